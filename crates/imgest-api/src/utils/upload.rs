//! Staging of multipart uploads into temporary files

use crate::constants::UPLOAD_FIELD_NAMES;
use crate::error::HttpAppError;
use axum::extract::Multipart;
use axum::http::HeaderMap;
use imgest_core::AppError;
use imgest_services::StagedUpload;
use std::path::Path;
use tokio::io::AsyncWriteExt;

const FALLBACK_FILENAME: &str = "upload";
const MAX_TEMP_STEM_CHARS: usize = 64;
const MAX_TEMP_EXTENSION_CHARS: usize = 16;

/// Temp file prefix and suffix for a client filename: `{stem}.` and `.{ext}`.
///
/// Keeping the extension lets format sniffing fall back on it.
fn temp_name_parts(filename: &str) -> (String, String) {
    let path = Path::new(filename);
    let stem: String = path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(FALLBACK_FILENAME)
        .chars()
        .take(MAX_TEMP_STEM_CHARS)
        .collect();
    let suffix = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let ext: String = e.chars().take(MAX_TEMP_EXTENSION_CHARS).collect();
            format!(".{}", ext)
        })
        .unwrap_or_default();

    (format!("{}.", stem), suffix)
}

fn header_pairs(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}

/// Stream the single image field of `multipart` into a temporary file.
///
/// Accepts exactly one field named `image_file` or `file`; other fields are ignored.
/// The staged upload carries that field's part headers, not the request headers.
/// The file is capped at `max_size` bytes (413 beyond that) and never held in memory.
pub async fn stage_multipart_image(
    mut multipart: Multipart,
    max_size: usize,
) -> Result<StagedUpload, HttpAppError> {
    let mut staged: Option<StagedUpload> = None;

    while let Some(mut field) = multipart.next_field().await? {
        let is_image_field = field
            .name()
            .is_some_and(|name| UPLOAD_FIELD_NAMES.contains(&name));
        if !is_image_field {
            continue;
        }
        if staged.is_some() {
            return Err(AppError::InvalidInput(
                "Multiple file fields are not allowed; send exactly one field named 'image_file'"
                    .to_string(),
            )
            .into());
        }

        let original_filename = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| FALLBACK_FILENAME.to_string());
        let content_type = field.content_type().map(str::to_string);
        let part_headers = header_pairs(field.headers());

        let (prefix, suffix) = temp_name_parts(&original_filename);
        let temp_file = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(&suffix)
            .tempfile()
            .map_err(AppError::from)?;
        let (file, temp_path) = temp_file.into_parts();
        let mut file = tokio::fs::File::from_std(file);

        let mut written = 0usize;
        while let Some(chunk) = field.chunk().await? {
            written += chunk.len();
            if written > max_size {
                return Err(AppError::PayloadTooLarge(format!(
                    "File size exceeds maximum allowed size of {} MB",
                    max_size / 1024 / 1024
                ))
                .into());
            }
            file.write_all(&chunk).await.map_err(AppError::from)?;
        }
        file.flush().await.map_err(AppError::from)?;

        tracing::debug!(
            original_filename = %original_filename,
            size_bytes = written,
            temp_path = %temp_path.display(),
            "Upload staged"
        );

        let mut upload =
            StagedUpload::new(temp_path, original_filename).with_headers(part_headers);
        upload.content_type = content_type;
        staged = Some(upload);
    }

    staged.ok_or_else(|| {
        AppError::InvalidInput("No file provided; expected a field named 'image_file'".to_string())
            .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::{header, HeaderValue, Request};

    const BOUNDARY: &str = "imgest-boundary";

    async fn multipart_request(body: &str) -> Multipart {
        let request = Request::builder()
            .method("POST")
            .uri("/api/submit")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .header(header::AUTHORIZATION, "Bearer secret-token")
            .header(header::COOKIE, "session=abc")
            .body(Body::from(body.replace('\n', "\r\n")))
            .unwrap();
        Multipart::from_request(request, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_staged_upload_carries_part_headers_only() {
        let body = format!(
            "--{b}\n\
             Content-Disposition: form-data; name=\"image_file\"; filename=\"photo.png\"\n\
             Content-Type: image/png\n\
             \n\
             not really a png\n\
             --{b}--\n",
            b = BOUNDARY
        );

        let staged = stage_multipart_image(multipart_request(&body).await, 1024)
            .await
            .unwrap();

        assert_eq!(staged.original_filename, "photo.png");
        assert_eq!(staged.content_type.as_deref(), Some("image/png"));
        let names: Vec<&str> = staged.headers.iter().map(|(n, _)| n.as_str()).collect();
        assert!(names.contains(&"content-disposition"));
        assert!(!names.contains(&"authorization"));
        assert!(!names.contains(&"cookie"));
        assert_eq!(
            std::fs::read(&staged.temp_path).unwrap(),
            b"not really a png"
        );
    }

    #[tokio::test]
    async fn test_missing_file_field_is_invalid_input() {
        let body = format!(
            "--{b}\n\
             Content-Disposition: form-data; name=\"caption\"\n\
             \n\
             hello\n\
             --{b}--\n",
            b = BOUNDARY
        );

        let err = stage_multipart_image(multipart_request(&body).await, 1024)
            .await
            .unwrap_err();

        assert!(matches!(err.0, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_temp_name_parts_keep_stem_and_extension() {
        assert_eq!(
            temp_name_parts("holiday.photo.jpg"),
            ("holiday.photo.".to_string(), ".jpg".to_string())
        );
        assert_eq!(
            temp_name_parts("dir/scan.png"),
            ("scan.".to_string(), ".png".to_string())
        );
    }

    #[test]
    fn test_temp_name_parts_fallbacks() {
        assert_eq!(
            temp_name_parts("README"),
            ("README.".to_string(), String::new())
        );
        assert_eq!(temp_name_parts(".."), ("upload.".to_string(), String::new()));
        assert_eq!(temp_name_parts(""), ("upload.".to_string(), String::new()));
    }

    #[test]
    fn test_temp_name_parts_truncates_long_names() {
        let (prefix, _) = temp_name_parts(&format!("{}.png", "a".repeat(500)));
        assert_eq!(prefix.len(), MAX_TEMP_STEM_CHARS + 1);
    }

    #[test]
    fn test_header_pairs_skips_non_text_values() {
        let mut headers = HeaderMap::new();
        headers.insert("x-client", HeaderValue::from_static("cli"));
        headers.insert("x-binary", HeaderValue::from_bytes(&[0xFF, 0xFE]).unwrap());

        let pairs = header_pairs(&headers);

        assert_eq!(pairs, vec![("x-client".to_string(), "cli".to_string())]);
    }
}
