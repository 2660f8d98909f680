use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io;
use std::path::Path;
use utoipa::ToSchema;
use uuid::Uuid;

/// Processing status of an ingested image.
///
/// `InProgress` is only the column default; a record returned by ingestion is always
/// `Done` or `Corrupted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "image_status", rename_all = "SCREAMING_SNAKE_CASE")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImageStatus {
    InProgress,
    /// The checksum of the stored file was computed.
    Done,
    /// The stored file could not be produced or read back.
    Corrupted,
}

impl Display for ImageStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ImageStatus::InProgress => write!(f, "IN_PROGRESS"),
            ImageStatus::Done => write!(f, "DONE"),
            ImageStatus::Corrupted => write!(f, "CORRUPTED"),
        }
    }
}

/// A stored image and the outcome of its processing.
///
/// `checksum` and `status` have no setters: they only come out of [`ImageRecord::derive`]
/// or from a row that was itself written from a derived record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ImageRecord {
    id: Uuid,
    path: String,
    checksum: Option<String>,
    status: ImageStatus,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
}

impl ImageRecord {
    /// Derive a record for the file stored at `path`.
    ///
    /// `checksum` is run once over `path`; its success decides the status. A file that is
    /// missing or unreadable yields `Corrupted` with no checksum.
    pub fn derive<F>(id: Uuid, path: impl Into<String>, checksum: F) -> Self
    where
        F: FnOnce(&Path) -> io::Result<String>,
    {
        let path = path.into();
        let (checksum, status) = match checksum(Path::new(&path)) {
            Ok(digest) => (Some(digest), ImageStatus::Done),
            Err(_) => (None, ImageStatus::Corrupted),
        };
        // Postgres keeps microseconds
        let now = Utc::now().trunc_subsecs(6);

        ImageRecord {
            id,
            path,
            checksum,
            status,
            created: now,
            updated: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn checksum(&self) -> Option<&str> {
        self.checksum.as_deref()
    }

    pub fn status(&self) -> ImageStatus {
        self.status
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn updated(&self) -> DateTime<Utc> {
        self.updated
    }

    pub fn is_done(&self) -> bool {
        self.status == ImageStatus::Done
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImageResponse {
    pub id: Uuid,
    pub path: String,
    pub checksum: Option<String>,
    pub status: ImageStatus,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl From<ImageRecord> for ImageResponse {
    fn from(image: ImageRecord) -> Self {
        ImageResponse {
            id: image.id,
            path: image.path,
            checksum: image.checksum,
            status: image.status,
            created: image.created,
            updated: image.updated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIGEST: &str = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08";

    #[test]
    fn test_derive_done_when_checksum_succeeds() {
        let id = Uuid::new_v4();
        let record = ImageRecord::derive(id, "/srv/images/a.jpg", |_| Ok(DIGEST.to_string()));

        assert_eq!(record.id(), id);
        assert_eq!(record.path(), "/srv/images/a.jpg");
        assert_eq!(record.checksum(), Some(DIGEST));
        assert_eq!(record.status(), ImageStatus::Done);
        assert_eq!(record.created(), record.updated());
        assert!(record.is_done());
    }

    #[test]
    fn test_derive_corrupted_when_checksum_fails() {
        let record = ImageRecord::derive(Uuid::new_v4(), "/srv/images/b.jpg", |_| {
            Err(io::Error::new(io::ErrorKind::NotFound, "gone"))
        });

        assert_eq!(record.status(), ImageStatus::Corrupted);
        assert_eq!(record.checksum(), None);
    }

    #[test]
    fn test_derive_checksums_the_given_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stored.bin");
        std::fs::write(&path, b"stored bytes").unwrap();

        let record = ImageRecord::derive(Uuid::new_v4(), path.to_string_lossy(), |p| {
            std::fs::read(p).map(|bytes| format!("{}", bytes.len()))
        });

        assert_eq!(record.checksum(), Some("12"));
    }

    #[test]
    fn test_status_serializes_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&ImageStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        assert_eq!(ImageStatus::Corrupted.to_string(), "CORRUPTED");
        let parsed: ImageStatus = serde_json::from_str("\"DONE\"").unwrap();
        assert_eq!(parsed, ImageStatus::Done);
    }

    #[test]
    fn test_image_response_from_record() {
        let record = ImageRecord::derive(Uuid::new_v4(), "/srv/images/c.png", |_| {
            Ok(DIGEST.to_string())
        });
        let response = ImageResponse::from(record.clone());

        assert_eq!(response.id, record.id());
        assert_eq!(response.path, record.path());
        assert_eq!(response.checksum.as_deref(), Some(DIGEST));
        assert_eq!(response.status, ImageStatus::Done);
        assert_eq!(response.created, record.created());
    }
}
