//! File name derivation for stored images.
//!
//! Format: `{id}.{original_basename}`.

use crate::error::{StorageError, StorageResult};
use uuid::Uuid;

/// Longest file name most filesystems accept (NAME_MAX), in bytes.
pub const MAX_FILE_NAME_BYTES: usize = 255;

/// Final path component of a client-supplied filename.
///
/// Both `/` and `\` count as separators since browsers on Windows may send full paths.
pub fn basename(original_filename: &str) -> StorageResult<&str> {
    let name = original_filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    if name.is_empty() || name == "." || name == ".." || name.contains('\0') {
        return Err(StorageError::InvalidName(format!(
            "'{}' has no usable file name",
            original_filename
        )));
    }

    Ok(name)
}

/// Generate the stored file name for a record id and the upload's original filename.
///
/// Names that would not fit in a single path component are rejected up front.
pub fn image_file_name(id: Uuid, original_filename: &str) -> StorageResult<String> {
    let name = basename(original_filename)?;
    let file_name = format!("{}.{}", id, name);
    if file_name.len() > MAX_FILE_NAME_BYTES {
        return Err(StorageError::InvalidName(format!(
            "file name is {} bytes long; at most {} bytes are allowed",
            name.len(),
            MAX_FILE_NAME_BYTES - (file_name.len() - name.len())
        )));
    }
    Ok(file_name)
}
