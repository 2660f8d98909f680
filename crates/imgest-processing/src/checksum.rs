//! Streaming SHA-256 checksums.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Bytes read per iteration; memory use does not grow with the file.
pub const CHUNK_SIZE: usize = 4096;

/// Computes SHA-256 of everything `reader` yields and returns the hex-encoded digest.
pub fn checksum_reader<R: Read>(mut reader: R) -> io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Computes SHA-256 of an entire file and returns the hex-encoded digest.
pub fn sha256_file(path: &Path) -> io::Result<String> {
    let file = File::open(path)?;
    checksum_reader(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_known_digest() {
        let digest = checksum_reader(Cursor::new(b"test")).unwrap();
        assert_eq!(
            digest,
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        );
    }

    #[test]
    fn test_empty_input() {
        let digest = checksum_reader(Cursor::new(Vec::<u8>::new())).unwrap();
        assert_eq!(
            digest,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_multi_chunk_input_is_deterministic() {
        let data: Vec<u8> = (0..CHUNK_SIZE * 3 + 17).map(|i| (i % 251) as u8).collect();
        let first = checksum_reader(Cursor::new(&data)).unwrap();
        let second = checksum_reader(Cursor::new(&data)).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);

        let mut changed = data.clone();
        changed[CHUNK_SIZE + 1] ^= 0xFF;
        assert_ne!(first, checksum_reader(Cursor::new(&changed)).unwrap());
    }

    #[test]
    fn test_file_matches_reader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        std::fs::write(&path, b"test").unwrap();

        assert_eq!(
            sha256_file(&path).unwrap(),
            checksum_reader(Cursor::new(b"test")).unwrap()
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = sha256_file(&dir.path().join("missing.jpg")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
