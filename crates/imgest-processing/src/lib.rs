//! Imgest Media Processing Library
//!
//! This crate provides the leaf utilities of the ingestion pipeline: content
//! checksums and width-normalizing resizes.

pub mod checksum;
pub mod image;

// Re-export commonly used types
pub use checksum::{checksum_reader, sha256_file, CHUNK_SIZE};
pub use crate::image::{ImageResize, ResizeError};
