//! Database repositories for data access layer
//
// Image records
pub mod image;
//
// Mapping of database failures onto the service error taxonomy
pub mod error;
//
// Transaction utilities
pub mod transaction;

pub use image::ImageRepository;
