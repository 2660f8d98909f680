//! Data models for the application
//!
//! The image record is the only persisted entity; `page` carries the listing result
//! together with the metadata needed to paginate it.

mod image;
mod page;

// Re-export all models for convenient imports
pub use image::*;
pub use page::*;
