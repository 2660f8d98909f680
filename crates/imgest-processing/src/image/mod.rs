//! Image processing module
//!
//! Width normalization of uploaded images (resize).

pub mod resize;

pub use resize::{ImageResize, ResizeError};
