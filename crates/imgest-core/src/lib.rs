//! Imgest Core Library
//!
//! This crate provides the domain models, error taxonomy and configuration
//! shared by every imgest component.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{Config, IngestConfig, LogFormat};
pub use error::{AppError, ErrorCategory, ErrorMetadata, LogLevel};
pub use models::{ImagePage, ImageRecord, ImageResponse, ImageStatus};
