//! Imgest Storage Library
//!
//! This crate owns the on-disk layout of permanently stored images.
//!
//! # Path format
//!
//! Every stored image lives directly under the configured base directory as
//! `{base_path}/{id}.{original_basename}`. The record id prefix keeps paths unique
//! even when two uploads share a filename. Basenames must not be empty, `.` or `..`.
//! Name derivation is centralized in the `keys` module.

pub mod error;
pub(crate) mod keys;
pub mod local;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use local::LocalStorage;
