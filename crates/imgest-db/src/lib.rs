//! Imgest Database Layer
//!
//! This crate provides the image repository and transaction helpers on top of
//! PostgreSQL. Schema migrations live in the workspace `migrations/` directory.
//
// Module declarations
pub mod db;

// Re-exports: Repositories
pub use db::ImageRepository;

// Re-exports: Error classification and transaction utilities
pub use db::error::classify_db_error;
pub use db::transaction::with_transaction;
