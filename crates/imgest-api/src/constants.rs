//! API constants

/// API base path prefix
pub const API_PREFIX: &str = "/api";

/// Multipart field names accepted for the uploaded image, in order of preference
pub const UPLOAD_FIELD_NAMES: [&str; 2] = ["image_file", "file"];

/// Room for multipart boundaries and part headers on top of the file size cap
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub const DEFAULT_PAGE_SIZE: i64 = 50;

pub const HEADER_TOTAL_COUNT: &str = "x-total-count";
pub const HEADER_PAGE: &str = "x-page";
pub const HEADER_PAGE_SIZE: &str = "x-page-size";
pub const HEADER_TOTAL_PAGES: &str = "x-total-pages";
