//! Encodes user-selected files as base64 data URLs for JSON transport.
//!
//! Two ceilings apply: cover images may be at most
//! [`COVER_IMAGE_MAX_BYTES`], save archives at most
//! [`SAVE_ARCHIVE_MAX_BYTES`]. A file over its ceiling is rejected before it
//! is read, and the owning [`FileInput`] drops its selection so the user can
//! pick another file straight away.

mod data_url;
mod file_input;

pub use data_url::{detect_mime, encode_bytes, encode_file};
pub use file_input::FileInput;

/// Largest accepted cover image: 50 MiB.
pub const COVER_IMAGE_MAX_BYTES: u64 = 50 * 1024 * 1024;

/// Largest accepted save archive: 100 MiB.
pub const SAVE_ARCHIVE_MAX_BYTES: u64 = 100 * 1024 * 1024;

/// Errors produced while encoding a file.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("file is {size} bytes, limit is {limit} bytes")]
    SizeExceeded { size: u64, limit: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A fully encoded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedFile {
    /// Final path component of the source file.
    pub file_name: String,
    pub mime: String,
    pub size: u64,
    /// `data:<mime>;base64,<payload>`
    pub data_url: String,
}

/// Formats a byte count as whole mebibytes for user-facing messages.
pub fn format_limit(limit: u64) -> String {
    format!("{}MB", limit / (1024 * 1024))
}
