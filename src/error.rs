//! Error types for dropslot.

use thiserror::Error;

/// Common error type for dropslot.
#[derive(Error, Debug)]
pub enum DropError {
    /// A token was registered twice.
    ///
    /// The token generator checks membership before handing a token out,
    /// so this only fires if a caller registers tokens by hand.
    #[error("duplicate token: {0}")]
    DuplicateToken(String),

    /// Token unknown, or not in the state the operation needs.
    ///
    /// Used-up and never-issued tokens deliberately share this variant.
    #[error("{0} not found")]
    NotFound(String),

    /// Accepting the upload would push stored bytes over the quota.
    #[error("storage quota exceeded: {requested} bytes requested, {used} of {limit} bytes in use")]
    QuotaExceeded {
        /// Size of the rejected upload.
        requested: u64,
        /// Bytes committed or reserved at the time of the check.
        used: u64,
        /// Configured maximum.
        limit: u64,
    },

    /// A single upload is larger than the per-file limit.
    #[error("file too large: {size} bytes (limit {limit})")]
    FileTooLarge {
        /// Size of the rejected upload.
        size: u64,
        /// Configured per-file maximum.
        limit: u64,
    },

    /// Uploaded file name cannot be used as a path component.
    #[error("invalid file name: {0:?}")]
    InvalidFileName(String),

    /// I/O error from the storage directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Validation error for input or configuration values.
    #[error("validation error: {0}")]
    Validation(String),

    /// Chat notification delivery failed.
    #[error("notification error: {0}")]
    Notify(String),
}

/// Result type alias for dropslot operations.
pub type Result<T> = std::result::Result<T, DropError>;
