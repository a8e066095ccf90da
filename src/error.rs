//! Error types for storage backends
//!
//! Nothing in the frame loop returns these. They surface only from the
//! persistence layer, and callers there log and fall back to defaults.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying file or storage I/O failed
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Stored value exists but could not be decoded
    #[error("stored value is corrupt: {0}")]
    Parse(#[from] serde_json::Error),

    /// Stored value decoded but has the wrong shape
    #[error("stored value is corrupt: {0}")]
    Corrupt(String),

    /// Backend is not reachable (no window, storage disabled, quota...)
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
