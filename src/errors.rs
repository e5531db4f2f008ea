//! Persistence error kinds, uniform across save and load.
//!
//! Policy: first error wins, nothing is swallowed or downgraded. There is no
//! logging side channel for failures — the status below is the whole story.

use thiserror::Error;

/// Uniform error for the persistence pipelines and storage backends.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Caller programming error (bad argument, misused storage). Never retried.
    #[error("invalid argument: {0}")]
    Invalid(String),

    /// A storage operation (write_all/read_all/erase) failed. Caller decides retry.
    #[error("storage i/o failed: {0}")]
    Io(String),

    /// Well-formed but incompatible data: wrong format version, mismatched
    /// capacity limits, or a column type that cannot be persisted.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Structurally invalid or checksum-mismatched image. Terminal for the image.
    #[error("corrupt image: {0}")]
    Corrupt(String),
}

impl PersistError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        PersistError::Invalid(msg.into())
    }
    pub fn io(msg: impl Into<String>) -> Self {
        PersistError::Io(msg.into())
    }
    pub fn unsupported(msg: impl Into<String>) -> Self {
        PersistError::Unsupported(msg.into())
    }
    pub fn corrupt(msg: impl Into<String>) -> Self {
        PersistError::Corrupt(msg.into())
    }
}

impl From<std::io::Error> for PersistError {
    fn from(e: std::io::Error) -> Self {
        PersistError::Io(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PersistError>;
