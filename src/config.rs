//! Centralized capacity configuration for tables and images.
//!
//! Goals:
//! - Single place for the fixed capacity limits instead of compiled-in
//!   constants scattered through the format code.
//! - Save stamps these limits into the image header; load compares the
//!   header's limits against the reader's own, strictly on equality.
//!
//! The limits are part of the on-disk contract: two builds with different
//! limits cannot exchange images (load fails with Unsupported, never coerces).

use std::fmt;

use crate::errors::{PersistError, Result};

/// Fixed capacity limits of a table engine build.
///
/// All fields travel in the image header as u16 (see `consts`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLimits {
    /// Maximum number of row slots per table (live + tombstoned).
    pub max_rows: u16,
    /// Maximum number of columns per table.
    pub max_cols: u16,
    /// Width of the column-name field in schema entries, bytes.
    pub max_name_len: u16,
    /// Width of a text cell, bytes. Longer values are truncated on insert.
    pub max_text_len: u16,
    /// Bucket count of the engine's hash index. Carried in the header for
    /// build compatibility checks only; the persistence core never hashes.
    pub hash_size: u16,
}

impl Default for TableLimits {
    fn default() -> Self {
        Self {
            max_rows: 128,
            max_cols: 8,
            max_name_len: 16,
            max_text_len: 32,
            hash_size: 16,
        }
    }
}

impl TableLimits {
    /// Fluent setters (builder-style) to override specific limits.

    pub fn with_max_rows(mut self, n: u16) -> Self {
        self.max_rows = n;
        self
    }

    pub fn with_max_cols(mut self, n: u16) -> Self {
        self.max_cols = n;
        self
    }

    pub fn with_max_name_len(mut self, n: u16) -> Self {
        self.max_name_len = n;
        self
    }

    pub fn with_max_text_len(mut self, n: u16) -> Self {
        self.max_text_len = n;
        self
    }

    pub fn with_hash_size(mut self, n: u16) -> Self {
        self.hash_size = n;
        self
    }

    /// Validate that the limits describe a usable build.
    pub fn validate(&self) -> Result<()> {
        if self.max_rows == 0 {
            return Err(PersistError::invalid("max_rows must be > 0"));
        }
        if self.max_cols == 0 {
            return Err(PersistError::invalid("max_cols must be > 0"));
        }
        if self.max_name_len == 0 {
            return Err(PersistError::invalid("max_name_len must be > 0"));
        }
        if self.max_text_len == 0 {
            return Err(PersistError::invalid("max_text_len must be > 0"));
        }
        if self.hash_size == 0 {
            return Err(PersistError::invalid("hash_size must be > 0"));
        }
        Ok(())
    }
}

impl fmt::Display for TableLimits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TableLimits {{ max_rows: {}, max_cols: {}, max_name_len: {}, max_text_len: {}, hash_size: {} }}",
            self.max_rows, self.max_cols, self.max_name_len, self.max_text_len, self.hash_size,
        )
    }
}
