//! Error types for seglog
//!
//! Provides a unified error type for store and index operations.

use thiserror::Error;

/// Result type alias using LogError
pub type Result<T> = std::result::Result<T, LogError>;

/// Unified error type for segment storage operations
#[derive(Debug, Error)]
pub enum LogError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // End-of-file Errors
    // -------------------------------------------------------------------------
    /// A store read addressed bytes past the committed data
    #[error("Position {position} out of range (store size {size})")]
    OutOfRange { position: u64, size: u64 },

    /// An index read addressed an entry that has not been written
    #[error("Index entry {entry} not found ({entries} entries written)")]
    EntryNotFound { entry: i64, entries: u64 },

    /// The mapped index region has no room for another entry
    #[error("Index full ({max_bytes} bytes reserved)")]
    IndexFull { max_bytes: u64 },

    // -------------------------------------------------------------------------
    // Index Errors
    // -------------------------------------------------------------------------
    #[error("Mapped access [{offset}, {offset}+{len}) outside {mapped} mapped bytes")]
    MapOutOfBounds { offset: u64, len: u64, mapped: u64 },

    #[error("Index corruption detected: {0}")]
    IndexCorruption(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LogError {
    /// True for the end-of-file class: reads past committed data and a full index.
    ///
    /// Callers use this to tell "not yet written" (or "rotate now") apart from a
    /// genuine I/O fault.
    pub fn is_eof(&self) -> bool {
        matches!(
            self,
            LogError::OutOfRange { .. } | LogError::EntryNotFound { .. } | LogError::IndexFull { .. }
        )
    }
}
