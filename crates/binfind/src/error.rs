//! Error types for record location and insertion

use thiserror::Error;

/// Result type for binfind operations
pub type Result<T> = std::result::Result<T, BinfindError>;

/// Errors that can occur while locating or inserting records
#[derive(Debug, Error)]
pub enum BinfindError {
    /// No leading delimiter within the read window at a nonzero offset
    #[error("Failed to locate entry start delimiter for offset {offset}")]
    StartDelimiterNotFound {
        /// Offset the search started from
        offset: u64,
    },

    /// No terminating delimiter within the maximum entry size
    #[error("Failed to locate entry end delimiter for offset {offset}")]
    EndDelimiterNotFound {
        /// Offset the search started from
        offset: u64,
    },

    /// Key and value together exceed the maximum entry size
    #[error("Entry too large: {size} > {maximum}")]
    EntryTooLarge {
        /// Combined key and value length in bytes
        size: usize,
        /// Configured maximum entry size
        maximum: usize,
    },

    /// Key already present and the duplicate policy rejects it
    #[error("Duplicate key at offset {offset}")]
    DuplicateKey {
        /// Start offset of the existing entry
        offset: u64,
    },

    /// Gap requested beyond the end of the stream
    #[error("Offset {offset} beyond stream length {len}")]
    OffsetOutOfBounds {
        /// Requested offset
        offset: u64,
        /// Stream length at the time of the request
        len: u64,
    },

    /// Insertion range outside the stream or reversed
    #[error("Invalid range {start}..{end} for stream length {len}")]
    InvalidRange {
        /// Range start offset
        start: u64,
        /// Range end offset
        end: u64,
        /// Stream length at the time of the request
        len: u64,
    },

    /// Configuration rejected by validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error from the underlying stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BinfindError {
    /// Check if this error points at malformed stream contents
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Self::StartDelimiterNotFound { .. } | Self::EndDelimiterNotFound { .. }
        )
    }

    /// Check if the caller can correct this error by changing its input
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::EntryTooLarge { .. }
                | Self::DuplicateKey { .. }
                | Self::OffsetOutOfBounds { .. }
                | Self::InvalidRange { .. }
                | Self::InvalidConfig(_)
        )
    }
}
