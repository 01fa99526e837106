//! Configuration for record location and insertion

use serde::{Deserialize, Serialize};

use crate::{BinfindError, Result};

/// Default record delimiter
pub const DEFAULT_DELIMITER: u8 = b'\n';

/// Default minimum entry size hint
pub const DEFAULT_MINIMUM_ENTRY_SIZE: usize = 1;

/// Default maximum entry size
pub const DEFAULT_MAXIMUM_ENTRY_SIZE: usize = 128;

/// Default gap shifting chunk size (1 MiB)
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

/// Delimiter length in bytes. Only single-byte delimiters are supported.
pub const DELIMITER_LEN: u64 = 1;

/// Where an entry goes when its key is already present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKeyPolicy {
    /// Insert immediately before the existing entry
    InsertBefore,
    /// Insert immediately after the existing entry
    #[default]
    InsertAfter,
    /// Fail with [`BinfindError::DuplicateKey`] and leave the stream untouched
    Reject,
}

/// Configuration shared by the locator, the inserter and the gap opener
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryConfig {
    /// Single byte separating entries
    pub delimiter: u8,

    /// Minimum entry content length, used to skip bytes while searching
    /// for the trailing delimiter
    pub minimum_entry_size: usize,

    /// Maximum entry content length (enforced)
    pub maximum_entry_size: usize,

    /// Number of bytes moved per step when opening a gap
    pub chunk_size: usize,

    /// Placement of entries whose key already exists
    pub duplicate_policy: DuplicateKeyPolicy,
}

impl Default for EntryConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            minimum_entry_size: DEFAULT_MINIMUM_ENTRY_SIZE,
            maximum_entry_size: DEFAULT_MAXIMUM_ENTRY_SIZE,
            chunk_size: DEFAULT_CHUNK_SIZE,
            duplicate_policy: DuplicateKeyPolicy::default(),
        }
    }
}

impl EntryConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delimiter byte
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the minimum entry size hint
    #[must_use]
    pub const fn with_minimum_entry_size(mut self, size: usize) -> Self {
        self.minimum_entry_size = size;
        self
    }

    /// Set the maximum entry size
    #[must_use]
    pub const fn with_maximum_entry_size(mut self, size: usize) -> Self {
        self.maximum_entry_size = size;
        self
    }

    /// Set the gap shifting chunk size
    #[must_use]
    pub const fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Set the duplicate key policy
    #[must_use]
    pub const fn with_duplicate_policy(mut self, policy: DuplicateKeyPolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Check that the values can drive a search
    pub fn validate(&self) -> Result<()> {
        if self.maximum_entry_size == 0 {
            return Err(BinfindError::InvalidConfig(
                "maximum_entry_size must be greater than zero".into(),
            ));
        }
        if self.chunk_size == 0 {
            return Err(BinfindError::InvalidConfig(
                "chunk_size must be greater than zero".into(),
            ));
        }
        if self.minimum_entry_size > self.maximum_entry_size {
            return Err(BinfindError::InvalidConfig(format!(
                "minimum_entry_size {} exceeds maximum_entry_size {}",
                self.minimum_entry_size, self.maximum_entry_size
            )));
        }
        Ok(())
    }

    /// Copy of this configuration with the minimum entry size raised to
    /// at least `key_len`, since every entry holds a full key.
    pub(crate) fn for_key_len(&self, key_len: usize) -> Self {
        Self {
            minimum_entry_size: self.minimum_entry_size.max(key_len),
            ..self.clone()
        }
    }

    /// Bytes read by the first locator read: the maximum entry plus a
    /// delimiter on each side.
    pub(crate) const fn read_window(&self) -> usize {
        self.maximum_entry_size + 2 * DELIMITER_LEN as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EntryConfig::default();
        assert_eq!(config.delimiter, b'\n');
        assert_eq!(config.minimum_entry_size, 1);
        assert_eq!(config.maximum_entry_size, 128);
        assert_eq!(config.chunk_size, 1024 * 1024);
        assert_eq!(config.duplicate_policy, DuplicateKeyPolicy::InsertAfter);
        assert!(config.validate().is_ok());
        assert_eq!(config.read_window(), 130);
    }

    #[test]
    fn test_builder() {
        let config = EntryConfig::new()
            .with_delimiter(b'|')
            .with_minimum_entry_size(4)
            .with_maximum_entry_size(64)
            .with_chunk_size(16)
            .with_duplicate_policy(DuplicateKeyPolicy::Reject);

        assert_eq!(config.delimiter, b'|');
        assert_eq!(config.minimum_entry_size, 4);
        assert_eq!(config.maximum_entry_size, 64);
        assert_eq!(config.chunk_size, 16);
        assert_eq!(config.duplicate_policy, DuplicateKeyPolicy::Reject);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(matches!(
            EntryConfig::new().with_maximum_entry_size(0).validate(),
            Err(BinfindError::InvalidConfig(_))
        ));
        assert!(matches!(
            EntryConfig::new().with_chunk_size(0).validate(),
            Err(BinfindError::InvalidConfig(_))
        ));
        assert!(matches!(
            EntryConfig::new()
                .with_minimum_entry_size(10)
                .with_maximum_entry_size(8)
                .validate(),
            Err(BinfindError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_key_len_raises_minimum() {
        let config = EntryConfig::new().for_key_len(8);
        assert_eq!(config.minimum_entry_size, 8);

        let config = EntryConfig::new().with_minimum_entry_size(12).for_key_len(8);
        assert_eq!(config.minimum_entry_size, 12);
    }

    #[test]
    fn test_serde_partial_config() {
        let config: EntryConfig =
            serde_json::from_str(r#"{"maximum_entry_size": 32, "duplicate_policy": "reject"}"#)
                .unwrap();
        assert_eq!(config.maximum_entry_size, 32);
        assert_eq!(config.duplicate_policy, DuplicateKeyPolicy::Reject);
        assert_eq!(config.delimiter, DEFAULT_DELIMITER);
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
    }
}
