//! Stream handle bundling a caller-owned stream with its configuration

use std::ops::Range;

use crate::config::EntryConfig;
use crate::entry::Entry;
use crate::gap::open_gap;
use crate::insert::{insert, insert_in_range};
use crate::locate::{locate_containing, locate_from};
use crate::scan::Entries;
use crate::search::find;
use crate::stream::RecordStream;
use crate::Result;

/// A sorted, delimiter-framed stream
///
/// Holds no state between calls beyond the stream and configuration;
/// every operation recomputes entries from the stream bytes. Pass `&mut S`
/// to keep ownership of the stream on the caller side.
#[derive(Debug)]
pub struct SortedStream<S: RecordStream> {
    stream: S,
    config: EntryConfig,
}

impl<S: RecordStream> SortedStream<S> {
    /// Wrap `stream` with the default configuration
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            config: EntryConfig::default(),
        }
    }

    /// Wrap `stream` with `config` after validating it
    pub fn with_config(stream: S, config: EntryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { stream, config })
    }

    /// Get the configuration
    pub fn config(&self) -> &EntryConfig {
        &self.config
    }

    /// Current stream length in bytes
    pub fn len(&mut self) -> Result<u64> {
        Ok(self.stream.total_len()?)
    }

    /// Check if the stream holds no bytes
    pub fn is_empty(&mut self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// See [`locate_from`]
    pub fn locate_from(&mut self, offset: u64) -> Result<Entry> {
        locate_from(&mut self.stream, offset, &self.config)
    }

    /// See [`locate_containing`]
    pub fn locate_containing(&mut self, offset: u64) -> Result<Entry> {
        locate_containing(&mut self.stream, offset, &self.config)
    }

    /// See [`insert`]
    pub fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<Entry> {
        insert(&mut self.stream, key, value, &self.config)
    }

    /// See [`insert_in_range`]
    pub fn insert_in_range(
        &mut self,
        key: &[u8],
        value: &[u8],
        range: Range<u64>,
    ) -> Result<Entry> {
        insert_in_range(&mut self.stream, key, value, range, &self.config)
    }

    /// See [`find`]
    pub fn find(&mut self, key: &[u8]) -> Result<Option<Entry>> {
        find(&mut self.stream, key, &self.config)
    }

    /// Scan every entry in order
    pub fn entries(&mut self) -> Result<Entries<'_, S>> {
        Entries::new(&mut self.stream, &self.config)
    }

    /// Open a raw gap using the configured chunk size. See [`open_gap`].
    pub fn open_gap(&mut self, offset: u64, length: u64) -> Result<()> {
        open_gap(&mut self.stream, offset, length, self.config.chunk_size)
    }

    /// Get a reference to the underlying stream
    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    /// Get a mutable reference to the underlying stream
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    /// Unwrap the underlying stream
    pub fn into_inner(self) -> S {
        self.stream
    }
}
