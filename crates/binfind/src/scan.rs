//! In-order scan over every entry in the stream

use crate::config::{DELIMITER_LEN, EntryConfig};
use crate::entry::Entry;
use crate::locate::locate_from;
use crate::stream::RecordStream;
use crate::Result;

/// Iterator yielding entries front to back.
///
/// Each step is a [`locate_from`] call at the end of the previous entry.
/// The iterator stops at the stream end, or after yielding the first
/// error.
pub struct Entries<'a, S: RecordStream + ?Sized> {
    stream: &'a mut S,
    config: EntryConfig,
    len: u64,
    next: Option<u64>,
}

impl<'a, S: RecordStream + ?Sized> Entries<'a, S> {
    /// Start a scan at offset 0. The stream length is read once, here.
    pub fn new(stream: &'a mut S, config: &EntryConfig) -> Result<Self> {
        let len = stream.total_len()?;
        Ok(Self {
            stream,
            config: config.clone(),
            len,
            next: Some(0),
        })
    }
}

impl<S: RecordStream + ?Sized> Iterator for Entries<'_, S> {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        let offset = self.next?;

        // A trailing delimiter with nothing after it ends the scan
        let content_start = if offset == 0 { 0 } else { offset + DELIMITER_LEN };
        if content_start >= self.len {
            self.next = None;
            return None;
        }

        match locate_from(&mut *self.stream, offset, &self.config) {
            Ok(entry) => {
                self.next = Some(entry.end);
                Some(Ok(entry))
            }
            Err(e) => {
                self.next = None;
                Some(Err(e))
            }
        }
    }
}

/// Scan all entries of `stream` in order
pub fn entries<'a, S: RecordStream + ?Sized>(
    stream: &'a mut S,
    config: &EntryConfig,
) -> Result<Entries<'a, S>> {
    Entries::new(stream, config)
}
