//! Sorted insertion of fixed-length-key entries
//!
//! The insertion point comes from the offset binary search in
//! [`crate::search`]. A gap of `key + value + delimiter` bytes is then
//! opened next to the anchor entry and filled in place:
//!
//! ```text
//! before anchor:  [gap: key value \n][anchor ...]
//! after anchor:   [... anchor][gap: \n key value]
//! ```

use std::ops::Range;

use tracing::debug;

use crate::config::{DELIMITER_LEN, DuplicateKeyPolicy, EntryConfig};
use crate::entry::Entry;
use crate::gap::GapOpener;
use crate::search::{Anchor, search_anchor};
use crate::stream::RecordStream;
use crate::{BinfindError, Result};

/// Side of the anchor entry the new entry is written to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    /// Gap opened at the anchor start
    Before(u64),
    /// Gap opened at the anchor end
    After(u64),
}

/// Insert `key ++ value` so the stream stays sorted by key.
///
/// All entries in the stream must carry keys of `key.len()` bytes. Returns
/// the new entry with its span after the shift.
///
/// # Errors
///
/// - [`BinfindError::InvalidConfig`] if `config` fails validation
/// - [`BinfindError::EntryTooLarge`] if `key.len() + value.len()` exceeds
///   the maximum entry size, checked before any I/O
/// - [`BinfindError::DuplicateKey`] if the key exists and the policy is
///   [`DuplicateKeyPolicy::Reject`]; the stream is left untouched
/// - locator errors when the stream is not well formed
pub fn insert<S: RecordStream + ?Sized>(
    stream: &mut S,
    key: &[u8],
    value: &[u8],
    config: &EntryConfig,
) -> Result<Entry> {
    let len = stream.total_len()?;
    insert_in_range(stream, key, value, 0..len, config)
}

/// Insert `key ++ value` into the sorted section `range` of the stream.
///
/// For streams holding several independently sorted sections. `range`
/// starts at the first entry of the section and ends at the end of its
/// last entry; only entries inside it are probed. An empty range places
/// the entry at `range.start`, and a range starting at the stream end
/// appends after the last entry.
///
/// # Errors
///
/// - [`BinfindError::InvalidRange`] if `range` is reversed or ends past
///   the stream end
/// - everything [`insert`] can return
pub fn insert_in_range<S: RecordStream + ?Sized>(
    stream: &mut S,
    key: &[u8],
    value: &[u8],
    range: Range<u64>,
    config: &EntryConfig,
) -> Result<Entry> {
    config.validate()?;
    let size = key.len() + value.len();
    if size > config.maximum_entry_size {
        return Err(BinfindError::EntryTooLarge {
            size,
            maximum: config.maximum_entry_size,
        });
    }

    let len = stream.total_len()?;
    if range.start > range.end || range.end > len {
        return Err(BinfindError::InvalidRange {
            start: range.start,
            end: range.end,
            len,
        });
    }

    let mut content = Vec::with_capacity(size);
    content.extend_from_slice(key);
    content.extend_from_slice(value);

    if range.start == len {
        // Stream boundaries double as delimiters
        let start = if len == 0 { 0 } else { len + DELIMITER_LEN };
        let mut bytes = Vec::with_capacity(size + 1);
        if len > 0 {
            bytes.push(config.delimiter);
        }
        bytes.extend_from_slice(&content);
        stream.write_at(len, &bytes)?;
        debug!("appended {} byte entry at offset {}", size, start);
        return Ok(Entry::new(content, start, start + size as u64));
    }

    let config = config.for_key_len(key.len());
    let anchor = if range.is_empty() {
        None
    } else {
        Some(search_anchor(stream, key, range.clone(), &config)?)
    };
    let placement = match anchor {
        None => Placement::Before(range.start),
        Some(Anchor::Match(existing)) => match config.duplicate_policy {
            DuplicateKeyPolicy::InsertBefore => Placement::Before(existing.start),
            DuplicateKeyPolicy::InsertAfter => Placement::After(existing.end),
            DuplicateKeyPolicy::Reject => {
                return Err(BinfindError::DuplicateKey {
                    offset: existing.start,
                });
            }
        },
        Some(Anchor::Nearest(anchor)) if key < anchor.key(key.len()) => {
            Placement::Before(anchor.start)
        }
        Some(Anchor::Nearest(anchor)) => Placement::After(anchor.end),
    };

    let gap = size as u64 + DELIMITER_LEN;
    let mut opener = GapOpener::new(config.chunk_size);
    let (start, bytes) = match placement {
        Placement::Before(at) => {
            let mut bytes = content.clone();
            bytes.push(config.delimiter);
            opener.open(stream, at, gap)?;
            stream.write_at(at, &bytes)?;
            (at, bytes)
        }
        Placement::After(at) => {
            let mut bytes = Vec::with_capacity(size + 1);
            bytes.push(config.delimiter);
            bytes.extend_from_slice(&content);
            opener.open(stream, at, gap)?;
            stream.write_at(at, &bytes)?;
            (at + DELIMITER_LEN, bytes)
        }
    };

    debug!(
        "inserted {} byte entry {:?}, wrote {} bytes, moved {} bytes",
        size,
        placement,
        bytes.len(),
        opener.bytes_moved()
    );
    Ok(Entry::new(content, start, start + size as u64))
}
