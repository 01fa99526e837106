//! Binary search over byte offsets for fixed-length keys
//!
//! Midpoints are resolved to whole entries with [`locate_containing`].
//! The bounds always sit on entry boundaries: `low` at the end of an entry
//! with a smaller key (or the stream start) and `high` at the delimiter
//! before an entry with a larger key (or the stream end). The search has
//! converged once two consecutive midpoints resolve to the same entry.

use std::cmp::Ordering;
use std::ops::Range;

use tracing::trace;

use crate::config::{DELIMITER_LEN, EntryConfig};
use crate::entry::Entry;
use crate::locate::locate_containing;
use crate::stream::RecordStream;
use crate::Result;

/// Where the search stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Anchor {
    /// An entry with exactly the requested key
    Match(Entry),
    /// The entry the search converged on; the key belongs next to it
    Nearest(Entry),
}

/// Binary search `range` for `key`.
///
/// `range` must be non-empty, start at an entry start and end at the end
/// of an entry, with the entries inside sorted by key.
pub(crate) fn search_anchor<S: RecordStream + ?Sized>(
    stream: &mut S,
    key: &[u8],
    range: Range<u64>,
    config: &EntryConfig,
) -> Result<Anchor> {
    let mut low = range.start;
    let mut high = range.end;
    let mut previous: Option<(u64, u64)> = None;
    let mut iterations = 0usize;

    loop {
        iterations += 1;
        let mid = low + high.saturating_sub(low) / 2;
        let entry = locate_containing(stream, mid, config)?;
        let ordering = entry.key(key.len()).cmp(key);
        trace!(
            "search mid={} low={} high={} resolved [{}, {}) {:?}",
            mid, low, high, entry.start, entry.end, ordering
        );

        if ordering == Ordering::Equal {
            trace!("search matched after {} iterations", iterations);
            return Ok(Anchor::Match(entry));
        }
        if previous == Some(entry.span()) {
            trace!("search converged after {} iterations", iterations);
            return Ok(Anchor::Nearest(entry));
        }

        previous = Some(entry.span());
        match ordering {
            Ordering::Less => low = entry.end,
            _ => high = entry.start.saturating_sub(DELIMITER_LEN),
        }
    }
}

/// Look up the entry holding exactly `key`.
///
/// Read-only. With duplicate keys any one of the matching entries may be
/// returned.
///
/// # Errors
///
/// [`BinfindError::InvalidConfig`](crate::BinfindError::InvalidConfig) if
/// `config` fails validation; locator errors when the stream is not well
/// formed.
pub fn find<S: RecordStream + ?Sized>(
    stream: &mut S,
    key: &[u8],
    config: &EntryConfig,
) -> Result<Option<Entry>> {
    config.validate()?;
    // No entry can hold a key longer than the maximum
    if key.len() > config.maximum_entry_size {
        return Ok(None);
    }

    let len = stream.total_len()?;
    if len == 0 {
        return Ok(None);
    }

    let config = config.for_key_len(key.len());
    match search_anchor(stream, key, 0..len, &config)? {
        Anchor::Match(entry) => Ok(Some(entry)),
        Anchor::Nearest(_) => Ok(None),
    }
}
