//! Entry location from arbitrary byte offsets
//!
//! Entries are recovered directly from stream bytes on every call. The
//! minimum and maximum entry sizes bound how much is read: at most two
//! reads per [`locate_from`] call, the first covering a full entry plus a
//! delimiter on each side and the second covering whatever the first one
//! could not.
//!
//! ```text
//!   offset
//!     v
//! ... x x \n A A 1 \n B B 2 ...
//!            ^-----^
//!          start   end
//! ```

use tracing::trace;

use crate::config::{DELIMITER_LEN, EntryConfig};
use crate::entry::Entry;
use crate::stream::RecordStream;
use crate::{BinfindError, Result};

/// Position of the first `delimiter` in `buf` at or after `from`
fn find_delimiter(buf: &[u8], delimiter: u8, from: usize) -> Option<usize> {
    buf.get(from..)?
        .iter()
        .position(|&b| b == delimiter)
        .map(|pos| pos + from)
}

/// Find the first entry whose leading delimiter is at or after `offset`.
///
/// Offset 0 is treated as sitting on an implicit delimiter, so the entry
/// starting the stream is returned. The stream end acts as a trailing
/// delimiter.
///
/// # Errors
///
/// - [`BinfindError::StartDelimiterNotFound`] if no delimiter follows a
///   nonzero `offset` within the read window
/// - [`BinfindError::EndDelimiterNotFound`] if the entry content exceeds
///   the maximum entry size
pub fn locate_from<S: RecordStream + ?Sized>(
    stream: &mut S,
    offset: u64,
    config: &EntryConfig,
) -> Result<Entry> {
    let window = config.read_window();
    let mut initial = stream.read_up_to(offset, window)?;
    let initial_len = initial.len();
    trace!("locate_from offset={} read {} of {} bytes", offset, initial_len, window);

    let (mut content, start) = if offset == 0 {
        (initial, 0)
    } else {
        let first = find_delimiter(&initial, config.delimiter, 0)
            .ok_or(BinfindError::StartDelimiterNotFound { offset })?;
        let skip = first + DELIMITER_LEN as usize;
        (initial.split_off(skip), offset + skip as u64)
    };

    // The terminator cannot sit inside the first minimum_entry_size bytes
    if let Some(end) = find_delimiter(&content, config.delimiter, config.minimum_entry_size) {
        // At offset 0 the window has no leading delimiter to trim
        if end > config.maximum_entry_size {
            return Err(BinfindError::EndDelimiterNotFound { offset });
        }
        content.truncate(end);
        return Ok(Entry::new(content, start, start + end as u64));
    }

    if initial_len < window {
        // Short read: the stream end terminates the entry
        if content.len() > config.maximum_entry_size {
            return Err(BinfindError::EndDelimiterNotFound { offset });
        }
        let end = start + content.len() as u64;
        return Ok(Entry::new(content, start, end));
    }

    let requested =
        (config.maximum_entry_size + DELIMITER_LEN as usize).saturating_sub(content.len());
    let tail = stream.read_up_to(offset + initial_len as u64, requested)?;
    trace!(
        "locate_from offset={} second read {} of {} bytes",
        offset,
        tail.len(),
        requested
    );

    let skip = config.minimum_entry_size.saturating_sub(content.len());
    match find_delimiter(&tail, config.delimiter, skip) {
        Some(end) => content.extend_from_slice(&tail[..end]),
        None if tail.len() < requested => content.extend_from_slice(&tail),
        None => return Err(BinfindError::EndDelimiterNotFound { offset }),
    }

    let end = start + content.len() as u64;
    Ok(Entry::new(content, start, end))
}

/// Find the entry whose span `start..=end` contains `offset`.
///
/// Starts one maximum entry before `offset` and walks forward entry by
/// entry until the span covers it. Prefer [`locate_from`] when any nearby
/// entry will do.
pub fn locate_containing<S: RecordStream + ?Sized>(
    stream: &mut S,
    offset: u64,
    config: &EntryConfig,
) -> Result<Entry> {
    let baseline = offset.saturating_sub(config.maximum_entry_size as u64 + DELIMITER_LEN);
    let mut entry = locate_from(stream, baseline, config)?;

    let mut steps = 0usize;
    while !entry.contains(offset) {
        entry = locate_from(stream, entry.end, config)?;
        steps += 1;
    }

    trace!(
        "locate_containing offset={} resolved [{}, {}) after {} steps",
        offset, entry.start, entry.end, steps
    );
    Ok(entry)
}
