//! Sorted, delimiter-framed record storage inside a single seekable stream
//!
//! Entries are byte strings separated by a single delimiter byte and kept
//! sorted by a fixed-length key prefix. There is no index: every lookup
//! and insertion recovers entries straight from the stream bytes, reading
//! at most a couple of maximum-size windows per probe.
//!
//! # Components
//!
//! - **Entry location**: [`locate_from`] finds the first entry at or after
//!   an offset, [`locate_containing`] the entry spanning an offset
//! - **Sorted insertion**: [`insert`] binary-searches byte offsets for the
//!   insertion point and writes the entry in place; [`insert_in_range`]
//!   confines the search to one sorted section of the stream
//! - **Gap opening**: [`open_gap`] shifts trailing bytes forward in bounded
//!   chunks to make room
//!
//! The stream is owned by the caller and only needs to implement
//! [`RecordStream`], which is provided for [`std::fs::File`] and
//! `Cursor<Vec<u8>>`. Callers must serialize access; an interrupted insert
//! can leave the stream corrupted.
//!
//! # Examples
//!
//! ```
//! use binfind::SortedStream;
//! use std::io::Cursor;
//!
//! let mut sorted = SortedStream::new(Cursor::new(Vec::new()));
//! sorted.insert(b"BB", b"2")?;
//! sorted.insert(b"AA", b"1")?;
//! assert_eq!(sorted.get_ref().get_ref().as_slice(), b"AA1\nBB2");
//!
//! let entry = sorted.find(b"BB")?.expect("key present");
//! assert_eq!((entry.start, entry.end), (4, 7));
//! # Ok::<(), binfind::BinfindError>(())
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod entry;
pub mod error;
pub mod gap;
pub mod insert;
pub mod locate;
pub mod scan;
pub mod search;
pub mod sorted;
pub mod stream;

pub use config::{DuplicateKeyPolicy, EntryConfig};
pub use entry::Entry;
pub use error::{BinfindError, Result};
pub use gap::{GapOpener, open_gap};
pub use insert::{insert, insert_in_range};
pub use locate::{locate_containing, locate_from};
pub use scan::{Entries, entries};
pub use search::find;
pub use sorted::SortedStream;
pub use stream::RecordStream;
