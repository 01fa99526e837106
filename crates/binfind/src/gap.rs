//! Gap opening by shifting trailing bytes toward the stream end
//!
//! The stream is grown first, then `[offset, old_len)` is relocated
//! `length` bytes forward in chunks, tail to head. Processing the highest
//! chunk first means no source byte is overwritten before it has been
//! read, even when `length` is smaller than a chunk.
//!
//! The stream is inconsistent until the last chunk lands. An interrupted
//! call leaves duplicated trailing bytes behind.

use tracing::debug;

use crate::stream::RecordStream;
use crate::{BinfindError, Result};

/// Buffered mover for shifting stream contents forward
pub struct GapOpener {
    /// I/O buffer, sized to one chunk
    buffer: Vec<u8>,
    /// Bytes relocated so far
    bytes_moved: u64,
}

impl GapOpener {
    /// Create a mover that relocates at most `chunk_size` bytes per step.
    ///
    /// A zero chunk size is clamped to one byte.
    pub fn new(chunk_size: usize) -> Self {
        Self {
            buffer: vec![0u8; chunk_size.max(1)],
            bytes_moved: 0,
        }
    }

    /// Get the chunk size.
    pub fn chunk_size(&self) -> usize {
        self.buffer.len()
    }

    /// Get total bytes moved.
    pub const fn bytes_moved(&self) -> u64 {
        self.bytes_moved
    }

    /// Grow `stream` by `length` bytes and shift everything at or after
    /// `offset` forward by `length`.
    ///
    /// `[offset, offset + length)` holds unspecified bytes afterwards. When
    /// `offset` equals the stream length nothing is shifted and the stream
    /// is only extended.
    ///
    /// # Errors
    ///
    /// [`BinfindError::OffsetOutOfBounds`] if `offset` lies past the stream
    /// end; I/O errors from the stream otherwise.
    pub fn open<S: RecordStream + ?Sized>(
        &mut self,
        stream: &mut S,
        offset: u64,
        length: u64,
    ) -> Result<()> {
        let old_len = stream.total_len()?;
        if offset > old_len {
            return Err(BinfindError::OffsetOutOfBounds {
                offset,
                len: old_len,
            });
        }
        if length == 0 {
            return Ok(());
        }

        stream.set_total_len(old_len + length)?;

        let chunk_size = self.buffer.len() as u64;
        let mut remaining_end = old_len;
        while remaining_end > offset {
            let chunk_start = remaining_end.saturating_sub(chunk_size).max(offset);
            let chunk = (remaining_end - chunk_start) as usize;
            let buf = &mut self.buffer[..chunk];

            stream.read_exact_at(chunk_start, buf)?;
            stream.write_at(chunk_start + length, buf)?;

            self.bytes_moved += chunk as u64;
            remaining_end = chunk_start;
        }

        debug!(
            "opened {} byte gap at offset {}, shifted {} bytes",
            length,
            offset,
            old_len - offset
        );
        Ok(())
    }
}

/// Open a `length` byte gap at `offset`, moving at most `chunk_size` bytes
/// at a time. See [`GapOpener::open`].
pub fn open_gap<S: RecordStream + ?Sized>(
    stream: &mut S,
    offset: u64,
    length: u64,
    chunk_size: usize,
) -> Result<()> {
    GapOpener::new(chunk_size).open(stream, offset, length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    #[test]
    fn test_open_gap_shifts_tail() {
        let mut s = Cursor::new(b"AA1BB2".to_vec());
        open_gap(&mut s, 3, 2, 4).unwrap();
        s.write_at(3, b"--").unwrap();
        assert_eq!(s.get_ref().as_slice(), b"AA1--BB2");
    }

    #[test]
    fn test_open_gap_at_start() {
        let mut s = Cursor::new(b"BB2".to_vec());
        open_gap(&mut s, 0, 4, 1).unwrap();
        s.write_at(0, b"AA1\n").unwrap();
        assert_eq!(s.get_ref().as_slice(), b"AA1\nBB2");
    }

    #[test]
    fn test_open_gap_at_end_only_extends() {
        let mut s = Cursor::new(b"AA1".to_vec());
        let mut opener = GapOpener::new(16);
        opener.open(&mut s, 3, 4).unwrap();
        assert_eq!(s.get_ref().len(), 7);
        assert_eq!(&s.get_ref()[..3], b"AA1");
        assert_eq!(opener.bytes_moved(), 0);
    }

    #[test]
    fn test_open_gap_past_end_fails() {
        let mut s = Cursor::new(b"AA1".to_vec());
        let err = open_gap(&mut s, 4, 2, 16).unwrap_err();
        assert!(matches!(
            err,
            BinfindError::OffsetOutOfBounds { offset: 4, len: 3 }
        ));
        assert_eq!(s.get_ref().as_slice(), b"AA1");
    }

    #[test]
    fn test_zero_chunk_size_clamped() {
        let mut opener = GapOpener::new(0);
        assert_eq!(opener.chunk_size(), 1);

        let mut s = Cursor::new(b"AA1BB2".to_vec());
        opener.open(&mut s, 3, 1).unwrap();
        s.write_at(3, b"-").unwrap();
        assert_eq!(s.get_ref().as_slice(), b"AA1-BB2");
        assert_eq!(opener.bytes_moved(), 3);
    }

    #[test]
    fn test_zero_length_gap_is_noop() {
        let mut s = Cursor::new(b"AA1".to_vec());
        open_gap(&mut s, 1, 0, 16).unwrap();
        assert_eq!(s.get_ref().as_slice(), b"AA1");
    }

    #[test]
    fn test_gap_smaller_than_chunk() {
        // Source and destination overlap inside every chunk
        let original = sample(100);
        let mut s = Cursor::new(original.clone());
        let mut opener = GapOpener::new(32);
        assert_eq!(opener.chunk_size(), 32);
        opener.open(&mut s, 10, 3).unwrap();

        let data = s.get_ref();
        assert_eq!(data.len(), 103);
        assert_eq!(&data[..10], &original[..10]);
        assert_eq!(&data[13..], &original[10..]);
        assert_eq!(opener.bytes_moved(), 90);
    }

    #[test]
    fn test_every_offset_and_chunk_size() {
        let original = sample(40);
        let fill = [0xEEu8; 5];
        for chunk_size in [1, 2, 3, 7, 16, 64] {
            for offset in 0..=original.len() {
                let mut s = Cursor::new(original.clone());
                open_gap(&mut s, offset as u64, fill.len() as u64, chunk_size).unwrap();
                s.write_at(offset as u64, &fill).unwrap();

                let data = s.get_ref();
                assert_eq!(data.len(), original.len() + fill.len());
                assert_eq!(&data[..offset], &original[..offset]);
                assert_eq!(&data[offset..offset + fill.len()], &fill);
                assert_eq!(
                    &data[offset + fill.len()..],
                    &original[offset..],
                    "chunk_size={chunk_size} offset={offset}"
                );
            }
        }
    }
}
