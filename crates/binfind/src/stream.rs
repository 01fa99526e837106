//! Positioned access to the byte stream holding the entries
//!
//! The stream is owned by the caller. Nothing here opens, flushes or
//! closes it; every operation seeks to an absolute offset first, so the
//! cursor position after a call is unspecified.

use std::fs::File;
use std::io::{self, Cursor, ErrorKind, Read, Seek, SeekFrom, Write};

/// A seekable, resizable byte stream
///
/// Only [`set_total_len`](Self::set_total_len) has to be implemented; the
/// positioned helpers are built on `Read + Write + Seek`.
pub trait RecordStream: Read + Write + Seek {
    /// Truncate or extend the stream to exactly `len` bytes.
    ///
    /// Bytes added by an extension are unspecified until written.
    fn set_total_len(&mut self, len: u64) -> io::Result<()>;

    /// Current length of the stream in bytes
    fn total_len(&mut self) -> io::Result<u64> {
        self.seek(SeekFrom::End(0))
    }

    /// Read up to `max` bytes starting at `offset`.
    ///
    /// A result shorter than `max` means the end of the stream was reached.
    fn read_up_to(&mut self, offset: u64, max: usize) -> io::Result<Vec<u8>> {
        self.seek(SeekFrom::Start(offset))?;

        let mut buf = vec![0u8; max];
        let mut filled = 0;
        while filled < max {
            match self.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(read) => filled += read,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        buf.truncate(filled);
        Ok(buf)
    }

    /// Fill `dst` with the bytes at `offset`, failing on a short read
    fn read_exact_at(&mut self, offset: u64, dst: &mut [u8]) -> io::Result<()> {
        self.seek(SeekFrom::Start(offset))?;
        self.read_exact(dst)
    }

    /// Write all of `src` at `offset`
    fn write_at(&mut self, offset: u64, src: &[u8]) -> io::Result<()> {
        self.seek(SeekFrom::Start(offset))?;
        self.write_all(src)
    }
}

impl RecordStream for File {
    fn set_total_len(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }

    fn total_len(&mut self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }
}

impl RecordStream for Cursor<Vec<u8>> {
    fn set_total_len(&mut self, len: u64) -> io::Result<()> {
        let len = usize::try_from(len)
            .map_err(|_| io::Error::new(ErrorKind::InvalidInput, "length exceeds usize"))?;
        self.get_mut().resize(len, 0);
        Ok(())
    }

    fn total_len(&mut self) -> io::Result<u64> {
        Ok(self.get_ref().len() as u64)
    }
}

impl<S: RecordStream + ?Sized> RecordStream for &mut S {
    fn set_total_len(&mut self, len: u64) -> io::Result<()> {
        (**self).set_total_len(len)
    }

    fn total_len(&mut self) -> io::Result<u64> {
        (**self).total_len()
    }

    fn read_up_to(&mut self, offset: u64, max: usize) -> io::Result<Vec<u8>> {
        (**self).read_up_to(offset, max)
    }

    fn read_exact_at(&mut self, offset: u64, dst: &mut [u8]) -> io::Result<()> {
        (**self).read_exact_at(offset, dst)
    }

    fn write_at(&mut self, offset: u64, src: &[u8]) -> io::Result<()> {
        (**self).write_at(offset, src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_short_read_at_eof() {
        let mut stream = Cursor::new(b"hello".to_vec());
        assert_eq!(stream.read_up_to(1, 3).unwrap(), b"ell");
        assert_eq!(stream.read_up_to(3, 10).unwrap(), b"lo");
        assert!(stream.read_up_to(5, 10).unwrap().is_empty());
        assert!(stream.read_up_to(9, 10).unwrap().is_empty());
    }

    #[test]
    fn test_cursor_resize_and_write() {
        let mut stream = Cursor::new(b"abc".to_vec());
        stream.set_total_len(5).unwrap();
        assert_eq!(stream.total_len().unwrap(), 5);

        stream.write_at(3, b"de").unwrap();
        assert_eq!(stream.get_ref().as_slice(), b"abcde");

        stream.set_total_len(2).unwrap();
        assert_eq!(stream.get_ref().as_slice(), b"ab");
    }

    #[test]
    fn test_read_exact_fails_past_end() {
        let mut stream = Cursor::new(b"abc".to_vec());
        let mut buf = [0u8; 4];
        let err = stream.read_exact_at(0, &mut buf).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_file_stream() {
        let mut file = tempfile::tempfile().unwrap();
        file.write_at(0, b"0123456789").unwrap();
        assert_eq!(file.total_len().unwrap(), 10);

        file.set_total_len(4).unwrap();
        assert_eq!(file.total_len().unwrap(), 4);
        assert_eq!(file.read_up_to(0, 16).unwrap(), b"0123");
    }

    #[test]
    fn test_mut_ref_forwards() {
        let mut inner = Cursor::new(Vec::new());
        {
            let mut stream = &mut inner;
            stream.write_at(0, b"xy").unwrap();
            assert_eq!(stream.total_len().unwrap(), 2);
        }
        assert_eq!(inner.into_inner(), b"xy");
    }
}
