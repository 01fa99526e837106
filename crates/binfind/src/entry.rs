//! Entries recovered from the stream

/// A delimited entry located in the stream.
///
/// `content` excludes the delimiters. `start` is the offset of the first
/// content byte and `end` the offset one past the last, which is also the
/// offset of the trailing delimiter unless the entry ends the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Entry bytes without delimiters
    pub content: Vec<u8>,
    /// Offset of the first content byte
    pub start: u64,
    /// Offset one past the last content byte
    pub end: u64,
}

impl Entry {
    /// Create an entry from its content and span
    pub fn new(content: Vec<u8>, start: u64, end: u64) -> Self {
        Self {
            content,
            start,
            end,
        }
    }

    /// The first `key_len` bytes of the content, or all of it when shorter
    pub fn key(&self, key_len: usize) -> &[u8] {
        &self.content[..key_len.min(self.content.len())]
    }

    /// Content following the first `key_len` bytes
    pub fn value(&self, key_len: usize) -> &[u8] {
        &self.content[key_len.min(self.content.len())..]
    }

    /// Check if `offset` falls within `start..=end`.
    ///
    /// The end is inclusive so the trailing delimiter belongs to the entry
    /// before it.
    pub const fn contains(&self, offset: u64) -> bool {
        self.start <= offset && offset <= self.end
    }

    /// `(start, end)` pair
    pub const fn span(&self) -> (u64, u64) {
        (self.start, self.end)
    }

    /// Content length in bytes
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Check if the content is empty
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
