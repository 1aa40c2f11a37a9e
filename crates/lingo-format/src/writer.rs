#![forbid(unsafe_code)]

//! Bounded output.
//!
//! # Invariants
//!
//! 1. **Never past the bound**: a writer created with limit `L` holds at
//!    most `L - 1` bytes of text, leaving room for a terminator. A limit of
//!    0 holds nothing.
//! 2. **Prefix on truncation**: once a piece does not fit, the largest
//!    prefix of whole grapheme clusters that fits is kept and every later
//!    write is dropped. The result is always a prefix of the untruncated
//!    output and always valid UTF-8.

use unicode_segmentation::UnicodeSegmentation;

/// A `String` that refuses to grow past a byte limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedWriter {
    buf: String,
    /// Maximum text bytes (limit minus the terminator).
    capacity: usize,
    truncated: bool,
}

impl BoundedWriter {
    /// A writer for a buffer of `limit` bytes including the terminator.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            buf: String::new(),
            capacity: limit.saturating_sub(1),
            truncated: false,
        }
    }

    /// A writer with no practical bound.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::new(usize::MAX)
    }

    /// Append `s`, truncating at a grapheme boundary if it does not fit.
    /// Returns `false` once the writer is truncated.
    pub fn push_str(&mut self, s: &str) -> bool {
        if self.truncated {
            return false;
        }
        let room = self.capacity - self.buf.len();
        if s.len() <= room {
            self.buf.push_str(s);
            return true;
        }
        let mut end = 0;
        for (offset, grapheme) in s.grapheme_indices(true) {
            let next = offset + grapheme.len();
            if next > room {
                break;
            }
            end = next;
        }
        self.buf.push_str(&s[..end]);
        self.truncated = true;
        false
    }

    pub fn push(&mut self, ch: char) -> bool {
        let mut tmp = [0u8; 4];
        self.push_str(ch.encode_utf8(&mut tmp))
    }

    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Bytes still available before truncation.
    #[must_use]
    pub fn remaining(&self) -> usize {
        if self.truncated {
            0
        } else {
            self.capacity - self.buf.len()
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.buf
    }
}

/// Copy `text` into `dest` followed by a NUL byte, truncating at a char
/// boundary. Returns the number of text bytes written (excluding the NUL).
/// An empty `dest` receives nothing.
pub fn write_terminated(text: &str, dest: &mut [u8]) -> usize {
    let Some(room) = dest.len().checked_sub(1) else {
        return 0;
    };
    let mut end = text.len().min(room);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    dest[..end].copy_from_slice(&text.as_bytes()[..end]);
    dest[end] = 0;
    end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_exactly() {
        let mut w = BoundedWriter::new(6);
        assert!(w.push_str("hello"));
        assert_eq!(w.remaining(), 0);
        assert!(!w.is_truncated());
        assert!(!w.push_str("!"));
        assert!(w.is_truncated());
        assert_eq!(w.as_str(), "hello");
    }

    #[test]
    fn truncates_inside_piece() {
        let mut w = BoundedWriter::new(4);
        assert!(!w.push_str("abcdef"));
        assert_eq!(w.as_str(), "abc");
        assert!(!w.push_str("x"));
        assert_eq!(w.as_str(), "abc");
    }

    #[test]
    fn later_short_pieces_are_dropped() {
        let mut w = BoundedWriter::new(5);
        w.push_str("ab");
        w.push_str("\u{20AC}\u{20AC}");
        w.push_str("c");
        assert_eq!(w.as_str(), "ab");
    }

    #[test]
    fn never_splits_grapheme_clusters() {
        let mut w = BoundedWriter::new(3);
        // 'e' + combining acute is three bytes.
        w.push_str("e\u{301}x");
        assert_eq!(w.as_str(), "");
        let mut w = BoundedWriter::new(4);
        w.push_str("e\u{301}x");
        assert_eq!(w.as_str(), "e\u{301}");
    }

    #[test]
    fn zero_limit_holds_nothing() {
        let mut w = BoundedWriter::new(0);
        assert!(w.push_str(""));
        assert!(!w.push('a'));
        assert!(w.is_empty());
    }

    #[test]
    fn terminated_copy() {
        let mut buf = [0xFFu8; 5];
        assert_eq!(write_terminated("h\u{E9}llo", &mut buf), 4);
        assert_eq!(&buf, b"h\xC3\xA9l\0");

        let mut buf = [0xFFu8; 3];
        assert_eq!(write_terminated("\u{20AC}", &mut buf), 0);
        assert_eq!(buf[0], 0);

        assert_eq!(write_terminated("abc", &mut []), 0);
    }
}
