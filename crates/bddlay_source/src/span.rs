//! Byte ranges inside the input document.

use serde::{Deserialize, Serialize};

/// A half-open byte range `[start, end)` in the input document.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset of the first byte (inclusive).
    pub start: u32,
    /// Byte offset one past the last byte (exclusive).
    pub end: u32,
}

impl Span {
    /// Placeholder for values built programmatically rather than parsed.
    pub const DUMMY: Span = Span {
        start: u32::MAX,
        end: u32::MAX,
    };

    /// Creates a span covering `[start, end)`.
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn merge(self, other: Span) -> Span {
        if self.is_dummy() {
            return other;
        }
        if other.is_dummy() {
            return self;
        }
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Shifts the span right by `offset` bytes.
    ///
    /// Used to turn a span relative to one line into a span relative to the
    /// whole document.
    pub fn offset(self, offset: u32) -> Span {
        if self.is_dummy() {
            return self;
        }
        Span {
            start: self.start + offset,
            end: self.end + offset,
        }
    }

    /// Length in bytes.
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` for a zero-length span.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` if this is [`Span::DUMMY`].
    pub fn is_dummy(&self) -> bool {
        *self == Self::DUMMY
    }
}

impl Default for Span {
    fn default() -> Self {
        Span::DUMMY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_covers_both() {
        let a = Span::new(3, 7);
        let b = Span::new(5, 12);
        assert_eq!(a.merge(b), Span::new(3, 12));
    }

    #[test]
    fn merge_with_dummy_keeps_real_span() {
        let a = Span::new(2, 4);
        assert_eq!(a.merge(Span::DUMMY), a);
        assert_eq!(Span::DUMMY.merge(a), a);
    }

    #[test]
    fn offset_shifts() {
        assert_eq!(Span::new(1, 3).offset(10), Span::new(11, 13));
        assert!(Span::DUMMY.offset(10).is_dummy());
    }

    #[test]
    fn len_and_empty() {
        assert_eq!(Span::new(4, 9).len(), 5);
        assert!(Span::new(4, 4).is_empty());
        assert!(!Span::new(4, 5).is_empty());
    }

    #[test]
    fn default_is_dummy() {
        assert!(Span::default().is_dummy());
        assert_eq!(Span::new(2, 4).merge(Span::default()), Span::new(2, 4));
    }
}
