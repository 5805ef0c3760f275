//! Byte ranges.
//!
//! Every range in the pipeline is a `[start, end)` pair of UTF-8 byte offsets
//! into the document the caller passed in, stored as two `u32`s.

use std::fmt;

/// Byte range `[start, end)` into a source text.
///
/// Script nodes, template nodes and tokens all use this one representation.
/// Template trees are produced in region-local coordinates and moved into
/// document coordinates with [`Span::shift`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, PartialOrd, Ord)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    /// Zero-length span at `offset`.
    #[inline]
    pub const fn point(offset: u32) -> Span {
        Span {
            start: offset,
            end: offset,
        }
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether byte `offset` falls inside the span.
    #[inline]
    pub fn contains(&self, offset: u32) -> bool {
        (self.start..self.end).contains(&offset)
    }

    /// Whether `inner` lies entirely within the span. An empty `inner` on
    /// either edge counts.
    #[inline]
    pub fn contains_span(&self, inner: Span) -> bool {
        self.start <= inner.start && inner.end <= self.end
    }

    /// Smallest span covering both.
    #[inline]
    #[must_use]
    pub fn merge(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// Move the span forward by `delta` bytes.
    ///
    /// Used to translate region-local coordinates into document coordinates.
    #[inline]
    #[must_use]
    pub const fn shift(self, delta: u32) -> Span {
        Span::new(self.start + delta, self.end + delta)
    }

    /// Shrink the span by `n` bytes on each side, e.g. to drop quotes. A span
    /// too short to shrink collapses to its midpoint.
    #[inline]
    #[must_use]
    pub fn inset(self, n: u32) -> Span {
        if self.len() < n * 2 {
            return Span::point(self.start + self.len() / 2);
        }
        Span::new(self.start + n, self.end - n)
    }

    #[inline]
    pub fn to_range(&self) -> std::ops::Range<usize> {
        self.start as usize..self.end as usize
    }

    /// The text under the span, or `None` when the span is out of bounds or
    /// splits a character.
    #[inline]
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.to_range())
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn end_is_exclusive() {
        let span = Span::new(10, 20);
        assert_eq!(span.len(), 10);
        assert!(span.contains(10));
        assert!(!span.contains(20));
        assert!(span.contains_span(Span::point(20)));
        assert!(!Span::point(3).contains(3));
    }

    #[test]
    fn shift_moves_into_the_document() {
        assert_eq!(Span::new(0, 10).shift(120), Span::new(120, 130));
        assert_eq!(Span::new(10, 20).merge(Span::new(15, 30)), Span::new(10, 30));
    }

    #[test]
    fn inset_drops_quotes() {
        assert_eq!(Span::new(4, 9).inset(1), Span::new(5, 8));
        assert_eq!(Span::new(4, 5).inset(1), Span::point(4));
    }

    #[test]
    fn slice_respects_char_boundaries() {
        let text = "const é = 1;";
        assert_eq!(Span::new(6, 8).slice(text), Some("é"));
        assert_eq!(Span::new(6, 7).slice(text), None);
        assert_eq!(Span::new(6, 70).slice(text), None);
        assert_eq!(format!("{:?}", Span::new(100, 200)), "100..200");
    }
}
