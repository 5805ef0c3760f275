//! Line/column positions.
//!
//! Lines are 1-based, columns are 0-based byte offsets within the line.

use crate::Span;

/// A line/column position.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Position {
    /// 1-based line number.
    pub line: u32,
    /// 0-based byte column.
    pub column: u32,
}

impl Position {
    pub const fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

/// Start and end positions of a node or token.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SourceLoc {
    pub start: Position,
    pub end: Position,
}

/// Table of line starts for offset <-> position conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<u32>,
    len: u32,
}

impl LineIndex {
    /// Build the index for `text`.
    ///
    /// `\n`, `\r\n` and lone `\r` all terminate a line.
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut line_starts = vec![0];
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => line_starts.push(i as u32 + 1),
                b'\r' => {
                    if bytes.get(i + 1) == Some(&b'\n') {
                        i += 1;
                    }
                    line_starts.push(i as u32 + 1);
                }
                _ => {}
            }
            i += 1;
        }
        LineIndex {
            line_starts,
            len: bytes.len() as u32,
        }
    }

    /// Number of lines (at least 1).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Length of the indexed text in bytes.
    pub fn text_len(&self) -> u32 {
        self.len
    }

    /// Position of a byte offset. Offsets past the end clamp to the end.
    pub fn position(&self, offset: u32) -> Position {
        let offset = offset.min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        Position {
            line: line as u32 + 1,
            column: offset - self.line_starts[line],
        }
    }

    /// Byte offset of a position, if the line exists.
    pub fn offset(&self, position: Position) -> Option<u32> {
        let line = position.line.checked_sub(1)? as usize;
        let start = *self.line_starts.get(line)?;
        let offset = start + position.column;
        (offset <= self.len).then_some(offset)
    }

    /// Location of a span.
    pub fn loc(&self, span: Span) -> SourceLoc {
        SourceLoc {
            start: self.position(span.start),
            end: self.position(span.end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn positions_across_lines() {
        let index = LineIndex::new("ab\ncd\r\nef");
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.position(0), Position::new(1, 0));
        assert_eq!(index.position(2), Position::new(1, 2));
        assert_eq!(index.position(3), Position::new(2, 0));
        assert_eq!(index.position(7), Position::new(3, 0));
        assert_eq!(index.position(100), Position::new(3, 2));
    }

    #[test]
    fn offset_round_trips() {
        let index = LineIndex::new("one\ntwo\nthree");
        for offset in 0..13 {
            assert_eq!(index.offset(index.position(offset)), Some(offset));
        }
        assert_eq!(index.offset(Position::new(9, 0)), None);
    }

    #[test]
    fn loc_of_span() {
        let index = LineIndex::new("a\nbcd");
        let loc = index.loc(Span::new(2, 5));
        assert_eq!(loc.start, Position::new(2, 0));
        assert_eq!(loc.end, Position::new(2, 3));
    }
}
