//! Byte cursor over a source string.
//!
//! Reads past the end return `0x00`, acting as a sentinel, so scanning loops
//! terminate without separate bounds checks. Interior NUL bytes are told
//! apart from EOF by comparing the position with the source length.

/// Cursor over the bytes of a `&str`.
///
/// The cursor is [`Copy`], enabling cheap state snapshots for backtracking.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    src: &'a str,
    pos: u32,
}

impl<'a> Cursor<'a> {
    pub fn new(src: &'a str) -> Self {
        Cursor { src, pos: 0 }
    }

    /// Cursor starting at byte `pos`.
    pub fn at(src: &'a str, pos: u32) -> Self {
        Cursor { src, pos }
    }

    /// Byte at the current position, `0x00` at EOF.
    #[inline]
    pub fn current(&self) -> u8 {
        self.byte_at(self.pos)
    }

    #[inline]
    pub fn peek(&self) -> u8 {
        self.byte_at(self.pos + 1)
    }

    #[inline]
    pub fn peek2(&self) -> u8 {
        self.byte_at(self.pos + 2)
    }

    #[inline]
    fn byte_at(&self, pos: u32) -> u8 {
        self.src.as_bytes().get(pos as usize).copied().unwrap_or(0)
    }

    #[inline]
    pub fn advance(&mut self) {
        self.pos += 1;
    }

    #[inline]
    pub fn advance_n(&mut self, n: u32) {
        self.pos += n;
    }

    /// Advance past one full UTF-8 character.
    #[inline]
    pub fn advance_char(&mut self) {
        let width = match self.current() {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        };
        self.pos += width;
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos as usize >= self.src.len()
    }

    #[inline]
    pub fn pos(&self) -> u32 {
        self.pos
    }

    #[inline]
    pub fn set_pos(&mut self, pos: u32) {
        self.pos = pos;
    }

    pub fn source(&self) -> &'a str {
        self.src
    }

    pub fn source_len(&self) -> u32 {
        self.src.len() as u32
    }

    /// Source text `start..end`, clamped to the source and to char boundaries.
    pub fn slice(&self, start: u32, end: u32) -> &'a str {
        let end = (end as usize).min(self.src.len());
        let start = (start as usize).min(end);
        self.src.get(start..end).unwrap_or("")
    }

    pub fn slice_from(&self, start: u32) -> &'a str {
        self.slice(start, self.pos)
    }

    /// Remaining source from the current position.
    pub fn rest(&self) -> &'a str {
        self.src.get(self.pos as usize..).unwrap_or("")
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    /// Consume `prefix` if the rest starts with it.
    pub fn eat_str(&mut self, prefix: &str) -> bool {
        if self.starts_with(prefix) {
            self.pos += prefix.len() as u32;
            true
        } else {
            false
        }
    }

    /// Consume `b` if it is the current byte.
    #[inline]
    pub fn eat(&mut self, b: u8) -> bool {
        if self.current() == b && !self.is_eof() {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Advance while `pred` holds for the current byte and not at EOF.
    pub fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while !self.is_eof() && pred(self.current()) {
            self.pos += 1;
        }
    }

    /// Advance to the next `\n` (not consumed) or EOF.
    pub fn eat_until_newline_or_eof(&mut self) {
        let rest = &self.src.as_bytes()[(self.pos as usize).min(self.src.len())..];
        match memchr::memchr2(b'\n', b'\r', rest) {
            Some(i) => self.pos += i as u32,
            None => self.pos = self.src.len() as u32,
        }
    }

    /// Position of the next occurrence of `needle` at or after the cursor.
    pub fn find(&self, needle: &str) -> Option<u32> {
        let rest = &self.src.as_bytes()[(self.pos as usize).min(self.src.len())..];
        memchr::memmem::find(rest, needle.as_bytes()).map(|i| self.pos + i as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_at_eof() {
        let mut c = Cursor::new("ab");
        assert_eq!(c.current(), b'a');
        assert_eq!(c.peek2(), 0);
        c.advance_n(2);
        assert!(c.is_eof());
        assert_eq!(c.current(), 0);
        assert!(!c.eat(0));
    }

    #[test]
    fn advance_char_multibyte() {
        let mut c = Cursor::new("❤x");
        c.advance_char();
        assert_eq!(c.current(), b'x');
        assert_eq!(c.pos(), 3);
    }

    #[test]
    fn eat_str_and_find() {
        let mut c = Cursor::new("// note\nconst");
        assert!(c.eat_str("//"));
        c.eat_until_newline_or_eof();
        assert_eq!(c.pos(), 7);
        assert_eq!(c.find("const"), Some(8));
        assert_eq!(c.find("nope"), None);
    }
}
