//! Skipping over literal and comment constructs.
//!
//! Every skipper starts with the cursor on the construct's first byte and
//! leaves it just past the construct. Unterminated constructs report the
//! position of their opening byte.

use crate::{is_ident_continue, is_ident_start, is_newline, is_space, regex_allowed, Cursor, PrevToken};

/// What went wrong while skipping.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RawErrorKind {
    UnterminatedString,
    UnterminatedTemplate,
    UnterminatedComment,
    UnterminatedRegex,
}

impl RawErrorKind {
    /// Message in the script grammar's wording.
    pub fn message(self) -> &'static str {
        match self {
            RawErrorKind::UnterminatedString => "Unterminated string literal.",
            RawErrorKind::UnterminatedTemplate => "Unterminated template literal.",
            RawErrorKind::UnterminatedComment => "'*/' expected.",
            RawErrorKind::UnterminatedRegex => "Unterminated regular expression literal.",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RawError {
    pub kind: RawErrorKind,
    /// Byte offset of the construct's opening byte.
    pub pos: u32,
}

impl RawError {
    fn new(kind: RawErrorKind, pos: u32) -> Self {
        RawError { kind, pos }
    }
}

/// How a template-literal chunk ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TemplateChunkEnd {
    /// Closing backtick (consumed).
    Backtick,
    /// `${` (consumed); code follows.
    DollarBrace,
}

/// Result of [`Cursor::skip_trivia_or_literal`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Skipped {
    Nothing,
    Trivia,
    Literal,
}

impl Cursor<'_> {
    /// Skip a `'` or `"` string literal.
    pub fn skip_quoted(&mut self) -> Result<(), RawError> {
        let start = self.pos();
        let quote = self.current();
        self.advance();
        loop {
            let b = self.current();
            if self.is_eof() || is_newline(b) {
                return Err(RawError::new(RawErrorKind::UnterminatedString, start));
            }
            match b {
                b'\\' => {
                    self.advance();
                    if self.current() == b'\r' && self.peek() == b'\n' {
                        self.advance_n(2);
                    } else if !self.is_eof() {
                        self.advance_char();
                    }
                }
                _ if b == quote => {
                    self.advance();
                    return Ok(());
                }
                _ => self.advance_char(),
            }
        }
    }

    /// Skip a `//` comment, stopping before the line terminator.
    pub fn skip_line_comment(&mut self) {
        self.advance_n(2);
        self.eat_until_newline_or_eof();
    }

    /// Skip a `/* */` comment.
    pub fn skip_block_comment(&mut self) -> Result<(), RawError> {
        let start = self.pos();
        self.advance_n(2);
        match self.find("*/") {
            Some(end) => {
                self.set_pos(end + 2);
                Ok(())
            }
            None => {
                self.set_pos(self.source_len());
                Err(RawError::new(RawErrorKind::UnterminatedComment, start))
            }
        }
    }

    /// Scan one chunk of template-literal text.
    ///
    /// The cursor must be just past the opening backtick or just past the
    /// `}` that closed a substitution. `start` is reported on EOF.
    pub fn scan_template_chunk(&mut self, start: u32) -> Result<TemplateChunkEnd, RawError> {
        loop {
            if self.is_eof() {
                return Err(RawError::new(RawErrorKind::UnterminatedTemplate, start));
            }
            match self.current() {
                b'\\' => {
                    self.advance();
                    if !self.is_eof() {
                        self.advance_char();
                    }
                }
                b'`' => {
                    self.advance();
                    return Ok(TemplateChunkEnd::Backtick);
                }
                b'$' if self.peek() == b'{' => {
                    self.advance_n(2);
                    return Ok(TemplateChunkEnd::DollarBrace);
                }
                _ => self.advance_char(),
            }
        }
    }

    /// Skip a whole template literal including nested substitutions.
    pub fn skip_template_literal(&mut self) -> Result<(), RawError> {
        let start = self.pos();
        self.advance();
        loop {
            match self.scan_template_chunk(start)? {
                TemplateChunkEnd::Backtick => return Ok(()),
                TemplateChunkEnd::DollarBrace => self.skip_code_until_close_brace(start)?,
            }
        }
    }

    /// Skip a regular-expression literal with its flags.
    pub fn skip_regex(&mut self) -> Result<(), RawError> {
        let start = self.pos();
        self.advance();
        let mut in_class = false;
        loop {
            let b = self.current();
            if self.is_eof() || is_newline(b) {
                return Err(RawError::new(RawErrorKind::UnterminatedRegex, start));
            }
            match b {
                b'\\' => {
                    self.advance();
                    if !self.is_eof() && !is_newline(self.current()) {
                        self.advance_char();
                    }
                }
                b'[' => {
                    in_class = true;
                    self.advance();
                }
                b']' => {
                    in_class = false;
                    self.advance();
                }
                b'/' if !in_class => {
                    self.advance();
                    self.eat_while(is_ident_continue);
                    return Ok(());
                }
                _ => self.advance_char(),
            }
        }
    }

    /// Skip whitespace, a comment, or a string/template/regex literal.
    ///
    /// Regex literals are only recognised when `prev` allows one.
    pub fn skip_trivia_or_literal(&mut self, prev: PrevToken) -> Result<Skipped, RawError> {
        let b = self.current();
        if self.is_eof() {
            return Ok(Skipped::Nothing);
        }
        if is_space(b) || is_newline(b) {
            self.eat_while(|b| is_space(b) || is_newline(b));
            return Ok(Skipped::Trivia);
        }
        match b {
            b'/' if self.peek() == b'/' => {
                self.skip_line_comment();
                Ok(Skipped::Trivia)
            }
            b'/' if self.peek() == b'*' => {
                self.skip_block_comment()?;
                Ok(Skipped::Trivia)
            }
            b'/' if regex_allowed(prev) => {
                self.skip_regex()?;
                Ok(Skipped::Literal)
            }
            b'\'' | b'"' => {
                self.skip_quoted()?;
                Ok(Skipped::Literal)
            }
            b'`' => {
                self.skip_template_literal()?;
                Ok(Skipped::Literal)
            }
            _ => Ok(Skipped::Nothing),
        }
    }

    /// Skip code up to and including the `}` that closes a substitution.
    fn skip_code_until_close_brace(&mut self, template_start: u32) -> Result<(), RawError> {
        let mut depth = 0u32;
        let mut prev = PrevToken::Punct(b'{');
        loop {
            if self.is_eof() {
                return Err(RawError::new(RawErrorKind::UnterminatedTemplate, template_start));
            }
            match self.skip_trivia_or_literal(prev)? {
                Skipped::Trivia => continue,
                Skipped::Literal => {
                    prev = PrevToken::Literal;
                    continue;
                }
                Skipped::Nothing => {}
            }
            let b = self.current();
            if is_ident_start(b) {
                let start = self.pos();
                self.eat_while(is_ident_continue);
                prev = PrevToken::word(self.slice_from(start));
                continue;
            }
            if b.is_ascii_digit() {
                self.eat_while(|b| is_ident_continue(b) || b == b'.');
                prev = PrevToken::Literal;
                continue;
            }
            match b {
                b'{' => depth += 1,
                b'}' if depth == 0 => {
                    self.advance();
                    return Ok(());
                }
                b'}' => depth -= 1,
                _ => {}
            }
            prev = PrevToken::Punct(b);
            self.advance_char();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn skip_one(src: &str) -> (Result<Skipped, RawError>, u32) {
        let mut c = Cursor::new(src);
        let r = c.skip_trivia_or_literal(PrevToken::Start);
        (r, c.pos())
    }

    #[test]
    fn strings_stop_at_matching_quote() {
        assert_eq!(skip_one(r#""a'b\"c" rest"#), (Ok(Skipped::Literal), 8));
        assert_eq!(skip_one("'<template>' x"), (Ok(Skipped::Literal), 12));
    }

    #[test]
    fn unterminated_string_reports_opening_quote() {
        let mut c = Cursor::new("console.log('test)");
        c.set_pos(12);
        assert_eq!(
            c.skip_quoted(),
            Err(RawError {
                kind: RawErrorKind::UnterminatedString,
                pos: 12
            })
        );
    }

    #[test]
    fn template_literal_with_nested_code() {
        let src = "`a ${ {b: `c${'}'}`} } d` tail";
        assert_eq!(skip_one(src), (Ok(Skipped::Literal), 25));
    }

    #[test]
    fn regex_only_when_allowed() {
        let mut c = Cursor::new("/<template>/g.test(x)");
        assert_eq!(c.skip_trivia_or_literal(PrevToken::Punct(b'=')), Ok(Skipped::Literal));
        assert_eq!(c.pos(), 13);

        let mut c = Cursor::new("/ 2");
        assert_eq!(c.skip_trivia_or_literal(PrevToken::Word), Ok(Skipped::Nothing));
    }

    #[test]
    fn regex_class_may_contain_slash() {
        let mut c = Cursor::new("/[/]x/i;");
        assert_eq!(c.skip_regex(), Ok(()));
        assert_eq!(c.pos(), 7);
    }

    #[test]
    fn comments_are_trivia() {
        assert_eq!(skip_one("// <template>\nx"), (Ok(Skipped::Trivia), 13));
        assert_eq!(skip_one("/* <template> */x"), (Ok(Skipped::Trivia), 16));
        assert_eq!(
            skip_one("/* open"),
            (
                Err(RawError {
                    kind: RawErrorKind::UnterminatedComment,
                    pos: 0
                }),
                7
            )
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn quoted_body_without_terminators_is_skipped_whole(body in "[^'\\\\\r\n]{0,40}") {
            let src = format!("'{body}' tail");
            let mut c = Cursor::new(&src);
            prop_assert_eq!(c.skip_quoted(), Ok(()));
            prop_assert_eq!(c.pos() as usize, body.len() + 2);
        }

        #[test]
        fn block_comment_body_is_skipped_whole(body in "[a-z <>/{}]{0,40}") {
            let src = format!("/*{body}*/x");
            let mut c = Cursor::new(&src);
            prop_assert_eq!(c.skip_trivia_or_literal(PrevToken::Start), Ok(Skipped::Trivia));
            prop_assert_eq!(c.current(), b'x');
        }
    }
}
