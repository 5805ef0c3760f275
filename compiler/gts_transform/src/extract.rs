//! Template extraction.
//!
//! Finds every script-level `<template>...</template>` region and replaces it
//! with a placeholder of the same byte length that the script grammar accepts
//! in that position:
//!
//! - expression position: a template literal, `` `   ` ``
//! - class body: a static block, `static{   }`
//! - statement start after a line break that ends an expression: a `void`
//!   template literal, `` void`   ` ``, which cannot continue the line above
//!
//! Line terminators inside the region are kept at the same byte index, so
//! lines and columns after the region do not move.


use std::path::{Path, PathBuf};

use gts_diagnostic::ParseError;
use gts_ir::{blank_preserving_lines, replace_range_preserving, LineIndex, Span};
use gts_lexer_core::{is_ident_continue, is_ident_start, regex_allowed, Cursor, PrevToken, Skipped};
use tracing::{debug, trace};

const OPEN_TAG: &str = "<template";
const CLOSE_TAG: &str = "</template";

/// The caller's document. Never mutated; every offset refers to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub text: String,
}

impl SourceDocument {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        SourceDocument {
            path: path.into(),
            text: text.into(),
        }
    }

    /// [`extract`] with the document's own path deciding applicability.
    pub fn extract(&self) -> Result<TransformedSource, ParseError> {
        extract(&self.text, Some(&self.path))
    }
}

/// Syntactic position a region occupies, and so the placeholder it gets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RegionKind {
    Expression,
    ClassMember,
    /// A statement of its own, closed off from the previous line by ASI.
    Statement,
}

/// One extracted template region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateRegion {
    /// Extraction order, from 0.
    pub ordinal: usize,
    /// Byte range in the document, delimiters included.
    pub span: Span,
    pub raw_text: String,
    pub placeholder_text: String,
    pub kind: RegionKind,
}

impl TemplateRegion {
    /// Document offset of the region; add it to region-local offsets.
    #[inline]
    pub fn start(&self) -> u32 {
        self.span.start
    }
}

/// Document text with every region replaced by its placeholder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransformedSource {
    pub text: String,
    pub regions: Vec<TemplateRegion>,
}

impl TransformedSource {
    pub fn has_regions(&self) -> bool {
        !self.regions.is_empty()
    }
}

/// Whether `path` has a dual-syntax extension (`.gts` or `.gjs`).
pub fn is_dual_syntax_path(path: &Path) -> bool {
    matches!(path.extension().and_then(|e| e.to_str()), Some("gts" | "gjs"))
}

fn should_scan(text: &str, path: Option<&Path>) -> bool {
    match path {
        None => true,
        Some(path) if is_dual_syntax_path(path) => true,
        Some(_) => memchr::memmem::find(text.as_bytes(), OPEN_TAG.as_bytes()).is_some(),
    }
}

/// Same-length placeholder for `raw`.
pub fn placeholder(raw: &str, kind: RegionKind) -> String {
    let (open, close) = match kind {
        RegionKind::Expression => ("`", "`"),
        RegionKind::ClassMember => ("static{", "}"),
        RegionKind::Statement => ("void`", "`"),
    };
    // `raw` opens with `<template` and ends with `>`; neither part holds a
    // line break, so the delimiters can overwrite them.
    let blank = blank_preserving_lines(raw);
    let inner = blank.get(open.len()..blank.len().saturating_sub(close.len())).unwrap_or_default();
    format!("{open}{inner}{close}")
}

/// Extract template regions from `text`.
///
/// `path` decides applicability: dual-syntax files are always scanned,
/// other files only when they contain `<template`. Without a path the text
/// is always scanned.
pub fn extract(text: &str, path: Option<&Path>) -> Result<TransformedSource, ParseError> {
    if !should_scan(text, path) {
        trace!("skipping template scan");
        return Ok(TransformedSource {
            text: text.to_owned(),
            regions: Vec::new(),
        });
    }

    let found = Scanner::new(text).run()?;
    let mut out = text.to_owned();
    let mut regions = Vec::with_capacity(found.len());
    for (ordinal, (span, kind)) in found.into_iter().enumerate() {
        let raw_text = span.slice(text).unwrap_or_default().to_owned();
        let placeholder_text = placeholder(&raw_text, kind);
        out = replace_range_preserving(&out, span.start as usize, span.end as usize, &placeholder_text)
            .map_err(|e| ParseError::internal(format!("placeholder for template region {ordinal}: {e}")))?;
        trace!(ordinal, %span, ?kind, "extracted template region");
        regions.push(TemplateRegion {
            ordinal,
            span,
            raw_text,
            placeholder_text,
            kind,
        });
    }
    debug!(regions = regions.len(), "template extraction done");
    Ok(TransformedSource { text: out, regions })
}

/// Kind of an open `{`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Brace {
    ClassBody,
    Other,
}

struct Scanner<'a> {
    src: &'a str,
    cur: Cursor<'a>,
    prev: PrevToken,
    braces: Vec<Brace>,
    /// `class` seen; the next `{` opens its body.
    class_pending: bool,
    /// Previous token was `default`, which may be followed by an expression.
    after_default: bool,
    /// A line terminator was skipped since the previous token.
    line_break: bool,
    found: Vec<(Span, RegionKind)>,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Scanner {
            src,
            cur: Cursor::new(src),
            prev: PrevToken::Start,
            braces: Vec::new(),
            class_pending: false,
            after_default: false,
            line_break: false,
            found: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<(Span, RegionKind)>, ParseError> {
        while !self.cur.is_eof() {
            let trivia_start = self.cur.pos();
            match self.cur.skip_trivia_or_literal(self.prev) {
                Ok(Skipped::Trivia) => {
                    let skipped = self.cur.slice(trivia_start, self.cur.pos());
                    self.line_break |= skipped.contains(['\n', '\r', '\u{2028}', '\u{2029}']);
                    continue;
                }
                Ok(Skipped::Literal) => {
                    self.prev = PrevToken::Literal;
                    self.line_break = false;
                    continue;
                }
                Ok(Skipped::Nothing) => {}
                // Broken script text is the script grammar's to report.
                Err(_) => break,
            }

            let b = self.cur.current();
            let expression_allowed = regex_allowed(self.prev) || self.after_default;
            self.after_default = false;
            let line_break = std::mem::take(&mut self.line_break);
            if b == b'<' && at_open_tag(&self.cur) {
                if let Some(kind) = self.region_kind(expression_allowed, line_break) {
                    self.region(kind)?;
                    continue;
                }
            }
            if is_ident_start(b) {
                let start = self.cur.pos();
                self.cur.eat_while(is_ident_continue);
                let word = self.cur.slice(start, self.cur.pos());
                match word {
                    "class" => self.class_pending = true,
                    "default" => self.after_default = true,
                    _ => {}
                }
                self.prev = PrevToken::word(word);
                continue;
            }
            if b.is_ascii_digit() {
                self.cur.eat_while(|b| is_ident_continue(b) || b == b'.');
                self.prev = PrevToken::Literal;
                continue;
            }
            match b {
                b'{' => {
                    let brace = if self.class_pending { Brace::ClassBody } else { Brace::Other };
                    self.class_pending = false;
                    self.braces.push(brace);
                }
                b'}' => {
                    self.braces.pop();
                }
                _ => {}
            }
            self.prev = PrevToken::Punct(b);
            self.cur.advance_char();
        }
        Ok(self.found)
    }

    /// Placeholder kind for a `<template` at the cursor, or `None` when the
    /// tag sits where the script grammar would read a comparison.
    ///
    /// A line break after a complete expression or class field ends that
    /// statement or member, so the region starts a new one there.
    fn region_kind(&self, expression_allowed: bool, line_break: bool) -> Option<RegionKind> {
        let ends_line = line_break && !regex_allowed(self.prev);
        let member_start = matches!(self.prev, PrevToken::Punct(b'{' | b'}' | b';')) || ends_line;
        if self.braces.last() == Some(&Brace::ClassBody) && member_start {
            Some(RegionKind::ClassMember)
        } else if expression_allowed {
            Some(RegionKind::Expression)
        } else if ends_line {
            Some(RegionKind::Statement)
        } else {
            None
        }
    }

    fn region(&mut self, kind: RegionKind) -> Result<(), ParseError> {
        let start = self.cur.pos();
        let Some(end) = region_end(self.src, start) else {
            return Err(ParseError::syntax(
                "Unterminated <template> tag",
                start,
                &LineIndex::new(self.src),
            ));
        };
        self.found.push((Span::new(start, end), kind));
        self.cur.set_pos(end);
        self.prev = match kind {
            RegionKind::Expression | RegionKind::Statement => PrevToken::Literal,
            RegionKind::ClassMember => PrevToken::Punct(b'}'),
        };
        Ok(())
    }
}

/// `<template` followed by `>` or whitespace.
fn at_open_tag(cur: &Cursor<'_>) -> bool {
    cur.starts_with(OPEN_TAG) && {
        let mut probe = *cur;
        probe.advance_n(OPEN_TAG.len() as u32);
        matches!(probe.current(), b'>' | b' ' | b'\t' | b'\n' | b'\r')
    }
}

/// End offset (exclusive) of the region opening at `start`, or `None` when
/// the outermost `<template>` is never closed.
fn region_end(src: &str, start: u32) -> Option<u32> {
    let mut cur = Cursor::at(src, start);
    let mut depth = 0u32;
    while !cur.is_eof() {
        if cur.starts_with("{{!--") {
            cur.set_pos(cur.find("--}}")? + 4);
        } else if cur.starts_with("{{!") {
            cur.set_pos(cur.find("}}")? + 2);
        } else if cur.starts_with("{{") {
            skip_mustache(&mut cur)?;
        } else if cur.starts_with("<!--") {
            cur.set_pos(cur.find("-->")? + 3);
        } else if cur.starts_with(CLOSE_TAG) && is_tag_boundary(&cur, CLOSE_TAG.len()) {
            cur.set_pos(cur.find(">")? + 1);
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Some(cur.pos());
            }
        } else if cur.current() == b'<' && cur.peek().is_ascii_alphabetic() {
            let is_template = cur.starts_with(OPEN_TAG) && is_tag_boundary(&cur, OPEN_TAG.len());
            let self_closing = skip_start_tag(&mut cur)?;
            if is_template && !self_closing {
                depth += 1;
            }
        } else {
            cur.advance_char();
        }
    }
    None
}

fn is_tag_boundary(cur: &Cursor<'_>, name_len: usize) -> bool {
    let mut probe = *cur;
    probe.advance_n(name_len as u32);
    matches!(probe.current(), b'>' | b'/' | b' ' | b'\t' | b'\n' | b'\r')
}

/// Skip `{{ ... }}`, ignoring `}}` inside quoted strings.
fn skip_mustache(cur: &mut Cursor<'_>) -> Option<()> {
    cur.advance_n(2);
    loop {
        match cur.current() {
            _ if cur.is_eof() => return None,
            b'}' if cur.peek() == b'}' => {
                cur.advance_n(2);
                if cur.current() == b'}' {
                    cur.advance();
                }
                return Some(());
            }
            b'"' | b'\'' => cur.skip_quoted().ok()?,
            _ => cur.advance_char(),
        }
    }
}

/// Skip a start tag with its attributes; returns whether it self-closes.
fn skip_start_tag(cur: &mut Cursor<'_>) -> Option<bool> {
    cur.advance();
    loop {
        match cur.current() {
            _ if cur.is_eof() => return None,
            b'>' => {
                cur.advance();
                return Some(false);
            }
            b'/' if cur.peek() == b'>' => {
                cur.advance_n(2);
                return Some(true);
            }
            quote @ (b'"' | b'\'') => {
                cur.advance();
                let close = cur.find(if quote == b'"' { "\"" } else { "'" })?;
                cur.set_pos(close + 1);
            }
            b'{' if cur.peek() == b'{' => skip_mustache(cur)?,
            b'{' => skip_braced_code(cur)?,
            _ => cur.advance_char(),
        }
    }
}

/// Skip a `{ code }` attribute value with balanced braces.
fn skip_braced_code(cur: &mut Cursor<'_>) -> Option<()> {
    cur.advance();
    let mut depth = 0u32;
    let mut prev = PrevToken::Punct(b'{');
    loop {
        if cur.is_eof() {
            return None;
        }
        match cur.skip_trivia_or_literal(prev).ok()? {
            Skipped::Trivia => continue,
            Skipped::Literal => {
                prev = PrevToken::Literal;
                continue;
            }
            Skipped::Nothing => {}
        }
        let b = cur.current();
        match b {
            b'{' => depth += 1,
            b'}' if depth == 0 => {
                cur.advance();
                return Some(());
            }
            b'}' => depth -= 1,
            _ => {}
        }
        prev = if is_ident_continue(b) { PrevToken::Word } else { PrevToken::Punct(b) };
        cur.advance_char();
    }
}
