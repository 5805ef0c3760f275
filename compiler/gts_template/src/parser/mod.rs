//! Markup parser for one template region.
//!
//! Scans bytes directly and emits tokens as it consumes them, so the token
//! list comes out sorted. Positions are byte offsets into the region text;
//! the bridge shifts them into document coordinates.
//!
//! Attribute values written as `name={ code }` are not parsed here. They
//! become `ScriptIsland` nodes spanning the code between the braces, for the
//! bridge to hand to the script grammar.

mod mustache;

use gts_diagnostic::ParseError;
use gts_ir::{Ast, Field, LineIndex, Node, NodeId, Span, TemplateTokenKind, Token};
use gts_lexer_core::Cursor;
use gts_stack::ensure_sufficient_stack;

pub(crate) type PResult<T> = Result<T, ParseError>;

/// Elements that never have children or an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input", "keygen", "link",
    "meta", "param", "source", "track", "wbr",
];

/// What ends the content currently being parsed.
#[derive(Copy, Clone)]
enum Closing<'t> {
    Root,
    Element { tag: &'t str, start: u32 },
    Block { name: &'t str, start: u32 },
}

pub(crate) struct Parser<'a> {
    cur: Cursor<'a>,
    lines: LineIndex,
    ast: Ast,
    tokens: Vec<Token>,
}

#[inline]
fn is_tag_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || matches!(b, b'@' | b':' | b'_')
}

#[inline]
fn is_ws(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0C)
}

#[inline]
fn is_tag_name_char(b: u8) -> bool {
    !is_ws(b) && !matches!(b, b'/' | b'>' | 0)
}

impl<'a> Parser<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Parser {
            cur: Cursor::new(src),
            lines: LineIndex::new(src),
            ast: Ast::new(),
            tokens: Vec::new(),
        }
    }

    /// Parse the whole region into a `Template` node.
    pub(crate) fn parse(mut self) -> PResult<(Ast, NodeId, Vec<Token>)> {
        let body = self.parse_content(Closing::Root)?;
        let node = Node::new("Template", Span::new(0, self.cur.source_len()))
            .with("body", Field::list(body))
            .with("blockParams", Field::Strs(Vec::new()));
        let root = self.finish(node);
        self.ast.set_root(root);
        Ok((self.ast, root, self.tokens))
    }

    // Scanning helpers

    #[cold]
    fn error(&self, message: impl Into<String>, at: u32) -> ParseError {
        ParseError::syntax(message, at, &self.lines)
    }

    fn token(&mut self, kind: TemplateTokenKind, value: impl Into<String>, range: Span) {
        let mut token = Token::template(kind, value, range);
        token.loc = self.lines.loc(range);
        self.tokens.push(token);
    }

    /// Consume one byte as a punctuator token.
    fn punct(&mut self) {
        let start = self.cur.pos();
        let value = self.cur.slice(start, start + 1).to_owned();
        self.cur.advance();
        self.token(TemplateTokenKind::Punctuator, value, Span::new(start, start + 1));
    }

    /// Consume `text` byte by byte as punctuators; `false` if it is not next.
    fn punct_str(&mut self, text: &str) -> bool {
        if !self.cur.starts_with(text) {
            return false;
        }
        for _ in 0..text.len() {
            self.punct();
        }
        true
    }

    /// Consume bytes matching `pred` as one word token.
    fn word_while(&mut self, pred: impl Fn(u8) -> bool) -> (String, Span) {
        let start = self.cur.pos();
        self.cur.eat_while(pred);
        let span = Span::new(start, self.cur.pos());
        let text = self.cur.slice(span.start, span.end).to_owned();
        if !span.is_empty() {
            self.token(TemplateTokenKind::Word, text.clone(), span);
        }
        (text, span)
    }

    fn skip_ws(&mut self) {
        self.cur.eat_while(is_ws);
    }

    fn node(&self, node_type: &str, start: u32) -> Node {
        Node::new(node_type, Span::new(start, self.cur.pos()))
    }

    fn finish(&mut self, mut node: Node) -> NodeId {
        node.loc = self.lines.loc(node.range);
        self.ast.alloc(node)
    }

    /// Byte after `{{`, `{{{` and an optional `~`.
    fn mustache_sigil(&self) -> Option<u8> {
        if !self.cur.starts_with("{{") {
            return None;
        }
        let mut probe = self.cur;
        probe.advance_n(2);
        probe.eat(b'{');
        probe.eat(b'~');
        Some(probe.current())
    }

    fn at_block_close(&self) -> bool {
        self.mustache_sigil() == Some(b'/')
    }

    /// `{{else}}` or `{{else if ...}}`.
    fn at_else(&self) -> bool {
        if self.mustache_sigil() != Some(b'e') {
            return false;
        }
        let mut probe = self.cur;
        probe.advance_n(2);
        probe.eat(b'~');
        if !probe.eat_str("else") {
            return false;
        }
        let next = probe.current();
        is_ws(next) || next == b'}' || next == b'~'
    }

    // Content

    fn parse_content(&mut self, closing: Closing<'_>) -> PResult<Vec<NodeId>> {
        let mut nodes = Vec::new();
        loop {
            if self.cur.is_eof() {
                return match closing {
                    Closing::Root => Ok(nodes),
                    Closing::Element { tag, start } => Err(self.error(format!("Unclosed element `{tag}`"), start)),
                    Closing::Block { name, start } => Err(self.error(format!("Unclosed block `{name}`"), start)),
                };
            }
            if self.cur.starts_with("</") {
                if let Closing::Element { .. } = closing {
                    return Ok(nodes);
                }
                let tag = self.peek_end_tag_name();
                return Err(self.error(format!("Closing tag </{tag}> without an open tag"), self.cur.pos()));
            }
            if self.at_block_close() || self.at_else() {
                if let Closing::Block { .. } = closing {
                    return Ok(nodes);
                }
                return Err(self.error("Unexpected closing block or {{else}}", self.cur.pos()));
            }
            nodes.push(self.parse_statement()?);
        }
    }

    fn parse_statement(&mut self) -> PResult<NodeId> {
        ensure_sufficient_stack(|| {
            if self.cur.starts_with("<!--") {
                return self.parse_html_comment();
            }
            if self.cur.current() == b'<' && is_tag_start(self.cur.peek()) {
                return self.parse_element();
            }
            match self.mustache_sigil() {
                Some(b'!') => self.parse_mustache_comment(),
                Some(b'#') => self.parse_block(),
                Some(_) => self.parse_mustache(),
                None => self.parse_text(),
            }
        })
    }

    fn parse_text(&mut self) -> PResult<NodeId> {
        let start = self.cur.pos();
        self.cur.advance_char();
        while !self.cur.is_eof() {
            if self.cur.starts_with("{{") {
                break;
            }
            if self.cur.current() == b'<' && (is_tag_start(self.cur.peek()) || matches!(self.cur.peek(), b'/' | b'!')) {
                break;
            }
            self.cur.advance_char();
        }
        let span = Span::new(start, self.cur.pos());
        let chars = self.cur.slice(span.start, span.end).to_owned();
        self.token(TemplateTokenKind::Text, chars.clone(), span);
        let node = self.node("TextNode", start).with("chars", Field::Str(chars));
        Ok(self.finish(node))
    }

    fn parse_html_comment(&mut self) -> PResult<NodeId> {
        let start = self.cur.pos();
        let Some(end) = self.cur.find("-->") else {
            return Err(self.error("Unclosed comment", start));
        };
        let value = self.cur.slice(start + 4, end).to_owned();
        self.cur.set_pos(end + 3);
        let span = Span::new(start, self.cur.pos());
        let raw = self.cur.slice(span.start, span.end).to_owned();
        self.token(TemplateTokenKind::Comment, raw, span);
        let node = self.node("CommentStatement", start).with("value", Field::Str(value));
        Ok(self.finish(node))
    }

    fn peek_end_tag_name(&self) -> &'a str {
        let mut probe = self.cur;
        probe.advance_n(2);
        let start = probe.pos();
        probe.eat_while(is_tag_name_char);
        probe.slice(start, probe.pos())
    }

    // Elements

    fn parse_element(&mut self) -> PResult<NodeId> {
        ensure_sufficient_stack(|| {
            let start = self.cur.pos();
            self.punct();
            let (tag, _) = self.word_while(is_tag_name_char);

            let mut attributes = Vec::new();
            let mut modifiers = Vec::new();
            let mut comments = Vec::new();
            let mut block_params = Vec::new();
            let self_closing = loop {
                self.skip_ws();
                if self.cur.is_eof() {
                    return Err(self.error(format!("Unclosed element `{tag}`"), start));
                }
                if self.cur.current() == b'>' {
                    self.punct();
                    break false;
                }
                if self.cur.starts_with("/>") {
                    self.punct_str("/>");
                    break true;
                }
                match self.mustache_sigil() {
                    Some(b'!') => comments.push(self.parse_mustache_comment()?),
                    Some(_) => modifiers.push(self.parse_modifier()?),
                    None if self.cur.starts_with("as |") => block_params = self.parse_block_params()?,
                    None => attributes.push(self.parse_attribute()?),
                }
            };

            let children = if self_closing || VOID_ELEMENTS.contains(&tag.as_str()) {
                Vec::new()
            } else {
                let children = self.parse_content(Closing::Element { tag: &tag, start })?;
                self.parse_end_tag(&tag)?;
                children
            };

            let node = self
                .node("ElementNode", start)
                .with("tag", Field::Str(tag))
                .with("selfClosing", Field::Bool(self_closing))
                .with("attributes", Field::list(attributes))
                .with("modifiers", Field::list(modifiers))
                .with("comments", Field::list(comments))
                .with("children", Field::list(children))
                .with("blockParams", Field::Strs(block_params));
            Ok(self.finish(node))
        })
    }

    fn parse_end_tag(&mut self, tag: &str) -> PResult<()> {
        let close_start = self.cur.pos();
        let found = self.peek_end_tag_name();
        if found != tag {
            return Err(self.error(
                format!("Closing tag </{found}> did not match last open tag <{tag}>"),
                close_start,
            ));
        }
        self.punct_str("</");
        self.word_while(is_tag_name_char);
        self.skip_ws();
        if self.cur.current() != b'>' {
            return Err(self.error(format!("Unclosed end tag </{tag}>"), close_start));
        }
        self.punct();
        Ok(())
    }

    /// `as |a b|` on an element or block; the cursor is at `as`.
    fn parse_block_params(&mut self) -> PResult<Vec<String>> {
        let start = self.cur.pos();
        self.word_while(|b| b.is_ascii_alphabetic());
        self.skip_ws();
        self.punct();
        let mut params = Vec::new();
        loop {
            self.skip_ws();
            match self.cur.current() {
                b'|' => {
                    self.punct();
                    return Ok(params);
                }
                b if mustache::is_id_char(b) => {
                    let (name, _) = self.word_while(mustache::is_id_char);
                    params.push(name);
                }
                _ => return Err(self.error("Invalid block parameters syntax", start)),
            }
        }
    }

    fn parse_attribute(&mut self) -> PResult<NodeId> {
        let start = self.cur.pos();
        let (name, name_span) =
            self.word_while(|b| !is_ws(b) && !matches!(b, b'=' | b'>' | b'"' | b'\'' | 0) && b != b'/');
        if name_span.is_empty() {
            return Err(self.error(format!("Invalid character in attribute name: `{}`", self.cur.current() as char), start));
        }
        let value = if self.cur.current() == b'=' {
            self.punct();
            self.parse_attribute_value(&name)?
        } else {
            let node = Node::new("TextNode", Span::point(name_span.end)).with("chars", Field::str(""));
            self.finish(node)
        };
        let node = self
            .node("AttrNode", start)
            .with("name", Field::Str(name))
            .with("value", Field::Node(value));
        Ok(self.finish(node))
    }

    fn parse_attribute_value(&mut self, name: &str) -> PResult<NodeId> {
        let start = self.cur.pos();
        match self.cur.current() {
            quote @ (b'"' | b'\'') => self.parse_quoted_value(quote),
            b'{' if self.cur.peek() == b'{' => self.parse_mustache(),
            b'{' => self.parse_island(name),
            _ => {
                self.cur.eat_while(|b| !is_ws(b) && b != b'>' && b != 0);
                let span = Span::new(start, self.cur.pos());
                if span.is_empty() {
                    return Err(self.error(format!("Missing value for attribute `{name}`"), start));
                }
                let chars = self.cur.slice(span.start, span.end).to_owned();
                self.token(TemplateTokenKind::Text, chars.clone(), span);
                let node = self.node("TextNode", start).with("chars", Field::Str(chars));
                Ok(self.finish(node))
            }
        }
    }

    /// Quoted value: a `TextNode` over the inner span, or a `ConcatStatement`
    /// when it contains mustaches.
    fn parse_quoted_value(&mut self, quote: u8) -> PResult<NodeId> {
        let start = self.cur.pos();
        let mut probe = self.cur;
        probe.advance();
        let mut has_mustache = false;
        while !probe.is_eof() && probe.current() != quote {
            if probe.starts_with("{{") {
                has_mustache = true;
                let Some(close) = probe.find("}}") else {
                    return Err(self.error("Unclosed mustache in attribute value", probe.pos()));
                };
                probe.set_pos(close + 2);
                continue;
            }
            probe.advance_char();
        }
        if probe.is_eof() {
            return Err(self.error("Unterminated quoted attribute value", start));
        }
        let end = probe.pos() + 1;

        if !has_mustache {
            self.cur.set_pos(end);
            let inner = Span::new(start + 1, end - 1);
            let chars = self.cur.slice(inner.start, inner.end).to_owned();
            self.token(TemplateTokenKind::Text, chars.clone(), Span::new(start, end));
            let node = Node::new("TextNode", inner).with("chars", Field::Str(chars));
            return Ok(self.finish(node));
        }

        self.punct();
        let mut parts = Vec::new();
        while self.cur.current() != quote {
            if self.cur.starts_with("{{") {
                parts.push(self.parse_mustache()?);
                continue;
            }
            let text_start = self.cur.pos();
            while self.cur.current() != quote && !self.cur.starts_with("{{") && !self.cur.is_eof() {
                self.cur.advance_char();
            }
            let span = Span::new(text_start, self.cur.pos());
            let chars = self.cur.slice(span.start, span.end).to_owned();
            self.token(TemplateTokenKind::Text, chars.clone(), span);
            let node = self.node("TextNode", text_start).with("chars", Field::Str(chars));
            parts.push(self.finish(node));
        }
        self.punct();
        let node = self.node("ConcatStatement", start).with("parts", Field::list(parts));
        Ok(self.finish(node))
    }

    /// `{ code }` attribute value, left for the script grammar.
    fn parse_island(&mut self, name: &str) -> PResult<NodeId> {
        let open = self.cur.pos();
        let mut probe = self.cur;
        probe.advance();
        let mut depth = 0u32;
        loop {
            match probe.current() {
                0 if probe.is_eof() => {
                    return Err(self.error(format!("Unterminated expression in attribute `{name}`"), open));
                }
                b'{' => {
                    depth += 1;
                    probe.advance();
                }
                b'}' if depth == 0 => break,
                b'}' => {
                    depth -= 1;
                    probe.advance();
                }
                b'"' | b'\'' => probe
                    .skip_quoted()
                    .map_err(|e| self.error(e.kind.message(), e.pos))?,
                b'`' => probe
                    .skip_template_literal()
                    .map_err(|e| self.error(e.kind.message(), e.pos))?,
                _ => probe.advance_char(),
            }
        }
        let close = probe.pos();
        self.punct();
        let inner = Span::new(open + 1, close);
        let code = self.cur.slice(inner.start, inner.end).to_owned();
        self.cur.set_pos(close);
        let island = Node::new("ScriptIsland", inner).with("code", Field::Str(code));
        let island = self.finish(island);
        self.punct();
        Ok(island)
    }
}
