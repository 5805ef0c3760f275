//! Mustaches, blocks, modifiers and the expressions inside them.

use gts_ir::{Field, Node, NodeId, Span, TemplateTokenKind};
use gts_stack::ensure_sufficient_stack;

use super::{Closing, PResult, Parser};

/// Bytes allowed in a path segment, hash key or block parameter.
#[inline]
pub(super) fn is_id_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'$' | b'-' | b':') || b >= 0x80
}

/// Opening half of a block: `{{#name params hash as |x|}}`.
struct BlockOpen {
    path: NodeId,
    name: String,
    params: Vec<NodeId>,
    hash: NodeId,
    block_params: Vec<String>,
}

impl Parser<'_> {
    /// Fail early when no `}}` follows, reporting at the opening braces.
    fn require_close(&self, start: u32) -> PResult<()> {
        match self.cur.find("}}") {
            Some(_) => Ok(()),
            None => Err(self.error("Unclosed mustache", start)),
        }
    }

    fn strip(&mut self) {
        if self.cur.current() == b'~' {
            self.punct();
        }
    }

    fn close_mustache(&mut self, start: u32, trusting: bool) -> PResult<()> {
        self.skip_ws();
        self.strip();
        let close = if trusting { "}}}" } else { "}}" };
        if self.punct_str(close) {
            return Ok(());
        }
        if self.cur.is_eof() {
            return Err(self.error("Unclosed mustache", start));
        }
        Err(self.error(
            format!("Expected `{close}` but found `{}`", self.cur.current() as char),
            self.cur.pos(),
        ))
    }

    pub(super) fn parse_mustache(&mut self) -> PResult<NodeId> {
        let start = self.cur.pos();
        self.require_close(start)?;
        self.punct_str("{{");
        let trusting = self.cur.current() == b'{';
        if trusting {
            self.punct();
        }
        self.strip();
        self.skip_ws();
        let path = self.parse_expression()?;
        let (params, hash) = self.parse_params()?;
        self.close_mustache(start, trusting)?;
        let node = self
            .node("MustacheStatement", start)
            .with("path", Field::Node(path))
            .with("params", Field::list(params))
            .with("hash", Field::Node(hash))
            .with("trusting", Field::Bool(trusting));
        Ok(self.finish(node))
    }

    pub(super) fn parse_mustache_comment(&mut self) -> PResult<NodeId> {
        let start = self.cur.pos();
        self.require_close(start)?;
        let mut probe = self.cur;
        probe.advance_n(2);
        probe.eat(b'~');
        probe.advance();
        let long = probe.eat_str("--");
        let value_start = probe.pos();
        let (value_end, close) = loop {
            let Some(at) = probe.find("}}") else {
                return Err(self.error("Unclosed comment", start));
            };
            let mut body_end = at;
            if probe.slice(value_start, body_end).ends_with('~') {
                body_end -= 1;
            }
            if long {
                if !probe.slice(value_start, body_end).ends_with("--") {
                    probe.set_pos(at + 2);
                    continue;
                }
                body_end -= 2;
            }
            break (body_end, at + 2);
        };
        let value = self.cur.slice(value_start, value_end).to_owned();
        self.cur.set_pos(close);
        let span = Span::new(start, close);
        let raw = self.cur.slice(span.start, span.end).to_owned();
        self.token(TemplateTokenKind::Comment, raw, span);
        let node = self
            .node("MustacheCommentStatement", start)
            .with("value", Field::Str(value));
        Ok(self.finish(node))
    }

    /// `{{modifier ...}}` inside a start tag.
    pub(super) fn parse_modifier(&mut self) -> PResult<NodeId> {
        let start = self.cur.pos();
        self.require_close(start)?;
        self.punct_str("{{");
        self.strip();
        self.skip_ws();
        let path = self.parse_expression()?;
        let (params, hash) = self.parse_params()?;
        self.close_mustache(start, false)?;
        let node = self
            .node("ElementModifierStatement", start)
            .with("path", Field::Node(path))
            .with("params", Field::list(params))
            .with("hash", Field::Node(hash));
        Ok(self.finish(node))
    }

    // Blocks

    pub(super) fn parse_block(&mut self) -> PResult<NodeId> {
        let start = self.cur.pos();
        self.require_close(start)?;
        self.punct_str("{{");
        self.strip();
        self.punct();
        let open = self.parse_block_open(start)?;
        let (program, inverse) = self.parse_block_arms(&open.name, start, open.block_params.clone())?;
        self.parse_block_close(&open.name, start)?;
        Ok(self.finish_block(start, open, program, inverse))
    }

    fn finish_block(&mut self, start: u32, open: BlockOpen, program: NodeId, inverse: Option<NodeId>) -> NodeId {
        let node = self
            .node("BlockStatement", start)
            .with("path", Field::Node(open.path))
            .with("params", Field::list(open.params))
            .with("hash", Field::Node(open.hash))
            .with("program", Field::Node(program))
            .with("inverse", Field::opt(inverse));
        self.finish(node)
    }

    fn parse_block_open(&mut self, start: u32) -> PResult<BlockOpen> {
        self.skip_ws();
        if !is_id_char(self.cur.current()) && self.cur.current() != b'@' {
            return Err(self.error("Expected a block name", self.cur.pos()));
        }
        let path = self.parse_path()?;
        let name = self.ast.get(path).str_field("original").unwrap_or_default().to_owned();
        let (params, hash) = self.parse_params()?;
        self.skip_ws();
        let block_params = if self.cur.starts_with("as |") {
            self.parse_block_params()?
        } else {
            Vec::new()
        };
        self.close_mustache(start, false)?;
        Ok(BlockOpen { path, name, params, hash, block_params })
    }

    /// Program and optional inverse of a block, stopping before `{{/name}}`.
    fn parse_block_arms(
        &mut self,
        name: &str,
        start: u32,
        block_params: Vec<String>,
    ) -> PResult<(NodeId, Option<NodeId>)> {
        let program_start = self.cur.pos();
        let body = self.parse_content(Closing::Block { name, start })?;
        let program = self
            .node("Block", program_start)
            .with("body", Field::list(body))
            .with("blockParams", Field::Strs(block_params))
            .with("chained", Field::Bool(false));
        let program = self.finish(program);
        let inverse = if self.at_else() {
            Some(self.parse_inverse(name, start)?)
        } else {
            None
        };
        Ok((program, inverse))
    }

    /// `{{else}}` arm, or an `{{else if ...}}` chain nested as one block.
    fn parse_inverse(&mut self, name: &str, start: u32) -> PResult<NodeId> {
        let else_start = self.cur.pos();
        self.punct_str("{{");
        self.strip();
        self.word_while(|b| b.is_ascii_alphabetic());
        self.skip_ws();
        if self.cur.starts_with("}}") || self.cur.starts_with("~}}") {
            self.close_mustache(else_start, false)?;
            let inverse_start = self.cur.pos();
            let body = self.parse_content(Closing::Block { name, start })?;
            let node = self
                .node("Block", inverse_start)
                .with("body", Field::list(body))
                .with("blockParams", Field::Strs(Vec::new()))
                .with("chained", Field::Bool(false));
            return Ok(self.finish(node));
        }
        let open = self.parse_block_open(else_start)?;
        let (program, inverse) = self.parse_block_arms(name, start, open.block_params.clone())?;
        let nested = self.finish_block(else_start, open, program, inverse);
        let node = self
            .node("Block", else_start)
            .with("body", Field::list([nested]))
            .with("blockParams", Field::Strs(Vec::new()))
            .with("chained", Field::Bool(true));
        Ok(self.finish(node))
    }

    fn parse_block_close(&mut self, name: &str, start: u32) -> PResult<()> {
        let close_start = self.cur.pos();
        if self.cur.find("}}").is_none() {
            return Err(self.error(format!("Unclosed block `{name}`"), start));
        }
        self.punct_str("{{");
        self.strip();
        self.punct();
        self.skip_ws();
        let (found, _) = self.word_while(|b| is_id_char(b) || matches!(b, b'.' | b'@'));
        if found != name {
            return Err(self.error(format!("`{name}` was closed by `{found}`"), close_start));
        }
        self.close_mustache(close_start, false)
    }

    // Expressions

    /// Positional params then `key=value` pairs, up to the closing braces.
    fn parse_params(&mut self) -> PResult<(Vec<NodeId>, NodeId)> {
        let mut params = Vec::new();
        let mut pairs = Vec::new();
        loop {
            self.skip_ws();
            if self.at_params_end() {
                break;
            }
            if self.at_hash_pair() {
                pairs.push(self.parse_hash_pair()?);
            } else if pairs.is_empty() {
                params.push(self.parse_expression()?);
            } else {
                return Err(self.error("Positional argument after named arguments", self.cur.pos()));
            }
        }
        let range = match (pairs.first(), pairs.last()) {
            (Some(first), Some(last)) => self.ast.get(*first).range.merge(self.ast.get(*last).range),
            _ => Span::point(self.cur.pos()),
        };
        let hash = Node::new("Hash", range).with("pairs", Field::list(pairs));
        Ok((params, self.finish(hash)))
    }

    fn at_params_end(&self) -> bool {
        self.cur.is_eof()
            || self.cur.starts_with("}}")
            || self.cur.starts_with("~}")
            || self.cur.current() == b')'
            || self.cur.starts_with("as |")
    }

    fn at_hash_pair(&self) -> bool {
        let mut probe = self.cur;
        probe.eat_while(is_id_char);
        probe.pos() > self.cur.pos() && probe.current() == b'='
    }

    fn parse_hash_pair(&mut self) -> PResult<NodeId> {
        let start = self.cur.pos();
        let (key, _) = self.word_while(is_id_char);
        self.punct();
        self.skip_ws();
        let value = self.parse_expression()?;
        let node = self
            .node("HashPair", start)
            .with("key", Field::Str(key))
            .with("value", Field::Node(value));
        Ok(self.finish(node))
    }

    fn parse_expression(&mut self) -> PResult<NodeId> {
        let start = self.cur.pos();
        match self.cur.current() {
            b'(' => self.parse_sub_expression(),
            b'"' | b'\'' => self.parse_string_literal(),
            b'0'..=b'9' => self.parse_number_literal(),
            b'-' if self.cur.peek().is_ascii_digit() => self.parse_number_literal(),
            b'@' => self.parse_path(),
            b if is_id_char(b) => {
                let mut probe = self.cur;
                probe.eat_while(is_id_char);
                let literal = match probe.slice(start, probe.pos()) {
                    "true" | "false" => Some("BooleanLiteral"),
                    "null" => Some("NullLiteral"),
                    "undefined" => Some("UndefinedLiteral"),
                    _ => None,
                };
                match literal {
                    Some(node_type) if probe.current() != b'.' => self.parse_keyword_literal(node_type),
                    _ => self.parse_path(),
                }
            }
            _ if self.cur.is_eof() => Err(self.error("Unclosed mustache", start)),
            other => Err(self.error(format!("Expected a path or literal but found `{}`", other as char), start)),
        }
    }

    fn parse_sub_expression(&mut self) -> PResult<NodeId> {
        ensure_sufficient_stack(|| {
            let start = self.cur.pos();
            self.punct();
            self.skip_ws();
            let path = self.parse_expression()?;
            let (params, hash) = self.parse_params()?;
            if self.cur.current() != b')' {
                return Err(self.error("Unclosed sub-expression", start));
            }
            self.punct();
            let node = self
                .node("SubExpression", start)
                .with("path", Field::Node(path))
                .with("params", Field::list(params))
                .with("hash", Field::Node(hash));
            Ok(self.finish(node))
        })
    }

    fn parse_string_literal(&mut self) -> PResult<NodeId> {
        let start = self.cur.pos();
        let quote = self.cur.current();
        self.punct();
        let value_start = self.cur.pos();
        while self.cur.current() != quote {
            if self.cur.is_eof() {
                return Err(self.error("Unterminated string literal", start));
            }
            self.cur.advance_char();
        }
        let span = Span::new(value_start, self.cur.pos());
        let value = self.cur.slice(span.start, span.end).to_owned();
        if !span.is_empty() {
            self.token(TemplateTokenKind::Word, value.clone(), span);
        }
        self.punct();
        let node = self.node("StringLiteral", start).with("value", Field::Str(value));
        Ok(self.finish(node))
    }

    fn parse_number_literal(&mut self) -> PResult<NodeId> {
        let start = self.cur.pos();
        let (text, _) = self.word_while(|b| b.is_ascii_digit() || matches!(b, b'-' | b'.'));
        let Ok(value) = text.parse::<f64>() else {
            return Err(self.error(format!("Invalid number `{text}`"), start));
        };
        let node = self.node("NumberLiteral", start).with("value", Field::Num(value));
        Ok(self.finish(node))
    }

    fn parse_keyword_literal(&mut self, node_type: &str) -> PResult<NodeId> {
        let start = self.cur.pos();
        let (text, _) = self.word_while(is_id_char);
        let value = match node_type {
            "BooleanLiteral" => Field::Bool(text == "true"),
            _ => Field::Null,
        };
        let node = self.node(node_type, start).with("value", value);
        Ok(self.finish(node))
    }

    /// `this.a.b`, `@arg.x` or `name.x`.
    fn parse_path(&mut self) -> PResult<NodeId> {
        let start = self.cur.pos();
        let data = self.cur.current() == b'@';
        if data {
            self.punct();
        }
        let mut segments = Vec::new();
        loop {
            let (segment, span) = self.word_while(is_id_char);
            if span.is_empty() {
                return Err(self.error("Expected a path segment", self.cur.pos()));
            }
            segments.push(segment);
            if self.cur.current() == b'.' && is_id_char(self.cur.peek()) {
                self.punct();
                continue;
            }
            break;
        }
        let original = self.cur.slice(start, self.cur.pos()).to_owned();
        let this = !data && segments.first().is_some_and(|s| s == "this");
        let mut segments = segments.into_iter();
        let first = segments.next().unwrap_or_default();
        let head = if data { format!("@{first}") } else { first };
        let node = self
            .node("PathExpression", start)
            .with("original", Field::Str(original))
            .with("head", Field::Str(head))
            .with("tail", Field::Strs(segments.collect()))
            .with("this", Field::Bool(this))
            .with("data", Field::Bool(data));
        Ok(self.finish(node))
    }
}
