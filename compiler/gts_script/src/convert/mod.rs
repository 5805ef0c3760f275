//! Lowering of the swc AST into the ESTree-shaped [`Ast`] arena.
//!
//! Node types and field names follow ESTree and typescript-estree, which
//! the visitor keys, scope analysis and template splicing depend on.
//! Ranges are byte offsets into the original text. swc nodes that carry no
//! span of their own (key/value properties, method values) get one built
//! from their parts.

mod class;
mod expr;
mod pattern;
mod stmt;
mod ts;

use gts_diagnostic::ParseError;
use gts_ir::{Ast, Field, LineIndex, Node, NodeId, Span};
use gts_lexer_core::{is_newline, is_space, Cursor};
use swc_core::common::Span as SwcSpan;
use swc_core::ecma::ast as swc;

use crate::tokens::TokenHints;

pub(crate) type PResult<T> = Result<T, ParseError>;

pub(crate) struct Converter<'a> {
    text: &'a str,
    lines: &'a LineIndex,
    /// swc position of byte 0 of `text`.
    base: u32,
    ast: Ast,
    hints: TokenHints,
}

impl<'a> Converter<'a> {
    pub(crate) fn new(text: &'a str, lines: &'a LineIndex, base: u32) -> Self {
        Converter {
            text,
            lines,
            base,
            ast: Ast::new(),
            hints: TokenHints::default(),
        }
    }

    pub(crate) fn finish_tree(mut self, root: NodeId) -> (Ast, TokenHints) {
        self.ast.set_root(root);
        (self.ast, self.hints)
    }

    /// The `Program` node spans the entire text.
    pub(crate) fn program(&mut self, module: &swc::Module) -> PResult<NodeId> {
        let body = self.list(&module.body, Self::module_item)?;
        let node = Node::new("Program", Span::new(0, self.len()))
            .with("body", body)
            .with("sourceType", Field::str("module"));
        Ok(self.finish(node))
    }

    fn module_item(&mut self, item: &swc::ModuleItem) -> PResult<NodeId> {
        match item {
            swc::ModuleItem::ModuleDecl(decl) => self.module_decl(decl),
            swc::ModuleItem::Stmt(stmt) => self.stmt(stmt),
        }
    }

    // Ranges

    fn len(&self) -> u32 {
        self.text.len() as u32
    }

    fn span(&self, span: SwcSpan) -> Span {
        let len = self.len();
        let start = span.lo.0.saturating_sub(self.base).min(len);
        let end = span.hi.0.saturating_sub(self.base).clamp(start, len);
        Span::new(start, end)
    }

    fn slice(&self, range: Span) -> &'a str {
        range.slice(self.text).unwrap_or_default()
    }

    /// First offset at or after `from` that is not whitespace or a comment.
    fn skip_trivia(&self, from: u32) -> u32 {
        let mut cur = Cursor::at(self.text, from);
        while !cur.is_eof() {
            let b = cur.current();
            if is_space(b) || is_newline(b) {
                cur.advance();
            } else if b == b'/' && cur.peek() == b'/' {
                cur.skip_line_comment();
            } else if b == b'/' && cur.peek() == b'*' {
                if cur.skip_block_comment().is_err() {
                    break;
                }
            } else {
                break;
            }
        }
        cur.pos()
    }

    /// Offset of the `(` or `<` opening a method's signature after its key,
    /// past an optional `?`.
    fn signature_start(&self, key_end: u32) -> u32 {
        let at = self.skip_trivia(key_end);
        match self.text.as_bytes().get(at as usize) {
            Some(b'?' | b'!') => self.skip_trivia(at + 1),
            _ => at,
        }
    }

    // Node building

    fn finish(&mut self, mut node: Node) -> NodeId {
        node.loc = self.lines.loc(node.range);
        self.ast.alloc(node)
    }

    fn range_of(&self, id: NodeId) -> Span {
        self.ast.get(id).range
    }

    /// A fresh copy of a leaf node, for shorthand properties and specifiers
    /// that reuse one piece of source as two fields.
    fn duplicate(&mut self, id: NodeId) -> NodeId {
        let node = self.ast.get(id).clone();
        self.ast.alloc(node)
    }

    fn opt<T: ?Sized>(
        &mut self,
        item: Option<&T>,
        convert: impl FnOnce(&mut Self, &T) -> PResult<NodeId>,
    ) -> PResult<Option<NodeId>> {
        item.map(|item| convert(self, item)).transpose()
    }

    fn opt_field<T: ?Sized>(
        &mut self,
        item: Option<&T>,
        convert: impl FnOnce(&mut Self, &T) -> PResult<NodeId>,
    ) -> PResult<Field> {
        Ok(Field::opt(self.opt(item, convert)?))
    }

    fn list<T>(&mut self, items: &[T], mut convert: impl FnMut(&mut Self, &T) -> PResult<NodeId>) -> PResult<Field> {
        let ids = items
            .iter()
            .map(|item| convert(self, item))
            .collect::<PResult<Vec<_>>>()?;
        Ok(Field::list(ids))
    }

    fn unsupported(&self, what: &str, range: Span) -> ParseError {
        ParseError::syntax(format!("Unsupported syntax: {what}."), range.start, self.lines)
    }

    fn ident(&mut self, ident: &swc::Ident) -> NodeId {
        let node = Node::new("Identifier", self.span(ident.span)).with("name", Field::str(ident.sym.to_string()));
        self.finish(node)
    }

    fn ident_name(&mut self, ident: &swc::IdentName) -> NodeId {
        let node = Node::new("Identifier", self.span(ident.span)).with("name", Field::str(ident.sym.to_string()));
        self.finish(node)
    }

    fn private_name(&mut self, name: &swc::PrivateName) -> NodeId {
        let range = self.span(name.span);
        self.hints.private_names.push((range, name.name.to_string()));
        let node = Node::new("PrivateIdentifier", range).with("name", Field::str(name.name.to_string()));
        self.finish(node)
    }

    fn decorators(&mut self, decorators: &[swc::Decorator]) -> PResult<Field> {
        self.list(decorators, |c, decorator| {
            let expression = c.expr(&decorator.expr)?;
            let node = Node::new("Decorator", c.span(decorator.span)).with("expression", Field::Node(expression));
            Ok(c.finish(node))
        })
    }
}
