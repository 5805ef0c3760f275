//! Driving swc over one source text.
//!
//! Every entry point first bounds the bracket nesting of the input, then
//! runs the swc parse and the lowering on a stack segment sized for that
//! bound. Offsets coming out of swc are relative to the source file's
//! `start_pos`; [`Converter`] subtracts it.

use gts_diagnostic::ParseError;
use gts_ir::{Ast, Comment, CommentKind, LineIndex, NodeId, Span, Token};
use gts_lexer_core::Cursor;
use gts_stack::with_parse_stack;
use swc_core::common::comments::{self as swc_comments, SingleThreadedComments};
use swc_core::common::sync::Lrc;
use swc_core::common::{BytePos, FileName, SourceFile, SourceMap, Spanned};
use swc_core::ecma::ast::{self as swc, EsVersion};
use swc_core::ecma::parser::error::Error as SwcError;
use swc_core::ecma::parser::lexer::Lexer;
use swc_core::ecma::parser::{EsSyntax, Parser, StringInput, Syntax};

use crate::convert::Converter;
use crate::tokens::collect_tokens;

/// Deepest `(`/`[`/`{` nesting accepted before parsing.
pub const MAX_NESTING: u32 = 1_000;

pub(crate) struct ParsedModule {
    pub ast: Ast,
    pub root: NodeId,
    pub tokens: Vec<Token>,
    pub comments: Vec<Comment>,
}

pub(crate) struct ParsedExpression {
    pub ast: Ast,
    pub root: NodeId,
    pub tokens: Vec<Token>,
}

#[cfg(feature = "typescript")]
fn syntax(typed: bool) -> Syntax {
    use swc_core::ecma::parser::TsSyntax;

    if typed {
        Syntax::Typescript(TsSyntax {
            decorators: true,
            ..Default::default()
        })
    } else {
        es_syntax()
    }
}

#[cfg(not(feature = "typescript"))]
fn syntax(_typed: bool) -> Syntax {
    es_syntax()
}

fn es_syntax() -> Syntax {
    Syntax::Es(EsSyntax {
        decorators: true,
        decorators_before_export: true,
        auto_accessors: true,
        ..Default::default()
    })
}

/// One swc source file plus the base its spans are measured from.
struct Source {
    file: Lrc<SourceFile>,
    base: u32,
}

impl Source {
    /// `text` is what swc sees; spans are reported relative to `skip`
    /// bytes into it.
    fn new(text: String, skip: u32) -> Self {
        let map: Lrc<SourceMap> = Lrc::new(SourceMap::default());
        let file = map.new_source_file(FileName::Anon.into(), text);
        let base = file.start_pos.0 + skip;
        Source { file, base }
    }

    fn lexer<'a>(&'a self, typed: bool, comments: Option<&'a SingleThreadedComments>) -> Lexer<'a> {
        let comments = comments.map(|c| c as &dyn swc_comments::Comments);
        Lexer::new(syntax(typed), EsVersion::latest(), StringInput::from(&*self.file), comments)
    }

    /// Parse as a module, failing on the first error swc reports, including
    /// the ones it recovered from.
    fn parse(
        &self,
        typed: bool,
        comments: Option<&SingleThreadedComments>,
        text: &str,
        lines: &LineIndex,
    ) -> Result<swc::Module, ParseError> {
        let mut parser = Parser::new_from(self.lexer(typed, comments));
        let module = parser.parse_module();
        let mut recovered = parser.take_errors();
        let first = match module {
            Err(err) => Some(err),
            Ok(_) if !recovered.is_empty() => {
                recovered.sort_by_key(|err| err.span().lo);
                recovered.into_iter().next()
            }
            Ok(module) => return Ok(module),
        };
        Err(first.map_or_else(
            || ParseError::internal("script parser failed without a diagnostic"),
            |err| self.error(&err, text, lines),
        ))
    }

    fn error(&self, err: &SwcError, text: &str, lines: &LineIndex) -> ParseError {
        let offset = self.offset(err.span().lo, text);
        let mut message = err.kind().msg().into_owned();
        if !message.ends_with('.') {
            message.push('.');
        }
        ParseError::syntax(message, offset, lines)
    }

    fn offset(&self, pos: BytePos, text: &str) -> u32 {
        pos.0.saturating_sub(self.base).min(text.len() as u32)
    }

    /// Spans of every token swc's lexer produces, in source order.
    fn token_spans(&self, typed: bool, text: &str) -> Vec<Span> {
        self.lexer(typed, None)
            .map(|token| Span::new(self.offset(token.span.lo, text), self.offset(token.span.hi, text)))
            .filter(|span| !span.is_empty())
            .collect()
    }
}

/// Reject input nested deeper than [`MAX_NESTING`].
///
/// Brackets inside quoted strings and comments are ignored. Template text
/// and regex bodies are not recognized, so their brackets count too; the
/// parse itself still runs on a grown stack.
fn check_nesting(text: &str, lines: &LineIndex) -> Result<(), ParseError> {
    let mut cur = Cursor::new(text);
    let mut depth = 0u32;
    while !cur.is_eof() {
        match cur.current() {
            b'(' | b'[' | b'{' => {
                depth += 1;
                if depth > MAX_NESTING {
                    return Err(ParseError::syntax(
                        format!("Nesting exceeds the maximum depth of {MAX_NESTING}."),
                        cur.pos(),
                        lines,
                    ));
                }
                cur.advance();
            }
            b')' | b']' | b'}' => {
                depth = depth.saturating_sub(1);
                cur.advance();
            }
            b'\'' | b'"' => {
                // Unterminated strings are swc's to report.
                cur.skip_quoted().ok();
            }
            b'/' if cur.peek() == b'/' => cur.skip_line_comment(),
            b'/' if cur.peek() == b'*' => {
                if cur.skip_block_comment().is_err() {
                    break;
                }
            }
            _ => cur.advance_char(),
        }
    }
    Ok(())
}

pub(crate) fn parse_module(text: &str, typed: bool) -> Result<ParsedModule, ParseError> {
    let lines = LineIndex::new(text);
    check_nesting(text, &lines)?;
    with_parse_stack(|| {
        let source = Source::new(text.to_owned(), 0);
        let swc_comments = SingleThreadedComments::default();
        let module = source.parse(typed, Some(&swc_comments), text, &lines)?;
        let mut converter = Converter::new(text, &lines, source.base);
        let root = converter.program(&module)?;
        drop(module);
        let (ast, hints) = converter.finish_tree(root);
        let tokens = collect_tokens(text, &lines, source.token_spans(typed, text), hints);
        let comments = collect_comments(&source, &swc_comments, text, &lines);
        Ok(ParsedModule {
            ast,
            root,
            tokens,
            comments,
        })
    })
}

/// Parse `text` as exactly one expression.
///
/// The text is parenthesized so swc sees a single expression statement;
/// spans are measured from just after the opening paren, so the wrapper
/// tokens collapse to empty spans and drop out.
pub(crate) fn parse_expression(text: &str, typed: bool) -> Result<ParsedExpression, ParseError> {
    let lines = LineIndex::new(text);
    check_nesting(text, &lines)?;
    with_parse_stack(|| {
        let source = Source::new(format!("({text}\n)"), 1);
        let module = source.parse(typed, None, text, &lines)?;
        let whole = source.file.end_pos;
        let expr = match module.body.as_slice() {
            [swc::ModuleItem::Stmt(swc::Stmt::Expr(stmt))] => match &*stmt.expr {
                swc::Expr::Paren(paren) if paren.span.hi == whole => Ok(&paren.expr),
                other => Err(source.offset(other.span().hi, text)),
            },
            [first, ..] => Err(source.offset(first.span().hi, text)),
            [] => Err(0),
        };
        let expr = expr.map_err(|offset| ParseError::syntax("Expected a single expression.", offset, &lines))?;
        let mut converter = Converter::new(text, &lines, source.base);
        let root = converter.expr(expr)?;
        drop(module);
        let (ast, hints) = converter.finish_tree(root);
        let tokens = collect_tokens(text, &lines, source.token_spans(typed, text), hints);
        Ok(ParsedExpression { ast, root, tokens })
    })
}

/// Ranges of the source string of every top-level `import` declaration,
/// quotes included.
pub(crate) fn import_sources(text: &str, typed: bool) -> Result<Vec<Span>, ParseError> {
    let lines = LineIndex::new(text);
    check_nesting(text, &lines)?;
    with_parse_stack(|| {
        let source = Source::new(text.to_owned(), 0);
        let module = source.parse(typed, None, text, &lines)?;
        let sources = module
            .body
            .iter()
            .filter_map(|item| match item {
                swc::ModuleItem::ModuleDecl(swc::ModuleDecl::Import(import)) => Some(Span::new(
                    source.offset(import.src.span.lo, text),
                    source.offset(import.src.span.hi, text),
                )),
                _ => None,
            })
            .collect();
        Ok(sources)
    })
}

fn collect_comments(
    source: &Source,
    comments: &SingleThreadedComments,
    text: &str,
    lines: &LineIndex,
) -> Vec<Comment> {
    let (leading, trailing) = comments.borrow_all();
    let mut out: Vec<Comment> = leading
        .values()
        .chain(trailing.values())
        .flatten()
        .map(|comment| {
            let range = Span::new(source.offset(comment.span.lo, text), source.offset(comment.span.hi, text));
            let kind = match comment.kind {
                swc_comments::CommentKind::Line => CommentKind::Line,
                swc_comments::CommentKind::Block => CommentKind::Block,
            };
            Comment {
                kind,
                value: comment.text.to_string(),
                range,
                loc: lines.loc(range),
            }
        })
        .collect();
    out.sort_by_key(|comment| comment.range.start);
    out.dedup_by_key(|comment| comment.range.start);
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn nesting_within_limit_is_accepted() {
        let text = format!("{}1{}", "(".repeat(200), ")".repeat(200));
        assert!(check_nesting(&text, &LineIndex::new(&text)).is_ok());
    }

    #[test]
    fn nesting_past_limit_is_a_syntax_error() {
        let text = format!("x = {}", "[".repeat(MAX_NESTING as usize + 1));
        let err = check_nesting(&text, &LineIndex::new(&text)).unwrap_err();
        assert!(err.is_syntax());
        assert_eq!(err.index, 4 + MAX_NESTING);
    }

    #[test]
    fn brackets_in_strings_and_comments_do_not_count() {
        let opens = "(".repeat(MAX_NESTING as usize + 1);
        let text = format!("'{opens}'; \"{opens}\" // {opens}\n/* {opens} */");
        assert!(check_nesting(&text, &LineIndex::new(&text)).is_ok());
    }
}
