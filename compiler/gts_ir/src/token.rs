//! Tokens and comments.
//!
//! Token kinds are split into two namespaces: [`ScriptTokenKind`] for tokens
//! produced by the script grammar and [`TemplateTokenKind`] for markup and
//! mustache tokens. Consumers that only care about "real" script tokens
//! filter on [`TokenKind::is_template`].

use std::fmt;

use crate::{SourceLoc, Span};

/// Script-grammar token kinds (ESTree token type names).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScriptTokenKind {
    Boolean,
    Null,
    Identifier,
    Keyword,
    Punctuator,
    Numeric,
    String,
    RegularExpression,
    Template,
    PrivateIdentifier,
}

impl ScriptTokenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ScriptTokenKind::Boolean => "Boolean",
            ScriptTokenKind::Null => "Null",
            ScriptTokenKind::Identifier => "Identifier",
            ScriptTokenKind::Keyword => "Keyword",
            ScriptTokenKind::Punctuator => "Punctuator",
            ScriptTokenKind::Numeric => "Numeric",
            ScriptTokenKind::String => "String",
            ScriptTokenKind::RegularExpression => "RegularExpression",
            ScriptTokenKind::Template => "Template",
            ScriptTokenKind::PrivateIdentifier => "PrivateIdentifier",
        }
    }
}

/// Template-grammar token kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TemplateTokenKind {
    /// Single markup or mustache character: `<`, `>`, `/`, `=`, `{`, `}`,
    /// `(`, `)`, `|`, `#`, `.`, quotes around mustache strings.
    Punctuator,
    /// Tag names, attribute names, path segments, keywords, literal text
    /// inside mustaches.
    Word,
    /// Text content and attribute text values.
    Text,
    /// `<!-- -->` and `{{!-- --}}` comments.
    Comment,
}

impl TemplateTokenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateTokenKind::Punctuator => "Punctuator",
            TemplateTokenKind::Word => "word",
            TemplateTokenKind::Text => "GlimmerTextNode",
            TemplateTokenKind::Comment => "GlimmerComment",
        }
    }
}

/// Namespaced token kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Script(ScriptTokenKind),
    Template(TemplateTokenKind),
}

impl TokenKind {
    #[inline]
    pub fn is_template(self) -> bool {
        matches!(self, TokenKind::Template(_))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Script(kind) => kind.as_str(),
            TokenKind::Template(kind) => kind.as_str(),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A token.
///
/// `range` is the raw extent in the source. `value` is the logical text,
/// which differs from the raw slice for quoted attribute values (quotes are
/// part of the range but not the value).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub range: Span,
    pub loc: SourceLoc,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, range: Span) -> Self {
        Token {
            kind,
            value: value.into(),
            range,
            loc: SourceLoc::default(),
        }
    }

    pub fn script(kind: ScriptTokenKind, value: impl Into<String>, range: Span) -> Self {
        Token::new(TokenKind::Script(kind), value, range)
    }

    pub fn template(kind: TemplateTokenKind, value: impl Into<String>, range: Span) -> Self {
        Token::new(TokenKind::Template(kind), value, range)
    }

    /// Whether this is a script punctuator with the given text.
    #[inline]
    pub fn is_punct(&self, text: &str) -> bool {
        self.kind == TokenKind::Script(ScriptTokenKind::Punctuator) && self.value == text
    }
}

/// Comment style.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CommentKind {
    Line,
    Block,
}

/// A script comment. `value` excludes the delimiters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comment {
    pub kind: CommentKind,
    pub value: String,
    pub range: Span,
    pub loc: SourceLoc,
}
