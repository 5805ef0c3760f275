//! The single error shape surfaced to callers.

use std::fmt;

use gts_ir::{LineIndex, Span};
use thiserror::Error;

/// Which part of the taxonomy an error belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input: script grammar, template grammar or region syntax.
    Syntax,
    /// The pipeline contradicted itself or a required grammar is missing.
    InternalConsistency,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Syntax => write!(f, "SyntaxError"),
            ErrorKind::InternalConsistency => write!(f, "InternalConsistencyError"),
        }
    }
}

/// A parse failure.
///
/// `line_number` is 1-based, `column` is 1-based, `index` is the byte offset
/// into the document the caller passed in. Internal-consistency errors that
/// have no location report line 0, column 0.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message} ({line_number}:{column})")]
pub struct ParseError {
    pub kind: ErrorKind,
    pub message: String,
    pub line_number: u32,
    pub column: u32,
    pub index: u32,
    pub file_name: Option<String>,
}

impl ParseError {
    /// Syntax error at byte `index` of the text indexed by `lines`.
    #[cold]
    pub fn syntax(message: impl Into<String>, index: u32, lines: &LineIndex) -> Self {
        let position = lines.position(index);
        ParseError {
            kind: ErrorKind::Syntax,
            message: message.into(),
            line_number: position.line,
            column: position.column + 1,
            index,
            file_name: None,
        }
    }

    /// Syntax error at the start of `span`.
    #[cold]
    pub fn syntax_at(message: impl Into<String>, span: Span, lines: &LineIndex) -> Self {
        Self::syntax(message, span.start, lines)
    }

    /// Internal-consistency error without a location.
    #[cold]
    pub fn internal(message: impl Into<String>) -> Self {
        ParseError {
            kind: ErrorKind::InternalConsistency,
            message: message.into(),
            line_number: 0,
            column: 0,
            index: 0,
            file_name: None,
        }
    }

    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Move a sub-document error into document coordinates.
    ///
    /// `delta` is the byte offset of the sub-document inside the document
    /// indexed by `lines`. Line and column are recomputed from the shifted
    /// index, not adjusted arithmetically.
    #[must_use]
    pub fn translate(mut self, delta: u32, lines: &LineIndex) -> Self {
        if self.kind != ErrorKind::Syntax {
            return self;
        }
        self.index += delta;
        let position = lines.position(self.index);
        self.line_number = position.line;
        self.column = position.column + 1;
        self
    }

    pub fn is_syntax(&self) -> bool {
        self.kind == ErrorKind::Syntax
    }
}
