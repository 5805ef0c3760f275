//! Low-level scanning for script text.
//!
//! Provides a byte [`Cursor`] plus helpers that skip over the constructs
//! inside which markup-looking text must be ignored: string literals,
//! template literals (with nested `${}` code), line and block comments and
//! regular-expression literals. Both the template extractor and the script
//! lexer are built on these helpers so they agree on where code ends and
//! literal text begins.

mod cursor;
mod regex_context;
mod skip;

pub use cursor::Cursor;
pub use regex_context::{regex_allowed, PrevToken};
pub use skip::{RawError, RawErrorKind, Skipped, TemplateChunkEnd};

/// Whether `b` can start an identifier. Non-ASCII bytes are accepted so
/// Unicode identifiers scan as one word.
#[inline]
pub fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$' || b >= 0x80
}

/// Whether `b` can continue an identifier.
#[inline]
pub fn is_ident_continue(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}

/// Script whitespace, excluding line terminators.
#[inline]
pub fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | 0x0B | 0x0C)
}

#[inline]
pub fn is_newline(b: u8) -> bool {
    matches!(b, b'\n' | b'\r')
}
