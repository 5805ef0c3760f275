//! Error reporting for the hybrid script/template parser.
//!
//! Failures fall into three groups:
//! - **Syntax**: unterminated template regions, malformed markup, script
//!   grammar failures. Fatal to one parse call, reported with a
//!   source-accurate position.
//! - **Internal consistency**: the extractor and splicer disagree, or a
//!   required grammar is missing. Always a hard error.
//! - **Configuration mismatch**: a resolved option disagrees with the host
//!   compiler's effective setting. Never an error; see [`ConfigWarning`].
//!
//! Hard failures are carried by [`ParseError`], which has the same shape as
//! the script grammar's own errors so existing reporters need no changes.

mod error;
mod warning;

pub use error::{ErrorKind, ParseError};
pub use warning::ConfigWarning;
