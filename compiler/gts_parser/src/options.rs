//! Parser options.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use gts_vfs::Program;

/// A host-compiler program shared with the caller.
pub type SharedProgram = Arc<dyn Program + Send + Sync>;

/// Options for [`parse_for_lint`](crate::parse_for_lint).
///
/// Built with chained setters:
///
/// ```
/// use gts_parser::ParserOptions;
///
/// let options = ParserOptions::new()
///     .with_file_path("src/card.gts")
///     .with_allow_secondary(false);
/// assert!(options.is_typed_path());
/// ```
#[derive(Clone, Default)]
pub struct ParserOptions {
    /// Path of the document; selects the grammar and decides whether the
    /// template scan runs.
    pub file_path: Option<PathBuf>,
    /// Honor `.gjs` files in the file-system shim. Unset means "inspect the
    /// project".
    pub allow_secondary: Option<bool>,
    /// Use the untyped grammar for files that do not require the typed one.
    pub use_alternate_script_grammar: bool,
    /// Project root. When set, import specifiers are pointed at virtual
    /// siblings and the root's `tsconfig.json` feeds the shim configuration.
    pub project: Option<PathBuf>,
    /// Host-compiler program to keep in sync with dual-syntax files.
    pub program: Option<SharedProgram>,
}

impl ParserOptions {
    pub fn new() -> Self {
        ParserOptions::default()
    }

    #[must_use]
    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_allow_secondary(mut self, allow: bool) -> Self {
        self.allow_secondary = Some(allow);
        self
    }

    #[must_use]
    pub fn with_alternate_script_grammar(mut self, alternate: bool) -> Self {
        self.use_alternate_script_grammar = alternate;
        self
    }

    #[must_use]
    pub fn with_project(mut self, root: impl Into<PathBuf>) -> Self {
        self.project = Some(root.into());
        self
    }

    #[must_use]
    pub fn with_program(mut self, program: SharedProgram) -> Self {
        self.program = Some(program);
        self
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Whether the path names a file only the typed grammar can read.
    pub fn is_typed_path(&self) -> bool {
        self.file_path().is_some_and(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| matches!(ext, "gts" | "ts" | "mts" | "cts"))
        })
    }

    pub(crate) fn program(&self) -> Option<&dyn Program> {
        self.program.as_deref().map(|program| program as &dyn Program)
    }
}

impl fmt::Debug for ParserOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserOptions")
            .field("file_path", &self.file_path)
            .field("allow_secondary", &self.allow_secondary)
            .field("use_alternate_script_grammar", &self.use_alternate_script_grammar)
            .field("project", &self.project)
            .field("program", &self.program.is_some())
            .finish()
    }
}
