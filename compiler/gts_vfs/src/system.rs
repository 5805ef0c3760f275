//! The patched file system handed to the host compiler.

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use gts_transform::{rewrite_import_specifiers, SourceDocument};
use tracing::{error, trace};

use crate::rules::{self, EXISTS_RULES, READ_RULES};
use crate::{HostSystem, VfsError};

const BUILD_INFO: &str = "tsconfig.tsbuildinfo";

/// Wraps a host's file-system hooks so module resolution sees dual-syntax
/// files under their conventional-extension names.
#[derive(Clone, Debug)]
pub struct PatchedSystem<H> {
    host: H,
    allow_secondary: bool,
}

impl<H: HostSystem> PatchedSystem<H> {
    pub fn new(host: H, allow_secondary: bool) -> Self {
        PatchedSystem { host, allow_secondary }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn allow_secondary(&self) -> bool {
        self.allow_secondary
    }

    /// The on-disk file an existence check for `path` resolves to.
    pub fn resolve_existing(&self, path: &Path) -> Option<PathBuf> {
        rules::resolve(EXISTS_RULES, path, self.allow_secondary, |p| self.host.file_exists(p))
    }

    /// The on-disk file a read of `path` resolves to.
    pub fn resolve_for_read(&self, path: &Path) -> Option<PathBuf> {
        rules::resolve(READ_RULES, path, self.allow_secondary, |p| self.host.file_exists(p))
    }

    /// Placeholder transform and import rewriting for a resolved file.
    /// A failing step is logged and skipped.
    fn prepare(&self, resolved: &Path, mut content: String) -> String {
        let Some(name) = resolved.to_str() else {
            return content;
        };
        let dual = rules::is_dual_syntax_source(name, self.allow_secondary);
        if dual {
            let document = SourceDocument::new(resolved, content);
            content = match document.extract() {
                Ok(transformed) => transformed.text,
                Err(e) => {
                    error!(path = %resolved.display(), error = %e, "template transform failed");
                    document.text
                }
            };
        }
        if dual || (name.ends_with(".ts") && !rules::is_declaration(name)) {
            match rewrite_import_specifiers(&content, self.allow_secondary) {
                Ok(rewritten) => content = rewritten,
                Err(e) => error!(path = %resolved.display(), error = %e, "import rewrite failed"),
            }
        }
        content
    }
}

impl<H: HostSystem> HostSystem for PatchedSystem<H> {
    fn file_exists(&self, path: &Path) -> bool {
        self.resolve_existing(path).is_some()
    }

    fn read_file(&self, path: &Path) -> Result<String, VfsError> {
        if path.to_str().is_some_and(|p| p.ends_with(BUILD_INFO)) {
            return Ok(String::new());
        }
        let resolved = self
            .resolve_for_read(path)
            .ok_or_else(|| VfsError::NotFound(path.to_path_buf()))?;
        if resolved != path {
            trace!(from = %path.display(), to = %resolved.display(), "resolved dual-syntax variant");
        }
        let content = self.host.read_file(&resolved)?;
        Ok(self.prepare(&resolved, content))
    }

    fn read_directory(&self, dir: &Path) -> Result<Vec<PathBuf>, VfsError> {
        let mut listing = self.host.read_directory(dir)?;
        let siblings = rules::virtual_siblings(&listing, self.allow_secondary);
        listing.extend(siblings);
        Ok(listing)
    }
}
