//! Post-parse synchronization of virtual source files.
//!
//! The host compiler keeps per-file metadata for every file it parsed. A
//! dual-syntax file and its virtual sibling (`a.gts` and `a.mts`) must share
//! that metadata, or incremental builds see stale copies. After each pass the
//! real file's metadata is copied onto the sibling, and a sibling whose real
//! file disappeared is invalidated.

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::CompilerOptions;

/// Marks a source file as the virtual copy of a dual-syntax file.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VirtualFlag {
    Gts,
    Gjs,
}

impl VirtualFlag {
    /// `(real extension, virtual extension, conventional fallback)`.
    fn extensions(self) -> (&'static str, &'static str, &'static str) {
        match self {
            VirtualFlag::Gts => ("gts", "mts", "ts"),
            VirtualFlag::Gjs => ("gjs", "mjs", "js"),
        }
    }
}

/// Per-file metadata held by the host compiler.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// `None` once invalidated.
    pub version: Option<u64>,
    pub text: String,
    pub virtual_flag: Option<VirtualFlag>,
}

/// The host compiler's program: the set of parsed source files.
pub trait Program {
    fn source_files(&self) -> Vec<PathBuf>;

    fn source_file(&self, path: &Path) -> Option<SourceFile>;

    fn compiler_options(&self) -> CompilerOptions;

    /// Copy `from`'s metadata onto `to`, keeping `to`'s identity, and flag
    /// `to` as virtual.
    fn copy_metadata(&self, from: &Path, to: &Path, flag: VirtualFlag);

    /// Mark `path` stale.
    fn invalidate(&self, path: &Path);
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().is_some_and(|e| e == ext)
}

/// Synchronize every dual-syntax file of `program` with its virtual sibling.
pub fn sync_virtual_files(program: &dyn Program) {
    let mut synced = 0usize;
    for path in program.source_files() {
        let Some(file) = program.source_file(&path) else {
            continue;
        };
        for flag in [VirtualFlag::Gts, VirtualFlag::Gjs] {
            let (real, virt, fallback) = flag.extensions();

            if file.virtual_flag == Some(flag) && (has_extension(&path, virt) || has_extension(&path, fallback)) {
                let original = path.with_extension(real);
                if program.source_file(&original).is_none() {
                    trace!(path = %path.display(), "invalidating orphaned virtual file");
                    program.invalidate(&path);
                }
            }

            if has_extension(&path, real) {
                let sibling = [virt, fallback]
                    .into_iter()
                    .map(|ext| path.with_extension(ext))
                    .find(|candidate| program.source_file(candidate).is_some());
                if let Some(sibling) = sibling {
                    program.copy_metadata(&path, &sibling, flag);
                    synced += 1;
                }
            }
        }
    }
    debug!(synced, "synchronized virtual source files");
}

/// A [`Program`] kept in memory.
#[derive(Debug, Default)]
pub struct InMemoryProgram {
    files: Mutex<FxHashMap<PathBuf, SourceFile>>,
    options: CompilerOptions,
}

impl InMemoryProgram {
    pub fn new(options: CompilerOptions) -> Self {
        InMemoryProgram {
            files: Mutex::new(FxHashMap::default()),
            options,
        }
    }

    pub fn add_file(&self, path: impl Into<PathBuf>, text: impl Into<String>, version: u64) {
        let path = path.into();
        let file = SourceFile {
            path: path.clone(),
            version: Some(version),
            text: text.into(),
            virtual_flag: None,
        };
        self.files.lock().insert(path, file);
    }

    pub fn remove_file(&self, path: &Path) -> Option<SourceFile> {
        self.files.lock().remove(path)
    }
}

impl Program for InMemoryProgram {
    fn source_files(&self) -> Vec<PathBuf> {
        let mut paths: Vec<_> = self.files.lock().keys().cloned().collect();
        paths.sort();
        paths
    }

    fn source_file(&self, path: &Path) -> Option<SourceFile> {
        self.files.lock().get(path).cloned()
    }

    fn compiler_options(&self) -> CompilerOptions {
        self.options.clone()
    }

    fn copy_metadata(&self, from: &Path, to: &Path, flag: VirtualFlag) {
        let mut files = self.files.lock();
        let Some(source) = files.get(from).cloned() else {
            return;
        };
        if let Some(target) = files.get_mut(to) {
            *target = SourceFile {
                path: target.path.clone(),
                virtual_flag: Some(flag),
                ..source
            };
        }
    }

    fn invalidate(&self, path: &Path) {
        if let Some(file) = self.files.lock().get_mut(path) {
            file.version = None;
        }
    }
}
