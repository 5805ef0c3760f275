//! The host compiler's file-system hooks.

use std::fs;
use std::path::{Path, PathBuf};

use crate::VfsError;

/// File-system operations a host compiler performs during module resolution.
pub trait HostSystem {
    fn file_exists(&self, path: &Path) -> bool;

    fn read_file(&self, path: &Path) -> Result<String, VfsError>;

    /// Every file below `dir`, recursively.
    fn read_directory(&self, dir: &Path) -> Result<Vec<PathBuf>, VfsError>;
}

/// [`HostSystem`] over the real file system.
#[derive(Copy, Clone, Debug, Default)]
pub struct RealFs;

impl HostSystem for RealFs {
    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_file(&self, path: &Path) -> Result<String, VfsError> {
        fs::read_to_string(path).map_err(|e| VfsError::io(path, e))
    }

    fn read_directory(&self, dir: &Path) -> Result<Vec<PathBuf>, VfsError> {
        let mut out = Vec::new();
        let mut pending = vec![dir.to_path_buf()];
        while let Some(current) = pending.pop() {
            let entries = fs::read_dir(&current).map_err(|e| VfsError::io(&current, e))?;
            for entry in entries {
                let path = entry.map_err(|e| VfsError::io(&current, e))?.path();
                if path.is_dir() {
                    pending.push(path);
                } else {
                    out.push(path);
                }
            }
        }
        out.sort();
        Ok(out)
    }
}
