//! Virtual file-system shim.
//!
//! A host compiler only resolves conventional extensions. The shim wraps its
//! file-system hooks so that:
//!
//! - `a.mts` resolves to `a.gts` (and `a.mjs` to `a.gjs` when the secondary
//!   extension is enabled), following ordered rewrite rules;
//! - reading a dual-syntax file returns its placeholder-transformed text
//!   with import specifiers pointed at virtual siblings;
//! - directory listings include the virtual siblings.
//!
//! [`sync_virtual_files`] keeps a program's per-file metadata consistent
//! between a dual-syntax file and its sibling. [`ShimState::activate`]
//! installs the configuration once per process.

mod config;
mod error;
mod host;
mod program;
pub mod rules;
mod shim;
mod system;

pub use config::{parse_tsconfig, read_tsconfig, CompilerOptions, TSCONFIG};
pub use error::VfsError;
pub use host::{HostSystem, RealFs};
pub use program::{sync_virtual_files, InMemoryProgram, Program, SourceFile, VirtualFlag};
pub use shim::{SettingSource, ShimOptions, ShimState};
pub use system::PatchedSystem;
