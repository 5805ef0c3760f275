//! Project configuration (`tsconfig.json`).


use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::{HostSystem, VfsError};

pub const TSCONFIG: &str = "tsconfig.json";

/// The subset of compiler options the shim reads.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompilerOptions {
    pub allow_js: Option<bool>,
    pub allow_arbitrary_extensions: Option<bool>,
    pub check_js: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct TsConfig {
    compiler_options: CompilerOptions,
}

/// Parse tsconfig text: JSON with comments and trailing commas.
pub fn parse_tsconfig(text: &str) -> Result<CompilerOptions, serde_json::Error> {
    let config: TsConfig = serde_json::from_str(&strip_jsonc(text))?;
    Ok(config.compiler_options)
}

/// Compiler options from `<root>/tsconfig.json`, or `None` when the file is
/// absent.
pub fn read_tsconfig(host: &dyn HostSystem, root: &Path) -> Result<Option<CompilerOptions>, VfsError> {
    let path = root.join(TSCONFIG);
    if !host.file_exists(&path) {
        return Ok(None);
    }
    let text = host.read_file(&path)?;
    let options = parse_tsconfig(&text).map_err(|source| VfsError::Config { path: path.clone(), source })?;
    debug!(path = %path.display(), ?options, "read project configuration");
    Ok(Some(options))
}

/// Remove `//` and `/* */` comments and trailing commas, keeping
/// string contents intact.
fn strip_jsonc(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                let start = i;
                i += 1;
                while i < bytes.len() && bytes[i] != b'"' {
                    i += if bytes[i] == b'\\' { 2 } else { 1 };
                }
                i = (i + 1).min(bytes.len());
                out.extend_from_slice(&bytes[start..i]);
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i < bytes.len() && !(bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/')) {
                    i += 1;
                }
                i = (i + 2).min(bytes.len());
            }
            b',' if next_significant(bytes, i + 1).is_some_and(|b| b == b'}' || b == b']') => i += 1,
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Next byte after `from` that is not whitespace or inside a comment.
fn next_significant(bytes: &[u8], mut from: usize) -> Option<u8> {
    while from < bytes.len() {
        match bytes[from] {
            b if b.is_ascii_whitespace() => from += 1,
            b'/' if bytes.get(from + 1) == Some(&b'/') => {
                while from < bytes.len() && bytes[from] != b'\n' {
                    from += 1;
                }
            }
            b'/' if bytes.get(from + 1) == Some(&b'*') => {
                from += 2;
                while from < bytes.len() && !(bytes[from] == b'*' && bytes.get(from + 1) == Some(&b'/')) {
                    from += 1;
                }
                from += 2;
            }
            b => return Some(b),
        }
    }
    None
}
