//! Non-fatal configuration diagnostics.

use std::fmt;

/// A resolved option disagrees with the compiler's effective setting.
///
/// Parsing continues with `resolved`; the warning only records the conflict.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigWarning {
    /// Option name as the user spells it.
    pub setting: &'static str,
    pub resolved: bool,
    pub effective: bool,
    /// Where the effective value came from (e.g. `"program"`, `"tsconfig.json"`).
    pub source: String,
}

impl ConfigWarning {
    pub fn mismatch(setting: &'static str, resolved: bool, effective: bool, source: impl Into<String>) -> Self {
        ConfigWarning {
            setting,
            resolved,
            effective,
            source: source.into(),
        }
    }
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}` resolved to {} but {} has it set to {}; using {}",
            self.setting, self.resolved, self.source, self.effective, self.resolved
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_message_names_both_values() {
        let warning = ConfigWarning::mismatch("allowSecondaryExtension", true, false, "program");
        let text = warning.to_string();
        assert!(text.starts_with("`allowSecondaryExtension` resolved to true"));
        assert!(text.contains("program has it set to false"));
    }
}
