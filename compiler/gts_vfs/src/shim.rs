//! One-time shim activation.
//!
//! The patched file system is process-wide state: the first activation
//! resolves the configuration and installs it, later activations return the
//! stored state untouched.

#[cfg(test)]
mod tests;

use std::path::Path;
use std::sync::OnceLock;

use gts_diagnostic::ConfigWarning;
use tracing::{debug, warn};

use crate::{read_tsconfig, PatchedSystem, Program, RealFs};

static SHIM: OnceLock<ShimState> = OnceLock::new();

/// Name of the secondary-extension setting in warnings.
const SETTING: &str = "allowSecondaryExtension";

/// Caller-provided shim options.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShimOptions {
    /// Honor `.gjs` files. Unset means "inspect the project".
    pub allow_secondary: Option<bool>,
}

/// Where the secondary-extension flag was resolved from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SettingSource {
    Explicit,
    Program,
    ProjectConfig,
    Default,
}

impl SettingSource {
    pub fn as_str(self) -> &'static str {
        match self {
            SettingSource::Explicit => "options",
            SettingSource::Program => "program",
            SettingSource::ProjectConfig => "tsconfig.json",
            SettingSource::Default => "default",
        }
    }
}

/// The established shim configuration.
#[derive(Debug)]
pub struct ShimState {
    allow_secondary: bool,
    source: SettingSource,
    warning: Option<ConfigWarning>,
    system: PatchedSystem<RealFs>,
}

impl ShimState {
    /// Activate the shim, or return the state of the earlier activation.
    pub fn activate(
        options: &ShimOptions,
        program: Option<&dyn Program>,
        project_root: Option<&Path>,
    ) -> &'static ShimState {
        let mut first = false;
        let state = SHIM.get_or_init(|| {
            first = true;
            ShimState::resolve(options, program, project_root)
        });
        if !first {
            debug!(allow_secondary = state.allow_secondary, "shim already active");
        }
        state
    }

    /// The active state, if the shim was activated.
    pub fn current() -> Option<&'static ShimState> {
        SHIM.get()
    }

    /// Resolve the configuration without installing it.
    ///
    /// Precedence: explicit option, then the program's `allowJs`, then the
    /// project's `tsconfig.json`, then `true`.
    pub fn resolve(options: &ShimOptions, program: Option<&dyn Program>, project_root: Option<&Path>) -> ShimState {
        let from_program = program.and_then(|p| p.compiler_options().allow_js);
        let from_config = || {
            let root = project_root?;
            match read_tsconfig(&RealFs, root) {
                Ok(options) => options?.allow_js,
                Err(e) => {
                    warn!(error = %e, "ignoring unreadable project configuration");
                    None
                }
            }
        };
        let effective = from_program
            .map(|value| (value, SettingSource::Program))
            .or_else(|| from_config().map(|value| (value, SettingSource::ProjectConfig)));

        let (allow_secondary, source) = match options.allow_secondary {
            Some(value) => (value, SettingSource::Explicit),
            None => effective.unwrap_or((true, SettingSource::Default)),
        };

        let warning = effective
            .filter(|(value, _)| *value != allow_secondary)
            .map(|(value, origin)| ConfigWarning::mismatch(SETTING, allow_secondary, value, origin.as_str()));
        if let Some(warning) = &warning {
            warn!("{warning}");
        }
        debug!(allow_secondary, ?source, "resolved shim configuration");

        ShimState {
            allow_secondary,
            source,
            warning,
            system: PatchedSystem::new(RealFs, allow_secondary),
        }
    }

    pub fn allow_secondary(&self) -> bool {
        self.allow_secondary
    }

    pub fn source(&self) -> SettingSource {
        self.source
    }

    /// The configuration mismatch found during activation, if any.
    pub fn warning(&self) -> Option<&ConfigWarning> {
        self.warning.as_ref()
    }

    /// The patched file system; one per process.
    pub fn system(&self) -> &PatchedSystem<RealFs> {
        &self.system
    }
}
