#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;

use pretty_assertions::assert_eq;
use tempfile::tempdir;

use super::*;
use crate::{CompilerOptions, InMemoryProgram};

fn program(allow_js: Option<bool>) -> InMemoryProgram {
    InMemoryProgram::new(CompilerOptions {
        allow_js,
        ..CompilerOptions::default()
    })
}

fn explicit(value: bool) -> ShimOptions {
    ShimOptions {
        allow_secondary: Some(value),
    }
}

#[test]
fn explicit_option_wins_and_mismatch_is_a_warning() {
    let program = program(Some(false));
    let state = ShimState::resolve(&explicit(true), Some(&program), None);
    assert!(state.allow_secondary());
    assert_eq!(state.source(), SettingSource::Explicit);
    let warning = state.warning().unwrap();
    assert_eq!((warning.resolved, warning.effective), (true, false));
    assert_eq!(warning.source, "program");
}

#[test]
fn program_setting_comes_before_project_config() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("tsconfig.json"), "{ \"compilerOptions\": { \"allowJs\": true } }").unwrap();
    let program = program(Some(false));
    let state = ShimState::resolve(&ShimOptions::default(), Some(&program), Some(dir.path()));
    assert!(!state.allow_secondary());
    assert_eq!(state.source(), SettingSource::Program);
    assert!(state.warning().is_none());
}

#[test]
fn project_config_with_comments_is_read() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("tsconfig.json"),
        "{\n  // js stays out\n  \"compilerOptions\": { \"allowJs\": false, },\n}\n",
    )
    .unwrap();
    let state = ShimState::resolve(&ShimOptions::default(), Some(&program(None)), Some(dir.path()));
    assert!(!state.allow_secondary());
    assert_eq!(state.source(), SettingSource::ProjectConfig);

    let overridden = ShimState::resolve(&explicit(true), None, Some(dir.path()));
    assert_eq!(overridden.warning().unwrap().source, "tsconfig.json");
}

#[test]
fn default_is_permissive() {
    let dir = tempdir().unwrap();
    let state = ShimState::resolve(&ShimOptions::default(), None, Some(dir.path()));
    assert!(state.allow_secondary());
    assert_eq!(state.source(), SettingSource::Default);
    assert!(state.system().allow_secondary());
}

#[test]
fn unreadable_project_config_falls_back_to_the_default() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("tsconfig.json"), "{ broken").unwrap();
    let state = ShimState::resolve(&ShimOptions::default(), None, Some(dir.path()));
    assert_eq!(state.source(), SettingSource::Default);
}

// The only test that touches the process-wide state.
#[test]
fn activation_happens_once() {
    let first = ShimState::activate(&explicit(false), None, None);
    let second = ShimState::activate(&explicit(true), Some(&program(Some(true))), None);
    assert!(std::ptr::eq(first, second));
    assert!(std::ptr::eq(first.system(), second.system()));
    assert_eq!(first.allow_secondary(), second.allow_secondary());
    assert!(ShimState::current().is_some());
}
