//! The file-system shim as the parser uses it.

use std::fs;
use std::ptr;

use gts_parser::ParserOptions;
use gts_vfs::{HostSystem, PatchedSystem, RealFs, ShimOptions, ShimState};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

use crate::common::{first_of, parse_ok, slice};

const COMPONENT: &str = "import Card from './card.gts';\nexport default <template><Card @x={{1}} /></template>;\n";

#[test]
fn test_parsing_activates_the_shim_once() {
    parse_ok("export const T = <template>hi</template>;\n", "hi.gts");
    let active = ShimState::current().unwrap();

    let flipped = ShimOptions {
        allow_secondary: Some(!active.allow_secondary()),
    };
    let again = ShimState::activate(&flipped, None, None);
    assert!(ptr::eq(active, again));
    assert!(ptr::eq(active.system(), again.system()));
    assert_eq!(again.allow_secondary(), active.allow_secondary());
}

#[test]
fn test_secondary_sibling_shadows_the_conventional_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("foo.ts"), "export const literal = 1;\n").unwrap();
    fs::write(dir.path().join("foo.gjs"), COMPONENT).unwrap();
    let system = PatchedSystem::new(RealFs, true);
    let foo = dir.path().join("foo.ts");

    assert!(system.file_exists(&foo));
    let content = system.read_file(&foo).unwrap();
    assert_eq!(content.len(), COMPONENT.len());
    assert!(content.contains("'./card.mts'"));
    assert!(!content.contains("<template>"));

    // the placeholder text still parses, and the original parses in full
    parse_ok(&content, "foo.ts");
    let result = parse_ok(COMPONENT, "foo.gjs");
    let mustache = first_of(&result, "GlimmerMustacheStatement");
    assert_eq!(slice(COMPONENT, &result, mustache), "{{1}}");
}

#[test]
fn test_virtual_listing_pairs_with_parser_paths() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("card.gts"), COMPONENT).unwrap();
    let system = PatchedSystem::new(RealFs, true);

    let listing = system.read_directory(dir.path()).unwrap();
    assert!(listing.contains(&dir.path().join("card.mts")));
    let content = system.read_file(&dir.path().join("card.mts")).unwrap();
    assert_eq!(content.len(), COMPONENT.len());

    let options = ParserOptions::new().with_file_path(dir.path().join("card.gts"));
    assert!(gts_parser::parse_for_lint(COMPONENT, &options).unwrap().is_typescript);
}
