//! Grammar selection, import rewriting and program synchronization.

use std::path::Path;
use std::sync::Arc;

use gts_parser::{parse_for_lint, ParserOptions};
use gts_vfs::{CompilerOptions, InMemoryProgram, Program, VirtualFlag};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

use crate::common::{parse_ok, unresolved};

const IMPORTER: &str = "import Card from './card.gts';\nexport default <template><Card /></template>;\n";

#[test]
fn test_typed_grammar_by_default() {
    assert!(parse_ok("export const T = <template>hi</template>;\n", "hi.gjs").is_typescript);
    assert!(parse_ok("export const x = 1;\n", "x.js").is_typescript);
}

#[test]
fn test_alternate_grammar_for_untyped_files_only() {
    let src = "export const T = <template>hi</template>;\n";
    let untyped = ParserOptions::new()
        .with_file_path("hi.gjs")
        .with_alternate_script_grammar(true);
    assert!(!parse_for_lint(src, &untyped).unwrap().is_typescript);

    let typed = ParserOptions::new()
        .with_file_path("hi.gts")
        .with_alternate_script_grammar(true);
    assert!(parse_for_lint(src, &typed).unwrap().is_typescript);
}

#[test]
fn test_type_annotations_in_typed_components() {
    let src = "interface Args { name: string }\nexport const T: unknown = <template>{{@name}}</template>;\n";
    let result = parse_ok(src, "typed.gts");
    assert!(unresolved(&result).is_empty());
}

#[test]
fn test_project_imports_point_at_virtual_siblings() {
    let dir = tempdir().unwrap();
    let options = ParserOptions::new()
        .with_file_path(dir.path().join("app.gts"))
        .with_project(dir.path());
    let result = parse_for_lint(IMPORTER, &options).unwrap();
    assert!(result.tokens.iter().any(|t| t.value.contains("./card.mts")));
    assert!(!result.tokens.iter().any(|t| t.value.contains("./card.gts")));
    assert!(unresolved(&result).is_empty());
}

#[test]
fn test_imports_are_untouched_without_a_project() {
    let result = parse_ok(IMPORTER, "app.gts");
    assert!(result.tokens.iter().any(|t| t.value.contains("./card.gts")));
}

fn program() -> Arc<InMemoryProgram> {
    let program = InMemoryProgram::new(CompilerOptions::default());
    program.add_file("app/card.gts", IMPORTER, 5);
    program.add_file("app/card.mts", "", 1);
    Arc::new(program)
}

#[test]
fn test_typed_parse_synchronizes_the_program() {
    let program = program();
    let options = ParserOptions::new()
        .with_file_path("app/card.gts")
        .with_program(program.clone());
    let result = parse_for_lint(IMPORTER, &options).unwrap();
    assert!(result.services.is_some());

    let sibling = program.source_file(Path::new("app/card.mts")).unwrap();
    assert_eq!(sibling.version, Some(5));
    assert_eq!(sibling.text, IMPORTER);
    assert_eq!(sibling.virtual_flag, Some(VirtualFlag::Gts));
}

#[test]
fn test_untyped_parse_leaves_the_program_alone() {
    let program = program();
    let options = ParserOptions::new()
        .with_file_path("app/other.gjs")
        .with_alternate_script_grammar(true)
        .with_program(program.clone());
    let result = parse_for_lint("export const T = <template>x</template>;\n", &options).unwrap();
    assert!(result.services.is_none());
    let sibling = program.source_file(Path::new("app/card.mts")).unwrap();
    assert_eq!(sibling.version, Some(1));
}
