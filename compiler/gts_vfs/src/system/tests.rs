#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;

use pretty_assertions::assert_eq;
use tempfile::{tempdir, TempDir};

use super::*;
use crate::RealFs;

const COMPONENT: &str = "import Card from './card.gts';\nexport const T = <template><Card /></template>;\n";

fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = tempdir().unwrap();
    for (name, content) in files {
        let path = dir.path().join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    dir
}

#[test]
fn dual_syntax_sibling_shadows_a_conventional_file() {
    let dir = project(&[("foo.ts", "export const literal = 1;\n"), ("foo.gjs", COMPONENT)]);
    let system = PatchedSystem::new(RealFs, true);
    let foo = dir.path().join("foo.ts");

    assert!(system.file_exists(&foo));
    let content = system.read_file(&foo).unwrap();
    assert_ne!(content, "export const literal = 1;\n");
    assert_eq!(content.len(), COMPONENT.len());
    assert!(!content.contains("<template>"));
    assert!(content.contains("'./card.mts'"));
}

#[test]
fn without_the_flag_the_literal_file_is_read() {
    let dir = project(&[("foo.ts", "export const literal = 1;\n"), ("foo.gjs", COMPONENT)]);
    let system = PatchedSystem::new(RealFs, false);
    assert_eq!(
        system.read_file(&dir.path().join("foo.ts")).unwrap(),
        "export const literal = 1;\n"
    );
    assert!(!system.file_exists(&dir.path().join("foo.mjs")));
}

#[test]
fn virtual_names_resolve_to_dual_syntax_files() {
    let dir = project(&[("card.gts", COMPONENT), ("api.gjs.d.ts", "export declare const a: number;\n")]);
    let system = PatchedSystem::new(RealFs, true);

    assert!(system.file_exists(&dir.path().join("card.mts")));
    assert!(system.file_exists(&dir.path().join("api.d.mts")));
    assert!(!system.file_exists(&dir.path().join("missing.mts")));

    let declaration = system.read_file(&dir.path().join("api.d.mts")).unwrap();
    assert_eq!(declaration, "export declare const a: number;\n");
    assert_eq!(
        system.resolve_for_read(&dir.path().join("card.mts")),
        Some(dir.path().join("card.gts"))
    );
}

#[test]
fn declaration_content_is_never_transformed() {
    let text = "import x from './x.gts';\nexport declare const T: unknown;\n";
    let dir = project(&[("types.d.ts", text)]);
    let system = PatchedSystem::new(RealFs, true);
    assert_eq!(system.read_file(&dir.path().join("types.d.ts")).unwrap(), text);
}

#[test]
fn plain_typescript_gets_import_rewriting_only() {
    let text = "import Card from './card.gts';\nconst a = 1 < 2;\n";
    let dir = project(&[("main.ts", text)]);
    let system = PatchedSystem::new(RealFs, false);
    assert_eq!(
        system.read_file(&dir.path().join("main.ts")).unwrap(),
        "import Card from './card.mts';\nconst a = 1 < 2;\n"
    );
}

#[test]
fn failed_transform_returns_the_untouched_content() {
    let broken = "const T = <template><div>\n";
    let dir = project(&[("broken.gts", broken)]);
    let system = PatchedSystem::new(RealFs, true);
    assert_eq!(system.read_file(&dir.path().join("broken.gts")).unwrap(), broken);
}

#[test]
fn build_info_reads_are_empty() {
    let dir = project(&[("tsconfig.tsbuildinfo", "{\"program\":{}}")]);
    let system = PatchedSystem::new(RealFs, true);
    assert_eq!(system.read_file(&dir.path().join("tsconfig.tsbuildinfo")).unwrap(), "");
}

#[test]
fn missing_files_are_not_found() {
    let dir = project(&[]);
    let system = PatchedSystem::new(RealFs, true);
    let err = system.read_file(&dir.path().join("nope.ts")).unwrap_err();
    assert!(matches!(err, VfsError::NotFound(_)), "{err}");
}

#[test]
fn directory_listing_gains_virtual_siblings() {
    let dir = project(&[
        ("a.gts", COMPONENT),
        ("nested/b.gjs", COMPONENT),
        ("nested/c.gjs.d.ts", ""),
        ("plain.ts", ""),
    ]);
    let system = PatchedSystem::new(RealFs, true);
    let names: Vec<_> = system
        .read_directory(dir.path())
        .unwrap()
        .into_iter()
        .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();
    assert_eq!(
        names,
        [
            "a.gts",
            "nested/b.gjs",
            "nested/c.gjs.d.ts",
            "plain.ts",
            "a.mts",
            "nested/b.mjs",
            "nested/c.mjs.d.ts",
            "nested/c.d.mts",
        ]
    );
}
