#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;

use super::*;

fn program() -> InMemoryProgram {
    let program = InMemoryProgram::new(CompilerOptions::default());
    program.add_file("src/card.gts", "card source", 7);
    program.add_file("src/card.mts", "", 1);
    program.add_file("src/legacy.gjs", "legacy source", 3);
    program.add_file("src/legacy.js", "", 1);
    program.add_file("src/plain.ts", "plain", 2);
    program
}

#[test]
fn metadata_is_copied_onto_virtual_siblings() {
    let program = program();
    sync_virtual_files(&program);

    let card = program.source_file(Path::new("src/card.mts")).unwrap();
    assert_eq!(
        card,
        SourceFile {
            path: PathBuf::from("src/card.mts"),
            version: Some(7),
            text: "card source".to_owned(),
            virtual_flag: Some(VirtualFlag::Gts),
        }
    );

    // no `.mjs` sibling, so the conventional `.js` file takes the metadata
    let legacy = program.source_file(Path::new("src/legacy.js")).unwrap();
    assert_eq!(legacy.version, Some(3));
    assert_eq!(legacy.virtual_flag, Some(VirtualFlag::Gjs));

    let plain = program.source_file(Path::new("src/plain.ts")).unwrap();
    assert_eq!(plain.virtual_flag, None);
}

#[test]
fn orphaned_virtual_files_are_invalidated() {
    let program = program();
    sync_virtual_files(&program);
    program.remove_file(Path::new("src/card.gts"));
    sync_virtual_files(&program);

    let card = program.source_file(Path::new("src/card.mts")).unwrap();
    assert_eq!(card.version, None);
    let legacy = program.source_file(Path::new("src/legacy.js")).unwrap();
    assert_eq!(legacy.version, Some(3));
}

#[test]
fn files_never_synced_are_left_alone() {
    let program = InMemoryProgram::new(CompilerOptions::default());
    program.add_file("a.mts", "", 4);
    sync_virtual_files(&program);
    assert_eq!(program.source_file(Path::new("a.mts")).unwrap().version, Some(4));
}
