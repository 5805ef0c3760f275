#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::Path;

use gts_ir::{DefKind, ScopeKind};
use gts_script::{EcmaParser, ScriptOptions, ScriptParser};
use gts_template::GlimmerParser;
use pretty_assertions::assert_eq;

use super::*;
use crate::{extract, splice, TemplateAdapter, UnifiedAst};

fn unify(src: &str) -> UnifiedAst {
    let source = extract(src, Some(Path::new("component.gts"))).unwrap();
    let (template, script) = (GlimmerParser::new(), EcmaParser::new());
    let adapter = TemplateAdapter::new(&template, &script, ScriptOptions::typed());
    let out = script.parse_module(&source.text, ScriptOptions::typed()).unwrap();
    splice(out, &source, src, &adapter).unwrap()
}

fn unresolved(unified: &UnifiedAst) -> Vec<String> {
    let mut names: Vec<_> = unified.scope_manager.unresolved().map(|r| r.name.clone()).collect();
    names.sort();
    names
}

#[test]
fn builtin_tags_match_any_casing() {
    assert!(is_builtin_tag("div"));
    assert!(is_builtin_tag("DIV"));
    assert!(is_builtin_tag("Input"));
    assert!(is_builtin_tag("clipPath"));
    assert!(is_builtin_tag("mfrac"));
    assert!(!is_builtin_tag("Button2"));
    assert!(!is_builtin_tag("my-widget"));
}

#[test]
fn markup_tags_never_become_references() {
    let unified = unify(
        "const T = <template><div><svg><circle /></svg><my-widget></my-widget><Input /><card /></div></template>;",
    );
    assert!(unresolved(&unified).is_empty());
}

#[test]
fn bound_component_resolves_to_its_import() {
    let unified = unify("import Button from './button';\nconst T = <template><Button @label=\"hi\" /></template>;");
    let sm = &unified.scope_manager;
    let (_, reference) = sm.references().find(|(_, r)| r.name == "Button").unwrap();
    let var = reference.resolved.unwrap();
    assert_eq!(sm.variable(var).defs[0].kind, DefKind::ImportBinding);
    assert_eq!(unified.ast.get(reference.identifier).node_type, "GlimmerElementNode");
    assert!(unresolved(&unified).is_empty());
}

#[test]
fn unbound_components_are_unresolved() {
    let unified = unify("const T = <template><Missing /><ui.card /></template>;");
    assert_eq!(unresolved(&unified), ["Missing", "ui"]);
}

#[test]
fn block_params_open_a_template_scope() {
    let unified = unify("const T = <template>{{#each items as |item|}}{{item.name}}{{/each}}</template>;");
    let sm = &unified.scope_manager;
    let block = sm.first_of_kind(ScopeKind::TemplateBlock).unwrap();
    let item = sm.variable_in(block, "item").unwrap();
    assert_eq!(sm.variable(item).defs[0].kind, DefKind::TemplateBlockParam);
    assert_eq!(sm.variable(item).references.len(), 1);
    assert_eq!(unresolved(&unified), ["items"]);
}

#[test]
fn element_block_params_scope_children_only() {
    let unified = unify("const T = <template><List as |row|>{{row}}</List>{{row}}</template>;");
    assert_eq!(unresolved(&unified), ["List", "row"]);
}

#[test]
fn this_args_and_keywords_are_skipped() {
    let unified = unify("const T = <template>{{this.name}} {{@title}} {{if cond \"a\"}} {{yield}}</template>;");
    assert_eq!(unresolved(&unified), ["cond"]);
}

#[test]
fn a_bound_keyword_is_a_reference() {
    let unified = unify("const on = (f) => f;\nconst T = <template>{{on}}</template>;");
    let sm = &unified.scope_manager;
    let module = sm.first_of_kind(ScopeKind::Module).unwrap();
    let on = sm.variable_in(module, "on").unwrap();
    assert_eq!(sm.variable(on).references.len(), 2);
}

#[test]
fn island_identifiers_resolve_in_the_region_scope() {
    let unified = unify(
        "const go = () => 1;\nconst T = <template><button onclick={ go(missing) }></button></template>;",
    );
    assert_eq!(unresolved(&unified), ["missing"]);
    let sm = &unified.scope_manager;
    let module = sm.first_of_kind(ScopeKind::Module).unwrap();
    let go = sm.variable_in(module, "go").unwrap();
    // initializer write plus the island call
    assert_eq!(sm.variable(go).references.len(), 2);
}

#[test]
fn function_locals_are_visible_to_the_region() {
    let unified = unify("function render(user) {\n  return <template>{{user.name}}</template>;\n}");
    assert!(unresolved(&unified).is_empty());
}
