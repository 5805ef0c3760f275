//! Template references in the scope manager.

use gts_ir::{DefKind, ScopeKind};
use pretty_assertions::assert_eq;

use crate::common::{first_of, parse_ok, unresolved, COUNTER};

#[test]
fn test_component_has_no_unresolved_names() {
    let result = parse_ok(COUNTER, "app/counter.gts");
    assert!(unresolved(&result).is_empty(), "{:?}", unresolved(&result));
}

#[test]
fn test_imported_component_and_modifier_resolve() {
    let result = parse_ok(COUNTER, "app/counter.gts");
    let sm = &result.scope_manager;
    for name in ["Card", "on"] {
        let (_, reference) = sm.references().find(|(_, r)| r.name == name).unwrap();
        let variable = sm.variable(reference.resolved.unwrap());
        assert_eq!(variable.defs[0].kind, DefKind::ImportBinding, "{name}");
        assert!(result.ast.get(reference.identifier).node_type.starts_with("Glimmer"));
    }
}

#[test]
fn test_builtin_and_custom_element_tags_are_exempt() {
    let src = "export const T = <template><div><svg><path d=\"M0\" /></svg><my-widget /><x-foo></x-foo></div></template>;\n";
    let result = parse_ok(src, "tags.gts");
    assert!(unresolved(&result).is_empty(), "{:?}", unresolved(&result));
}

#[test]
fn test_unbound_component_is_unresolved() {
    let src = "export const T = <template><Missing /><Also.Missing /></template>;\n";
    let result = parse_ok(src, "missing.gts");
    assert_eq!(unresolved(&result), ["Also", "Missing"]);
}

#[test]
fn test_template_only_use_keeps_a_binding_alive() {
    let src = "import Helper from './helper';\nconst Local = 1;\nexport const T = <template>{{Helper Local}}</template>;\n";
    let result = parse_ok(src, "use.gts");
    let sm = &result.scope_manager;
    let module = sm.first_of_kind(ScopeKind::Module).unwrap();
    let helper = sm.variable_in(module, "Helper").unwrap();
    assert_eq!(sm.variable(helper).references.len(), 1);
    // the initializer write plus the template use
    let local = sm.variable_in(module, "Local").unwrap();
    assert_eq!(sm.variable(local).references.len(), 2);
}

#[test]
fn test_block_params_shadow_outer_names() {
    let src = "const item = 1;\nexport const T = <template>{{#each list as |item|}}{{item}}{{/each}}{{item}}</template>;\n";
    let result = parse_ok(src, "shadow.gts");
    let sm = &result.scope_manager;
    assert_eq!(unresolved(&result), ["list"]);

    let block = sm.first_of_kind(ScopeKind::TemplateBlock).unwrap();
    let inner = sm.variable_in(block, "item").unwrap();
    assert_eq!(sm.variable(inner).references.len(), 1);
    let module = sm.first_of_kind(ScopeKind::Module).unwrap();
    let outer = sm.variable_in(module, "item").unwrap();
    // the initializer write plus the use after the block
    assert_eq!(sm.variable(outer).references.len(), 2);
}

#[test]
fn test_template_after_semicolonless_import_resolves_it() {
    let src = "import Foo from './foo'\n\n<template><Foo /></template>\n";
    let result = parse_ok(src, "app/foo-user.gts");
    assert!(unresolved(&result).is_empty(), "{:?}", unresolved(&result));
    let sm = &result.scope_manager;
    let module = sm.first_of_kind(ScopeKind::Module).unwrap();
    let foo = sm.variable_in(module, "Foo").unwrap();
    assert_eq!(sm.variable(foo).references.len(), 1);
}

#[test]
fn test_template_after_semicolonless_declaration_sees_it() {
    let src = "const greeting = 'hi'\n\n<template>{{greeting}}</template>\n";
    let result = parse_ok(src, "greeting.gts");
    assert!(unresolved(&result).is_empty(), "{:?}", unresolved(&result));
}

#[test]
fn test_template_after_semicolonless_class_fields() {
    for src in [
        "export default class A {\n  count = 0\n  <template>{{this.count}}</template>\n}\n",
        "import { tracked } from '@glimmer/tracking';\nexport default class A {\n  @tracked count\n  <template>{{this.count}}</template>\n}\n",
    ] {
        let result = parse_ok(src, "fields.gts");
        let template = first_of(&result, "GlimmerTemplate");
        let link = result.parents.get(template).unwrap();
        assert_eq!(result.ast.get(link.parent).node_type, "ClassBody");
        assert!(unresolved(&result).is_empty(), "{:?}", unresolved(&result));
    }
}
