#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::Path;

use gts_diagnostic::ErrorKind;
use gts_ir::{Position, ScopeKind, Span, TemplateTokenKind, TokenKind};
use gts_script::{EcmaParser, ScriptOptions, ScriptParser};
use gts_template::GlimmerParser;
use pretty_assertions::assert_eq;

use super::*;
use crate::extract;

fn unify_source(src: &str, source: &TransformedSource) -> Result<UnifiedAst, ParseError> {
    let (template, script) = (GlimmerParser::new(), EcmaParser::new());
    let adapter = TemplateAdapter::new(&template, &script, ScriptOptions::typed());
    let out = script.parse_module(&source.text, ScriptOptions::typed()).unwrap();
    splice(out, source, src, &adapter)
}

fn unify(src: &str) -> UnifiedAst {
    let source = extract(src, Some(Path::new("component.gts"))).unwrap();
    unify_source(src, &source).unwrap()
}

fn reachable(unified: &UnifiedAst) -> Vec<NodeId> {
    unified.ast.descendants(unified.root)
}

fn first(unified: &UnifiedAst, node_type: &str) -> NodeId {
    reachable(unified)
        .into_iter()
        .find(|id| unified.ast.get(*id).node_type == node_type)
        .unwrap()
}

fn text<'a>(src: &'a str, unified: &UnifiedAst, id: NodeId) -> &'a str {
    unified.ast.get(id).range.slice(src).unwrap()
}

const COMPONENT: &str = "import Button from './button';\n\nexport const Greeting = <template>\n  <Button @size={{1}} class=\"big\">Hi</Button>\n</template>;\n";

#[test]
fn expression_region_replaces_the_template_literal() {
    let unified = unify(COMPONENT);
    let template = first(&unified, "GlimmerTemplate");
    assert!(text(COMPONENT, &unified, template).starts_with("<template>\n  <Button"));

    let link = unified.parents.get(template).unwrap();
    assert_eq!(unified.ast.get(link.parent).node_type, "VariableDeclarator");
    assert_eq!(link.field, "init");
    assert!(!reachable(&unified)
        .iter()
        .any(|id| unified.ast.get(*id).node_type == "TemplateLiteral"));
}

#[test]
fn class_member_region_replaces_the_static_block() {
    let src = "export default class Hello {\n  name = 'x';\n  <template>Hi {{this.name}}</template>\n}\n";
    let unified = unify(src);
    let template = first(&unified, "GlimmerTemplate");
    assert_eq!(text(src, &unified, template), "<template>Hi {{this.name}}</template>");
    let link = unified.parents.get(template).unwrap();
    assert_eq!(unified.ast.get(link.parent).node_type, "ClassBody");
    assert!(!reachable(&unified)
        .iter()
        .any(|id| unified.ast.get(*id).node_type == "StaticBlock"));
    assert_eq!(unified.scope_manager.first_of_kind(ScopeKind::ClassStaticBlock), None);
}

#[test]
fn statement_region_replaces_the_void_expression() {
    let src = "import Foo from './foo'\n\n<template><Foo /></template>\n";
    let unified = unify(src);
    let template = first(&unified, "GlimmerTemplate");
    assert_eq!(text(src, &unified, template), "<template><Foo /></template>");
    let link = unified.parents.get(template).unwrap();
    assert_eq!(unified.ast.get(link.parent).node_type, "ExpressionStatement");
    assert!(!reachable(&unified)
        .iter()
        .any(|id| matches!(unified.ast.get(*id).node_type.as_str(), "UnaryExpression" | "TemplateLiteral")));
    let sm = &unified.scope_manager;
    let (_, reference) = sm.references().find(|(_, r)| r.name == "Foo").unwrap();
    assert!(reference.resolved.is_some());
}

#[test]
fn member_region_after_field_without_semicolon() {
    let src = "class A {\n  count = 0\n  <template>{{this.count}}</template>\n}\n";
    let unified = unify(src);
    let template = first(&unified, "GlimmerTemplate");
    let link = unified.parents.get(template).unwrap();
    assert_eq!(unified.ast.get(link.parent).node_type, "ClassBody");
    let property = first(&unified, "PropertyDefinition");
    assert_eq!(text(src, &unified, property), "count = 0");
}

#[test]
fn spliced_ranges_slice_the_original_text() {
    let unified = unify(COMPONENT);
    let element = first(&unified, "GlimmerElementNode");
    // the outer `<template>` element comes first
    let button = unified
        .ast
        .get(element)
        .children("children")
        .find(|id| unified.ast.get(*id).node_type == "GlimmerElementNode")
        .unwrap();
    assert_eq!(text(COMPONENT, &unified, button), "<Button @size={{1}} class=\"big\">Hi</Button>");
    assert_eq!(
        text(COMPONENT, &unified, first(&unified, "GlimmerMustacheStatement")),
        "{{1}}"
    );
    assert_eq!(unified.ast.get(button).loc.start, Position::new(4, 2));
    assert_eq!(unified.ast.get(unified.root).range, Span::new(0, COMPONENT.len() as u32));
}

#[test]
fn quoted_attribute_text_excludes_quotes_but_its_token_does_not() {
    let unified = unify(COMPONENT);
    let attr = reachable(&unified)
        .into_iter()
        .find(|id| unified.ast.get(*id).str_field("name") == Some("class"))
        .unwrap();
    let value = unified.ast.get(attr).child("value").unwrap();
    assert_eq!(unified.ast.get(value).node_type, "GlimmerTextNode");
    assert_eq!(text(COMPONENT, &unified, value), "big");

    let token = unified
        .tokens
        .iter()
        .find(|t| t.kind == TokenKind::Template(TemplateTokenKind::Text) && t.value == "big")
        .unwrap();
    assert_eq!(token.range.slice(COMPONENT), Some("\"big\""));
}

#[test]
fn tokens_are_merged_sorted_and_cover_every_node() {
    let unified = unify(COMPONENT);
    for pair in unified.tokens.windows(2) {
        assert!(pair[0].range.start <= pair[1].range.start);
    }
    let region = extract(COMPONENT, Some(Path::new("a.gts"))).unwrap().regions[0].span;
    assert!(!unified
        .tokens
        .iter()
        .any(|t| !t.kind.is_template() && region.contains_span(t.range)));

    for id in reachable(&unified) {
        let range = unified.ast.get(id).range;
        if range.is_empty() {
            continue;
        }
        assert!(
            unified
                .tokens
                .iter()
                .any(|t| t.range.start < range.end && range.start < t.range.end),
            "{} at {range} has no token",
            unified.ast.get(id).node_type
        );
    }

    let hi = unified.tokens.iter().find(|t| t.value == "Hi").unwrap();
    assert_eq!(hi.loc.start, Position::new(4, 34));
}

#[test]
fn visitor_keys_cover_both_grammars() {
    let unified = unify(COMPONENT);
    for id in reachable(&unified) {
        let node_type = &unified.ast.get(id).node_type;
        assert!(unified.visitor_keys.contains(node_type), "{node_type} has no keys");
    }
    assert!(unified.visitor_keys.contains("Program"));
    assert!(unified.visitor_keys.contains("GlimmerBlockStatement"));
}

#[test]
fn every_spliced_node_has_a_parent_link() {
    let unified = unify("const a = <template>{{#if x}}<b>1</b>{{/if}}</template>;\nconst b = <template>2</template>;");
    for id in reachable(&unified) {
        if id == unified.root {
            continue;
        }
        let link = unified.parents.get(id).unwrap();
        assert!(unified.ast.get(link.parent).all_children().contains(&id));
    }
    let templates = reachable(&unified)
        .into_iter()
        .filter(|id| unified.ast.get(*id).node_type == "GlimmerTemplate")
        .count();
    assert_eq!(templates, 2);
}

#[test]
fn region_without_placeholder_is_an_internal_error() {
    let src = "const T = <template>x</template>;";
    let mut source = extract(src, Some(Path::new("a.gts"))).unwrap();
    source.regions[0].span = source.regions[0].span.shift(1);
    let err = unify_source(src, &source).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InternalConsistency);
}

#[test]
fn template_errors_surface_from_splicing() {
    let src = "const T = <template>{{#if}}</template>;";
    let source = extract(src, Some(Path::new("a.gts"))).unwrap();
    let err = unify_source(src, &source).unwrap_err();
    assert!(err.is_syntax());
    assert!(err.index >= 20, "{err}");
}
