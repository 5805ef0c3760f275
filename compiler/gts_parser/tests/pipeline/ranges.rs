//! Ranges, tokens and visitor keys of the merged tree.

use gts_ir::{Position, Span, TemplateTokenKind, TokenKind};
use pretty_assertions::assert_eq;

use crate::common::{first_of, nodes_of, parse_ok, reachable, slice, COUNTER};

#[test]
fn test_golden_ranges_per_node_type() {
    let result = parse_ok(COUNTER, "app/counter.gts");
    let golden = [
        ("GlimmerMustacheStatement", "{{if this.open 'open'}}"),
        ("GlimmerConcatStatement", "\"counter {{if this.open 'open'}}\""),
        ("GlimmerElementModifierStatement", "{{on \"click\" this.inc}}"),
        ("GlimmerBlockStatement", "{{#each @items as |item|}}<li>{{item.name}}</li>{{/each}}"),
        ("GlimmerStringLiteral", "'open'"),
        ("ArrowFunctionExpression", "(e) => this.inc(e)"),
        ("ImportDeclaration", "import { on } from '@ember/modifier';"),
        ("PropertyDefinition", "count = 0;"),
    ];
    for (node_type, expected) in golden {
        assert_eq!(slice(COUNTER, &result, first_of(&result, node_type)), expected, "{node_type}");
    }

    let template = first_of(&result, "GlimmerTemplate");
    let text = slice(COUNTER, &result, template);
    assert!(text.starts_with("<template>\n    <Card"), "{text}");
    assert!(text.ends_with("</Card>\n  </template>"), "{text}");

    let card = nodes_of(&result, "GlimmerElementNode")
        .into_iter()
        .find(|id| result.ast.get(*id).str_field("tag") == Some("Card"))
        .unwrap();
    assert!(slice(COUNTER, &result, card).starts_with("<Card @title=\"Count\""));
    assert!(slice(COUNTER, &result, card).ends_with("</Card>"));
    assert_eq!(result.ast.get(card).loc.start, Position::new(12, 4));

    let paths: Vec<_> = nodes_of(&result, "GlimmerPathExpression")
        .into_iter()
        .map(|id| slice(COUNTER, &result, id))
        .collect();
    assert!(paths.contains(&"item.name"));
    assert!(paths.contains(&"@items"));
    assert!(paths.contains(&"this.count"));
}

#[test]
fn test_root_covers_the_document() {
    let result = parse_ok(COUNTER, "app/counter.gts");
    let root = result.ast.get(result.root);
    assert_eq!(root.node_type, "Program");
    assert_eq!(root.range, Span::new(0, COUNTER.len() as u32));
}

#[test]
fn test_template_sits_in_the_class_body() {
    let result = parse_ok(COUNTER, "app/counter.gts");
    let template = first_of(&result, "GlimmerTemplate");
    let link = result.parents.get(template).unwrap();
    assert_eq!(result.ast.get(link.parent).node_type, "ClassBody");
    assert!(nodes_of(&result, "StaticBlock").is_empty());

    // the island's parent is the attribute that held it
    let arrow = first_of(&result, "ArrowFunctionExpression");
    let link = result.parents.get(arrow).unwrap();
    assert_eq!(result.ast.get(link.parent).node_type, "GlimmerAttrNode");
    assert_eq!(link.field, "value");
}

#[test]
fn test_every_node_has_a_token() {
    let result = parse_ok(COUNTER, "app/counter.gts");
    for id in reachable(&result) {
        let node = result.ast.get(id);
        if node.range.is_empty() {
            continue;
        }
        assert!(
            result
                .tokens
                .iter()
                .any(|t| t.range.start < node.range.end && node.range.start < t.range.end),
            "{} at {} has no token",
            node.node_type,
            node.range
        );
    }
}

#[test]
fn test_tokens_are_sorted_and_namespaced() {
    let result = parse_ok(COUNTER, "app/counter.gts");
    for pair in result.tokens.windows(2) {
        assert!(pair[0].range.start <= pair[1].range.start);
    }
    let template = result.ast.get(first_of(&result, "GlimmerTemplate")).range;
    for token in &result.tokens {
        if !template.contains_span(token.range) {
            assert!(!token.kind.is_template(), "{token:?} outside the template");
        }
    }
    // the trailing `}` of the class stays a script token
    let last = result.tokens.last().unwrap();
    assert!(last.is_punct("}"));
    assert!(!last.kind.is_template());
}

#[test]
fn test_quoted_attribute_value_asymmetry() {
    let result = parse_ok(COUNTER, "app/counter.gts");
    let title = nodes_of(&result, "GlimmerAttrNode")
        .into_iter()
        .find(|id| result.ast.get(*id).str_field("name") == Some("@title"))
        .unwrap();
    assert_eq!(slice(COUNTER, &result, title), "@title=\"Count\"");

    let value = result.ast.get(title).child("value").unwrap();
    assert_eq!(slice(COUNTER, &result, value), "Count");
    let token = result
        .tokens
        .iter()
        .find(|t| t.kind == TokenKind::Template(TemplateTokenKind::Text) && t.value == "Count")
        .unwrap();
    assert_eq!(token.range.slice(COUNTER), Some("\"Count\""));
    assert_eq!(token.range.inset(1), result.ast.get(value).range);
}

#[test]
fn test_visitor_keys_cover_every_node_type() {
    let result = parse_ok(COUNTER, "app/counter.gts");
    for id in reachable(&result) {
        let node_type = &result.ast.get(id).node_type;
        assert!(result.visitor_keys.contains(node_type), "{node_type} has no keys");
    }
    assert_eq!(result.visitor_keys.get("GlimmerAttrNode"), Some(&["value"][..]));
}

#[test]
fn test_document_without_regions_is_the_script_result() {
    let src = "export const answer = 42;\n";
    let result = parse_ok(src, "answer.ts");
    assert!(result.tokens.iter().all(|t| !t.kind.is_template()));
    assert!(!result.visitor_keys.contains("GlimmerTemplate"));
    assert_eq!(slice(src, &result, first_of(&result, "VariableDeclaration")), "const answer = 42;");
}

#[test]
fn test_multibyte_text_keeps_byte_offsets() {
    let src = "const greeting = 'héllo';\nexport const T = <template>¡{{greeting}}!</template>;\n";
    let result = parse_ok(src, "greeting.gts");
    let mustache = first_of(&result, "GlimmerMustacheStatement");
    assert_eq!(slice(src, &result, mustache), "{{greeting}}");
    assert_eq!(result.ast.get(mustache).loc.start, Position::new(2, 29));
}
