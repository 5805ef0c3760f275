#![allow(clippy::unwrap_used, clippy::expect_used)]

use gts_diagnostic::ErrorKind;
use gts_ir::{Ast, NodeId};
use pretty_assertions::assert_eq;

use super::*;

fn module(src: &str, typed: bool) -> ScriptOutput {
    let options = if typed {
        ScriptOptions::typed()
    } else {
        ScriptOptions::untyped()
    };
    EcmaParser::new().parse_module(src, options).unwrap()
}

fn find_all(ast: &Ast, root: NodeId, node_type: &str) -> Vec<NodeId> {
    ast.descendants(root)
        .into_iter()
        .filter(|id| ast.get(*id).node_type == node_type)
        .collect()
}

fn text_of<'a>(src: &'a str, ast: &Ast, id: NodeId) -> &'a str {
    ast.get(id).range.slice(src).unwrap()
}

#[test]
fn program_spans_whole_text() {
    let src = "// lead\nconst x = 1;\n";
    let out = module(src, false);
    let program = out.ast.get(out.root);
    assert_eq!(program.node_type, "Program");
    assert_eq!(program.range.to_range(), 0..src.len());
    assert_eq!(out.comments.len(), 1);
    let decl = program.children("body").next().unwrap();
    assert_eq!(text_of(src, &out.ast, decl), "const x = 1;");
}

#[test]
fn placeholder_template_literal_keeps_exact_range() {
    let src = "const t = `   \n   `;";
    let out = module(src, false);
    let literals = find_all(&out.ast, out.root, "TemplateLiteral");
    assert_eq!(literals.len(), 1);
    assert_eq!(text_of(src, &out.ast, literals[0]), "`   \n   `");
    assert_eq!(out.ast.get(literals[0]).loc.end.line, 2);
}

#[test]
fn placeholder_static_block_keeps_exact_range() {
    let src = "class A {\n  static{      }\n}";
    let out = module(src, false);
    let blocks = find_all(&out.ast, out.root, "StaticBlock");
    assert_eq!(blocks.len(), 1);
    assert_eq!(text_of(src, &out.ast, blocks[0]), "static{      }");
}

#[test]
fn expressions_and_precedence() {
    let src = "a = b + c * d ?? e;";
    let out = module(src, false);
    let assign = find_all(&out.ast, out.root, "AssignmentExpression")[0];
    let right = out.ast.get(assign).child("right").unwrap();
    assert_eq!(out.ast.get(right).node_type, "LogicalExpression");
    let binary = find_all(&out.ast, out.root, "BinaryExpression");
    let texts: Vec<_> = binary.iter().map(|id| text_of(src, &out.ast, *id)).collect();
    assert!(texts.contains(&"b + c * d"));
    assert!(texts.contains(&"c * d"));
}

#[test]
fn arrow_functions_and_destructuring() {
    let src = "const f = ({ a, b = 2 }, ...rest) => a + b;";
    let out = module(src, false);
    let arrow = find_all(&out.ast, out.root, "ArrowFunctionExpression")[0];
    let node = out.ast.get(arrow);
    assert!(node.bool_field("expression"));
    let params: Vec<_> = node.children("params").collect();
    assert_eq!(out.ast.get(params[0]).node_type, "ObjectPattern");
    assert_eq!(out.ast.get(params[1]).node_type, "RestElement");
    assert_eq!(find_all(&out.ast, out.root, "AssignmentPattern").len(), 1);
}

#[test]
fn imports_and_exports() {
    let src = "import Foo, { bar as baz } from './foo.gts';\nexport default class extends Foo {}\nexport { baz };";
    let out = module(src, false);
    let import = find_all(&out.ast, out.root, "ImportDeclaration")[0];
    assert_eq!(out.ast.get(import).children("specifiers").count(), 2);
    let source = out.ast.get(import).child("source").unwrap();
    assert_eq!(out.ast.get(source).str_field("value"), Some("./foo.gts"));
    assert_eq!(find_all(&out.ast, out.root, "ExportDefaultDeclaration").len(), 1);
    assert_eq!(find_all(&out.ast, out.root, "ExportSpecifier").len(), 1);
}

#[test]
fn regex_after_paren_and_division_after_identifier() {
    let src = "if (/a/.test(s)) x = y / 2;";
    let out = module(src, false);
    let regex = find_all(&out.ast, out.root, "Literal")
        .into_iter()
        .find(|id| !out.ast.get(*id).strs_field("regex").is_empty())
        .unwrap();
    assert_eq!(out.ast.get(regex).strs_field("regex"), ["a".to_owned(), String::new()]);
    assert_eq!(find_all(&out.ast, out.root, "BinaryExpression").len(), 1);
}

#[test]
fn class_members() {
    let src = "class A extends B {\n  #count = 0;\n  static create() { return new A(); }\n  get count() { return this.#count; }\n}";
    let out = module(src, false);
    let methods: Vec<_> = find_all(&out.ast, out.root, "MethodDefinition")
        .into_iter()
        .map(|id| out.ast.get(id).str_field("kind").unwrap().to_owned())
        .collect();
    assert_eq!(methods.len(), 2);
    assert!(methods.contains(&"get".to_owned()));
    let property = find_all(&out.ast, out.root, "PropertyDefinition")[0];
    let key = out.ast.get(property).child("key").unwrap();
    assert_eq!(out.ast.get(key).node_type, "PrivateIdentifier");
}

#[test]
fn typed_annotations_and_declarations() {
    let src = "interface Props { name: string; count?: number }\n\
               type Maybe<T> = T | null;\n\
               export default class Greeting<T> implements Props {\n  declare name: string;\n  greet(this: Greeting<T>, n: number): void {}\n}\n\
               const x = y as unknown as Maybe<string>;\n\
               enum Color { Red, Green = 2 }";
    let out = module(src, true);
    for node_type in [
        "TSInterfaceDeclaration",
        "TSTypeAliasDeclaration",
        "TSUnionType",
        "TSClassImplements",
        "TSAsExpression",
        "TSEnumDeclaration",
        "TSTypeParameterDeclaration",
    ] {
        assert!(
            !find_all(&out.ast, out.root, node_type).is_empty(),
            "missing {node_type}"
        );
    }
    let members = find_all(&out.ast, out.root, "TSEnumMember");
    assert_eq!(members.len(), 2);
    for node_type in out.ast.descendants(out.root).iter().map(|id| &out.ast.get(*id).node_type) {
        assert!(out.visitor_keys.contains(node_type), "no keys for {node_type}");
    }
}

#[test]
fn generic_call_and_comparison_disambiguate() {
    let out = module("const a = f<string>(x);\nconst b = c < d && e > g;", true);
    let calls = find_all(&out.ast, out.root, "CallExpression");
    assert_eq!(calls.len(), 1);
    assert!(out.ast.get(calls[0]).child("typeArguments").is_some());
    assert_eq!(find_all(&out.ast, out.root, "BinaryExpression").len(), 2);
}

#[test]
fn type_annotation_rejected_when_untyped() {
    let err = EcmaParser::new()
        .parse_module("let a: number = 1;", ScriptOptions::untyped())
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Syntax);
}

#[test]
fn unterminated_string_reports_line_one() {
    let err = EcmaParser::new()
        .parse_module("console.log('test)", ScriptOptions::untyped())
        .unwrap_err();
    assert!(err.is_syntax());
    assert_eq!(err.line_number, 1);
    assert!(err.index >= 12);
}

#[test]
fn unexpected_token_is_a_located_syntax_error() {
    let err = EcmaParser::new()
        .parse_module("let a = 1;
const = 1;", ScriptOptions::untyped())
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Syntax);
    assert_eq!(err.line_number, 2);
    assert!(err.message.ends_with('.'));
}

#[test]
fn expression_mode() {
    let parser = EcmaParser::new();
    let out = parser.parse_expression("this.count + 1", ScriptOptions::untyped()).unwrap();
    assert_eq!(out.ast.get(out.root).node_type, "BinaryExpression");
    assert_eq!(out.ast.get(out.root).range.to_range(), 0..14);
    assert_eq!(out.tokens.len(), 5);

    let err = parser.parse_expression("a b", ScriptOptions::untyped()).unwrap_err();
    assert_eq!(err.index, 2);
    assert!(parser.parse_expression("   ", ScriptOptions::untyped()).is_err());
}

#[test]
fn asi_splits_statements_on_newline() {
    let out = module("let a = 1\nlet b = a\n++b", false);
    assert_eq!(out.ast.get(out.root).children("body").count(), 3);
    assert_eq!(find_all(&out.ast, out.root, "UpdateExpression").len(), 1);
}

#[test]
fn regex_opens_statement_after_if_header() {
    let src = "if (ok) /a/.test(s);\n";
    let out = module(src, false);
    let regex = find_all(&out.ast, out.root, "Literal")
        .into_iter()
        .find(|id| !out.ast.get(*id).strs_field("regex").is_empty())
        .unwrap();
    assert_eq!(text_of(src, &out.ast, regex), "/a/");
    let token = out.tokens.iter().find(|t| t.value == "/a/").unwrap();
    assert_eq!(token.kind, gts_ir::TokenKind::Script(gts_ir::ScriptTokenKind::RegularExpression));
}

#[test]
fn template_pieces_are_single_tokens() {
    let src = "const s = `a ${b} c`;";
    let out = module(src, false);
    let pieces: Vec<_> = out
        .tokens
        .iter()
        .filter(|t| t.kind == gts_ir::TokenKind::Script(gts_ir::ScriptTokenKind::Template))
        .map(|t| t.value.as_str())
        .collect();
    assert_eq!(pieces, ["`a ${", "} c`"]);
    let elements = find_all(&out.ast, out.root, "TemplateElement");
    assert_eq!(elements.len(), 2);
}

#[test]
fn nested_type_arguments_split_closing_angles() {
    let src = "let m: Map<string, Array<number>> = x;";
    let out = module(src, true);
    let closers = out.tokens.iter().filter(|t| t.value == ">").count();
    assert_eq!(closers, 2);
    assert!(out.tokens.iter().all(|t| t.value != ">>"));
}

#[test]
fn comments_are_collected_in_order() {
    let src = "/* a */ let x = 1; // b\n/** c */ f();";
    let out = module(src, false);
    let values: Vec<_> = out.comments.iter().map(|c| c.value.as_str()).collect();
    assert_eq!(values, [" a ", " b", "* c "]);
}

#[test]
fn import_sources_cover_declarations_only() {
    let src = "const routes = { import: './page.gts' };\n\
               if (x.import === './other.gjs') {}\n\
               import real from './real.gts';\n\
               export { y } from './y.gts';\n\
               const lazy = import('./lazy.gts');";
    let spans = import_sources(src, ScriptOptions::untyped()).unwrap();
    let texts: Vec<_> = spans.iter().map(|span| span.slice(src).unwrap()).collect();
    assert_eq!(texts, ["'./real.gts'"]);
}

#[test]
fn deep_parentheses_parse() {
    let src = format!("const x = {}1{};", "(".repeat(200), ")".repeat(200));
    let out = module(&src, false);
    assert_eq!(find_all(&out.ast, out.root, "Literal").len(), 1);
}

#[test]
fn nesting_past_the_limit_is_an_error_not_an_abort() {
    let depth = MAX_NESTING as usize + 50;
    let src = format!("const x = {}1{};", "(".repeat(depth), ")".repeat(depth));
    let err = EcmaParser::new()
        .parse_module(&src, ScriptOptions::untyped())
        .unwrap_err();
    assert!(err.is_syntax());
}
