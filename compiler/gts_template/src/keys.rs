//! Visitor keys of the template grammar, unprefixed.

use std::sync::OnceLock;

use gts_ir::VisitorKeys;

const TEMPLATE: &[(&str, &[&str])] = &[
    ("Template", &["body"]),
    ("Block", &["body"]),
    ("ElementNode", &["attributes", "modifiers", "children", "comments"]),
    ("AttrNode", &["value"]),
    ("TextNode", &[]),
    ("ConcatStatement", &["parts"]),
    ("MustacheStatement", &["path", "params", "hash"]),
    ("BlockStatement", &["path", "params", "hash", "program", "inverse"]),
    ("ElementModifierStatement", &["path", "params", "hash"]),
    ("SubExpression", &["path", "params", "hash"]),
    ("PathExpression", &[]),
    ("StringLiteral", &[]),
    ("NumberLiteral", &[]),
    ("BooleanLiteral", &[]),
    ("NullLiteral", &[]),
    ("UndefinedLiteral", &[]),
    ("Hash", &["pairs"]),
    ("HashPair", &["value"]),
    ("CommentStatement", &[]),
    ("MustacheCommentStatement", &[]),
    ("ScriptIsland", &[]),
];

/// Template grammar keys, built once per process.
pub fn template_visitor_keys() -> &'static VisitorKeys {
    static KEYS: OnceLock<VisitorKeys> = OnceLock::new();
    KEYS.get_or_init(|| VisitorKeys::from_static(TEMPLATE))
}
