//! Scope analysis for spliced template subtrees.
//!
//! Template identifiers resolve exactly as script identifiers written at the
//! region's location would. Recorded as references:
//!
//! - the head of a path expression (`{{format x}}` -> `format`, `x`),
//!   except `this`, `@args` and unbound template keywords;
//! - the head of an element tag that names a component (`<Foo>`,
//!   `<foo.bar>`, or a lowercase tag bound in scope);
//! - identifiers inside script islands.
//!
//! Markup vocabulary (HTML, SVG and MathML tag names, any casing) and
//! unbound lowercase tags, hyphenated or not, are host markup and never
//! become references. `as |x|` block params open a `template-block` scope.

#[cfg(test)]
mod tests;

use gts_ir::{Ast, DefKind, Definition, Node, NodeId, ReferenceId, ScopeId, ScopeKind, ScopeManager, VisitorKeys};
use gts_script::ScriptParser;
use gts_stack::ensure_sufficient_stack;
use tracing::trace;

use crate::TEMPLATE_NODE_PREFIX;

/// Built-in helpers, modifiers and statements of the template language.
const TEMPLATE_KEYWORDS: &[&str] = &[
    "action", "array", "component", "concat", "debugger", "each", "each-in", "fn", "get", "has-block",
    "has-block-params", "hash", "helper", "if", "in-element", "input", "let", "link-to", "log",
    "modifier", "mount", "mut", "on", "outlet", "readonly", "textarea", "unbound", "unique-id",
    "unless", "with", "yield",
];

/// HTML element names.
const HTML_TAGS: &[&str] = &[
    "a", "abbr", "address", "area", "article", "aside", "audio", "b", "base", "bdi", "bdo",
    "blockquote", "body", "br", "button", "canvas", "caption", "cite", "code", "col", "colgroup",
    "data", "datalist", "dd", "del", "details", "dfn", "dialog", "div", "dl", "dt", "em", "embed",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "head",
    "header", "hgroup", "hr", "html", "i", "iframe", "img", "input", "ins", "kbd", "label", "legend",
    "li", "link", "main", "map", "mark", "menu", "meta", "meter", "nav", "noscript", "object", "ol",
    "optgroup", "option", "output", "p", "param", "picture", "pre", "progress", "q", "rp", "rt",
    "ruby", "s", "samp", "script", "search", "section", "select", "slot", "small", "source", "span",
    "strong", "style", "sub", "summary", "sup", "table", "tbody", "td", "template", "textarea",
    "tfoot", "th", "thead", "time", "title", "tr", "track", "u", "ul", "var", "video", "wbr",
];

/// SVG element names.
const SVG_TAGS: &[&str] = &[
    "animate", "animateMotion", "animateTransform", "circle", "clipPath", "defs", "desc", "ellipse",
    "feBlend", "feColorMatrix", "feComponentTransfer", "feComposite", "feConvolveMatrix",
    "feDiffuseLighting", "feDisplacementMap", "feDistantLight", "feDropShadow", "feFlood",
    "feFuncA", "feFuncB", "feFuncG", "feFuncR", "feGaussianBlur", "feImage", "feMerge",
    "feMergeNode", "feMorphology", "feOffset", "fePointLight", "feSpecularLighting",
    "feSpotLight", "feTile", "feTurbulence", "filter", "foreignObject", "g", "image", "line",
    "linearGradient", "marker", "mask", "metadata", "mpath", "path", "pattern", "polygon",
    "polyline", "radialGradient", "rect", "set", "stop", "svg", "switch", "symbol", "text",
    "textPath", "tspan", "use", "view",
];

/// MathML element names.
const MATHML_TAGS: &[&str] = &[
    "annotation", "annotation-xml", "maction", "math", "menclose", "merror", "mfenced", "mfrac",
    "mi", "mmultiscripts", "mn", "mo", "mover", "mpadded", "mphantom", "mprescripts", "mroot",
    "mrow", "ms", "mspace", "msqrt", "mstyle", "msub", "msubsup", "msup", "mtable", "mtd", "mtext",
    "mtr", "munder", "munderover", "none", "semantics",
];

/// Whether `tag` is built-in markup vocabulary, in any casing.
pub fn is_builtin_tag(tag: &str) -> bool {
    [HTML_TAGS, SVG_TAGS, MATHML_TAGS]
        .iter()
        .any(|set| set.iter().any(|t| t.eq_ignore_ascii_case(tag)))
}

/// Record references and block-param scopes for the template subtree at
/// `root`. The returned references still need resolving.
pub fn bind_template(
    ast: &Ast,
    root: NodeId,
    keys: &VisitorKeys,
    sm: &mut ScopeManager,
    script: &dyn ScriptParser,
) -> Vec<ReferenceId> {
    let Some(scope) = sm.acquire_at(ast.get(root).range.start) else {
        return Vec::new();
    };
    trace!(scope = sm.scope(scope).kind.as_str(), "binding template references");
    let mut binder = Binder {
        ast,
        keys,
        sm,
        script,
        references: Vec::new(),
    };
    binder.visit(root, scope);
    binder.references
}

struct Binder<'a> {
    ast: &'a Ast,
    keys: &'a VisitorKeys,
    sm: &'a mut ScopeManager,
    script: &'a dyn ScriptParser,
    references: Vec<ReferenceId>,
}

fn template_type(node_type: &str) -> Option<&str> {
    node_type.strip_prefix(TEMPLATE_NODE_PREFIX)
}

impl<'a> Binder<'a> {
    fn node(&self, id: NodeId) -> &'a Node {
        let ast: &'a Ast = self.ast;
        ast.get(id)
    }

    fn visit(&mut self, id: NodeId, scope: ScopeId) {
        ensure_sufficient_stack(|| self.visit_node(id, scope));
    }

    fn visit_node(&mut self, id: NodeId, scope: ScopeId) {
        let node = self.node(id);
        let Some(kind) = template_type(&node.node_type) else {
            // A script island.
            let found = self.script.analyze_island(self.ast, id, self.sm, scope);
            self.references.extend(found);
            return;
        };
        match kind {
            "PathExpression" => self.path(id, scope),
            "ElementNode" => {
                self.tag(id, scope);
                for field in ["attributes", "modifiers", "comments"] {
                    self.visit_field(id, field, scope);
                }
                let inner = self.block_scope(id, id, node.strs_field("blockParams"), scope);
                self.visit_field(id, "children", inner);
            }
            "BlockStatement" => {
                for field in ["path", "params", "hash"] {
                    self.visit_field(id, field, scope);
                }
                if let Some(program) = node.child("program") {
                    let params = self.node(program).strs_field("blockParams");
                    let inner = self.block_scope(program, id, params, scope);
                    self.visit_field(program, "body", inner);
                }
                self.visit_field(id, "inverse", scope);
            }
            _ => self.visit_children(id, scope),
        }
    }

    fn visit_field(&mut self, id: NodeId, field: &str, scope: ScopeId) {
        let children: Vec<_> = self.node(id).children(field).collect();
        for child in children {
            self.visit(child, scope);
        }
    }

    fn visit_children(&mut self, id: NodeId, scope: ScopeId) {
        let keys: &'a VisitorKeys = self.keys;
        let Some(fields) = keys.get(&self.node(id).node_type) else {
            return;
        };
        for field in fields {
            self.visit_field(id, field, scope);
        }
    }

    /// Open a `template-block` scope over `block` declaring `params`.
    fn block_scope(&mut self, block: NodeId, owner: NodeId, params: &[String], parent: ScopeId) -> ScopeId {
        if params.is_empty() {
            return parent;
        }
        let range = self.node(block).range;
        let scope = self.sm.add_scope(ScopeKind::TemplateBlock, block, range, Some(parent));
        for name in params {
            let def = Definition {
                kind: DefKind::TemplateBlockParam,
                name: owner,
                node: owner,
            };
            self.sm.declare(scope, name, def);
        }
        scope
    }

    fn reference(&mut self, scope: ScopeId, id: NodeId, name: &str) {
        let reference = self.sm.add_reference(scope, id, name, false);
        self.references.push(reference);
    }

    fn path(&mut self, id: NodeId, scope: ScopeId) {
        let node = self.node(id);
        if node.bool_field("this") || node.bool_field("data") {
            return;
        }
        let Some(head) = node.str_field("head") else {
            return;
        };
        if head.starts_with('@') {
            return;
        }
        let bound = self.sm.lookup(scope, head).is_some();
        if bound || !TEMPLATE_KEYWORDS.contains(&head) {
            self.reference(scope, id, head);
        }
    }

    fn tag(&mut self, id: NodeId, scope: ScopeId) {
        let Some(tag) = self.node(id).str_field("tag") else {
            return;
        };
        if tag.starts_with([':', '@']) || tag.starts_with("this.") {
            return;
        }
        let head = tag.split('.').next().unwrap_or(tag);
        let is_path = head.len() < tag.len();
        let bound = self.sm.lookup(scope, head).is_some();
        let capitalized = head.starts_with(|c: char| c.is_ascii_uppercase());
        let is_reference = if bound || is_path {
            true
        } else if is_builtin_tag(tag) {
            false
        } else {
            capitalized
        };
        if is_reference {
            self.reference(scope, id, head);
        }
    }
}
