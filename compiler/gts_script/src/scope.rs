//! Scope analysis over the script tree.
//!
//! One pass declares bindings and records references; resolution runs after
//! the walk so hoisted declarations are visible to earlier references.
//! Type-level syntax is skipped, except that interface and type-alias names
//! are declared so value and type lookups see the same scope chain.

use gts_ir::{Ast, DefKind, Definition, Field, Node, NodeId, ReferenceId, ScopeId, ScopeKind, ScopeManager};
use gts_stack::ensure_sufficient_stack;
use tracing::trace;

use crate::keys::script_visitor_keys;

/// Fields holding type-level syntax only.
const TYPE_FIELDS: &[&str] = &[
    "typeAnnotation",
    "typeParameters",
    "typeArguments",
    "superTypeArguments",
    "returnType",
    "implements",
];

/// Build the scope manager for a parsed program.
pub fn analyze(ast: &Ast, program: NodeId) -> ScopeManager {
    let mut sm = ScopeManager::new();
    let range = ast.get(program).range;
    let global = sm.add_scope(ScopeKind::Global, program, range, None);
    let module = sm.add_scope(ScopeKind::Module, program, range, Some(global));
    let references = {
        let mut analyzer = Analyzer::new(ast, &mut sm, module);
        for item in ast.get(program).children("body") {
            analyzer.visit(item);
        }
        analyzer.references
    };
    sm.resolve_all(&references);
    trace!(
        scopes = sm.scopes().count(),
        references = references.len(),
        "script scope analysis"
    );
    sm
}

/// Record the references of an embedded expression rooted at `root`, as if it
/// were written inside `scope`. The returned references are not resolved yet.
pub fn analyze_island(ast: &Ast, root: NodeId, sm: &mut ScopeManager, scope: ScopeId) -> Vec<ReferenceId> {
    let mut analyzer = Analyzer::new(ast, sm, scope);
    analyzer.visit(root);
    analyzer.references
}

struct Analyzer<'a> {
    ast: &'a Ast,
    sm: &'a mut ScopeManager,
    current: ScopeId,
    references: Vec<ReferenceId>,
}

impl<'a> Analyzer<'a> {
    fn new(ast: &'a Ast, sm: &'a mut ScopeManager, current: ScopeId) -> Self {
        Analyzer {
            ast,
            sm,
            current,
            references: Vec::new(),
        }
    }

    fn node(&self, id: NodeId) -> &'a Node {
        self.ast.get(id)
    }

    fn with_scope(&mut self, kind: ScopeKind, block: NodeId, f: impl FnOnce(&mut Self)) {
        let range = self.node(block).range;
        let scope = self.sm.add_scope(kind, block, range, Some(self.current));
        let saved = std::mem::replace(&mut self.current, scope);
        f(self);
        self.current = saved;
    }

    /// Nearest enclosing scope that `var` hoists to.
    fn var_scope(&self) -> ScopeId {
        let mut id = self.current;
        loop {
            let scope = self.sm.scope(id);
            if scope.kind.is_var_scope() {
                return id;
            }
            match scope.parent {
                Some(parent) => id = parent,
                None => return id,
            }
        }
    }

    fn name_of(&self, id: NodeId) -> Option<&'a str> {
        let node = self.node(id);
        (node.node_type == "Identifier")
            .then(|| node.str_field("name"))
            .flatten()
    }

    fn reference(&mut self, id: NodeId, is_write: bool) {
        if let Some(name) = self.name_of(id) {
            let reference = self.sm.add_reference(self.current, id, name, is_write);
            self.references.push(reference);
        }
    }

    fn visit_opt(&mut self, id: Option<NodeId>) {
        if let Some(id) = id {
            self.visit(id);
        }
    }

    fn visit_all(&mut self, parent: NodeId, field: &str) {
        for child in self.node(parent).children(field) {
            self.visit(child);
        }
    }

    /// Visit every traversable child except type-level ones.
    fn visit_children(&mut self, id: NodeId) {
        let node = self.node(id);
        let Some(keys) = script_visitor_keys().get(&node.node_type) else {
            return;
        };
        for key in keys {
            if TYPE_FIELDS.contains(key) {
                continue;
            }
            match node.get(key) {
                Some(Field::Node(child)) => self.visit(*child),
                Some(Field::List(list)) => {
                    for child in list.iter().flatten() {
                        self.visit(*child);
                    }
                }
                _ => {}
            }
        }
    }

    fn visit(&mut self, id: NodeId) {
        ensure_sufficient_stack(|| self.visit_node(id));
    }

    fn visit_node(&mut self, id: NodeId) {
        let node = self.node(id);
        match node.node_type.as_str() {
            "Identifier" => self.reference(id, false),
            "VariableDeclaration" => self.visit_variable_declaration(id),
            "FunctionDeclaration" | "TSDeclareFunction" => {
                if let Some(name) = node.child("id") {
                    self.declare(self.current, name, DefKind::FunctionName, id);
                }
                self.visit_function(id);
            }
            "FunctionExpression" | "ArrowFunctionExpression" => self.visit_function(id),
            "ClassDeclaration" => {
                if let Some(name) = node.child("id") {
                    self.declare(self.current, name, DefKind::ClassName, id);
                }
                self.visit_class(id);
            }
            "ClassExpression" => self.visit_class(id),
            "BlockStatement" => self.with_scope(ScopeKind::Block, id, |a| a.visit_all(id, "body")),
            "StaticBlock" => self.with_scope(ScopeKind::ClassStaticBlock, id, |a| a.visit_all(id, "body")),
            "ForStatement" => self.with_scope(ScopeKind::For, id, |a| a.visit_children(id)),
            "ForInStatement" | "ForOfStatement" => self.with_scope(ScopeKind::For, id, |a| {
                if let Some(left) = node.child("left") {
                    if a.node(left).node_type == "VariableDeclaration" {
                        a.visit_variable_declaration(left);
                        a.write_declared_targets(left);
                    } else {
                        a.visit_assignment_target(left);
                    }
                }
                a.visit_opt(node.child("right"));
                a.visit_opt(node.child("body"));
            }),
            "CatchClause" => self.with_scope(ScopeKind::Catch, id, |a| {
                if let Some(param) = node.child("param") {
                    let scope = a.current;
                    a.declare_pattern(param, DefKind::CatchClause, id, scope, false);
                }
                a.visit_opt(node.child("body"));
            }),
            "SwitchStatement" => {
                self.visit_opt(node.child("discriminant"));
                self.with_scope(ScopeKind::Switch, id, |a| a.visit_all(id, "cases"));
            }
            "ImportDeclaration" => {
                let module = self.var_scope();
                for specifier in node.children("specifiers") {
                    if let Some(local) = self.node(specifier).child("local") {
                        self.declare(module, local, DefKind::ImportBinding, specifier);
                    }
                }
            }
            "ExportNamedDeclaration" => {
                if let Some(declaration) = node.child("declaration") {
                    self.visit(declaration);
                } else if node.child("source").is_none() {
                    for specifier in node.children("specifiers") {
                        self.visit_opt(self.node(specifier).child("local"));
                    }
                }
            }
            "LabeledStatement" => self.visit_opt(node.child("body")),
            "ExportAllDeclaration" | "BreakStatement" | "ContinueStatement" => {}
            "MemberExpression" => {
                self.visit_opt(node.child("object"));
                if node.bool_field("computed") {
                    self.visit_opt(node.child("property"));
                }
            }
            "MetaProperty" | "PrivateIdentifier" | "Literal" | "ThisExpression" | "Super" => {}
            "Property" | "MethodDefinition" | "PropertyDefinition" | "AccessorProperty"
            | "TSAbstractMethodDefinition" | "TSAbstractPropertyDefinition" | "TSAbstractAccessorProperty" => {
                self.visit_all(id, "decorators");
                if node.bool_field("computed") {
                    self.visit_opt(node.child("key"));
                }
                self.visit_opt(node.child("value"));
            }
            "AssignmentExpression" => {
                if let Some(left) = node.child("left") {
                    self.visit_assignment_target(left);
                }
                self.visit_opt(node.child("right"));
            }
            "UpdateExpression" => match node.child("argument") {
                Some(argument) if self.name_of(argument).is_some() => self.reference(argument, true),
                argument => self.visit_opt(argument),
            },
            "TSInterfaceDeclaration" | "TSTypeAliasDeclaration" => {
                if let Some(name) = node.child("id") {
                    self.declare(self.current, name, DefKind::Type, id);
                }
            }
            "TSEnumDeclaration" => {
                if let Some(name) = node.child("id") {
                    self.declare(self.current, name, DefKind::Variable, id);
                }
                for member in node.children("members") {
                    self.visit_opt(self.node(member).child("initializer"));
                }
            }
            "TSModuleDeclaration" => {
                if let Some(name) = node.child("id") {
                    if self.name_of(name).is_some() {
                        self.declare(self.current, name, DefKind::Variable, id);
                    }
                }
                if let Some(body) = node.child("body") {
                    self.with_scope(ScopeKind::Block, body, |a| a.visit_all(body, "body"));
                }
            }
            "TSAsExpression"
            | "TSSatisfiesExpression"
            | "TSNonNullExpression"
            | "TSTypeAssertion"
            | "TSInstantiationExpression"
            | "TSExportAssignment" => {
                self.visit_opt(node.child("expression"));
            }
            "TSImportEqualsDeclaration" => {
                if let Some(name) = node.child("id") {
                    self.declare(self.var_scope(), name, DefKind::ImportBinding, id);
                }
            }
            other if other.starts_with("TS") => {}
            _ => self.visit_children(id),
        }
    }

    fn declare(&mut self, scope: ScopeId, name: NodeId, kind: DefKind, node: NodeId) {
        if let Some(text) = self.name_of(name) {
            self.sm.declare(scope, text, Definition { kind, name, node });
        }
    }

    fn visit_variable_declaration(&mut self, id: NodeId) {
        let node = self.node(id);
        let scope = if node.str_field("kind") == Some("var") {
            self.var_scope()
        } else {
            self.current
        };
        for declarator in node.children("declarations") {
            let decl = self.node(declarator);
            let init = decl.child("init");
            if let Some(target) = decl.child("id") {
                self.declare_pattern(target, DefKind::Variable, declarator, scope, init.is_some());
            }
            self.visit_opt(init);
        }
    }

    /// `for (const x of xs)` writes `x` on every iteration.
    fn write_declared_targets(&mut self, declaration: NodeId) {
        for declarator in self.node(declaration).children("declarations") {
            if let Some(target) = self.node(declarator).child("id") {
                for name in self.pattern_names(target) {
                    self.reference(name, true);
                }
            }
        }
    }

    fn pattern_names(&self, pattern: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![pattern];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            match node.node_type.as_str() {
                "Identifier" => out.push(id),
                "ObjectPattern" => {
                    for property in node.children("properties") {
                        let prop = self.node(property);
                        stack.extend(prop.child("value").or_else(|| prop.child("argument")));
                    }
                }
                "ArrayPattern" => stack.extend(node.children("elements")),
                "AssignmentPattern" => stack.extend(node.child("left")),
                "RestElement" => stack.extend(node.child("argument")),
                "TSParameterProperty" => stack.extend(node.child("parameter")),
                _ => {}
            }
        }
        out
    }

    /// Declare every name bound by `pattern`; defaults and computed keys are
    /// visited as ordinary expressions.
    fn declare_pattern(&mut self, pattern: NodeId, kind: DefKind, decl: NodeId, scope: ScopeId, write: bool) {
        let node = self.node(pattern);
        match node.node_type.as_str() {
            "Identifier" => {
                if self.name_of(pattern) == Some("this") {
                    return;
                }
                self.visit_all(pattern, "decorators");
                self.declare(scope, pattern, kind, decl);
                if write {
                    self.reference(pattern, true);
                }
            }
            "ObjectPattern" => {
                for property in node.children("properties") {
                    let prop = self.node(property);
                    if prop.node_type == "RestElement" {
                        self.declare_pattern(property, kind, decl, scope, write);
                        continue;
                    }
                    if prop.bool_field("computed") {
                        self.visit_opt(prop.child("key"));
                    }
                    if let Some(value) = prop.child("value") {
                        self.declare_pattern(value, kind, decl, scope, write);
                    }
                }
            }
            "ArrayPattern" => {
                for element in node.children("elements") {
                    self.declare_pattern(element, kind, decl, scope, write);
                }
            }
            "AssignmentPattern" => {
                if let Some(left) = node.child("left") {
                    self.declare_pattern(left, kind, decl, scope, true);
                }
                self.visit_opt(node.child("right"));
            }
            "RestElement" => {
                if let Some(argument) = node.child("argument") {
                    self.declare_pattern(argument, kind, decl, scope, write);
                }
            }
            "TSParameterProperty" => {
                self.visit_all(pattern, "decorators");
                if let Some(parameter) = node.child("parameter") {
                    self.declare_pattern(parameter, kind, decl, scope, write);
                }
            }
            _ => {}
        }
    }

    /// Left side of an assignment or a `for-in/of` head without a declaration.
    fn visit_assignment_target(&mut self, target: NodeId) {
        let node = self.node(target);
        match node.node_type.as_str() {
            "Identifier" => self.reference(target, true),
            "ObjectPattern" => {
                for property in node.children("properties") {
                    let prop = self.node(property);
                    if prop.node_type == "RestElement" {
                        self.visit_assignment_target(property);
                        continue;
                    }
                    if prop.bool_field("computed") {
                        self.visit_opt(prop.child("key"));
                    }
                    if let Some(value) = prop.child("value") {
                        self.visit_assignment_target(value);
                    }
                }
            }
            "ArrayPattern" => {
                for element in node.children("elements") {
                    self.visit_assignment_target(element);
                }
            }
            "AssignmentPattern" => {
                if let Some(left) = node.child("left") {
                    self.visit_assignment_target(left);
                }
                self.visit_opt(node.child("right"));
            }
            "RestElement" => {
                if let Some(argument) = node.child("argument") {
                    self.visit_assignment_target(argument);
                }
            }
            "TSAsExpression" | "TSSatisfiesExpression" | "TSNonNullExpression" | "TSTypeAssertion" => {
                if let Some(expression) = node.child("expression") {
                    self.visit_assignment_target(expression);
                }
            }
            _ => self.visit(target),
        }
    }

    fn visit_function(&mut self, id: NodeId) {
        let node = self.node(id);
        self.with_scope(ScopeKind::Function, id, |a| {
            if node.node_type == "FunctionExpression" {
                if let Some(name) = node.child("id") {
                    let scope = a.current;
                    a.declare(scope, name, DefKind::FunctionName, id);
                }
            }
            let scope = a.current;
            for param in node.children("params") {
                a.declare_pattern(param, DefKind::Parameter, id, scope, false);
            }
            match node.child("body") {
                Some(body) if a.node(body).node_type == "BlockStatement" => a.visit_all(body, "body"),
                body => a.visit_opt(body),
            }
        });
    }

    fn visit_class(&mut self, id: NodeId) {
        let node = self.node(id);
        self.visit_all(id, "decorators");
        self.with_scope(ScopeKind::Class, id, |a| {
            if let Some(name) = node.child("id") {
                let scope = a.current;
                a.declare(scope, name, DefKind::ClassName, id);
            }
            a.visit_opt(node.child("superClass"));
            if let Some(body) = node.child("body") {
                a.visit_all(body, "body");
            }
        });
    }
}
