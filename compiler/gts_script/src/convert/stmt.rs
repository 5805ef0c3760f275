//! Statements, declarations and module items.

use gts_ir::{Field, Node, NodeId, Span};
use gts_stack::ensure_sufficient_stack;
use swc_core::common::Spanned;
use swc_core::ecma::ast as swc;

use super::{Converter, PResult};

impl Converter<'_> {
    pub(crate) fn stmt(&mut self, stmt: &swc::Stmt) -> PResult<NodeId> {
        ensure_sufficient_stack(|| self.stmt_inner(stmt))
    }

    fn stmt_inner(&mut self, stmt: &swc::Stmt) -> PResult<NodeId> {
        let range = self.span(stmt.span());
        let node = match stmt {
            swc::Stmt::Block(block) => return self.block(block),
            swc::Stmt::Empty(_) => Node::new("EmptyStatement", range),
            swc::Stmt::Debugger(_) => Node::new("DebuggerStatement", range),
            swc::Stmt::With(with) => Node::new("WithStatement", range)
                .with("object", Field::Node(self.expr(&with.obj)?))
                .with("body", Field::Node(self.stmt(&with.body)?)),
            swc::Stmt::Return(ret) => {
                Node::new("ReturnStatement", range).with("argument", self.opt_field(ret.arg.as_deref(), Self::expr)?)
            }
            swc::Stmt::Labeled(labeled) => Node::new("LabeledStatement", range)
                .with("label", Field::Node(self.ident(&labeled.label)))
                .with("body", Field::Node(self.stmt(&labeled.body)?)),
            swc::Stmt::Break(jump) => {
                let label = jump.label.as_ref().map(|label| self.ident(label));
                Node::new("BreakStatement", range).with("label", Field::opt(label))
            }
            swc::Stmt::Continue(jump) => {
                let label = jump.label.as_ref().map(|label| self.ident(label));
                Node::new("ContinueStatement", range).with("label", Field::opt(label))
            }
            swc::Stmt::If(stmt) => Node::new("IfStatement", range)
                .with("test", Field::Node(self.expr(&stmt.test)?))
                .with("consequent", Field::Node(self.stmt(&stmt.cons)?))
                .with("alternate", self.opt_field(stmt.alt.as_deref(), Self::stmt)?),
            swc::Stmt::Switch(switch) => Node::new("SwitchStatement", range)
                .with("discriminant", Field::Node(self.expr(&switch.discriminant)?))
                .with("cases", self.list(&switch.cases, Self::switch_case)?),
            swc::Stmt::Throw(throw) => {
                Node::new("ThrowStatement", range).with("argument", Field::Node(self.expr(&throw.arg)?))
            }
            swc::Stmt::Try(stmt) => Node::new("TryStatement", range)
                .with("block", Field::Node(self.block(&stmt.block)?))
                .with("handler", self.opt_field(stmt.handler.as_ref(), Self::catch_clause)?)
                .with("finalizer", self.opt_field(stmt.finalizer.as_ref(), Self::block)?),
            swc::Stmt::While(stmt) => Node::new("WhileStatement", range)
                .with("test", Field::Node(self.expr(&stmt.test)?))
                .with("body", Field::Node(self.stmt(&stmt.body)?)),
            swc::Stmt::DoWhile(stmt) => Node::new("DoWhileStatement", range)
                .with("body", Field::Node(self.stmt(&stmt.body)?))
                .with("test", Field::Node(self.expr(&stmt.test)?)),
            swc::Stmt::For(stmt) => {
                let init = match &stmt.init {
                    Some(swc::VarDeclOrExpr::VarDecl(decl)) => Some(self.var_decl(decl)?),
                    Some(swc::VarDeclOrExpr::Expr(expr)) => Some(self.expr(expr)?),
                    None => None,
                };
                Node::new("ForStatement", range)
                    .with("init", Field::opt(init))
                    .with("test", self.opt_field(stmt.test.as_deref(), Self::expr)?)
                    .with("update", self.opt_field(stmt.update.as_deref(), Self::expr)?)
                    .with("body", Field::Node(self.stmt(&stmt.body)?))
            }
            swc::Stmt::ForIn(stmt) => Node::new("ForInStatement", range)
                .with("left", Field::Node(self.for_head(&stmt.left)?))
                .with("right", Field::Node(self.expr(&stmt.right)?))
                .with("body", Field::Node(self.stmt(&stmt.body)?)),
            swc::Stmt::ForOf(stmt) => Node::new("ForOfStatement", range)
                .with("left", Field::Node(self.for_head(&stmt.left)?))
                .with("right", Field::Node(self.expr(&stmt.right)?))
                .with("body", Field::Node(self.stmt(&stmt.body)?))
                .with("await", Field::Bool(stmt.is_await)),
            swc::Stmt::Decl(decl) => return self.decl(decl),
            swc::Stmt::Expr(stmt) => {
                Node::new("ExpressionStatement", range).with("expression", Field::Node(self.expr(&stmt.expr)?))
            }
        };
        Ok(self.finish(node))
    }

    pub(crate) fn block(&mut self, block: &swc::BlockStmt) -> PResult<NodeId> {
        let body = self.list(&block.stmts, Self::stmt)?;
        let node = Node::new("BlockStatement", self.span(block.span)).with("body", body);
        Ok(self.finish(node))
    }

    fn switch_case(&mut self, case: &swc::SwitchCase) -> PResult<NodeId> {
        let node = Node::new("SwitchCase", self.span(case.span))
            .with("test", self.opt_field(case.test.as_deref(), Self::expr)?)
            .with("consequent", self.list(&case.cons, Self::stmt)?);
        Ok(self.finish(node))
    }

    fn catch_clause(&mut self, clause: &swc::CatchClause) -> PResult<NodeId> {
        let node = Node::new("CatchClause", self.span(clause.span))
            .with("param", self.opt_field(clause.param.as_ref(), Self::pat)?)
            .with("body", Field::Node(self.block(&clause.body)?));
        Ok(self.finish(node))
    }

    fn for_head(&mut self, head: &swc::ForHead) -> PResult<NodeId> {
        match head {
            swc::ForHead::VarDecl(decl) => self.var_decl(decl),
            swc::ForHead::UsingDecl(decl) => self.using_decl(decl),
            swc::ForHead::Pat(pat) => self.pat(pat),
        }
    }

    pub(crate) fn decl(&mut self, decl: &swc::Decl) -> PResult<NodeId> {
        match decl {
            swc::Decl::Class(decl) => {
                let id = self.ident(&decl.ident);
                let range = self.span(decl.class.span);
                let class = self.class("ClassDeclaration", Some(id), &decl.class, range)?;
                if decl.declare {
                    self.ast.get_mut(class).set("declare", Field::Bool(true));
                }
                Ok(class)
            }
            swc::Decl::Fn(decl) => {
                let node_type = if decl.function.body.is_some() {
                    "FunctionDeclaration"
                } else {
                    "TSDeclareFunction"
                };
                let id = self.ident(&decl.ident);
                let range = self.span(decl.function.span);
                let function = self.function(node_type, Some(id), &decl.function, range)?;
                if decl.declare {
                    self.ast.get_mut(function).set("declare", Field::Bool(true));
                }
                Ok(function)
            }
            swc::Decl::Var(decl) => self.var_decl(decl),
            swc::Decl::Using(decl) => self.using_decl(decl),
            swc::Decl::TsInterface(decl) => self.ts_interface(decl),
            swc::Decl::TsTypeAlias(decl) => self.ts_type_alias(decl),
            swc::Decl::TsEnum(decl) => self.ts_enum(decl),
            swc::Decl::TsModule(decl) => self.ts_module(decl),
        }
    }

    fn var_decl(&mut self, decl: &swc::VarDecl) -> PResult<NodeId> {
        let kind = match decl.kind {
            swc::VarDeclKind::Var => "var",
            swc::VarDeclKind::Let => "let",
            swc::VarDeclKind::Const => "const",
        };
        let mut node = Node::new("VariableDeclaration", self.span(decl.span))
            .with("declarations", self.list(&decl.decls, Self::declarator)?)
            .with("kind", Field::str(kind));
        if decl.declare {
            node.set("declare", Field::Bool(true));
        }
        Ok(self.finish(node))
    }

    fn using_decl(&mut self, decl: &swc::UsingDecl) -> PResult<NodeId> {
        let kind = if decl.is_await { "await using" } else { "using" };
        let node = Node::new("VariableDeclaration", self.span(decl.span))
            .with("declarations", self.list(&decl.decls, Self::declarator)?)
            .with("kind", Field::str(kind));
        Ok(self.finish(node))
    }

    fn declarator(&mut self, declarator: &swc::VarDeclarator) -> PResult<NodeId> {
        let id = self.pat(&declarator.name)?;
        if declarator.definite {
            self.ast.get_mut(id).set("definite", Field::Bool(true));
        }
        let node = Node::new("VariableDeclarator", self.span(declarator.span))
            .with("id", Field::Node(id))
            .with("init", self.opt_field(declarator.init.as_deref(), Self::expr)?);
        Ok(self.finish(node))
    }

    // Modules

    pub(crate) fn module_decl(&mut self, decl: &swc::ModuleDecl) -> PResult<NodeId> {
        let range = self.span(decl.span());
        let node = match decl {
            swc::ModuleDecl::Import(import) => {
                let kind = if import.type_only { "type" } else { "value" };
                Node::new("ImportDeclaration", range)
                    .with("specifiers", self.list(&import.specifiers, Self::import_specifier)?)
                    .with("source", Field::Node(self.str_lit(&import.src)))
                    .with("attributes", self.import_attributes(import.with.as_deref())?)
                    .with("importKind", Field::str(kind))
            }
            swc::ModuleDecl::ExportDecl(export) => Node::new("ExportNamedDeclaration", range)
                .with("declaration", Field::Node(self.decl(&export.decl)?))
                .with("specifiers", Field::List(Vec::new()))
                .with("source", Field::Null)
                .with("attributes", Field::List(Vec::new()))
                .with("exportKind", Field::str("value")),
            swc::ModuleDecl::ExportNamed(export) => return self.named_export(export, range),
            swc::ModuleDecl::ExportDefaultDecl(export) => {
                let declaration = match &export.decl {
                    swc::DefaultDecl::Class(class) => {
                        let id = class.ident.as_ref().map(|id| self.ident(id));
                        let range = self.span(class.class.span);
                        self.class("ClassDeclaration", id, &class.class, range)?
                    }
                    swc::DefaultDecl::Fn(function) => {
                        let id = function.ident.as_ref().map(|id| self.ident(id));
                        let range = self.span(function.function.span);
                        self.function("FunctionDeclaration", id, &function.function, range)?
                    }
                    swc::DefaultDecl::TsInterfaceDecl(decl) => self.ts_interface(decl)?,
                };
                Node::new("ExportDefaultDeclaration", range)
                    .with("declaration", Field::Node(declaration))
                    .with("exportKind", Field::str("value"))
            }
            swc::ModuleDecl::ExportDefaultExpr(export) => Node::new("ExportDefaultDeclaration", range)
                .with("declaration", Field::Node(self.expr(&export.expr)?))
                .with("exportKind", Field::str("value")),
            swc::ModuleDecl::ExportAll(export) => {
                let kind = if export.type_only { "type" } else { "value" };
                Node::new("ExportAllDeclaration", range)
                    .with("exported", Field::Null)
                    .with("source", Field::Node(self.str_lit(&export.src)))
                    .with("attributes", self.import_attributes(export.with.as_deref())?)
                    .with("exportKind", Field::str(kind))
            }
            swc::ModuleDecl::TsImportEquals(decl) => {
                let reference = match &decl.module_ref {
                    swc::TsModuleRef::TsEntityName(name) => self.entity_name(name),
                    swc::TsModuleRef::TsExternalModuleRef(reference) => {
                        let expression = self.str_lit(&reference.expr);
                        let node = Node::new("TSExternalModuleReference", self.span(reference.span))
                            .with("expression", Field::Node(expression));
                        self.finish(node)
                    }
                };
                let kind = if decl.is_type_only { "type" } else { "value" };
                Node::new("TSImportEqualsDeclaration", range)
                    .with("id", Field::Node(self.ident(&decl.id)))
                    .with("moduleReference", Field::Node(reference))
                    .with("importKind", Field::str(kind))
                    .with("isExport", Field::Bool(decl.is_export))
            }
            swc::ModuleDecl::TsExportAssignment(export) => {
                Node::new("TSExportAssignment", range).with("expression", Field::Node(self.expr(&export.expr)?))
            }
            swc::ModuleDecl::TsNamespaceExport(export) => {
                Node::new("TSNamespaceExportDeclaration", range).with("id", Field::Node(self.ident(&export.id)))
            }
        };
        Ok(self.finish(node))
    }

    fn named_export(&mut self, export: &swc::NamedExport, range: Span) -> PResult<NodeId> {
        let kind = if export.type_only { "type" } else { "value" };
        let source = export.src.as_deref().map(|src| self.str_lit(src));
        let attributes = self.import_attributes(export.with.as_deref())?;
        // `export * as ns from '…'` is an export-all in ESTree.
        if let [swc::ExportSpecifier::Namespace(namespace)] = export.specifiers.as_slice() {
            let exported = self.module_export_name(&namespace.name);
            let node = Node::new("ExportAllDeclaration", range)
                .with("exported", Field::Node(exported))
                .with("source", Field::opt(source))
                .with("attributes", attributes)
                .with("exportKind", Field::str(kind));
            return Ok(self.finish(node));
        }
        let specifiers = self.list(&export.specifiers, Self::export_specifier)?;
        let node = Node::new("ExportNamedDeclaration", range)
            .with("declaration", Field::Null)
            .with("specifiers", specifiers)
            .with("source", Field::opt(source))
            .with("attributes", attributes)
            .with("exportKind", Field::str(kind));
        Ok(self.finish(node))
    }

    fn export_specifier(&mut self, specifier: &swc::ExportSpecifier) -> PResult<NodeId> {
        let range = self.span(specifier.span());
        let (local, exported) = match specifier {
            swc::ExportSpecifier::Named(named) => {
                let local = self.module_export_name(&named.orig);
                let exported = match &named.exported {
                    Some(name) => self.module_export_name(name),
                    None => self.duplicate(local),
                };
                (local, exported)
            }
            swc::ExportSpecifier::Default(default) => {
                let local = self.ident(&default.exported);
                (local, self.duplicate(local))
            }
            swc::ExportSpecifier::Namespace(namespace) => {
                let exported = self.module_export_name(&namespace.name);
                (exported, self.duplicate(exported))
            }
        };
        let node = Node::new("ExportSpecifier", range)
            .with("local", Field::Node(local))
            .with("exported", Field::Node(exported));
        Ok(self.finish(node))
    }

    fn import_specifier(&mut self, specifier: &swc::ImportSpecifier) -> PResult<NodeId> {
        let node = match specifier {
            swc::ImportSpecifier::Named(named) => {
                let local = self.ident(&named.local);
                let imported = match &named.imported {
                    Some(name) => self.module_export_name(name),
                    None => self.duplicate(local),
                };
                let kind = if named.is_type_only { "type" } else { "value" };
                Node::new("ImportSpecifier", self.span(named.span))
                    .with("imported", Field::Node(imported))
                    .with("local", Field::Node(local))
                    .with("importKind", Field::str(kind))
            }
            swc::ImportSpecifier::Default(default) => Node::new("ImportDefaultSpecifier", self.span(default.span))
                .with("local", Field::Node(self.ident(&default.local))),
            swc::ImportSpecifier::Namespace(namespace) => {
                Node::new("ImportNamespaceSpecifier", self.span(namespace.span))
                    .with("local", Field::Node(self.ident(&namespace.local)))
            }
        };
        Ok(self.finish(node))
    }

    fn module_export_name(&mut self, name: &swc::ModuleExportName) -> NodeId {
        match name {
            swc::ModuleExportName::Ident(ident) => self.ident(ident),
            swc::ModuleExportName::Str(string) => self.str_lit(string),
        }
    }

    /// `with { type: 'json' }` entries as `ImportAttribute` nodes.
    fn import_attributes(&mut self, with: Option<&swc::ObjectLit>) -> PResult<Field> {
        let mut attributes = Vec::new();
        for prop in with.map(|object| object.props.as_slice()).unwrap_or_default() {
            let swc::PropOrSpread::Prop(prop) = prop else { continue };
            let swc::Prop::KeyValue(entry) = &**prop else { continue };
            let (key, _) = self.prop_name(&entry.key)?;
            let value = self.expr(&entry.value)?;
            let range = self.range_of(key).merge(self.range_of(value));
            let node = Node::new("ImportAttribute", range)
                .with("key", Field::Node(key))
                .with("value", Field::Node(value));
            attributes.push(self.finish(node));
        }
        Ok(Field::list(attributes))
    }
}
