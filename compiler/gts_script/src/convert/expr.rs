//! Expressions, literals and templates.

use gts_ir::{Field, Node, NodeId, Span};
use gts_stack::ensure_sufficient_stack;
use swc_core::common::Spanned;
use swc_core::ecma::ast as swc;

use super::{Converter, PResult};

impl Converter<'_> {
    pub(crate) fn expr(&mut self, expr: &swc::Expr) -> PResult<NodeId> {
        ensure_sufficient_stack(|| self.expr_inner(expr))
    }

    fn expr_inner(&mut self, expr: &swc::Expr) -> PResult<NodeId> {
        let range = self.span(expr.span());
        let node = match expr {
            swc::Expr::This(_) => Node::new("ThisExpression", range),
            swc::Expr::Array(array) => {
                let elements = array
                    .elems
                    .iter()
                    .map(|element| self.opt(element.as_ref(), Self::expr_or_spread))
                    .collect::<PResult<Vec<_>>>()?;
                Node::new("ArrayExpression", range).with("elements", Field::List(elements))
            }
            swc::Expr::Object(object) => {
                Node::new("ObjectExpression", range).with("properties", self.list(&object.props, Self::prop_or_spread)?)
            }
            swc::Expr::Fn(function) => {
                let id = function.ident.as_ref().map(|id| self.ident(id));
                return self.function("FunctionExpression", id, &function.function, range);
            }
            swc::Expr::Unary(unary) => Node::new("UnaryExpression", range)
                .with("operator", Field::str(unary.op.as_str()))
                .with("prefix", Field::Bool(true))
                .with("argument", Field::Node(self.expr(&unary.arg)?)),
            swc::Expr::Update(update) => Node::new("UpdateExpression", range)
                .with("operator", Field::str(update.op.as_str()))
                .with("prefix", Field::Bool(update.prefix))
                .with("argument", Field::Node(self.expr(&update.arg)?)),
            swc::Expr::Bin(binary) => {
                let node_type = match binary.op {
                    swc::BinaryOp::LogicalOr | swc::BinaryOp::LogicalAnd | swc::BinaryOp::NullishCoalescing => {
                        "LogicalExpression"
                    }
                    _ => "BinaryExpression",
                };
                Node::new(node_type, range)
                    .with("operator", Field::str(binary.op.as_str()))
                    .with("left", Field::Node(self.expr(&binary.left)?))
                    .with("right", Field::Node(self.expr(&binary.right)?))
            }
            swc::Expr::Assign(assign) => Node::new("AssignmentExpression", range)
                .with("operator", Field::str(assign.op.as_str()))
                .with("left", Field::Node(self.assign_target(&assign.left)?))
                .with("right", Field::Node(self.expr(&assign.right)?)),
            swc::Expr::Member(_) | swc::Expr::Call(_) | swc::Expr::OptChain(_) => return self.chain(expr),
            swc::Expr::SuperProp(prop) => return self.super_prop(prop),
            swc::Expr::Cond(cond) => Node::new("ConditionalExpression", range)
                .with("test", Field::Node(self.expr(&cond.test)?))
                .with("consequent", Field::Node(self.expr(&cond.cons)?))
                .with("alternate", Field::Node(self.expr(&cond.alt)?)),
            swc::Expr::New(new) => {
                let arguments = match &new.args {
                    Some(args) => self.list(args, Self::expr_or_spread)?,
                    None => Field::List(Vec::new()),
                };
                Node::new("NewExpression", range)
                    .with("callee", Field::Node(self.expr(&new.callee)?))
                    .with("arguments", arguments)
                    .with_optional("typeArguments", self.type_args(new.type_args.as_deref())?)
            }
            swc::Expr::Seq(seq) => {
                Node::new("SequenceExpression", range).with("expressions", self.list(&seq.exprs, |c, e| c.expr(e))?)
            }
            swc::Expr::Ident(ident) => return Ok(self.ident(ident)),
            swc::Expr::Lit(lit) => return self.lit(lit),
            swc::Expr::Tpl(tpl) => return self.template(tpl),
            swc::Expr::TaggedTpl(tagged) => Node::new("TaggedTemplateExpression", range)
                .with("tag", Field::Node(self.expr(&tagged.tag)?))
                .with("quasi", Field::Node(self.template(&tagged.tpl)?))
                .with_optional("typeArguments", self.type_args(tagged.type_params.as_deref())?),
            swc::Expr::Arrow(arrow) => return self.arrow(arrow, range),
            swc::Expr::Class(class) => {
                let id = class.ident.as_ref().map(|id| self.ident(id));
                return self.class("ClassExpression", id, &class.class, range);
            }
            swc::Expr::Yield(yield_expr) => Node::new("YieldExpression", range)
                .with("argument", self.opt_field(yield_expr.arg.as_deref(), Self::expr)?)
                .with("delegate", Field::Bool(yield_expr.delegate)),
            swc::Expr::MetaProp(meta) => return Ok(self.meta_property(meta.kind, range)),
            swc::Expr::Await(await_expr) => {
                Node::new("AwaitExpression", range).with("argument", Field::Node(self.expr(&await_expr.arg)?))
            }
            // ESTree has no parenthesized expression node.
            swc::Expr::Paren(paren) => return self.expr(&paren.expr),
            swc::Expr::TsTypeAssertion(assertion) => Node::new("TSTypeAssertion", range)
                .with("typeAnnotation", Field::Node(self.ts_type(&assertion.type_ann)?))
                .with("expression", Field::Node(self.expr(&assertion.expr)?)),
            swc::Expr::TsConstAssertion(assertion) => {
                // `x as const`: the annotation is a reference to `const`.
                let keyword = Span::new(range.end.saturating_sub(5), range.end);
                let name = Node::new("Identifier", keyword).with("name", Field::str("const"));
                let name = self.finish(name);
                let reference = Node::new("TSTypeReference", keyword).with("typeName", Field::Node(name));
                let reference = self.finish(reference);
                Node::new("TSAsExpression", range)
                    .with("expression", Field::Node(self.expr(&assertion.expr)?))
                    .with("typeAnnotation", Field::Node(reference))
            }
            swc::Expr::TsNonNull(non_null) => {
                Node::new("TSNonNullExpression", range).with("expression", Field::Node(self.expr(&non_null.expr)?))
            }
            swc::Expr::TsAs(as_expr) => Node::new("TSAsExpression", range)
                .with("expression", Field::Node(self.expr(&as_expr.expr)?))
                .with("typeAnnotation", Field::Node(self.ts_type(&as_expr.type_ann)?)),
            swc::Expr::TsSatisfies(satisfies) => Node::new("TSSatisfiesExpression", range)
                .with("expression", Field::Node(self.expr(&satisfies.expr)?))
                .with("typeAnnotation", Field::Node(self.ts_type(&satisfies.type_ann)?)),
            swc::Expr::TsInstantiation(instantiation) => Node::new("TSInstantiationExpression", range)
                .with("expression", Field::Node(self.expr(&instantiation.expr)?))
                .with("typeArguments", Field::Node(self.type_param_instantiation(&instantiation.type_args)?)),
            swc::Expr::PrivateName(name) => return Ok(self.private_name(name)),
            swc::Expr::Invalid(_) => return Err(self.unsupported("invalid expression", range)),
            _ => return Err(self.unsupported("JSX", range)),
        };
        Ok(self.finish(node))
    }

    pub(crate) fn expr_or_spread(&mut self, arg: &swc::ExprOrSpread) -> PResult<NodeId> {
        let argument = self.expr(&arg.expr)?;
        let Some(dots) = arg.spread else {
            return Ok(argument);
        };
        let range = self.span(dots).merge(self.range_of(argument));
        let node = Node::new("SpreadElement", range).with("argument", Field::Node(argument));
        Ok(self.finish(node))
    }

    // Member and call chains

    /// A member/call chain, wrapped in `ChainExpression` when any link
    /// is optional.
    fn chain(&mut self, expr: &swc::Expr) -> PResult<NodeId> {
        let (id, optional) = self.chain_link(expr)?;
        if !optional {
            return Ok(id);
        }
        let node = Node::new("ChainExpression", self.range_of(id)).with("expression", Field::Node(id));
        Ok(self.finish(node))
    }

    /// Convert one link; the flag reports an optional link at or below it.
    /// Parenthesized chains end the walk and are wrapped on their own.
    fn chain_link(&mut self, expr: &swc::Expr) -> PResult<(NodeId, bool)> {
        ensure_sufficient_stack(|| match expr {
            swc::Expr::Member(member) => self.member(member, false),
            swc::Expr::Call(call) => self.call(call, false),
            swc::Expr::OptChain(chain) => match &*chain.base {
                swc::OptChainBase::Member(member) => self.member(member, chain.optional),
                swc::OptChainBase::Call(call) => self.opt_call(call, chain.optional, self.span(chain.span)),
            },
            other => Ok((self.expr(other)?, false)),
        })
    }

    fn member(&mut self, member: &swc::MemberExpr, optional: bool) -> PResult<(NodeId, bool)> {
        let (object, inner) = self.chain_link(&member.obj)?;
        let (property, computed) = self.member_prop(&member.prop)?;
        let node = Node::new("MemberExpression", self.span(member.span))
            .with("object", Field::Node(object))
            .with("property", Field::Node(property))
            .with("computed", Field::Bool(computed))
            .with("optional", Field::Bool(optional));
        Ok((self.finish(node), inner || optional))
    }

    fn member_prop(&mut self, prop: &swc::MemberProp) -> PResult<(NodeId, bool)> {
        Ok(match prop {
            swc::MemberProp::Ident(ident) => (self.ident_name(ident), false),
            swc::MemberProp::PrivateName(name) => (self.private_name(name), false),
            swc::MemberProp::Computed(computed) => (self.expr(&computed.expr)?, true),
        })
    }

    fn super_prop(&mut self, prop: &swc::SuperPropExpr) -> PResult<NodeId> {
        let object = Node::new("Super", self.span(prop.obj.span));
        let object = self.finish(object);
        let (property, computed) = match &prop.prop {
            swc::SuperProp::Ident(ident) => (self.ident_name(ident), false),
            swc::SuperProp::Computed(computed) => (self.expr(&computed.expr)?, true),
        };
        let node = Node::new("MemberExpression", self.span(prop.span))
            .with("object", Field::Node(object))
            .with("property", Field::Node(property))
            .with("computed", Field::Bool(computed))
            .with("optional", Field::Bool(false));
        Ok(self.finish(node))
    }

    fn call(&mut self, call: &swc::CallExpr, optional: bool) -> PResult<(NodeId, bool)> {
        let range = self.span(call.span);
        let (callee, inner) = match &call.callee {
            swc::Callee::Expr(callee) => self.chain_link(callee)?,
            swc::Callee::Super(sup) => {
                let node = Node::new("Super", self.span(sup.span));
                (self.finish(node), false)
            }
            swc::Callee::Import(_) => return Ok((self.dynamic_import(call, range)?, false)),
        };
        let node = Node::new("CallExpression", range)
            .with("callee", Field::Node(callee))
            .with("arguments", self.list(&call.args, Self::expr_or_spread)?)
            .with("optional", Field::Bool(optional))
            .with_optional("typeArguments", self.type_args(call.type_args.as_deref())?);
        Ok((self.finish(node), inner || optional))
    }

    fn opt_call(&mut self, call: &swc::OptCall, optional: bool, range: Span) -> PResult<(NodeId, bool)> {
        let (callee, inner) = self.chain_link(&call.callee)?;
        let node = Node::new("CallExpression", range)
            .with("callee", Field::Node(callee))
            .with("arguments", self.list(&call.args, Self::expr_or_spread)?)
            .with("optional", Field::Bool(optional))
            .with_optional("typeArguments", self.type_args(call.type_args.as_deref())?);
        Ok((self.finish(node), inner || optional))
    }

    /// `import(source, options)`.
    fn dynamic_import(&mut self, call: &swc::CallExpr, range: Span) -> PResult<NodeId> {
        let mut args = call.args.iter();
        let Some(source) = args.next() else {
            return Err(self.unsupported("import() without a source", range));
        };
        let source = self.expr_or_spread(source)?;
        let options = self.opt(args.next(), Self::expr_or_spread)?;
        let node = Node::new("ImportExpression", range)
            .with("source", Field::Node(source))
            .with("options", Field::opt(options));
        Ok(self.finish(node))
    }

    fn meta_property(&mut self, kind: swc::MetaPropKind, range: Span) -> NodeId {
        let (meta, property) = match kind {
            swc::MetaPropKind::NewTarget => ("new", "target"),
            swc::MetaPropKind::ImportMeta => ("import", "meta"),
        };
        let meta_range = Span::new(range.start, range.start + meta.len() as u32);
        let property_range = Span::new(range.end.saturating_sub(property.len() as u32), range.end);
        let meta = Node::new("Identifier", meta_range).with("name", Field::str(meta));
        let meta = self.finish(meta);
        let property = Node::new("Identifier", property_range).with("name", Field::str(property));
        let property = self.finish(property);
        let node = Node::new("MetaProperty", range)
            .with("meta", Field::Node(meta))
            .with("property", Field::Node(property));
        self.finish(node)
    }

    fn arrow(&mut self, arrow: &swc::ArrowExpr, range: Span) -> PResult<NodeId> {
        let params = self.list(&arrow.params, Self::pat)?;
        let (body, expression) = match &*arrow.body {
            swc::BlockStmtOrExpr::BlockStmt(block) => (self.block(block)?, false),
            swc::BlockStmtOrExpr::Expr(expr) => (self.expr(expr)?, true),
        };
        let node = Node::new("ArrowFunctionExpression", range)
            .with("id", Field::Null)
            .with("params", params)
            .with("body", Field::Node(body))
            .with("async", Field::Bool(arrow.is_async))
            .with("expression", Field::Bool(expression))
            .with("generator", Field::Bool(false))
            .with_optional("typeParameters", self.type_params(arrow.type_params.as_deref())?)
            .with_optional("returnType", self.type_ann(arrow.return_type.as_deref())?);
        Ok(self.finish(node))
    }

    // Object literals

    fn prop_or_spread(&mut self, prop: &swc::PropOrSpread) -> PResult<NodeId> {
        match prop {
            swc::PropOrSpread::Spread(spread) => {
                let argument = self.expr(&spread.expr)?;
                let range = self.span(spread.dot3_token).merge(self.range_of(argument));
                let node = Node::new("SpreadElement", range).with("argument", Field::Node(argument));
                Ok(self.finish(node))
            }
            swc::PropOrSpread::Prop(prop) => self.prop(prop),
        }
    }

    fn prop(&mut self, prop: &swc::Prop) -> PResult<NodeId> {
        match prop {
            swc::Prop::Shorthand(ident) => {
                let key = self.ident(ident);
                let value = self.duplicate(key);
                Ok(self.property(key, value, "init", false, true, false))
            }
            swc::Prop::KeyValue(entry) => {
                let (key, computed) = self.prop_name(&entry.key)?;
                let value = self.expr(&entry.value)?;
                Ok(self.property(key, value, "init", false, false, computed))
            }
            swc::Prop::Assign(assign) => {
                // `{ a = 1 }`, only valid once reinterpreted as a pattern.
                let key = self.ident(&assign.key);
                let left = self.duplicate(key);
                let right = self.expr(&assign.value)?;
                let pattern = Node::new("AssignmentPattern", self.span(assign.span))
                    .with("left", Field::Node(left))
                    .with("right", Field::Node(right));
                let value = self.finish(pattern);
                Ok(self.property(key, value, "init", false, true, false))
            }
            swc::Prop::Getter(getter) => {
                let (key, computed) = self.prop_name(&getter.key)?;
                let start = self.signature_start(self.range_of(key).end);
                let value_range = Span::new(start, self.span(getter.span).end);
                let body = self.opt(getter.body.as_ref(), Self::block)?;
                let value = self.accessor_value(Vec::new(), body, getter.type_ann.as_deref(), value_range)?;
                Ok(self.property(key, value, "get", false, false, computed))
            }
            swc::Prop::Setter(setter) => {
                let (key, computed) = self.prop_name(&setter.key)?;
                let start = self.signature_start(self.range_of(key).end);
                let value_range = Span::new(start, self.span(setter.span).end);
                let mut params = Vec::new();
                if let Some(this) = &setter.this_param {
                    params.push(self.pat(this)?);
                }
                params.push(self.pat(&setter.param)?);
                let body = self.opt(setter.body.as_ref(), Self::block)?;
                let value = self.accessor_value(params, body, None, value_range)?;
                Ok(self.property(key, value, "set", false, false, computed))
            }
            swc::Prop::Method(method) => {
                let (key, computed) = self.prop_name(&method.key)?;
                let start = self.signature_start(self.range_of(key).end);
                let value_range = Span::new(start, self.span(method.function.span).end);
                let value = self.function("FunctionExpression", None, &method.function, value_range)?;
                Ok(self.property(key, value, "init", true, false, computed))
            }
        }
    }

    /// `FunctionExpression` value of an object-literal getter or setter.
    fn accessor_value(
        &mut self,
        params: Vec<NodeId>,
        body: Option<NodeId>,
        return_type: Option<&swc::TsTypeAnn>,
        range: Span,
    ) -> PResult<NodeId> {
        let node = Node::new("FunctionExpression", range)
            .with("id", Field::Null)
            .with("params", Field::list(params))
            .with("body", Field::opt(body))
            .with("async", Field::Bool(false))
            .with("generator", Field::Bool(false))
            .with("expression", Field::Bool(false))
            .with_optional("returnType", self.type_ann(return_type)?);
        Ok(self.finish(node))
    }

    /// An object `Property`; its range runs from the key to the value.
    pub(crate) fn property(
        &mut self,
        key: NodeId,
        value: NodeId,
        kind: &str,
        method: bool,
        shorthand: bool,
        computed: bool,
    ) -> NodeId {
        let mut range = self.range_of(key).merge(self.range_of(value));
        if computed {
            // Take in the `[` before the key.
            let before = self.text.get(..range.start as usize).unwrap_or_default().trim_end();
            if before.ends_with('[') {
                range.start = (before.len() - 1) as u32;
            }
        }
        let node = Node::new("Property", range)
            .with("key", Field::Node(key))
            .with("value", Field::Node(value))
            .with("kind", Field::str(kind))
            .with("method", Field::Bool(method))
            .with("shorthand", Field::Bool(shorthand))
            .with("computed", Field::Bool(computed));
        self.finish(node)
    }

    /// A property key and whether it is computed.
    pub(crate) fn prop_name(&mut self, name: &swc::PropName) -> PResult<(NodeId, bool)> {
        Ok(match name {
            swc::PropName::Ident(ident) => (self.ident_name(ident), false),
            swc::PropName::Str(string) => (self.str_lit(string), false),
            swc::PropName::Num(number) => (self.lit(&swc::Lit::Num(number.clone()))?, false),
            swc::PropName::BigInt(bigint) => (self.lit(&swc::Lit::BigInt(bigint.clone()))?, false),
            swc::PropName::Computed(computed) => (self.expr(&computed.expr)?, true),
        })
    }

    // Literals

    pub(crate) fn lit(&mut self, lit: &swc::Lit) -> PResult<NodeId> {
        let range = self.span(lit.span());
        let raw = self.slice(range);
        let mut node = Node::new("Literal", range);
        match lit {
            swc::Lit::Str(string) => node.set("value", Field::Str(self.string_value(string, range))),
            swc::Lit::Bool(boolean) => node.set("value", Field::Bool(boolean.value)),
            swc::Lit::Null(_) => node.set("value", Field::Null),
            swc::Lit::Num(number) => node.set("value", Field::Num(number.value)),
            swc::Lit::BigInt(_) => {
                node.set("value", Field::Null);
                node.set("bigint", Field::Str(raw.trim_end_matches('n').replace('_', "")));
            }
            swc::Lit::Regex(regex) => {
                self.hints.regexes.push(range);
                node.set("value", Field::Null);
                node.set("regex", Field::Strs(vec![regex.exp.to_string(), regex.flags.to_string()]));
            }
            swc::Lit::JSXText(_) => return Err(self.unsupported("JSX", range)),
        }
        node.set("raw", Field::str(raw));
        Ok(self.finish(node))
    }

    pub(crate) fn str_lit(&mut self, string: &swc::Str) -> NodeId {
        let range = self.span(string.span);
        let node = Node::new("Literal", range)
            .with("value", Field::Str(self.string_value(string, range)))
            .with("raw", Field::str(self.slice(range)));
        self.finish(node)
    }

    /// Cooked value; lone surrogates fall back to the raw body.
    fn string_value(&self, string: &swc::Str, range: Span) -> String {
        match string.value.as_str() {
            Some(value) => value.to_owned(),
            None => self.slice(range.inset(1)).to_owned(),
        }
    }

    // Templates

    pub(crate) fn template(&mut self, tpl: &swc::Tpl) -> PResult<NodeId> {
        let range = self.span(tpl.span);
        let expression_ends: Vec<u32> = tpl.exprs.iter().map(|e| self.span(e.span()).end).collect();
        let quasis = self.template_elements(&tpl.quasis, range.start, &expression_ends);
        let expressions = self.list(&tpl.exprs, |c, e| c.expr(e))?;
        let node = Node::new("TemplateLiteral", range)
            .with("quasis", Field::list(quasis))
            .with("expressions", expressions);
        Ok(self.finish(node))
    }

    /// `TemplateElement`s with ranges covering their delimiters: the
    /// opening backtick or `}`, and the closing backtick or `${`.
    ///
    /// Each element starts at the template start or at the `}` after the
    /// previous substitution, and spans its raw text plus delimiters.
    pub(crate) fn template_elements(
        &mut self,
        quasis: &[swc::TplElement],
        start: u32,
        substitution_ends: &[u32],
    ) -> Vec<NodeId> {
        let mut ids = Vec::with_capacity(quasis.len());
        for (i, quasi) in quasis.iter().enumerate() {
            let open = match i.checked_sub(1).and_then(|prev| substitution_ends.get(prev)) {
                Some(&end) => self.skip_trivia(end),
                None => start,
            };
            let close = if quasi.tail { 1 } else { 2 };
            let end = (open + 1 + quasi.raw.len() as u32 + close).min(self.len());
            let range = Span::new(open, end);
            self.hints.templates.push(range);
            let cooked = quasi.cooked.as_ref().and_then(|cooked| cooked.as_str()).map(str::to_owned);
            let node = Node::new("TemplateElement", range)
                .with("cooked", cooked.map_or(Field::Null, Field::Str))
                .with("raw", Field::str(quasi.raw.to_string()))
                .with("tail", Field::Bool(quasi.tail));
            ids.push(self.finish(node));
        }
        ids
    }
}
