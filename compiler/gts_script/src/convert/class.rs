//! Functions, classes and class members.

use gts_ir::{Field, Node, NodeId, Span};
use swc_core::common::Spanned;
use swc_core::ecma::ast as swc;

use super::{Converter, PResult};

fn accessibility(value: Option<swc::Accessibility>) -> Option<Field> {
    value.map(|value| {
        Field::str(match value {
            swc::Accessibility::Public => "public",
            swc::Accessibility::Protected => "protected",
            swc::Accessibility::Private => "private",
        })
    })
}

fn method_kind(kind: swc::MethodKind) -> &'static str {
    match kind {
        swc::MethodKind::Method => "method",
        swc::MethodKind::Getter => "get",
        swc::MethodKind::Setter => "set",
    }
}

/// Modifiers shared by every class element.
struct Modifiers {
    is_static: bool,
    computed: bool,
    is_override: bool,
    optional: bool,
    accessibility: Option<swc::Accessibility>,
}

impl Modifiers {
    fn apply(self, node: Node) -> Node {
        node.with("computed", Field::Bool(self.computed))
            .with("static", Field::Bool(self.is_static))
            .with("override", Field::Bool(self.is_override))
            .with("optional", Field::Bool(self.optional))
            .with_optional("accessibility", accessibility(self.accessibility))
    }
}

impl Converter<'_> {
    pub(crate) fn function(
        &mut self,
        node_type: &str,
        id: Option<NodeId>,
        function: &swc::Function,
        range: Span,
    ) -> PResult<NodeId> {
        let params = self.list(&function.params, Self::param)?;
        let body = self.opt(function.body.as_ref(), Self::block)?;
        let node = Node::new(node_type, range)
            .with("id", Field::opt(id))
            .with("params", params)
            .with("body", Field::opt(body))
            .with("async", Field::Bool(function.is_async))
            .with("generator", Field::Bool(function.is_generator))
            .with("expression", Field::Bool(false))
            .with_optional("typeParameters", self.type_params(function.type_params.as_deref())?)
            .with_optional("returnType", self.type_ann(function.return_type.as_deref())?);
        Ok(self.finish(node))
    }

    pub(crate) fn class(
        &mut self,
        node_type: &str,
        id: Option<NodeId>,
        class: &swc::Class,
        range: Span,
    ) -> PResult<NodeId> {
        let range = class.decorators.iter().fold(range, |range, d| range.merge(self.span(d.span)));
        let decorators = self.decorators(&class.decorators)?;
        let type_parameters = self.type_params(class.type_params.as_deref())?;
        let super_class = self.opt(class.super_class.as_deref(), Self::expr)?;
        let super_type_arguments = self.type_args(class.super_type_params.as_deref())?;
        let implements = self.list(&class.implements, |c, heritage| c.heritage("TSClassImplements", heritage))?;

        let body_start = self.class_body_start(class, id, range);
        let mut members = Vec::with_capacity(class.body.len());
        for member in &class.body {
            if let Some(member) = self.class_member(member)? {
                members.push(member);
            }
        }
        let body = Node::new("ClassBody", Span::new(body_start, range.end)).with("body", Field::list(members));
        let body = self.finish(body);

        let mut node = Node::new(node_type, range)
            .with("id", Field::opt(id))
            .with("superClass", Field::opt(super_class))
            .with("body", Field::Node(body))
            .with("decorators", decorators)
            .with("implements", implements)
            .with_optional("typeParameters", type_parameters)
            .with_optional("superTypeArguments", super_type_arguments);
        if class.is_abstract {
            node.set("abstract", Field::Bool(true));
        }
        Ok(self.finish(node))
    }

    /// Offset of the `{` opening the class body: the first token after the
    /// last header part, or after the `class` keyword when there is none.
    fn class_body_start(&self, class: &swc::Class, id: Option<NodeId>, range: Span) -> u32 {
        let header_end = [
            id.map(|id| self.range_of(id).end),
            class.type_params.as_ref().map(|p| self.span(p.span).end),
            class.super_class.as_ref().map(|e| self.span(e.span()).end),
            class.super_type_params.as_ref().map(|p| self.span(p.span).end),
            class.implements.last().map(|h| self.span(h.span).end),
        ]
        .into_iter()
        .flatten()
        .max();
        let header_end = header_end.unwrap_or_else(|| {
            let from = class.decorators.last().map_or(range.start, |d| self.span(d.span).end);
            let rest = self.text.get(from as usize..).unwrap_or_default();
            rest.find("class").map_or(from, |at| from + at as u32 + 5)
        });
        self.skip_trivia(header_end)
    }

    fn class_member(&mut self, member: &swc::ClassMember) -> PResult<Option<NodeId>> {
        let node = match member {
            swc::ClassMember::Constructor(ctor) => {
                let range = self.span(ctor.span);
                let (key, computed) = self.prop_name(&ctor.key)?;
                let start = self.signature_start(self.range_of(key).end);
                let params = self.list(&ctor.params, Self::ctor_param)?;
                let body = self.opt(ctor.body.as_ref(), Self::block)?;
                let value = Node::new("FunctionExpression", Span::new(start, range.end))
                    .with("id", Field::Null)
                    .with("params", params)
                    .with("body", Field::opt(body))
                    .with("async", Field::Bool(false))
                    .with("generator", Field::Bool(false))
                    .with("expression", Field::Bool(false));
                let value = self.finish(value);
                let modifiers = Modifiers {
                    is_static: false,
                    computed,
                    is_override: false,
                    optional: ctor.is_optional,
                    accessibility: ctor.accessibility,
                };
                modifiers.apply(
                    Node::new("MethodDefinition", range)
                        .with("key", Field::Node(key))
                        .with("value", Field::Node(value))
                        .with("kind", Field::str("constructor"))
                        .with("decorators", Field::List(Vec::new())),
                )
            }
            swc::ClassMember::Method(method) => {
                let (key, computed) = self.prop_name(&method.key)?;
                let modifiers = Modifiers {
                    is_static: method.is_static,
                    computed,
                    is_override: method.is_override,
                    optional: method.is_optional,
                    accessibility: method.accessibility,
                };
                let node_type = if method.is_abstract {
                    "TSAbstractMethodDefinition"
                } else {
                    "MethodDefinition"
                };
                let node = self.method(node_type, key, &method.function, method.kind, self.span(method.span))?;
                modifiers.apply(node)
            }
            swc::ClassMember::PrivateMethod(method) => {
                let key = self.private_name(&method.key);
                let modifiers = Modifiers {
                    is_static: method.is_static,
                    computed: false,
                    is_override: method.is_override,
                    optional: method.is_optional,
                    accessibility: method.accessibility,
                };
                let node = self.method("MethodDefinition", key, &method.function, method.kind, self.span(method.span))?;
                modifiers.apply(node)
            }
            swc::ClassMember::ClassProp(prop) => {
                let (key, computed) = self.prop_name(&prop.key)?;
                let node_type = if prop.is_abstract {
                    "TSAbstractPropertyDefinition"
                } else {
                    "PropertyDefinition"
                };
                let modifiers = Modifiers {
                    is_static: prop.is_static,
                    computed,
                    is_override: prop.is_override,
                    optional: prop.is_optional,
                    accessibility: prop.accessibility,
                };
                let node = self.field(node_type, key, prop.value.as_deref(), prop.type_ann.as_deref(), &prop.decorators, prop.span)?
                    .with("readonly", Field::Bool(prop.readonly))
                    .with("declare", Field::Bool(prop.declare))
                    .with("definite", Field::Bool(prop.definite));
                modifiers.apply(node)
            }
            swc::ClassMember::PrivateProp(prop) => {
                let key = self.private_name(&prop.key);
                let modifiers = Modifiers {
                    is_static: prop.is_static,
                    computed: false,
                    is_override: prop.is_override,
                    optional: prop.is_optional,
                    accessibility: prop.accessibility,
                };
                let node = self.field("PropertyDefinition", key, prop.value.as_deref(), prop.type_ann.as_deref(), &prop.decorators, prop.span)?
                    .with("readonly", Field::Bool(prop.readonly))
                    .with("declare", Field::Bool(false))
                    .with("definite", Field::Bool(prop.definite));
                modifiers.apply(node)
            }
            swc::ClassMember::AutoAccessor(accessor) => {
                let (key, computed) = match &accessor.key {
                    swc::Key::Private(name) => (self.private_name(name), false),
                    swc::Key::Public(name) => self.prop_name(name)?,
                };
                let node_type = if accessor.is_abstract {
                    "TSAbstractAccessorProperty"
                } else {
                    "AccessorProperty"
                };
                let modifiers = Modifiers {
                    is_static: accessor.is_static,
                    computed,
                    is_override: accessor.is_override,
                    optional: false,
                    accessibility: accessor.accessibility,
                };
                let node = self.field(node_type, key, accessor.value.as_deref(), accessor.type_ann.as_deref(), &accessor.decorators, accessor.span)?
                    .with("definite", Field::Bool(accessor.definite));
                modifiers.apply(node)
            }
            swc::ClassMember::StaticBlock(block) => {
                Node::new("StaticBlock", self.span(block.span)).with("body", self.list(&block.body.stmts, Self::stmt)?)
            }
            swc::ClassMember::TsIndexSignature(signature) => return self.ts_index_signature(signature).map(Some),
            swc::ClassMember::Empty(_) => return Ok(None),
        };
        Ok(Some(self.finish(node)))
    }

    /// A method element before its modifiers. The value starts at the
    /// parameter list (or type parameters) and has no id.
    fn method(
        &mut self,
        node_type: &str,
        key: NodeId,
        function: &swc::Function,
        kind: swc::MethodKind,
        range: Span,
    ) -> PResult<Node> {
        let range = function.decorators.iter().fold(range, |range, d| range.merge(self.span(d.span)));
        let decorators = self.decorators(&function.decorators)?;
        let start = self.signature_start(self.range_of(key).end);
        let value = self.function("FunctionExpression", None, function, Span::new(start, range.end))?;
        Ok(Node::new(node_type, range)
            .with("key", Field::Node(key))
            .with("value", Field::Node(value))
            .with("kind", Field::str(method_kind(kind)))
            .with("decorators", decorators))
    }

    /// A field-like element (property or accessor) before its modifiers.
    fn field(
        &mut self,
        node_type: &str,
        key: NodeId,
        value: Option<&swc::Expr>,
        type_ann: Option<&swc::TsTypeAnn>,
        decorators: &[swc::Decorator],
        span: swc_core::common::Span,
    ) -> PResult<Node> {
        let range = decorators.iter().fold(self.span(span), |range, d| range.merge(self.span(d.span)));
        let decorators = self.decorators(decorators)?;
        let value = self.opt(value, Self::expr)?;
        Ok(Node::new(node_type, range)
            .with("key", Field::Node(key))
            .with("value", Field::opt(value))
            .with_optional("typeAnnotation", self.type_ann(type_ann)?)
            .with("decorators", decorators))
    }

    fn ctor_param(&mut self, param: &swc::ParamOrTsParamProp) -> PResult<NodeId> {
        match param {
            swc::ParamOrTsParamProp::Param(param) => self.param(param),
            swc::ParamOrTsParamProp::TsParamProp(prop) => {
                let parameter = match &prop.param {
                    swc::TsParamPropParam::Ident(binding) => self.binding_ident(binding)?,
                    swc::TsParamPropParam::Assign(assign) => self.assign_pat(assign)?,
                };
                let node = Node::new("TSParameterProperty", self.span(prop.span))
                    .with("parameter", Field::Node(parameter))
                    .with("readonly", Field::Bool(prop.readonly))
                    .with("override", Field::Bool(prop.is_override))
                    .with("decorators", self.decorators(&prop.decorators)?)
                    .with_optional("accessibility", accessibility(prop.accessibility));
                Ok(self.finish(node))
            }
        }
    }
}
