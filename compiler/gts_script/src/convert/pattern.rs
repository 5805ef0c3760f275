//! Binding and assignment patterns.

use gts_ir::{Field, Node, NodeId};
use gts_stack::ensure_sufficient_stack;
use swc_core::ecma::ast as swc;

use super::{Converter, PResult};

impl Converter<'_> {
    pub(crate) fn pat(&mut self, pat: &swc::Pat) -> PResult<NodeId> {
        ensure_sufficient_stack(|| self.pat_inner(pat))
    }

    fn pat_inner(&mut self, pat: &swc::Pat) -> PResult<NodeId> {
        match pat {
            swc::Pat::Ident(binding) => self.binding_ident(binding),
            swc::Pat::Array(array) => self.array_pat(array),
            swc::Pat::Rest(rest) => self.rest_pat(rest),
            swc::Pat::Object(object) => self.object_pat(object),
            swc::Pat::Assign(assign) => self.assign_pat(assign),
            swc::Pat::Expr(expr) => self.expr(expr),
            swc::Pat::Invalid(invalid) => Err(self.unsupported("invalid pattern", self.span(invalid.span))),
        }
    }

    /// An `Identifier` whose range runs over its type annotation.
    pub(crate) fn binding_ident(&mut self, binding: &swc::BindingIdent) -> PResult<NodeId> {
        let mut range = self.span(binding.id.span);
        let annotation = self.type_ann(binding.type_ann.as_deref())?;
        if let Some(Field::Node(annotation)) = &annotation {
            range = range.merge(self.range_of(*annotation));
        }
        let mut node = Node::new("Identifier", range)
            .with("name", Field::str(binding.id.sym.to_string()))
            .with_optional("typeAnnotation", annotation);
        if binding.id.optional {
            node.set("optional", Field::Bool(true));
        }
        Ok(self.finish(node))
    }

    fn array_pat(&mut self, array: &swc::ArrayPat) -> PResult<NodeId> {
        let elements = array
            .elems
            .iter()
            .map(|element| self.opt(element.as_ref(), Self::pat))
            .collect::<PResult<Vec<_>>>()?;
        let mut node = Node::new("ArrayPattern", self.span(array.span))
            .with("elements", Field::List(elements))
            .with_optional("typeAnnotation", self.type_ann(array.type_ann.as_deref())?);
        if array.optional {
            node.set("optional", Field::Bool(true));
        }
        Ok(self.finish(node))
    }

    fn object_pat(&mut self, object: &swc::ObjectPat) -> PResult<NodeId> {
        let mut node = Node::new("ObjectPattern", self.span(object.span))
            .with("properties", self.list(&object.props, Self::object_pat_prop)?)
            .with_optional("typeAnnotation", self.type_ann(object.type_ann.as_deref())?);
        if object.optional {
            node.set("optional", Field::Bool(true));
        }
        Ok(self.finish(node))
    }

    fn object_pat_prop(&mut self, prop: &swc::ObjectPatProp) -> PResult<NodeId> {
        match prop {
            swc::ObjectPatProp::KeyValue(entry) => {
                let (key, computed) = self.prop_name(&entry.key)?;
                let value = self.pat(&entry.value)?;
                Ok(self.property(key, value, "init", false, false, computed))
            }
            swc::ObjectPatProp::Assign(assign) => {
                let key = self.ident(&assign.key.id);
                let left = self.duplicate(key);
                let value = match &assign.value {
                    Some(default) => {
                        let right = self.expr(default)?;
                        let node = Node::new("AssignmentPattern", self.span(assign.span))
                            .with("left", Field::Node(left))
                            .with("right", Field::Node(right));
                        self.finish(node)
                    }
                    None => left,
                };
                Ok(self.property(key, value, "init", false, true, false))
            }
            swc::ObjectPatProp::Rest(rest) => self.rest_pat(rest),
        }
    }

    fn rest_pat(&mut self, rest: &swc::RestPat) -> PResult<NodeId> {
        let node = Node::new("RestElement", self.span(rest.span))
            .with("argument", Field::Node(self.pat(&rest.arg)?))
            .with_optional("typeAnnotation", self.type_ann(rest.type_ann.as_deref())?);
        Ok(self.finish(node))
    }

    pub(crate) fn assign_pat(&mut self, assign: &swc::AssignPat) -> PResult<NodeId> {
        let node = Node::new("AssignmentPattern", self.span(assign.span))
            .with("left", Field::Node(self.pat(&assign.left)?))
            .with("right", Field::Node(self.expr(&assign.right)?));
        Ok(self.finish(node))
    }

    pub(crate) fn assign_target(&mut self, target: &swc::AssignTarget) -> PResult<NodeId> {
        match target {
            swc::AssignTarget::Simple(simple) => self.simple_assign_target(simple),
            swc::AssignTarget::Pat(swc::AssignTargetPat::Array(array)) => self.array_pat(array),
            swc::AssignTarget::Pat(swc::AssignTargetPat::Object(object)) => self.object_pat(object),
            swc::AssignTarget::Pat(swc::AssignTargetPat::Invalid(invalid)) => {
                Err(self.unsupported("invalid assignment target", self.span(invalid.span)))
            }
        }
    }

    fn simple_assign_target(&mut self, target: &swc::SimpleAssignTarget) -> PResult<NodeId> {
        match target {
            swc::SimpleAssignTarget::Ident(binding) => self.binding_ident(binding),
            swc::SimpleAssignTarget::Paren(paren) => self.expr(&paren.expr),
            swc::SimpleAssignTarget::Invalid(invalid) => {
                Err(self.unsupported("invalid assignment target", self.span(invalid.span)))
            }
            // The remaining targets are ordinary expressions.
            other => {
                let expr: Box<swc::Expr> = other.clone().into();
                self.expr(&expr)
            }
        }
    }

    /// A function parameter, carrying its decorators.
    pub(crate) fn param(&mut self, param: &swc::Param) -> PResult<NodeId> {
        let id = self.pat(&param.pat)?;
        if !param.decorators.is_empty() {
            let decorators = self.decorators(&param.decorators)?;
            let range = self.range_of(id).merge(self.span(param.span));
            let loc = self.lines.loc(range);
            let node = self.ast.get_mut(id);
            node.set("decorators", decorators);
            node.range = range;
            node.loc = loc;
        }
        Ok(id)
    }

    /// A parameter of a function type or index signature.
    pub(crate) fn ts_fn_param(&mut self, param: &swc::TsFnParam) -> PResult<NodeId> {
        match param {
            swc::TsFnParam::Ident(binding) => self.binding_ident(binding),
            swc::TsFnParam::Array(array) => self.array_pat(array),
            swc::TsFnParam::Rest(rest) => self.rest_pat(rest),
            swc::TsFnParam::Object(object) => self.object_pat(object),
        }
    }
}
