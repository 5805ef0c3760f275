//! TypeScript types and declarations, in typescript-estree shapes.

use gts_ir::{Field, Node, NodeId, Span};
use gts_stack::ensure_sufficient_stack;
use swc_core::common::Spanned;
use swc_core::ecma::ast as swc;

use super::{Converter, PResult};

fn keyword_type(kind: swc::TsKeywordTypeKind) -> &'static str {
    match kind {
        swc::TsKeywordTypeKind::TsAnyKeyword => "TSAnyKeyword",
        swc::TsKeywordTypeKind::TsUnknownKeyword => "TSUnknownKeyword",
        swc::TsKeywordTypeKind::TsNumberKeyword => "TSNumberKeyword",
        swc::TsKeywordTypeKind::TsObjectKeyword => "TSObjectKeyword",
        swc::TsKeywordTypeKind::TsBooleanKeyword => "TSBooleanKeyword",
        swc::TsKeywordTypeKind::TsBigIntKeyword => "TSBigIntKeyword",
        swc::TsKeywordTypeKind::TsStringKeyword => "TSStringKeyword",
        swc::TsKeywordTypeKind::TsSymbolKeyword => "TSSymbolKeyword",
        swc::TsKeywordTypeKind::TsVoidKeyword => "TSVoidKeyword",
        swc::TsKeywordTypeKind::TsUndefinedKeyword => "TSUndefinedKeyword",
        swc::TsKeywordTypeKind::TsNullKeyword => "TSNullKeyword",
        swc::TsKeywordTypeKind::TsNeverKeyword => "TSNeverKeyword",
        swc::TsKeywordTypeKind::TsIntrinsicKeyword => "TSIntrinsicKeyword",
    }
}

fn plus_minus(value: swc::TruePlusMinus) -> Field {
    match value {
        swc::TruePlusMinus::True => Field::Bool(true),
        swc::TruePlusMinus::Plus => Field::str("+"),
        swc::TruePlusMinus::Minus => Field::str("-"),
    }
}

impl Converter<'_> {
    // Annotations and type parameters

    pub(crate) fn type_ann(&mut self, ann: Option<&swc::TsTypeAnn>) -> PResult<Option<Field>> {
        let Some(ann) = ann else { return Ok(None) };
        let inner = self.ts_type(&ann.type_ann)?;
        let node = Node::new("TSTypeAnnotation", self.span(ann.span)).with("typeAnnotation", Field::Node(inner));
        Ok(Some(Field::Node(self.finish(node))))
    }

    pub(crate) fn type_args(&mut self, args: Option<&swc::TsTypeParamInstantiation>) -> PResult<Option<Field>> {
        args.map(|args| self.type_param_instantiation(args).map(Field::Node)).transpose()
    }

    pub(crate) fn type_param_instantiation(&mut self, args: &swc::TsTypeParamInstantiation) -> PResult<NodeId> {
        let range = self.span(args.span);
        self.note_type_closer(range);
        let params = self.list(&args.params, |c, t| c.ts_type(t))?;
        let node = Node::new("TSTypeParameterInstantiation", range).with("params", params);
        Ok(self.finish(node))
    }

    pub(crate) fn type_params(&mut self, params: Option<&swc::TsTypeParamDecl>) -> PResult<Option<Field>> {
        let Some(params) = params else { return Ok(None) };
        let range = self.span(params.span);
        self.note_type_closer(range);
        let list = self.list(&params.params, Self::type_param)?;
        let node = Node::new("TSTypeParameterDeclaration", range).with("params", list);
        Ok(Some(Field::Node(self.finish(node))))
    }

    /// The `>` closing a type argument list may have been lexed as part of
    /// `>>` or `>=`; tokens are split there.
    fn note_type_closer(&mut self, range: Span) {
        if self.text.as_bytes().get(range.end.saturating_sub(1) as usize) == Some(&b'>') {
            self.hints.type_closers.push(range.end - 1);
        }
    }

    fn type_param(&mut self, param: &swc::TsTypeParam) -> PResult<NodeId> {
        let name = self.ident(&param.name);
        let mut node = Node::new("TSTypeParameter", self.span(param.span))
            .with("name", Field::Node(name))
            .with("constraint", self.opt_field(param.constraint.as_deref(), Self::ts_type)?)
            .with("default", self.opt_field(param.default.as_deref(), Self::ts_type)?);
        for (flag, set) in [("in", param.is_in), ("out", param.is_out), ("const", param.is_const)] {
            if set {
                node.set(flag, Field::Bool(true));
            }
        }
        Ok(self.finish(node))
    }

    // Types

    pub(crate) fn ts_type(&mut self, ty: &swc::TsType) -> PResult<NodeId> {
        ensure_sufficient_stack(|| self.ts_type_inner(ty))
    }

    fn ts_type_inner(&mut self, ty: &swc::TsType) -> PResult<NodeId> {
        let range = self.span(ty.span());
        let node = match ty {
            swc::TsType::TsKeywordType(keyword) => Node::new(keyword_type(keyword.kind), range),
            swc::TsType::TsThisType(_) => Node::new("TSThisType", range),
            swc::TsType::TsFnOrConstructorType(swc::TsFnOrConstructorType::TsFnType(function)) => {
                Node::new("TSFunctionType", range)
                    .with("params", self.list(&function.params, Self::ts_fn_param)?)
                    .with_optional("returnType", self.type_ann(Some(&*function.type_ann))?)
                    .with_optional("typeParameters", self.type_params(function.type_params.as_deref())?)
            }
            swc::TsType::TsFnOrConstructorType(swc::TsFnOrConstructorType::TsConstructorType(ctor)) => {
                Node::new("TSConstructorType", range)
                    .with("params", self.list(&ctor.params, Self::ts_fn_param)?)
                    .with_optional("returnType", self.type_ann(Some(&*ctor.type_ann))?)
                    .with_optional("typeParameters", self.type_params(ctor.type_params.as_deref())?)
                    .with("abstract", Field::Bool(ctor.is_abstract))
            }
            swc::TsType::TsTypeRef(reference) => Node::new("TSTypeReference", range)
                .with("typeName", Field::Node(self.entity_name(&reference.type_name)))
                .with_optional("typeArguments", self.type_args(reference.type_params.as_deref())?),
            swc::TsType::TsTypeQuery(query) => {
                let name = match &query.expr_name {
                    swc::TsTypeQueryExpr::TsEntityName(name) => self.entity_name(name),
                    swc::TsTypeQueryExpr::Import(import) => self.import_type(import)?,
                };
                Node::new("TSTypeQuery", range)
                    .with("exprName", Field::Node(name))
                    .with_optional("typeArguments", self.type_args(query.type_args.as_deref())?)
            }
            swc::TsType::TsTypeLit(literal) => {
                Node::new("TSTypeLiteral", range).with("members", self.list(&literal.members, Self::type_element)?)
            }
            swc::TsType::TsArrayType(array) => {
                Node::new("TSArrayType", range).with("elementType", Field::Node(self.ts_type(&array.elem_type)?))
            }
            swc::TsType::TsTupleType(tuple) => {
                Node::new("TSTupleType", range).with("elementTypes", self.list(&tuple.elem_types, Self::tuple_element)?)
            }
            swc::TsType::TsOptionalType(optional) => {
                Node::new("TSOptionalType", range).with("typeAnnotation", Field::Node(self.ts_type(&optional.type_ann)?))
            }
            swc::TsType::TsRestType(rest) => {
                Node::new("TSRestType", range).with("typeAnnotation", Field::Node(self.ts_type(&rest.type_ann)?))
            }
            swc::TsType::TsUnionOrIntersectionType(swc::TsUnionOrIntersectionType::TsUnionType(union)) => {
                Node::new("TSUnionType", range).with("types", self.list(&union.types, |c, t| c.ts_type(t))?)
            }
            swc::TsType::TsUnionOrIntersectionType(swc::TsUnionOrIntersectionType::TsIntersectionType(both)) => {
                Node::new("TSIntersectionType", range).with("types", self.list(&both.types, |c, t| c.ts_type(t))?)
            }
            swc::TsType::TsConditionalType(cond) => Node::new("TSConditionalType", range)
                .with("checkType", Field::Node(self.ts_type(&cond.check_type)?))
                .with("extendsType", Field::Node(self.ts_type(&cond.extends_type)?))
                .with("trueType", Field::Node(self.ts_type(&cond.true_type)?))
                .with("falseType", Field::Node(self.ts_type(&cond.false_type)?)),
            swc::TsType::TsInferType(infer) => {
                Node::new("TSInferType", range).with("typeParameter", Field::Node(self.type_param(&infer.type_param)?))
            }
            // typescript-estree drops type parentheses.
            swc::TsType::TsParenthesizedType(paren) => return self.ts_type(&paren.type_ann),
            swc::TsType::TsTypeOperator(operator) => {
                let name = match operator.op {
                    swc::TsTypeOperatorOp::KeyOf => "keyof",
                    swc::TsTypeOperatorOp::Unique => "unique",
                    swc::TsTypeOperatorOp::ReadOnly => "readonly",
                };
                Node::new("TSTypeOperator", range)
                    .with("operator", Field::str(name))
                    .with("typeAnnotation", Field::Node(self.ts_type(&operator.type_ann)?))
            }
            swc::TsType::TsIndexedAccessType(access) => Node::new("TSIndexedAccessType", range)
                .with("objectType", Field::Node(self.ts_type(&access.obj_type)?))
                .with("indexType", Field::Node(self.ts_type(&access.index_type)?)),
            swc::TsType::TsMappedType(mapped) => {
                let key = self.ident(&mapped.type_param.name);
                let mut node = Node::new("TSMappedType", range)
                    .with("key", Field::Node(key))
                    .with("constraint", self.opt_field(mapped.type_param.constraint.as_deref(), Self::ts_type)?)
                    .with("nameType", self.opt_field(mapped.name_type.as_deref(), Self::ts_type)?)
                    .with("typeAnnotation", self.opt_field(mapped.type_ann.as_deref(), Self::ts_type)?);
                if let Some(readonly) = mapped.readonly {
                    node.set("readonly", plus_minus(readonly));
                }
                if let Some(optional) = mapped.optional {
                    node.set("optional", plus_minus(optional));
                }
                node
            }
            swc::TsType::TsLitType(literal) => return self.literal_type(literal, range),
            swc::TsType::TsTypePredicate(predicate) => {
                let parameter = match &predicate.param_name {
                    swc::TsThisTypeOrIdent::TsThisType(this) => {
                        let node = Node::new("TSThisType", self.span(this.span));
                        self.finish(node)
                    }
                    swc::TsThisTypeOrIdent::Ident(ident) => self.ident(ident),
                };
                Node::new("TSTypePredicate", range)
                    .with("parameterName", Field::Node(parameter))
                    .with("typeAnnotation", self.type_ann(predicate.type_ann.as_deref())?.unwrap_or(Field::Null))
                    .with("asserts", Field::Bool(predicate.asserts))
            }
            swc::TsType::TsImportType(import) => return self.import_type(import),
        };
        Ok(self.finish(node))
    }

    fn literal_type(&mut self, literal: &swc::TsLitType, range: Span) -> PResult<NodeId> {
        let value = match &literal.lit {
            swc::TsLit::Number(number) if self.slice(range).starts_with('-') => {
                // `-1` is a negated literal in ESTree.
                let argument = self.lit(&swc::Lit::Num(number.clone()))?;
                let digits = Span::new(self.skip_trivia(range.start + 1), range.end);
                let loc = self.lines.loc(digits);
                let raw = self.slice(digits);
                let node = self.ast.get_mut(argument);
                node.range = digits;
                node.loc = loc;
                node.set("raw", Field::str(raw));
                let node = Node::new("UnaryExpression", range)
                    .with("operator", Field::str("-"))
                    .with("prefix", Field::Bool(true))
                    .with("argument", Field::Node(argument));
                self.finish(node)
            }
            swc::TsLit::Number(number) => self.lit(&swc::Lit::Num(number.clone()))?,
            swc::TsLit::Str(string) => self.str_lit(string),
            swc::TsLit::Bool(boolean) => self.lit(&swc::Lit::Bool(boolean.clone()))?,
            swc::TsLit::BigInt(bigint) => self.lit(&swc::Lit::BigInt(bigint.clone()))?,
            swc::TsLit::Tpl(tpl) => {
                let type_ends: Vec<u32> = tpl.types.iter().map(|t| self.span(t.span()).end).collect();
                let quasis = self.template_elements(&tpl.quasis, range.start, &type_ends);
                let node = Node::new("TSTemplateLiteralType", range)
                    .with("quasis", Field::list(quasis))
                    .with("types", self.list(&tpl.types, |c, t| c.ts_type(t))?);
                return Ok(self.finish(node));
            }
        };
        let node = Node::new("TSLiteralType", range).with("literal", Field::Node(value));
        Ok(self.finish(node))
    }

    fn import_type(&mut self, import: &swc::TsImportType) -> PResult<NodeId> {
        let source = self.str_lit(&import.arg);
        let argument = Node::new("TSLiteralType", self.range_of(source)).with("literal", Field::Node(source));
        let argument = self.finish(argument);
        let qualifier = import.qualifier.as_ref().map(|name| self.entity_name(name));
        let node = Node::new("TSImportType", self.span(import.span))
            .with("argument", Field::Node(argument))
            .with("qualifier", Field::opt(qualifier))
            .with_optional("typeArguments", self.type_args(import.type_args.as_deref())?);
        Ok(self.finish(node))
    }

    fn tuple_element(&mut self, element: &swc::TsTupleElement) -> PResult<NodeId> {
        let element_type = self.ts_type(&element.ty)?;
        let Some(label) = &element.label else {
            return Ok(element_type);
        };
        let label = self.pat(label)?;
        let node = Node::new("TSNamedTupleMember", self.span(element.span))
            .with("label", Field::Node(label))
            .with("elementType", Field::Node(element_type))
            .with("optional", Field::Bool(false));
        Ok(self.finish(node))
    }

    /// `A` or `A.B.C`.
    pub(crate) fn entity_name(&mut self, name: &swc::TsEntityName) -> NodeId {
        match name {
            swc::TsEntityName::Ident(ident) => self.ident(ident),
            swc::TsEntityName::TsQualifiedName(qualified) => {
                let left = self.entity_name(&qualified.left);
                let right = self.ident_name(&qualified.right);
                let range = self.range_of(left).merge(self.range_of(right));
                let node = Node::new("TSQualifiedName", range)
                    .with("left", Field::Node(left))
                    .with("right", Field::Node(right));
                self.finish(node)
            }
        }
    }

    /// `implements`/`extends` clause entry.
    pub(crate) fn heritage(&mut self, node_type: &str, heritage: &swc::TsExprWithTypeArgs) -> PResult<NodeId> {
        let expression = self.heritage_name(&heritage.expr)?;
        let node = Node::new(node_type, self.span(heritage.span))
            .with("expression", Field::Node(expression))
            .with_optional("typeArguments", self.type_args(heritage.type_args.as_deref())?);
        Ok(self.finish(node))
    }

    fn heritage_name(&mut self, expr: &swc::Expr) -> PResult<NodeId> {
        match expr {
            swc::Expr::Ident(ident) => Ok(self.ident(ident)),
            swc::Expr::Member(swc::MemberExpr {
                obj,
                prop: swc::MemberProp::Ident(right),
                ..
            }) => {
                let left = self.heritage_name(obj)?;
                let right = self.ident_name(right);
                let range = self.range_of(left).merge(self.range_of(right));
                let node = Node::new("TSQualifiedName", range)
                    .with("left", Field::Node(left))
                    .with("right", Field::Node(right));
                Ok(self.finish(node))
            }
            other => self.expr(other),
        }
    }

    // Type members

    fn type_element(&mut self, element: &swc::TsTypeElement) -> PResult<NodeId> {
        let range = self.span(element.span());
        let node = match element {
            swc::TsTypeElement::TsCallSignatureDecl(signature) => Node::new("TSCallSignatureDeclaration", range)
                .with("params", self.list(&signature.params, Self::ts_fn_param)?)
                .with_optional("returnType", self.type_ann(signature.type_ann.as_deref())?)
                .with_optional("typeParameters", self.type_params(signature.type_params.as_deref())?),
            swc::TsTypeElement::TsConstructSignatureDecl(signature) => {
                Node::new("TSConstructSignatureDeclaration", range)
                    .with("params", self.list(&signature.params, Self::ts_fn_param)?)
                    .with_optional("returnType", self.type_ann(signature.type_ann.as_deref())?)
                    .with_optional("typeParameters", self.type_params(signature.type_params.as_deref())?)
            }
            swc::TsTypeElement::TsPropertySignature(signature) => Node::new("TSPropertySignature", range)
                .with("key", Field::Node(self.expr(&signature.key)?))
                .with("computed", Field::Bool(signature.computed))
                .with("optional", Field::Bool(signature.optional))
                .with("readonly", Field::Bool(signature.readonly))
                .with_optional("typeAnnotation", self.type_ann(signature.type_ann.as_deref())?),
            swc::TsTypeElement::TsGetterSignature(signature) => Node::new("TSMethodSignature", range)
                .with("key", Field::Node(self.expr(&signature.key)?))
                .with("computed", Field::Bool(signature.computed))
                .with("kind", Field::str("get"))
                .with("params", Field::List(Vec::new()))
                .with_optional("returnType", self.type_ann(signature.type_ann.as_deref())?),
            swc::TsTypeElement::TsSetterSignature(signature) => Node::new("TSMethodSignature", range)
                .with("key", Field::Node(self.expr(&signature.key)?))
                .with("computed", Field::Bool(signature.computed))
                .with("kind", Field::str("set"))
                .with("params", Field::list([self.ts_fn_param(&signature.param)?])),
            swc::TsTypeElement::TsMethodSignature(signature) => Node::new("TSMethodSignature", range)
                .with("key", Field::Node(self.expr(&signature.key)?))
                .with("computed", Field::Bool(signature.computed))
                .with("optional", Field::Bool(signature.optional))
                .with("kind", Field::str("method"))
                .with("params", self.list(&signature.params, Self::ts_fn_param)?)
                .with_optional("returnType", self.type_ann(signature.type_ann.as_deref())?)
                .with_optional("typeParameters", self.type_params(signature.type_params.as_deref())?),
            swc::TsTypeElement::TsIndexSignature(signature) => return self.ts_index_signature(signature),
        };
        Ok(self.finish(node))
    }

    pub(crate) fn ts_index_signature(&mut self, signature: &swc::TsIndexSignature) -> PResult<NodeId> {
        let mut node = Node::new("TSIndexSignature", self.span(signature.span))
            .with("parameters", self.list(&signature.params, Self::ts_fn_param)?)
            .with_optional("typeAnnotation", self.type_ann(signature.type_ann.as_deref())?)
            .with("readonly", Field::Bool(signature.readonly));
        if signature.is_static {
            node.set("static", Field::Bool(true));
        }
        Ok(self.finish(node))
    }

    // Declarations

    pub(crate) fn ts_interface(&mut self, decl: &swc::TsInterfaceDecl) -> PResult<NodeId> {
        let id = self.ident(&decl.id);
        let extends = self.list(&decl.extends, |c, heritage| c.heritage("TSInterfaceHeritage", heritage))?;
        let members = self.list(&decl.body.body, Self::type_element)?;
        let body = Node::new("TSInterfaceBody", self.span(decl.body.span)).with("body", members);
        let body = self.finish(body);
        let mut node = Node::new("TSInterfaceDeclaration", self.span(decl.span))
            .with("id", Field::Node(id))
            .with("extends", extends)
            .with("body", Field::Node(body))
            .with_optional("typeParameters", self.type_params(decl.type_params.as_deref())?);
        if decl.declare {
            node.set("declare", Field::Bool(true));
        }
        Ok(self.finish(node))
    }

    pub(crate) fn ts_type_alias(&mut self, decl: &swc::TsTypeAliasDecl) -> PResult<NodeId> {
        let id = self.ident(&decl.id);
        let type_parameters = self.type_params(decl.type_params.as_deref())?;
        let mut node = Node::new("TSTypeAliasDeclaration", self.span(decl.span))
            .with("id", Field::Node(id))
            .with("typeAnnotation", Field::Node(self.ts_type(&decl.type_ann)?))
            .with_optional("typeParameters", type_parameters);
        if decl.declare {
            node.set("declare", Field::Bool(true));
        }
        Ok(self.finish(node))
    }

    pub(crate) fn ts_enum(&mut self, decl: &swc::TsEnumDecl) -> PResult<NodeId> {
        let id = self.ident(&decl.id);
        let members = self.list(&decl.members, |c, member| {
            let id = match &member.id {
                swc::TsEnumMemberId::Ident(ident) => c.ident(ident),
                swc::TsEnumMemberId::Str(string) => c.str_lit(string),
            };
            let node = Node::new("TSEnumMember", c.span(member.span))
                .with("id", Field::Node(id))
                .with("initializer", c.opt_field(member.init.as_deref(), Self::expr)?);
            Ok(c.finish(node))
        })?;
        let mut node = Node::new("TSEnumDeclaration", self.span(decl.span))
            .with("id", Field::Node(id))
            .with("members", members)
            .with("const", Field::Bool(decl.is_const));
        if decl.declare {
            node.set("declare", Field::Bool(true));
        }
        Ok(self.finish(node))
    }

    /// `namespace A.B {}` becomes one declaration with a qualified id.
    pub(crate) fn ts_module(&mut self, decl: &swc::TsModuleDecl) -> PResult<NodeId> {
        let mut id = match &decl.id {
            swc::TsModuleName::Ident(ident) => self.ident(ident),
            swc::TsModuleName::Str(string) => self.str_lit(string),
        };
        let mut body = decl.body.as_ref();
        while let Some(swc::TsNamespaceBody::TsNamespaceDecl(nested)) = body {
            let right = self.ident(&nested.id);
            let range = self.range_of(id).merge(self.range_of(right));
            let qualified = Node::new("TSQualifiedName", range)
                .with("left", Field::Node(id))
                .with("right", Field::Node(right));
            id = self.finish(qualified);
            body = Some(&*nested.body);
        }
        let block = match body {
            Some(swc::TsNamespaceBody::TsModuleBlock(block)) => {
                let items = self.list(&block.body, Self::module_item)?;
                let node = Node::new("TSModuleBlock", self.span(block.span)).with("body", items);
                Some(self.finish(node))
            }
            _ => None,
        };
        let kind = if decl.global {
            "global"
        } else if decl.namespace {
            "namespace"
        } else {
            "module"
        };
        let mut node = Node::new("TSModuleDeclaration", self.span(decl.span))
            .with("id", Field::Node(id))
            .with("body", Field::opt(block))
            .with("kind", Field::str(kind));
        if decl.declare {
            node.set("declare", Field::Bool(true));
        }
        Ok(self.finish(node))
    }
}
