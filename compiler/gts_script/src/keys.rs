//! Visitor keys for every node type the script parser emits.

use std::sync::OnceLock;

use gts_ir::VisitorKeys;

const ESTREE: &[(&str, &[&str])] = &[
    ("ArrayExpression", &["elements"]),
    ("ArrayPattern", &["decorators", "elements", "typeAnnotation"]),
    ("ArrowFunctionExpression", &["typeParameters", "params", "returnType", "body"]),
    ("AssignmentExpression", &["left", "right"]),
    ("AssignmentPattern", &["decorators", "left", "right", "typeAnnotation"]),
    ("AwaitExpression", &["argument"]),
    ("BinaryExpression", &["left", "right"]),
    ("BlockStatement", &["body"]),
    ("BreakStatement", &["label"]),
    ("CallExpression", &["callee", "typeArguments", "arguments"]),
    ("CatchClause", &["param", "body"]),
    ("ChainExpression", &["expression"]),
    ("ClassBody", &["body"]),
    ("ClassDeclaration", &["decorators", "id", "typeParameters", "superClass", "superTypeArguments", "implements", "body"]),
    ("ClassExpression", &["decorators", "id", "typeParameters", "superClass", "superTypeArguments", "implements", "body"]),
    ("ConditionalExpression", &["test", "consequent", "alternate"]),
    ("ContinueStatement", &["label"]),
    ("DebuggerStatement", &[]),
    ("Decorator", &["expression"]),
    ("DoWhileStatement", &["body", "test"]),
    ("EmptyStatement", &[]),
    ("ExportAllDeclaration", &["exported", "source", "attributes"]),
    ("ExportDefaultDeclaration", &["declaration"]),
    ("ExportNamedDeclaration", &["declaration", "specifiers", "source", "attributes"]),
    ("ExportSpecifier", &["exported", "local"]),
    ("ExpressionStatement", &["expression"]),
    ("ForInStatement", &["left", "right", "body"]),
    ("ForOfStatement", &["left", "right", "body"]),
    ("ForStatement", &["init", "test", "update", "body"]),
    ("FunctionDeclaration", &["id", "typeParameters", "params", "returnType", "body"]),
    ("FunctionExpression", &["id", "typeParameters", "params", "returnType", "body"]),
    ("Identifier", &["decorators", "typeAnnotation"]),
    ("IfStatement", &["test", "consequent", "alternate"]),
    ("ImportAttribute", &["key", "value"]),
    ("ImportDeclaration", &["specifiers", "source", "attributes"]),
    ("ImportDefaultSpecifier", &["local"]),
    ("ImportExpression", &["source", "options"]),
    ("ImportNamespaceSpecifier", &["local"]),
    ("ImportSpecifier", &["imported", "local"]),
    ("LabeledStatement", &["label", "body"]),
    ("Literal", &[]),
    ("LogicalExpression", &["left", "right"]),
    ("MemberExpression", &["object", "property"]),
    ("MetaProperty", &["meta", "property"]),
    ("MethodDefinition", &["decorators", "key", "value"]),
    ("NewExpression", &["callee", "typeArguments", "arguments"]),
    ("ObjectExpression", &["properties"]),
    ("ObjectPattern", &["decorators", "properties", "typeAnnotation"]),
    ("PrivateIdentifier", &[]),
    ("Program", &["body"]),
    ("Property", &["key", "value"]),
    ("PropertyDefinition", &["decorators", "key", "typeAnnotation", "value"]),
    ("AccessorProperty", &["decorators", "key", "typeAnnotation", "value"]),
    ("RestElement", &["decorators", "argument", "typeAnnotation"]),
    ("ReturnStatement", &["argument"]),
    ("SequenceExpression", &["expressions"]),
    ("SpreadElement", &["argument"]),
    ("StaticBlock", &["body"]),
    ("Super", &[]),
    ("SwitchCase", &["test", "consequent"]),
    ("SwitchStatement", &["discriminant", "cases"]),
    ("TaggedTemplateExpression", &["tag", "typeArguments", "quasi"]),
    ("TemplateElement", &[]),
    ("TemplateLiteral", &["quasis", "expressions"]),
    ("ThisExpression", &[]),
    ("ThrowStatement", &["argument"]),
    ("TryStatement", &["block", "handler", "finalizer"]),
    ("UnaryExpression", &["argument"]),
    ("UpdateExpression", &["argument"]),
    ("VariableDeclaration", &["declarations"]),
    ("VariableDeclarator", &["id", "init"]),
    ("WhileStatement", &["test", "body"]),
    ("WithStatement", &["object", "body"]),
    ("YieldExpression", &["argument"]),
];

#[cfg(feature = "typescript")]
const TYPESCRIPT: &[(&str, &[&str])] = &[
    ("TSAbstractAccessorProperty", &["decorators", "key", "typeAnnotation", "value"]),
    ("TSAbstractMethodDefinition", &["decorators", "key", "value"]),
    ("TSAbstractPropertyDefinition", &["decorators", "key", "typeAnnotation", "value"]),
    ("TSAnyKeyword", &[]),
    ("TSArrayType", &["elementType"]),
    ("TSAsExpression", &["expression", "typeAnnotation"]),
    ("TSBigIntKeyword", &[]),
    ("TSBooleanKeyword", &[]),
    ("TSCallSignatureDeclaration", &["typeParameters", "params", "returnType"]),
    ("TSClassImplements", &["expression", "typeArguments"]),
    ("TSConditionalType", &["checkType", "extendsType", "trueType", "falseType"]),
    ("TSConstructSignatureDeclaration", &["typeParameters", "params", "returnType"]),
    ("TSConstructorType", &["typeParameters", "params", "returnType"]),
    ("TSDeclareFunction", &["id", "typeParameters", "params", "returnType", "body"]),
    ("TSEnumDeclaration", &["id", "members"]),
    ("TSEnumMember", &["id", "initializer"]),
    ("TSExportAssignment", &["expression"]),
    ("TSExternalModuleReference", &["expression"]),
    ("TSFunctionType", &["typeParameters", "params", "returnType"]),
    ("TSImportType", &["argument", "qualifier", "typeArguments"]),
    ("TSImportEqualsDeclaration", &["id", "moduleReference"]),
    ("TSIndexSignature", &["parameters", "typeAnnotation"]),
    ("TSIndexedAccessType", &["objectType", "indexType"]),
    ("TSInferType", &["typeParameter"]),
    ("TSInstantiationExpression", &["expression", "typeArguments"]),
    ("TSInterfaceBody", &["body"]),
    ("TSInterfaceDeclaration", &["id", "typeParameters", "extends", "body"]),
    ("TSInterfaceHeritage", &["expression", "typeArguments"]),
    ("TSIntersectionType", &["types"]),
    ("TSIntrinsicKeyword", &[]),
    ("TSLiteralType", &["literal"]),
    ("TSMappedType", &["key", "constraint", "nameType", "typeAnnotation"]),
    ("TSMethodSignature", &["typeParameters", "key", "params", "returnType"]),
    ("TSModuleBlock", &["body"]),
    ("TSModuleDeclaration", &["id", "body"]),
    ("TSNamedTupleMember", &["label", "elementType"]),
    ("TSNamespaceExportDeclaration", &["id"]),
    ("TSNeverKeyword", &[]),
    ("TSNonNullExpression", &["expression"]),
    ("TSNullKeyword", &[]),
    ("TSNumberKeyword", &[]),
    ("TSObjectKeyword", &[]),
    ("TSOptionalType", &["typeAnnotation"]),
    ("TSParameterProperty", &["decorators", "parameter"]),
    ("TSPropertySignature", &["typeAnnotation", "key"]),
    ("TSQualifiedName", &["left", "right"]),
    ("TSRestType", &["typeAnnotation"]),
    ("TSSatisfiesExpression", &["expression", "typeAnnotation"]),
    ("TSStringKeyword", &[]),
    ("TSSymbolKeyword", &[]),
    ("TSTemplateLiteralType", &["quasis", "types"]),
    ("TSThisType", &[]),
    ("TSTupleType", &["elementTypes"]),
    ("TSTypeAliasDeclaration", &["id", "typeParameters", "typeAnnotation"]),
    ("TSTypeAnnotation", &["typeAnnotation"]),
    ("TSTypeAssertion", &["typeAnnotation", "expression"]),
    ("TSTypeLiteral", &["members"]),
    ("TSTypeOperator", &["typeAnnotation"]),
    ("TSTypeParameter", &["name", "constraint", "default"]),
    ("TSTypeParameterDeclaration", &["params"]),
    ("TSTypeParameterInstantiation", &["params"]),
    ("TSTypePredicate", &["typeAnnotation", "parameterName"]),
    ("TSTypeQuery", &["exprName", "typeArguments"]),
    ("TSTypeReference", &["typeName", "typeArguments"]),
    ("TSUndefinedKeyword", &[]),
    ("TSUnionType", &["types"]),
    ("TSUnknownKeyword", &[]),
    ("TSVoidKeyword", &[]),
];

/// The script grammar's visitor keys, built once.
pub fn script_visitor_keys() -> &'static VisitorKeys {
    static KEYS: OnceLock<VisitorKeys> = OnceLock::new();
    KEYS.get_or_init(|| {
        #[allow(unused_mut)]
        let mut keys = VisitorKeys::from_static(ESTREE);
        #[cfg(feature = "typescript")]
        keys.merge(&VisitorKeys::from_static(TYPESCRIPT));
        keys
    })
}
