//! AST splicing.
//!
//! The script grammar parsed the placeholder text, so its tree holds one
//! placeholder node per region, spanning the region exactly: a
//! `TemplateLiteral` for expression regions, a `StaticBlock` for class-member
//! regions and a `void` `UnaryExpression` for statement regions. Splicing swaps every placeholder for the region's template tree,
//! moved into document coordinates, then merges tokens, visitor keys and
//! scopes so the result reads as one tree.

#[cfg(test)]
mod tests;

use gts_diagnostic::ParseError;
use gts_ir::{Ast, Comment, LineIndex, NodeId, ParentIndex, ScopeManager, Token, VisitorKeys};
use gts_script::ScriptOutput;
use tracing::{debug, trace};

use crate::{bind_template, RegionKind, TemplateAdapter, TemplateRegion, TransformedSource};

/// The merged tree handed to lint consumers.
#[derive(Clone, Debug)]
pub struct UnifiedAst {
    pub ast: Ast,
    /// The `Program` node; covers the whole document.
    pub root: NodeId,
    /// Script and template tokens, sorted by start offset.
    pub tokens: Vec<Token>,
    pub comments: Vec<Comment>,
    pub visitor_keys: VisitorKeys,
    pub scope_manager: ScopeManager,
    pub parents: ParentIndex,
}

impl UnifiedAst {
    /// Wrap a script result that had no template regions.
    pub fn from_script(script: ScriptOutput) -> Self {
        let parents = ParentIndex::build(&script.ast, script.root);
        UnifiedAst {
            ast: script.ast,
            root: script.root,
            tokens: script.tokens,
            comments: script.comments,
            visitor_keys: script.visitor_keys,
            scope_manager: script.scope_manager,
            parents,
        }
    }
}

fn placeholder_type(kind: RegionKind) -> &'static str {
    match kind {
        RegionKind::Expression => "TemplateLiteral",
        RegionKind::ClassMember => "StaticBlock",
        RegionKind::Statement => "UnaryExpression",
    }
}

/// Splice every region of `source` into `script`.
///
/// `original` is the untransformed document; template text, `loc` values and
/// error positions all refer to it.
pub fn splice(
    script: ScriptOutput,
    source: &TransformedSource,
    original: &str,
    adapter: &TemplateAdapter<'_>,
) -> Result<UnifiedAst, ParseError> {
    let lines = LineIndex::new(original);
    let ScriptOutput {
        mut ast,
        root,
        tokens,
        comments,
        visitor_keys,
        mut scope_manager,
    } = script;
    let mut parents = ParentIndex::build(&ast, root);
    let placeholders = collect_placeholders(&ast, root);

    let mut template_roots = Vec::with_capacity(source.regions.len());
    let mut template_tokens = Vec::new();
    for region in &source.regions {
        let placeholder = find_placeholder(&ast, &placeholders, region)?;
        let parsed = adapter.parse_region(region, &lines)?;
        let new_root = ast.import(&parsed.ast, parsed.root, region.start(), Some(&lines));
        substitute(&mut ast, &mut parents, placeholder, new_root, region)?;
        scope_manager.detach_block(placeholder);

        template_tokens.extend(parsed.tokens.into_iter().map(|mut token| {
            token.range = token.range.shift(region.start());
            token.loc = lines.loc(token.range);
            token
        }));
        template_roots.push(new_root);
        trace!(ordinal = region.ordinal, span = %region.span, "spliced template region");
    }

    let mut keys = visitor_keys;
    keys.merge(adapter.visitor_keys());

    for template in &template_roots {
        let references = bind_template(&ast, *template, &keys, &mut scope_manager, adapter.script());
        scope_manager.resolve_all(&references);
    }

    let tokens = merge_tokens(tokens, template_tokens, &source.regions);
    debug!(
        regions = source.regions.len(),
        tokens = tokens.len(),
        "spliced template regions"
    );
    Ok(UnifiedAst {
        ast,
        root,
        tokens,
        comments,
        visitor_keys: keys,
        scope_manager,
        parents,
    })
}

fn collect_placeholders(ast: &Ast, root: NodeId) -> Vec<NodeId> {
    ast.descendants(root)
        .into_iter()
        .filter(|id| matches!(ast.get(*id).node_type.as_str(), "TemplateLiteral" | "StaticBlock" | "UnaryExpression"))
        .collect()
}

fn find_placeholder(ast: &Ast, candidates: &[NodeId], region: &TemplateRegion) -> Result<NodeId, ParseError> {
    let wanted = placeholder_type(region.kind);
    candidates
        .iter()
        .copied()
        .find(|id| {
            let node = ast.get(*id);
            node.range == region.span && node.node_type == wanted
        })
        .ok_or_else(|| {
            ParseError::internal(format!(
                "no {wanted} placeholder for template region {} at {}",
                region.ordinal, region.span
            ))
        })
}

/// Hang `new_root` where `placeholder` was and keep the parent index whole.
fn substitute(
    ast: &mut Ast,
    parents: &mut ParentIndex,
    placeholder: NodeId,
    new_root: NodeId,
    region: &TemplateRegion,
) -> Result<(), ParseError> {
    let Some(link) = parents.get(placeholder) else {
        return Err(ParseError::internal(format!(
            "placeholder for template region {} has no parent",
            region.ordinal
        )));
    };
    if ast.get_mut(link.parent).replace_child(placeholder, new_root).is_none() {
        return Err(ParseError::internal(format!(
            "placeholder for template region {} is not held by `{}`",
            region.ordinal, link.field
        )));
    }
    for orphan in ast.descendants(placeholder) {
        parents.remove(orphan);
    }
    parents.insert(new_root, link);
    parents.index_subtree(ast, new_root);
    Ok(())
}

/// Drop script tokens covered by a region, add the template tokens and
/// stable-sort by start.
fn merge_tokens(script: Vec<Token>, template: Vec<Token>, regions: &[TemplateRegion]) -> Vec<Token> {
    let mut out: Vec<Token> = script
        .into_iter()
        .filter(|token| !regions.iter().any(|r| r.span.contains_span(token.range)))
        .collect();
    out.extend(template);
    out.sort_by_key(|token| token.range.start);
    out
}
