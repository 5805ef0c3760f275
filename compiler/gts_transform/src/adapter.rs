//! Template sub-parser adapter.
//!
//! Runs the template grammar over one region, namespaces its node types and
//! parses every `{ ... }` script island with the script grammar. Output stays
//! in region-local coordinates; the splicer moves it into the document.


use std::sync::OnceLock;

use gts_diagnostic::ParseError;
use gts_ir::{Ast, LineIndex, NodeId, Token, VisitorKeys};
use gts_script::{ScriptOptions, ScriptParser};
use gts_template::TemplateParser;
use tracing::trace;

use crate::TemplateRegion;

/// Prefix applied to every template node type.
pub const TEMPLATE_NODE_PREFIX: &str = "Glimmer";

/// Template node type standing for an unparsed script island.
const ISLAND: &str = "ScriptIsland";

/// One region's tree, region-local.
#[derive(Clone, Debug)]
pub struct ParsedRegion {
    pub ast: Ast,
    pub root: NodeId,
    /// Template and island tokens, sorted.
    pub tokens: Vec<Token>,
}

/// Wraps both sub-parsers for the duration of one parse session.
pub struct TemplateAdapter<'p> {
    template: &'p dyn TemplateParser,
    script: &'p dyn ScriptParser,
    island_options: ScriptOptions,
    keys: OnceLock<VisitorKeys>,
}

impl<'p> TemplateAdapter<'p> {
    pub fn new(template: &'p dyn TemplateParser, script: &'p dyn ScriptParser, island_options: ScriptOptions) -> Self {
        TemplateAdapter {
            template,
            script,
            island_options,
            keys: OnceLock::new(),
        }
    }

    /// The script grammar used for islands.
    pub fn script(&self) -> &'p dyn ScriptParser {
        self.script
    }

    /// Template keys with prefixed node types, built on first use.
    pub fn visitor_keys(&self) -> &VisitorKeys {
        self.keys
            .get_or_init(|| self.template.visitor_keys().prefixed(TEMPLATE_NODE_PREFIX))
    }

    /// Parse `region`. Errors are reported in document coordinates.
    pub fn parse_region(&self, region: &TemplateRegion, lines: &LineIndex) -> Result<ParsedRegion, ParseError> {
        let out = self
            .template
            .parse(&region.raw_text)
            .map_err(|e| e.translate(region.start(), lines))?;
        let mut ast = out.ast;
        let mut tokens = out.tokens;

        let mut islands = Vec::new();
        for id in ast.descendants(out.root) {
            let node = ast.get_mut(id);
            if node.node_type == ISLAND {
                islands.push(id);
            } else {
                node.node_type = format!("{TEMPLATE_NODE_PREFIX}{}", node.node_type);
            }
        }

        for island in islands {
            self.attach_island(&mut ast, out.root, island, &mut tokens, region, lines)?;
        }
        tokens.sort_by_key(|t| t.range.start);
        Ok(ParsedRegion {
            ast,
            root: out.root,
            tokens,
        })
    }

    /// Parse an island with the script grammar and put its root where the
    /// island node was.
    fn attach_island(
        &self,
        ast: &mut Ast,
        root: NodeId,
        island: NodeId,
        tokens: &mut Vec<Token>,
        region: &TemplateRegion,
        lines: &LineIndex,
    ) -> Result<(), ParseError> {
        let node = ast.get(island);
        let local = node.range.start;
        let code = node.str_field("code").unwrap_or_default().to_owned();
        let parsed = self
            .script
            .parse_expression(&code, self.island_options)
            .map_err(|e| e.translate(region.start() + local, lines))?;

        let expression = ast.import(&parsed.ast, parsed.root, local, None);
        let holder = ast
            .descendants(root)
            .into_iter()
            .find(|id| ast.get(*id).all_children().contains(&island));
        let replaced = holder.and_then(|holder| ast.get_mut(holder).replace_child(island, expression));
        if replaced.is_none() {
            return Err(ParseError::internal(format!(
                "script island at {} has no parent attribute",
                region.start() + local
            )));
        }
        tokens.extend(parsed.tokens.into_iter().map(|mut token| {
            token.range = token.range.shift(local);
            token
        }));
        trace!(offset = region.start() + local, "attached script island");
        Ok(())
    }
}
