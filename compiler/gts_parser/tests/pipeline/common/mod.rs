//! Shared helpers for pipeline tests.

use gts_ir::NodeId;
use gts_parser::{parse_for_lint, ParseError, ParseForLintResult, ParserOptions};

/// A class component exercising most template constructs.
pub const COUNTER: &str = "import { on } from '@ember/modifier';
import Card from './card';

export default class Counter {
  count = 0;

  inc(e) {
    this.count += 1;
  }

  <template>
    <Card @title=\"Count\" class=\"counter {{if this.open 'open'}}\" {{on \"click\" this.inc}}>
      {{this.count}}
      {{#each @items as |item|}}<li>{{item.name}}</li>{{/each}}
      <button onclick={ (e) => this.inc(e) }>+</button>
    </Card>
  </template>
}
";

pub fn parse_ok(src: &str, path: &str) -> ParseForLintResult {
    parse_for_lint(src, &ParserOptions::new().with_file_path(path)).unwrap()
}

pub fn parse_err(src: &str, path: &str) -> ParseError {
    parse_for_lint(src, &ParserOptions::new().with_file_path(path)).unwrap_err()
}

/// Every node reachable from the root, pre-order.
pub fn reachable(result: &ParseForLintResult) -> Vec<NodeId> {
    result.ast.descendants(result.root)
}

pub fn nodes_of(result: &ParseForLintResult, node_type: &str) -> Vec<NodeId> {
    reachable(result)
        .into_iter()
        .filter(|id| result.ast.get(*id).node_type == node_type)
        .collect()
}

pub fn first_of(result: &ParseForLintResult, node_type: &str) -> NodeId {
    nodes_of(result, node_type)
        .into_iter()
        .next()
        .unwrap_or_else(|| panic!("no {node_type} node"))
}

pub fn slice<'a>(src: &'a str, result: &ParseForLintResult, id: NodeId) -> &'a str {
    result.ast.get(id).range.slice(src).unwrap()
}

/// Names left unresolved in the global scope, sorted.
pub fn unresolved(result: &ParseForLintResult) -> Vec<String> {
    let mut names: Vec<_> = result.scope_manager.unresolved().map(|r| r.name.clone()).collect();
    names.sort();
    names
}
