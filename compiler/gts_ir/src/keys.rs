//! Visitor-key tables and key-driven traversal.
//!
//! A [`VisitorKeys`] table maps a node type name to the ordered list of its
//! traversable child fields. Generic tools walk the tree by consulting the
//! table rather than knowing node shapes, so the table must list every node
//! type that can occur in a tree. A type missing from the table is a leaf as
//! far as [`traverse`] is concerned.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::{Ast, NodeId};

type Keys = SmallVec<[&'static str; 6]>;

/// Node type -> ordered child field names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisitorKeys {
    table: FxHashMap<String, Keys>,
}

impl VisitorKeys {
    pub fn new() -> Self {
        VisitorKeys::default()
    }

    /// Build a table from static `(type, keys)` pairs.
    pub fn from_static(entries: &[(&str, &[&'static str])]) -> Self {
        let mut keys = VisitorKeys::new();
        for (node_type, fields) in entries {
            keys.insert(*node_type, fields);
        }
        keys
    }

    pub fn insert(&mut self, node_type: impl Into<String>, fields: &[&'static str]) {
        self.table
            .insert(node_type.into(), fields.iter().copied().collect());
    }

    pub fn get(&self, node_type: &str) -> Option<&[&'static str]> {
        self.table.get(node_type).map(SmallVec::as_slice)
    }

    pub fn contains(&self, node_type: &str) -> bool {
        self.table.contains_key(node_type)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Node type names, unordered.
    pub fn node_types(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }

    /// Add every entry of `other`; entries of `other` win on collision.
    pub fn merge(&mut self, other: &VisitorKeys) {
        for (node_type, fields) in &other.table {
            self.table.insert(node_type.clone(), fields.clone());
        }
    }

    /// Copy of this table with every node type prefixed.
    #[must_use]
    pub fn prefixed(&self, prefix: &str) -> VisitorKeys {
        VisitorKeys {
            table: self
                .table
                .iter()
                .map(|(node_type, fields)| (format!("{prefix}{node_type}"), fields.clone()))
                .collect(),
        }
    }
}

/// Walk the tree below `root` in visitor-key order.
///
/// `visit` receives each node and its parent (`None` for `root`), pre-order.
pub fn traverse(
    ast: &Ast,
    keys: &VisitorKeys,
    root: NodeId,
    mut visit: impl FnMut(NodeId, Option<NodeId>),
) {
    let mut stack: Vec<(NodeId, Option<NodeId>)> = vec![(root, None)];
    while let Some((id, parent)) = stack.pop() {
        visit(id, parent);
        let node = ast.get(id);
        let Some(fields) = keys.get(&node.node_type) else {
            continue;
        };
        let mut children = Vec::new();
        for field in fields {
            match node.get(field) {
                Some(crate::Field::Node(child)) => children.push(*child),
                Some(crate::Field::List(list)) => children.extend(list.iter().flatten().copied()),
                _ => {}
            }
        }
        stack.extend(children.into_iter().rev().map(|child| (child, Some(id))));
    }
}
