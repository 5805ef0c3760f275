//! Parent back-references.
//!
//! Kept beside the arena rather than inside nodes: the tree owns its nodes,
//! the index only points at them.

use rustc_hash::FxHashMap;

use crate::{Ast, NodeId};

/// Where a node hangs in its parent.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ParentLink {
    pub parent: NodeId,
    pub field: &'static str,
}

/// Map from node to its parent and the parent field holding it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParentIndex {
    links: FxHashMap<NodeId, ParentLink>,
}

impl ParentIndex {
    /// Index every parent/child edge reachable from `root`.
    pub fn build(ast: &Ast, root: NodeId) -> Self {
        let mut index = ParentIndex::default();
        index.index_subtree(ast, root);
        index
    }

    /// Add the edges below `root`. `root`'s own link is left alone.
    pub fn index_subtree(&mut self, ast: &Ast, root: NodeId) {
        for id in ast.descendants(root) {
            for (field, value) in ast.get(id).fields() {
                match value {
                    crate::Field::Node(child) => {
                        self.links.insert(*child, ParentLink { parent: id, field });
                    }
                    crate::Field::List(list) => {
                        for child in list.iter().flatten() {
                            self.links.insert(*child, ParentLink { parent: id, field });
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    pub fn insert(&mut self, child: NodeId, link: ParentLink) {
        self.links.insert(child, link);
    }

    pub fn remove(&mut self, child: NodeId) -> Option<ParentLink> {
        self.links.remove(&child)
    }

    pub fn get(&self, child: NodeId) -> Option<ParentLink> {
        self.links.get(&child).copied()
    }

    pub fn parent(&self, child: NodeId) -> Option<NodeId> {
        self.get(child).map(|link| link.parent)
    }

    /// Ancestors of `node`, nearest first.
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(node), move |id| self.parent(*id))
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Field, Node, Span};

    #[test]
    fn builds_links_and_ancestors() {
        let mut ast = Ast::new();
        let leaf = ast.alloc(Node::new("Identifier", Span::new(6, 7)));
        let decl = ast.alloc(Node::new("VariableDeclarator", Span::new(6, 11)).with("id", Field::Node(leaf)));
        let root = ast.alloc(Node::new("Program", Span::new(0, 12)).with("body", Field::List(vec![Some(decl)])));
        let index = ParentIndex::build(&ast, root);

        assert_eq!(index.get(leaf), Some(ParentLink { parent: decl, field: "id" }));
        assert_eq!(index.ancestors(leaf).collect::<Vec<_>>(), vec![decl, root]);
        assert_eq!(index.parent(root), None);
    }
}
