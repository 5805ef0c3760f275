//! Node arena shared by script and template trees.
//!
//! A [`Node`] is a tagged record: `node_type` is the discriminant (`"Identifier"`,
//! `"GlimmerElementNode"`, ...) and `fields` are its named properties in
//! declaration order. Children are [`NodeId`] indices into the owning [`Ast`].
//! Which fields are traversable is not a property of the node but of the
//! external [`VisitorKeys`](crate::VisitorKeys) table.

use rustc_hash::FxHashMap;

use crate::{LineIndex, SourceLoc, Span};

/// Index of a node in an [`Ast`] arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        NodeId(raw)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node property value.
#[derive(Clone, Debug, PartialEq)]
pub enum Field {
    Node(NodeId),
    /// Ordered children; `None` marks a hole (e.g. `[a, , b]`).
    List(Vec<Option<NodeId>>),
    Str(String),
    Strs(Vec<String>),
    Num(f64),
    Bool(bool),
    Null,
}

impl Field {
    /// `Node(id)` or `Null`.
    pub fn opt(id: Option<NodeId>) -> Field {
        id.map_or(Field::Null, Field::Node)
    }

    /// A hole-free list.
    pub fn list(ids: impl IntoIterator<Item = NodeId>) -> Field {
        Field::List(ids.into_iter().map(Some).collect())
    }

    pub fn str(text: impl Into<String>) -> Field {
        Field::Str(text.into())
    }
}

/// A single node.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub node_type: String,
    pub range: Span,
    pub loc: SourceLoc,
    fields: Vec<(&'static str, Field)>,
}

impl Node {
    pub fn new(node_type: impl Into<String>, range: Span) -> Self {
        Node {
            node_type: node_type.into(),
            range,
            loc: SourceLoc::default(),
            fields: Vec::new(),
        }
    }

    /// Builder-style field setter.
    #[must_use]
    pub fn with(mut self, name: &'static str, field: Field) -> Self {
        self.set(name, field);
        self
    }

    /// Builder-style setter that skips `None`.
    #[must_use]
    pub fn with_optional(mut self, name: &'static str, field: Option<Field>) -> Self {
        if let Some(field) = field {
            self.set(name, field);
        }
        self
    }

    /// Set a field, replacing any previous value with the same name.
    pub fn set(&mut self, name: &'static str, field: Field) {
        if let Some(slot) = self.fields.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = field;
        } else {
            self.fields.push((name, field));
        }
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|(n, _)| *n == name).map(|(_, f)| f)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields
            .iter_mut()
            .find(|(n, _)| *n == name)
            .map(|(_, f)| f)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &Field)> {
        self.fields.iter().map(|(n, f)| (*n, f))
    }

    /// Single child stored under `name`.
    pub fn child(&self, name: &str) -> Option<NodeId> {
        match self.get(name) {
            Some(Field::Node(id)) => Some(*id),
            _ => None,
        }
    }

    /// List children stored under `name` (holes skipped).
    pub fn children(&self, name: &str) -> impl Iterator<Item = NodeId> + '_ {
        let list = match self.get(name) {
            Some(Field::List(list)) => list.as_slice(),
            _ => &[],
        };
        list.iter().flatten().copied()
    }

    pub fn str_field(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(Field::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn strs_field(&self, name: &str) -> &[String] {
        match self.get(name) {
            Some(Field::Strs(s)) => s,
            _ => &[],
        }
    }

    pub fn bool_field(&self, name: &str) -> bool {
        matches!(self.get(name), Some(Field::Bool(true)))
    }

    /// Every child id held by any field, in field order.
    pub fn all_children(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        for (_, field) in &self.fields {
            match field {
                Field::Node(id) => out.push(*id),
                Field::List(list) => out.extend(list.iter().flatten().copied()),
                _ => {}
            }
        }
        out
    }

    /// Replace every reference to `old` with `new`.
    ///
    /// Returns the name of the field that held `old`.
    pub fn replace_child(&mut self, old: NodeId, new: NodeId) -> Option<&'static str> {
        for (name, field) in &mut self.fields {
            match field {
                Field::Node(id) if *id == old => {
                    *id = new;
                    return Some(*name);
                }
                Field::List(list) => {
                    if let Some(slot) = list.iter_mut().flatten().find(|id| **id == old) {
                        *slot = new;
                        return Some(*name);
                    }
                }
                _ => {}
            }
        }
        None
    }

    fn remap_children(&mut self, map: &FxHashMap<NodeId, NodeId>) {
        for (_, field) in &mut self.fields {
            match field {
                Field::Node(id) => {
                    if let Some(new) = map.get(id) {
                        *id = *new;
                    }
                }
                Field::List(list) => {
                    for id in list.iter_mut().flatten() {
                        if let Some(new) = map.get(id) {
                            *id = *new;
                        }
                    }
                }
                _ => {}
            }
        }
    }
}

/// Arena of nodes with an optional root.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ast {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl Ast {
    pub fn new() -> Self {
        Ast::default()
    }

    pub fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// # Panics
    /// Panics if `id` does not belong to this arena.
    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes reachable from `root` through any field, pre-order.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            let children = self.get(id).all_children();
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// Copy the subtree rooted at `root` in `other` into this arena.
    ///
    /// Every copied range is moved forward by `delta`. When `lines` is given,
    /// each copied node's `loc` is recomputed from it; otherwise `loc` is kept.
    /// Returns the id of the copied root.
    pub fn import(
        &mut self,
        other: &Ast,
        root: NodeId,
        delta: u32,
        lines: Option<&LineIndex>,
    ) -> NodeId {
        let ids = other.descendants(root);
        let mut map = FxHashMap::default();
        map.reserve(ids.len());
        for (i, old) in ids.iter().enumerate() {
            map.insert(*old, NodeId((self.nodes.len() + i) as u32));
        }
        for old in &ids {
            let mut node = other.get(*old).clone();
            node.range = node.range.shift(delta);
            if let Some(lines) = lines {
                node.loc = lines.loc(node.range);
            }
            node.remap_children(&map);
            self.nodes.push(node);
        }
        map[&root]
    }

    /// Recompute `loc` for the subtree rooted at `root`.
    pub fn relocate(&mut self, root: NodeId, lines: &LineIndex) {
        for id in self.descendants(root) {
            let node = self.get_mut(id);
            node.loc = lines.loc(node.range);
        }
    }
}
