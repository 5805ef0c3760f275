//! Scope-analysis data.
//!
//! The script grammar's analyzer fills a [`ScopeManager`]; the splicer later
//! adds template-originated scopes and references to the same manager so the
//! unified tree has one scope view.
//!
//! Resolution walks the scope chain outward. A reference that is not found in
//! a scope is recorded in that scope's `through` list before moving on, so
//! the global scope's `through` is the set of unresolved references.

use rustc_hash::FxHashMap;

use crate::{NodeId, Span};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReferenceId(u32);

/// What introduced a scope.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Global,
    Module,
    Function,
    Block,
    For,
    Catch,
    Switch,
    Class,
    ClassStaticBlock,
    /// Block params of a template element or block statement (`as |x|`).
    TemplateBlock,
}

impl ScopeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ScopeKind::Global => "global",
            ScopeKind::Module => "module",
            ScopeKind::Function => "function",
            ScopeKind::Block => "block",
            ScopeKind::For => "for",
            ScopeKind::Catch => "catch",
            ScopeKind::Switch => "switch",
            ScopeKind::Class => "class",
            ScopeKind::ClassStaticBlock => "class-static-block",
            ScopeKind::TemplateBlock => "template-block",
        }
    }

    /// Whether `var` declarations stop here.
    pub fn is_var_scope(self) -> bool {
        matches!(
            self,
            ScopeKind::Global | ScopeKind::Module | ScopeKind::Function | ScopeKind::ClassStaticBlock
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scope {
    pub kind: ScopeKind,
    /// Node that opened the scope.
    pub block: NodeId,
    pub range: Span,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    pub variables: Vec<VariableId>,
    pub references: Vec<ReferenceId>,
    pub through: Vec<ReferenceId>,
    /// Set when the block was replaced during splicing.
    pub detached: bool,
    set: FxHashMap<String, VariableId>,
}

/// How a variable was declared.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DefKind {
    Variable,
    Parameter,
    FunctionName,
    ClassName,
    ImportBinding,
    CatchClause,
    Type,
    /// `as |x|` in a template.
    TemplateBlockParam,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Definition {
    pub kind: DefKind,
    /// The identifier (or block-param) node.
    pub name: NodeId,
    /// The declaring node (declarator, function, import specifier, ...).
    pub node: NodeId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub scope: ScopeId,
    pub defs: Vec<Definition>,
    pub references: Vec<ReferenceId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    /// The referencing node (an `Identifier`, or a template path/element).
    pub identifier: NodeId,
    pub name: String,
    pub from: ScopeId,
    pub resolved: Option<VariableId>,
    pub is_write: bool,
}

/// Arena of scopes, variables and references.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScopeManager {
    scopes: Vec<Scope>,
    variables: Vec<Variable>,
    references: Vec<Reference>,
}

impl ScopeManager {
    pub fn new() -> Self {
        ScopeManager::default()
    }

    pub fn add_scope(
        &mut self,
        kind: ScopeKind,
        block: NodeId,
        range: Span,
        parent: Option<ScopeId>,
    ) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            kind,
            block,
            range,
            parent,
            children: Vec::new(),
            variables: Vec::new(),
            references: Vec::new(),
            through: Vec::new(),
            detached: false,
            set: FxHashMap::default(),
        });
        if let Some(parent) = parent {
            self.scopes[parent.0 as usize].children.push(id);
        }
        id
    }

    /// Declare `name` in `scope`, merging with an existing variable.
    pub fn declare(&mut self, scope: ScopeId, name: &str, def: Definition) -> VariableId {
        if let Some(existing) = self.scope(scope).set.get(name).copied() {
            self.variables[existing.0 as usize].defs.push(def);
            return existing;
        }
        let id = VariableId(self.variables.len() as u32);
        self.variables.push(Variable {
            name: name.to_owned(),
            scope,
            defs: vec![def],
            references: Vec::new(),
        });
        let scope = &mut self.scopes[scope.0 as usize];
        scope.variables.push(id);
        scope.set.insert(name.to_owned(), id);
        id
    }

    /// Record an unresolved reference; call [`Self::resolve`] later.
    pub fn add_reference(
        &mut self,
        from: ScopeId,
        identifier: NodeId,
        name: &str,
        is_write: bool,
    ) -> ReferenceId {
        let id = ReferenceId(self.references.len() as u32);
        self.references.push(Reference {
            identifier,
            name: name.to_owned(),
            from,
            resolved: None,
            is_write,
        });
        self.scopes[from.0 as usize].references.push(id);
        id
    }

    /// Resolve one reference against the scope chain of its `from` scope.
    pub fn resolve(&mut self, reference: ReferenceId) -> Option<VariableId> {
        let (name, from) = {
            let r = &self.references[reference.0 as usize];
            (r.name.clone(), r.from)
        };
        let mut current = Some(from);
        while let Some(scope_id) = current {
            let scope = &mut self.scopes[scope_id.0 as usize];
            if let Some(var) = scope.set.get(&name).copied() {
                self.references[reference.0 as usize].resolved = Some(var);
                self.variables[var.0 as usize].references.push(reference);
                return Some(var);
            }
            scope.through.push(reference);
            current = scope.parent;
        }
        None
    }

    /// Resolve every reference that has not been resolved or propagated yet.
    pub fn resolve_all(&mut self, references: &[ReferenceId]) {
        for reference in references {
            self.resolve(*reference);
        }
    }

    /// Look `name` up from `scope` outward without recording anything.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<VariableId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = self.scope(id);
            if let Some(var) = scope.set.get(name) {
                return Some(*var);
            }
            current = scope.parent;
        }
        None
    }

    /// Detach the scope opened by `block`, if any.
    ///
    /// Its variables and references stay in the arena but the scope is no
    /// longer reachable from its parent and is skipped by [`Self::acquire_at`].
    pub fn detach_block(&mut self, block: NodeId) -> Option<ScopeId> {
        let index = self
            .scopes
            .iter()
            .position(|s| s.block == block && !s.detached)?;
        let id = ScopeId(index as u32);
        self.scopes[index].detached = true;
        if let Some(parent) = self.scopes[index].parent {
            self.scopes[parent.0 as usize].children.retain(|c| *c != id);
        }
        Some(id)
    }

    /// Innermost attached scope whose range contains `offset`.
    pub fn acquire_at(&self, offset: u32) -> Option<ScopeId> {
        let mut current = self.global_scope()?;
        'descend: loop {
            for child in &self.scope(current).children {
                let scope = self.scope(*child);
                if !scope.detached && scope.range.start <= offset && offset < scope.range.end {
                    current = *child;
                    continue 'descend;
                }
            }
            return Some(current);
        }
    }

    pub fn global_scope(&self) -> Option<ScopeId> {
        (!self.scopes.is_empty()).then_some(ScopeId(0))
    }

    /// First scope of `kind`, in creation order.
    pub fn first_of_kind(&self, kind: ScopeKind) -> Option<ScopeId> {
        self.scopes
            .iter()
            .position(|s| s.kind == kind && !s.detached)
            .map(|i| ScopeId(i as u32))
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    pub fn variable(&self, id: VariableId) -> &Variable {
        &self.variables[id.0 as usize]
    }

    pub fn reference(&self, id: ReferenceId) -> &Reference {
        &self.references[id.0 as usize]
    }

    pub fn scopes(&self) -> impl Iterator<Item = (ScopeId, &Scope)> {
        self.scopes
            .iter()
            .enumerate()
            .map(|(i, s)| (ScopeId(i as u32), s))
    }

    pub fn references(&self) -> impl Iterator<Item = (ReferenceId, &Reference)> {
        self.references
            .iter()
            .enumerate()
            .map(|(i, r)| (ReferenceId(i as u32), r))
    }

    /// References that reached the global scope without resolving.
    pub fn unresolved(&self) -> impl Iterator<Item = &Reference> {
        self.global_scope()
            .map(|g| self.scope(g).through.as_slice())
            .unwrap_or_default()
            .iter()
            .map(|r| self.reference(*r))
    }

    /// Variable declared directly in `scope` under `name`.
    pub fn variable_in(&self, scope: ScopeId, name: &str) -> Option<VariableId> {
        self.scope(scope).set.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn def(kind: DefKind, n: u32) -> Definition {
        Definition {
            kind,
            name: NodeId::from_raw(n),
            node: NodeId::from_raw(n),
        }
    }

    #[test]
    fn resolves_through_chain() {
        let mut sm = ScopeManager::new();
        let global = sm.add_scope(ScopeKind::Global, NodeId::from_raw(0), Span::new(0, 100), None);
        let module = sm.add_scope(ScopeKind::Module, NodeId::from_raw(0), Span::new(0, 100), Some(global));
        let inner = sm.add_scope(ScopeKind::Block, NodeId::from_raw(1), Span::new(10, 20), Some(module));
        let var = sm.declare(module, "Link", def(DefKind::ImportBinding, 2));

        let found = sm.add_reference(inner, NodeId::from_raw(3), "Link", false);
        let missing = sm.add_reference(inner, NodeId::from_raw(4), "Missing", false);
        sm.resolve_all(&[found, missing]);

        assert_eq!(sm.reference(found).resolved, Some(var));
        assert_eq!(sm.variable(var).references, vec![found]);
        assert_eq!(sm.scope(inner).through, vec![found, missing]);
        let unresolved: Vec<_> = sm.unresolved().map(|r| r.name.as_str()).collect();
        assert_eq!(unresolved, vec!["Missing"]);
    }

    #[test]
    fn acquire_skips_detached() {
        let mut sm = ScopeManager::new();
        let global = sm.add_scope(ScopeKind::Global, NodeId::from_raw(0), Span::new(0, 100), None);
        let class = sm.add_scope(ScopeKind::Class, NodeId::from_raw(1), Span::new(10, 90), Some(global));
        let block = sm.add_scope(ScopeKind::ClassStaticBlock, NodeId::from_raw(2), Span::new(20, 40), Some(class));

        assert_eq!(sm.acquire_at(25), Some(block));
        assert_eq!(sm.detach_block(NodeId::from_raw(2)), Some(block));
        assert_eq!(sm.acquire_at(25), Some(class));
        assert_eq!(sm.acquire_at(5), Some(global));
    }
}
