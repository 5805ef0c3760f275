//! GTS IR - shared data model for the hybrid script/template parser.
//!
//! This crate contains the structures every stage of the pipeline agrees on:
//! - Spans and line/column locations
//! - Offset-preserving range utilities
//! - The node arena shared by script and template trees
//! - Tokens and comments
//! - Visitor-key tables (reflection metadata for generic traversal)
//! - Parent back-references
//! - Scope-analysis data (scopes, variables, references)
//!
//! # Design Philosophy
//!
//! - **Tagged nodes**: every node carries its `type` string as discriminant.
//!   Script and template nodes share one representation so a single generic
//!   traversal (driven by [`VisitorKeys`]) can walk the unified tree.
//! - **Flatten everything**: children are [`NodeId`] indices into an [`Ast`]
//!   arena, never boxed subtrees.
//! - **Parents live outside the tree**: [`ParentIndex`] is a non-owning side
//!   table, so the arena stays a plain owned structure.

mod keys;
mod loc;
mod node;
mod parents;
pub mod range;
pub mod scope;
mod span;
mod token;

pub use keys::{traverse, VisitorKeys};
pub use loc::{LineIndex, Position, SourceLoc};
pub use node::{Ast, Field, Node, NodeId};
pub use parents::{ParentIndex, ParentLink};
pub use range::{blank_preserving_lines, replace_range, replace_range_preserving, LengthMismatch};
pub use scope::{
    DefKind, Definition, Reference, ReferenceId, Scope, ScopeId, ScopeKind, ScopeManager, Variable,
    VariableId,
};
pub use span::Span;
pub use token::{Comment, CommentKind, ScriptTokenKind, TemplateTokenKind, Token, TokenKind};
