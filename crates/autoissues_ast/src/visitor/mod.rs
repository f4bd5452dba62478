//! Visitor pattern for tree traversal.
//!
//! - [`Visitor`] - read-only traversal
//! - [`MutVisitor`] - tree transformation producing a new tree in the arena
//! - [`walk_node`] / [`walk_children`] - dispatch helpers for [`Visitor`]
//! - [`walk_node_mut`] / [`walk_children_mut`] / [`rewrite_root`] - dispatch
//!   helpers for [`MutVisitor`]
//!
//! # Collecting pending issue references
//!
//! ```rust
//! use autoissues_ast::{AstArena, NodeData, NodeType, Span, TxtNode};
//! use autoissues_ast::visitor::{Visitor, VisitResult, walk_node};
//! use std::ops::ControlFlow;
//!
//! struct Targets<'a> {
//!     ids: Vec<&'a str>,
//! }
//!
//! impl<'a> Visitor<'a> for Targets<'a> {
//!     fn visit_pending_issue(&mut self, node: &TxtNode<'a>) -> VisitResult {
//!         if let Some(pending) = node.data.as_pending_issue() {
//!             self.ids.push(pending.target);
//!         }
//!         ControlFlow::Continue(())
//!     }
//! }
//!
//! let arena = AstArena::new();
//! let mut pending = TxtNode::new_parent(NodeType::PendingIssue, Span::new(0, 3), &[]);
//! pending.data = NodeData::pending_issue("10", "owner/repo", None);
//! let doc = TxtNode::new_parent(
//!     NodeType::Document,
//!     Span::new(0, 3),
//!     arena.alloc_slice_copy(&[pending]),
//! );
//!
//! let mut targets = Targets { ids: Vec::new() };
//! walk_node(&mut targets, &doc);
//! assert_eq!(targets.ids, vec!["10"]);
//! ```

mod visit;
mod visit_mut;
mod walk;

pub use visit::{VisitResult, Visitor};
pub use visit_mut::{MutVisitor, Rewrite, rewrite_root, walk_children_mut, walk_node_mut};
pub use walk::{walk_children, walk_node};
