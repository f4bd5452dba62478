//! # autoissues_ast
//!
//! Document tree definitions for autoissues.
//!
//! Documents are parsed into a tree of [`TxtNode`]s allocated in a single
//! [`AstArena`]. Besides the usual Markdown node types, the tree knows two
//! node types used by issue linking:
//!
//! - [`NodeType::PendingIssue`] - an issue reference found while scanning,
//!   waiting for its issue to be looked up
//! - [`NodeType::IssueLink`] - a resolved issue reference, rendered as a
//!   hyperlink to the issue
//!
//! Nodes are `Copy` and immutable. Transformations rebuild the affected path
//! of the tree in the same arena (see [`visitor::MutVisitor`]).
//!
//! ## Example
//!
//! ```rust
//! use autoissues_ast::{AstArena, TxtNode, NodeType, Span};
//!
//! let arena = AstArena::new();
//! let text = arena.alloc(TxtNode::new_text(NodeType::Str, Span::new(0, 3), "#10"));
//! let children = arena.alloc_slice_copy(&[*text]);
//! let doc = TxtNode::new_parent(NodeType::Document, Span::new(0, 3), children);
//! assert!(doc.has_children());
//! ```

mod arena;
mod node;
mod node_type;
mod span;
pub mod visitor;

pub use arena::AstArena;
pub use node::{IssueLinkData, LinkData, NodeData, PendingIssueData, TxtNode};
pub use node_type::NodeType;
pub use span::{LineIndex, Location, Position, Span};

pub use visitor::{MutVisitor, Rewrite, VisitResult, Visitor};
