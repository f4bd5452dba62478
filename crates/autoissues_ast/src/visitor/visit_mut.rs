//! Visitor trait for tree transformation.
//!
//! Nodes are immutable and arena allocated, so a transformation rebuilds
//! every ancestor of a changed node. Unchanged subtrees are shared with the
//! input tree.

use crate::{AstArena, NodeType, TxtNode};

/// What to do with a node after visiting it.
#[derive(Debug, Clone)]
pub enum Rewrite<'a> {
    /// Keep the node as is.
    Keep,
    /// Replace the node with another node.
    Replace(TxtNode<'a>),
    /// Replace the node with zero or more sibling nodes.
    Splice(Vec<TxtNode<'a>>),
}

impl<'a> Rewrite<'a> {
    /// Returns true if the node is kept unchanged.
    #[inline]
    pub fn is_keep(&self) -> bool {
        matches!(self, Rewrite::Keep)
    }
}

/// Visitor trait for transforming the tree.
///
/// Every method returns a [`Rewrite`]. The default implementations descend
/// into containers and links and keep everything else.
pub trait MutVisitor<'a>: Sized {
    /// Returns the arena used to allocate rebuilt nodes.
    fn arena(&self) -> &'a AstArena;

    /// Visits any node by dispatching to the kind-specific method.
    fn visit_node_mut(&mut self, node: &TxtNode<'a>) -> Rewrite<'a> {
        walk_node_mut(self, node)
    }

    /// Transforms the children of `node`.
    ///
    /// Returns `None` when no child changed. Override this to look at
    /// siblings together.
    fn visit_children_mut(&mut self, node: &TxtNode<'a>) -> Option<&'a [TxtNode<'a>]> {
        walk_children_mut(self, node)
    }

    /// Visits a container node.
    fn visit_parent_mut(&mut self, node: &TxtNode<'a>) -> Rewrite<'a> {
        match self.visit_children_mut(node) {
            Some(children) => Rewrite::Replace(node.with_children(children)),
            None => Rewrite::Keep,
        }
    }

    /// Visits a leaf without content.
    fn visit_leaf_mut(&mut self, _node: &TxtNode<'a>) -> Rewrite<'a> {
        Rewrite::Keep
    }

    /// Visits a Str (text) node.
    fn visit_str_mut(&mut self, _node: &TxtNode<'a>) -> Rewrite<'a> {
        Rewrite::Keep
    }

    /// Visits inline code, a code block or raw HTML.
    fn visit_literal_mut(&mut self, _node: &TxtNode<'a>) -> Rewrite<'a> {
        Rewrite::Keep
    }

    /// Visits a Link or LinkReference node.
    fn visit_link_mut(&mut self, node: &TxtNode<'a>) -> Rewrite<'a> {
        self.visit_parent_mut(node)
    }

    /// Visits an Image node.
    fn visit_image_mut(&mut self, _node: &TxtNode<'a>) -> Rewrite<'a> {
        Rewrite::Keep
    }

    /// Visits a pending issue reference.
    fn visit_pending_issue_mut(&mut self, _node: &TxtNode<'a>) -> Rewrite<'a> {
        Rewrite::Keep
    }

    /// Visits a resolved issue link.
    fn visit_issue_link_mut(&mut self, _node: &TxtNode<'a>) -> Rewrite<'a> {
        Rewrite::Keep
    }
}

/// Dispatches a node to the appropriate kind-specific method.
pub fn walk_node_mut<'a, V>(visitor: &mut V, node: &TxtNode<'a>) -> Rewrite<'a>
where
    V: MutVisitor<'a>,
{
    match node.node_type {
        NodeType::Str => visitor.visit_str_mut(node),
        kind if kind.is_literal() => visitor.visit_literal_mut(node),
        NodeType::Link | NodeType::LinkReference => visitor.visit_link_mut(node),
        NodeType::Image => visitor.visit_image_mut(node),
        NodeType::PendingIssue => visitor.visit_pending_issue_mut(node),
        NodeType::IssueLink => visitor.visit_issue_link_mut(node),
        kind if kind.is_parent() => visitor.visit_parent_mut(node),
        _ => visitor.visit_leaf_mut(node),
    }
}

/// Visits each child and rebuilds the child slice if any child changed.
pub fn walk_children_mut<'a, V>(visitor: &mut V, node: &TxtNode<'a>) -> Option<&'a [TxtNode<'a>]>
where
    V: MutVisitor<'a>,
{
    let mut rebuilt: Option<Vec<TxtNode<'a>>> = None;

    for (i, child) in node.children.iter().enumerate() {
        let rewrite = visitor.visit_node_mut(child);
        if rewrite.is_keep() {
            if let Some(out) = rebuilt.as_mut() {
                out.push(*child);
            }
            continue;
        }

        let out = rebuilt.get_or_insert_with(|| {
            let mut v = Vec::with_capacity(node.children.len() + 2);
            v.extend_from_slice(&node.children[..i]);
            v
        });
        match rewrite {
            Rewrite::Keep => out.push(*child),
            Rewrite::Replace(new_node) => out.push(new_node),
            Rewrite::Splice(nodes) => out.extend(nodes),
        }
    }

    let arena = visitor.arena();
    rebuilt.map(|children| arena.alloc_slice_copy(&children))
}

/// Applies a visitor to the root of a tree and returns the new root.
///
/// A `Splice` at the root becomes the root's new children.
pub fn rewrite_root<'a, V>(visitor: &mut V, root: &TxtNode<'a>) -> TxtNode<'a>
where
    V: MutVisitor<'a>,
{
    match visitor.visit_node_mut(root) {
        Rewrite::Keep => *root,
        Rewrite::Replace(node) => node,
        Rewrite::Splice(nodes) => root.with_children(visitor.arena().alloc_slice_copy(&nodes)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NodeData, Span};
    use pretty_assertions::assert_eq;

    /// Uppercases every Str outside of literals.
    struct Upper<'a> {
        arena: &'a AstArena,
    }

    impl<'a> MutVisitor<'a> for Upper<'a> {
        fn arena(&self) -> &'a AstArena {
            self.arena
        }

        fn visit_str_mut(&mut self, node: &TxtNode<'a>) -> Rewrite<'a> {
            let text = node.text().unwrap_or_default();
            let upper = self.arena.alloc_str(&text.to_uppercase());
            Rewrite::Replace(TxtNode::new_text(NodeType::Str, node.span, upper))
        }
    }

    /// Replaces every pending issue with its children.
    struct Unwrap<'a> {
        arena: &'a AstArena,
    }

    impl<'a> MutVisitor<'a> for Unwrap<'a> {
        fn arena(&self) -> &'a AstArena {
            self.arena
        }

        fn visit_pending_issue_mut(&mut self, node: &TxtNode<'a>) -> Rewrite<'a> {
            Rewrite::Splice(node.children.to_vec())
        }
    }

    struct Noop<'a> {
        arena: &'a AstArena,
    }

    impl<'a> MutVisitor<'a> for Noop<'a> {
        fn arena(&self) -> &'a AstArena {
            self.arena
        }
    }

    fn paragraph<'a>(arena: &'a AstArena, children: &[TxtNode<'a>]) -> TxtNode<'a> {
        let para = TxtNode::new_parent(
            NodeType::Paragraph,
            Span::new(0, 10),
            arena.alloc_slice_copy(children),
        );
        TxtNode::new_parent(
            NodeType::Document,
            Span::new(0, 10),
            arena.alloc_slice_copy(&[para]),
        )
    }

    #[test]
    fn test_replace_rebuilds_ancestors() {
        let arena = AstArena::new();
        let doc = paragraph(
            &arena,
            &[
                TxtNode::new_text(NodeType::Str, Span::new(0, 3), "see"),
                TxtNode::new_text(NodeType::Code, Span::new(3, 6), "abc"),
            ],
        );

        let out = rewrite_root(&mut Upper { arena: &arena }, &doc);
        let para = out.children[0];

        assert_eq!(para.children[0].text(), Some("SEE"));
        assert_eq!(para.children[1].text(), Some("abc"));
    }

    #[test]
    fn test_splice_flattens_children() {
        let arena = AstArena::new();
        let display = TxtNode::new_text(NodeType::Str, Span::new(4, 7), "#10");
        let mut pending = TxtNode::new_parent(
            NodeType::PendingIssue,
            Span::new(4, 7),
            arena.alloc_slice_copy(&[display]),
        );
        pending.data = NodeData::pending_issue("10", "owner/repo", None);
        let doc = paragraph(
            &arena,
            &[
                TxtNode::new_text(NodeType::Str, Span::new(0, 4), "see "),
                pending,
                TxtNode::new_text(NodeType::Str, Span::new(7, 8), "."),
            ],
        );

        let out = rewrite_root(&mut Unwrap { arena: &arena }, &doc);
        let para = out.children[0];

        let kinds: Vec<_> = para.children.iter().map(|c| c.node_type).collect();
        assert_eq!(kinds, vec![NodeType::Str, NodeType::Str, NodeType::Str]);
        assert_eq!(para.plain_text(), "see #10.");
    }

    #[test]
    fn test_pending_issue_content_is_kept() {
        let arena = AstArena::new();
        let display = TxtNode::new_text(NodeType::Str, Span::new(4, 7), "foo");
        let mut pending = TxtNode::new_parent(
            NodeType::PendingIssue,
            Span::new(4, 7),
            arena.alloc_slice_copy(&[display]),
        );
        pending.data = NodeData::pending_issue("10", "owner/repo", None);
        let doc = paragraph(
            &arena,
            &[TxtNode::new_text(NodeType::Str, Span::new(0, 4), "see "), pending],
        );

        let out = rewrite_root(&mut Upper { arena: &arena }, &doc);
        let para = out.children[0];

        assert_eq!(para.children[0].text(), Some("SEE "));
        assert_eq!(para.children[1].node_type, NodeType::PendingIssue);
        assert_eq!(para.children[1].plain_text(), "foo");
    }

    #[test]
    fn test_noop_shares_input() {
        let arena = AstArena::new();
        let doc = paragraph(&arena, &[TxtNode::new_text(NodeType::Str, Span::new(0, 3), "see")]);

        let out = rewrite_root(&mut Noop { arena: &arena }, &doc);

        assert!(std::ptr::eq(out.children.as_ptr(), doc.children.as_ptr()));
    }
}
