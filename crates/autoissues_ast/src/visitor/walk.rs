//! Walk functions for read-only traversal.

use std::ops::ControlFlow;

use crate::{NodeType, TxtNode};

use super::visit::{VisitResult, Visitor};

/// Walks a node by dispatching to the appropriate kind-specific visitor method.
///
/// Calls `enter_node`, the `visit_*` method for the node kind, then
/// `exit_node`.
pub fn walk_node<'a, V>(visitor: &mut V, node: &TxtNode<'a>) -> VisitResult
where
    V: Visitor<'a>,
{
    visitor.enter_node(node)?;

    match node.node_type {
        NodeType::Str => visitor.visit_str(node),
        kind if kind.is_literal() => visitor.visit_literal(node),
        NodeType::Link | NodeType::LinkReference => visitor.visit_link(node),
        NodeType::Image => visitor.visit_image(node),
        NodeType::PendingIssue => visitor.visit_pending_issue(node),
        NodeType::IssueLink => visitor.visit_issue_link(node),
        kind if kind.is_parent() => visitor.visit_parent(node),
        _ => visitor.visit_leaf(node),
    }?;

    visitor.exit_node(node)
}

/// Walks all children of a node, stopping early on `ControlFlow::Break`.
#[inline]
pub fn walk_children<'a, V>(visitor: &mut V, node: &TxtNode<'a>) -> VisitResult
where
    V: Visitor<'a>,
{
    for child in node.children {
        visitor.visit_node(child)?;
    }
    ControlFlow::Continue(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AstArena, NodeData, Span};

    #[derive(Default)]
    struct NodeCounter {
        strs: usize,
        literals: usize,
        pending: usize,
        total: usize,
    }

    impl<'a> Visitor<'a> for NodeCounter {
        fn enter_node(&mut self, _node: &TxtNode<'a>) -> VisitResult {
            self.total += 1;
            ControlFlow::Continue(())
        }

        fn visit_str(&mut self, _node: &TxtNode<'a>) -> VisitResult {
            self.strs += 1;
            ControlFlow::Continue(())
        }

        fn visit_literal(&mut self, _node: &TxtNode<'a>) -> VisitResult {
            self.literals += 1;
            ControlFlow::Continue(())
        }

        fn visit_pending_issue(&mut self, node: &TxtNode<'a>) -> VisitResult {
            self.pending += 1;
            walk_children(self, node)
        }
    }

    fn sample_tree(arena: &AstArena) -> TxtNode<'_> {
        let text = TxtNode::new_text(NodeType::Str, Span::new(0, 4), "see ");
        let display = TxtNode::new_text(NodeType::Str, Span::new(4, 7), "#10");
        let mut pending = TxtNode::new_parent(
            NodeType::PendingIssue,
            Span::new(4, 7),
            arena.alloc_slice_copy(&[display]),
        );
        pending.data = NodeData::pending_issue("10", "owner/repo", None);
        let code = TxtNode::new_text(NodeType::Code, Span::new(8, 13), "#11");
        let para = TxtNode::new_parent(
            NodeType::Paragraph,
            Span::new(0, 13),
            arena.alloc_slice_copy(&[text, pending, code]),
        );
        TxtNode::new_parent(
            NodeType::Document,
            Span::new(0, 13),
            arena.alloc_slice_copy(&[para]),
        )
    }

    #[test]
    fn test_walk_counts_nodes() {
        let arena = AstArena::new();
        let doc = sample_tree(&arena);

        let mut counter = NodeCounter::default();
        let result = walk_node(&mut counter, &doc);

        assert!(result.is_continue());
        assert_eq!(counter.total, 6);
        assert_eq!(counter.strs, 2);
        assert_eq!(counter.literals, 1);
        assert_eq!(counter.pending, 1);
    }

    #[test]
    fn test_walk_stops_on_break() {
        struct StopAtFirstStr {
            seen: usize,
        }

        impl<'a> Visitor<'a> for StopAtFirstStr {
            fn visit_str(&mut self, _node: &TxtNode<'a>) -> VisitResult {
                self.seen += 1;
                ControlFlow::Break(())
            }
        }

        let arena = AstArena::new();
        let doc = sample_tree(&arena);
        let mut visitor = StopAtFirstStr { seen: 0 };

        assert!(walk_node(&mut visitor, &doc).is_break());
        assert_eq!(visitor.seen, 1);
    }
}
