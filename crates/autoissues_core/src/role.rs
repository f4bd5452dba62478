//! Explicit issue references.
//!
//! An explicit reference is the role marker `:issue:` (or `{issue}`)
//! directly followed by an inline code span:
//!
//! ```markdown
//! See :issue:`10` and {issue}`the crash <12>`.
//! ```
//!
//! The code span holds either the issue id, or a title followed by the id
//! in angle brackets. The title is a display template and may use the
//! issue fields (see [`crate::format_issue`]).

use std::sync::LazyLock;

use autoissues_ast::{AstArena, MutVisitor, NodeType, Rewrite, Span, TxtNode};
use autoissues_tracker::TrackerConfig;
use regex::Regex;

use crate::scanner::{pending_issue, text_subspan};

/// Role markers, in the spellings we accept.
const ROLE_MARKERS: [&str; 2] = [":issue:", "{issue}"];

static EXPLICIT_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^(.+?)\s*<([^<]*?)>$").expect("Invalid title regex"));

/// Splits role content into `(target, display)`.
///
/// `10` gives `("10", "10")`, `foo <10>` gives `("10", "foo")`.
pub fn parse_role_content(content: &str) -> (&str, &str) {
    let content = content.trim();
    match EXPLICIT_TITLE.captures(content) {
        Some(caps) => match (caps.get(1), caps.get(2)) {
            (Some(title), Some(target)) if !target.as_str().trim().is_empty() => {
                (target.as_str().trim(), title.as_str())
            }
            _ => (content, content),
        },
        None => (content, content),
    }
}

/// Returns the text before a trailing role marker.
fn strip_marker(text: &str) -> Option<&str> {
    ROLE_MARKERS
        .iter()
        .find_map(|marker| text.strip_suffix(marker))
}

/// Tree transform turning explicit references into `PendingIssue` nodes.
///
/// Runs independently of plain text scanning.
pub struct RoleTransform<'a, 's> {
    arena: &'a AstArena,
    tracker: &'s TrackerConfig,
    found: usize,
}

impl<'a, 's> RoleTransform<'a, 's> {
    /// Creates the transform.
    pub fn new(arena: &'a AstArena, tracker: &'s TrackerConfig) -> Self {
        Self {
            arena,
            tracker,
            found: 0,
        }
    }

    /// Returns the number of references found so far.
    pub fn found(&self) -> usize {
        self.found
    }

    /// Builds the nodes replacing a marker `Str` and the following code span.
    fn role_nodes(
        &self,
        text_node: &TxtNode<'a>,
        before: &'a str,
        code: &TxtNode<'a>,
        out: &mut Vec<TxtNode<'a>>,
    ) {
        if !before.is_empty() {
            let span = text_subspan(text_node, 0..before.len());
            out.push(TxtNode::new_text(NodeType::Str, span, before));
        }

        let start = text_subspan(text_node, before.len()..before.len()).start;
        let span = Span::new(start, code.span.end);

        let (target, display) = parse_role_content(code.text().unwrap_or_default());
        out.push(pending_issue(self.arena, self.tracker, target, display, span));
    }
}

impl<'a> MutVisitor<'a> for RoleTransform<'a, '_> {
    fn arena(&self) -> &'a AstArena {
        self.arena
    }

    fn visit_children_mut(&mut self, node: &TxtNode<'a>) -> Option<&'a [TxtNode<'a>]> {
        let children = node.children;
        let mut out = Vec::with_capacity(children.len());
        let mut changed = false;
        let mut i = 0;

        while i < children.len() {
            let child = &children[i];

            if child.node_type == NodeType::Str
                && let Some(next) = children.get(i + 1)
                && next.node_type == NodeType::Code
                && let Some(before) = child.text().and_then(strip_marker)
                && !next.text().unwrap_or_default().trim().is_empty()
            {
                self.role_nodes(child, before, next, &mut out);
                self.found += 1;
                changed = true;
                i += 2;
                continue;
            }

            match self.visit_node_mut(child) {
                Rewrite::Keep => out.push(*child),
                Rewrite::Replace(new_node) => {
                    out.push(new_node);
                    changed = true;
                }
                Rewrite::Splice(nodes) => {
                    out.extend(nodes);
                    changed = true;
                }
            }
            i += 1;
        }

        let arena = self.arena;
        changed.then(|| arena.alloc_slice_copy(&out))
    }

    fn visit_link_mut(&mut self, _node: &TxtNode<'a>) -> Rewrite<'a> {
        Rewrite::Keep
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoissues_ast::visitor::rewrite_root;
    use autoissues_parser::{MarkdownParser, Parser};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case::id("10", "10", "10")]
    #[case::title("foo <10>", "10", "foo")]
    #[case::title_no_space("foo<10>", "10", "foo")]
    #[case::template("{issue.title} <7>", "7", "{issue.title}")]
    #[case::padded(" 10 ", "10", "10")]
    #[case::empty_target("foo <>", "foo <>", "foo <>")]
    fn test_parse_role_content(
        #[case] content: &str,
        #[case] target: &str,
        #[case] display: &str,
    ) {
        assert_eq!(parse_role_content(content), (target, display));
    }

    fn transform<'a>(arena: &'a AstArena, source: &str) -> (TxtNode<'a>, usize) {
        let doc = MarkdownParser::new().parse(arena, source).unwrap();
        let tracker = TrackerConfig::new("owner/repo");
        let mut role = RoleTransform::new(arena, &tracker);
        let out = rewrite_root(&mut role, &doc);
        (out, role.found())
    }

    #[test]
    fn test_role_simple() {
        let arena = AstArena::new();
        let (doc, found) = transform(&arena, ":issue:`10`");

        assert_eq!(found, 1);
        let para = doc.children[0];
        assert_eq!(para.children.len(), 1);
        let pending = para.children[0];
        assert_eq!(pending.node_type, NodeType::PendingIssue);
        assert_eq!(pending.data.as_pending_issue().unwrap().target, "10");
        assert_eq!(pending.plain_text(), "10");
        assert_eq!(pending.span, Span::new(0, 11));
    }

    #[test]
    fn test_role_with_title() {
        let arena = AstArena::new();
        let (doc, _) = transform(&arena, "See :issue:`foo <10>` here");

        let para = doc.children[0];
        let texts: Vec<_> = para
            .children
            .iter()
            .map(|c| (c.node_type, c.plain_text()))
            .collect();
        assert_eq!(
            texts,
            vec![
                (NodeType::Str, "See ".to_string()),
                (NodeType::PendingIssue, "foo".to_string()),
                (NodeType::Str, " here".to_string()),
            ]
        );
        assert_eq!(para.children[1].data.as_pending_issue().unwrap().target, "10");
        assert_eq!(para.children[1].span, Span::new(4, 21));
    }

    #[test]
    fn test_role_myst_spelling() {
        let arena = AstArena::new();
        let (doc, found) = transform(&arena, "{issue}`12`");

        assert_eq!(found, 1);
        assert_eq!(doc.children[0].children[0].node_type, NodeType::PendingIssue);
    }

    #[test]
    fn test_code_without_marker_is_kept() {
        let arena = AstArena::new();
        let (doc, found) = transform(&arena, "issue `10` and :other:`11`");

        assert_eq!(found, 0);
        assert!(
            doc.children[0]
                .children
                .iter()
                .all(|c| c.node_type != NodeType::PendingIssue)
        );
    }

    #[test]
    fn test_role_nested_in_emphasis() {
        let arena = AstArena::new();
        let (doc, found) = transform(&arena, "*see :issue:`3`*");

        assert_eq!(found, 1);
        let emphasis = doc.children[0].children[0];
        assert_eq!(emphasis.children[1].node_type, NodeType::PendingIssue);
    }
}
