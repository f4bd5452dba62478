//! Plain text issue reference scanning.
//!
//! [`ReferenceScanner`] finds issue references like `#10` in text and
//! [`ScanTransform`] applies it to a document tree, replacing every `Str`
//! node that contains references with literal `Str` nodes and
//! `PendingIssue` nodes.

use std::ops::Range;

use autoissues_ast::{AstArena, MutVisitor, NodeData, NodeType, Rewrite, Span, TxtNode};
use autoissues_tracker::TrackerConfig;
use regex::Regex;
use tracing::trace;

use crate::CoreError;
use crate::config::DEFAULT_ISSUE_PATTERN;

/// A compiled issue reference pattern.
///
/// The pattern must have exactly one capture group, which holds the issue
/// id. The whole match is the reference text.
#[derive(Debug, Clone)]
pub struct IssuePattern {
    regex: Regex,
}

impl IssuePattern {
    /// Compiles `pattern`.
    ///
    /// Fails if the pattern is not a valid regex or does not have exactly
    /// one capture group.
    pub fn new(pattern: &str) -> Result<Self, CoreError> {
        let regex = Regex::new(pattern).map_err(|e| {
            CoreError::config(format!("Invalid issuetracker_issue_pattern {pattern:?}: {e}"))
        })?;
        // Group 0 is the whole match.
        if regex.captures_len() != 2 {
            return Err(CoreError::config(format!(
                "issuetracker_issue_pattern must have exactly one group: {pattern:?} has {}",
                regex.captures_len() - 1
            )));
        }
        Ok(Self { regex })
    }

    /// Returns the pattern source.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl Default for IssuePattern {
    fn default() -> Self {
        Self::new(DEFAULT_ISSUE_PATTERN).expect("Invalid default issue pattern")
    }
}

/// A piece of scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'t> {
    /// Text without references.
    Literal(&'t str),
    /// An issue reference.
    Reference {
        /// The captured issue id.
        issue_id: &'t str,
        /// Text to display for the reference.
        display: &'t str,
        /// Byte range of the whole match in the scanned text.
        range: Range<usize>,
    },
}

/// Splits text into literal text and issue references.
#[derive(Debug, Clone)]
pub struct ReferenceScanner {
    pattern: IssuePattern,
    title_template: Option<String>,
}

impl ReferenceScanner {
    /// Creates a scanner.
    ///
    /// Matches are displayed with `title_template` when given, otherwise
    /// with the matched text.
    pub fn new(pattern: IssuePattern, title_template: Option<String>) -> Self {
        Self {
            pattern,
            title_template,
        }
    }

    /// Returns the pattern.
    pub fn pattern(&self) -> &IssuePattern {
        &self.pattern
    }

    /// Splits `text` into segments, left to right.
    ///
    /// Returns `None` when `text` contains no reference. Empty literals are
    /// omitted, so the literals and the matched ranges together cover `text`
    /// exactly.
    pub fn split<'t>(&'t self, text: &'t str) -> Option<Vec<Segment<'t>>> {
        let mut segments = Vec::new();
        let mut last_end = 0;

        for caps in self.pattern.regex.captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            // An empty match references nothing.
            if whole.is_empty() {
                continue;
            }
            // An optional group that did not take part gives no id.
            let Some(id) = caps.get(1) else {
                continue;
            };

            if whole.start() > last_end {
                segments.push(Segment::Literal(&text[last_end..whole.start()]));
            }
            segments.push(Segment::Reference {
                issue_id: id.as_str(),
                display: self.title_template.as_deref().unwrap_or(whole.as_str()),
                range: whole.range(),
            });
            last_end = whole.end();
        }

        if segments.is_empty() {
            return None;
        }
        if last_end < text.len() {
            segments.push(Segment::Literal(&text[last_end..]));
        }
        Some(segments)
    }
}

/// Creates a `PendingIssue` node wrapping a display `Str`.
pub(crate) fn pending_issue<'a>(
    arena: &'a AstArena,
    tracker: &TrackerConfig,
    issue_id: &str,
    display: &str,
    span: Span,
) -> TxtNode<'a> {
    let display = TxtNode::new_text(NodeType::Str, span, arena.alloc_str(display));
    let mut node = TxtNode::new_parent(
        NodeType::PendingIssue,
        span,
        arena.alloc_slice_copy(&[display]),
    );
    node.data = NodeData::pending_issue(
        arena.alloc_str(issue_id),
        arena.alloc_str(tracker.project()),
        tracker.url().map(|u| &*arena.alloc_str(u)),
    );
    node
}

/// Returns the span of `range` within a text node.
///
/// Text values can differ from their source (escapes, entities). Their
/// span is then not subdivided.
pub(crate) fn text_subspan(node: &TxtNode<'_>, range: Range<usize>) -> Span {
    let len = node.text().map(str::len).unwrap_or_default();
    if node.span.len() as usize == len {
        node.span.subspan(range.start as u32, range.end as u32)
    } else {
        node.span
    }
}

/// Tree transform applying a [`ReferenceScanner`] to every `Str` node.
///
/// Code, raw HTML, links, images and issue references are left alone.
pub struct ScanTransform<'a, 's> {
    arena: &'a AstArena,
    scanner: &'s ReferenceScanner,
    tracker: &'s TrackerConfig,
    found: usize,
}

impl<'a, 's> ScanTransform<'a, 's> {
    /// Creates the transform.
    pub fn new(
        arena: &'a AstArena,
        scanner: &'s ReferenceScanner,
        tracker: &'s TrackerConfig,
    ) -> Self {
        Self {
            arena,
            scanner,
            tracker,
            found: 0,
        }
    }

    /// Returns the number of references found so far.
    pub fn found(&self) -> usize {
        self.found
    }
}

impl<'a> MutVisitor<'a> for ScanTransform<'a, '_> {
    fn arena(&self) -> &'a AstArena {
        self.arena
    }

    fn visit_str_mut(&mut self, node: &TxtNode<'a>) -> Rewrite<'a> {
        let Some(text) = node.text() else {
            return Rewrite::Keep;
        };
        let scanner = self.scanner;
        let Some(segments) = scanner.split(text) else {
            return Rewrite::Keep;
        };

        let mut offset = 0;
        let mut nodes = Vec::with_capacity(segments.len());
        for segment in segments {
            match segment {
                Segment::Literal(literal) => {
                    let range = offset..offset + literal.len();
                    let span = text_subspan(node, range.clone());
                    nodes.push(TxtNode::new_text(NodeType::Str, span, &text[range]));
                    offset += literal.len();
                }
                Segment::Reference {
                    issue_id,
                    display,
                    range,
                } => {
                    trace!("Found reference to issue {issue_id}");
                    let span = text_subspan(node, range.clone());
                    nodes.push(pending_issue(
                        self.arena,
                        self.tracker,
                        issue_id,
                        display,
                        span,
                    ));
                    self.found += 1;
                    offset = range.end;
                }
            }
        }
        Rewrite::Splice(nodes)
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

    fn scanner() -> ReferenceScanner {
        ReferenceScanner::new(IssuePattern::default(), None)
    }

    /// Rebuilds the scanned text from the segments.
    fn join(text: &str, segments: &[Segment<'_>]) -> String {
        segments
            .iter()
            .map(|s| match s {
                Segment::Literal(l) => *l,
                Segment::Reference { range, .. } => &text[range.clone()],
            })
            .collect()
    }

    #[rstest]
    #[case::no_groups(r"#\d+", "exactly one group")]
    #[case::two_groups(r"(#)(\d+)", "exactly one group")]
    #[case::invalid_regex(r"#(\d+", "Invalid issuetracker_issue_pattern")]
    fn test_pattern_rejected(#[case] pattern: &str, #[case] message: &str) {
        let err = IssuePattern::new(pattern).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains(message), "{err}");
    }

    #[test]
    fn test_pattern_non_capturing_groups_allowed() {
        let pattern = IssuePattern::new(r"(?:GH|gh)-(\d+)").unwrap();
        assert_eq!(pattern.as_str(), r"(?:GH|gh)-(\d+)");
    }

    #[rstest]
    #[case::empty("")]
    #[case::plain("no references here")]
    #[case::hash_only("issue # and #x")]
    fn test_split_without_matches(#[case] text: &str) {
        assert_eq!(scanner().split(text), None);
    }

    #[test]
    fn test_split_segments() {
        let scanner = scanner();
        let segments = scanner.split("Fixes #10 and #22.").unwrap();

        assert_eq!(
            segments,
            vec![
                Segment::Literal("Fixes "),
                Segment::Reference {
                    issue_id: "10",
                    display: "#10",
                    range: 6..9,
                },
                Segment::Literal(" and "),
                Segment::Reference {
                    issue_id: "22",
                    display: "#22",
                    range: 14..17,
                },
                Segment::Literal("."),
            ]
        );
    }

    #[rstest]
    #[case::leading("#1 at start")]
    #[case::trailing("at end #2")]
    #[case::adjacent("#1#2#3")]
    #[case::only("#42")]
    #[case::unicode("é #7 ü")]
    fn test_split_is_lossless(#[case] text: &str) {
        let scanner = scanner();
        let segments = scanner.split(text).unwrap();
        assert_eq!(join(text, &segments), text);
    }

    #[test]
    fn test_split_uses_title_template() {
        let scanner = ReferenceScanner::new(
            IssuePattern::default(),
            Some("{issue.title} (#{issue.id})".to_string()),
        );
        let segments = scanner.split("see #5").unwrap();

        assert_eq!(
            segments[1],
            Segment::Reference {
                issue_id: "5",
                display: "{issue.title} (#{issue.id})",
                range: 4..6,
            }
        );
    }

    #[test]
    fn test_split_custom_pattern() {
        let scanner = ReferenceScanner::new(IssuePattern::new(r"GH-(\d+)").unwrap(), None);
        let segments = scanner.split("GH-7 and #8").unwrap();

        assert_eq!(segments.len(), 2);
        assert!(matches!(
            segments[0],
            Segment::Reference { issue_id: "7", display: "GH-7", .. }
        ));
    }

    fn scan<'a>(arena: &'a AstArena, source: &str) -> (TxtNode<'a>, usize) {
        let doc = MarkdownParser::new().parse(arena, source).unwrap();
        let scanner = scanner();
        let tracker = TrackerConfig::new("owner/repo");
        let mut transform = ScanTransform::new(arena, &scanner, &tracker);
        let out = rewrite_root(&mut transform, &doc);
        (out, transform.found())
    }

    #[test]
    fn test_transform_replaces_text() {
        let arena = AstArena::new();
        let (doc, found) = scan(&arena, "Fixes #10.");

        assert_eq!(found, 1);
        let para = doc.children[0];
        let kinds: Vec<_> = para.children.iter().map(|c| c.node_type).collect();
        assert_eq!(
            kinds,
            vec![NodeType::Str, NodeType::PendingIssue, NodeType::Str]
        );

        let pending = para.children[1];
        let data = pending.data.as_pending_issue().unwrap();
        assert_eq!(data.target, "10");
        assert_eq!(data.project, "owner/repo");
        assert_eq!(data.url, None);
        assert_eq!(pending.plain_text(), "#10");
        assert_eq!(pending.span, Span::new(6, 9));
        assert_eq!(para.plain_text(), "Fixes #10.");
    }

    #[test]
    fn test_transform_without_matches_is_noop() {
        let arena = AstArena::new();
        let doc = MarkdownParser::new()
            .parse(&arena, "Nothing to see.\n\n- here either")
            .unwrap();
        let scanner = scanner();
        let tracker = TrackerConfig::new("owner/repo");

        let out = rewrite_root(&mut ScanTransform::new(&arena, &scanner, &tracker), &doc);

        assert!(std::ptr::eq(out.children.as_ptr(), doc.children.as_ptr()));
    }

    #[rstest]
    #[case::inline_code("Use `#10` here")]
    #[case::code_block("```\n#10\n```")]
    #[case::html("<div>\n#10\n</div>")]
    #[case::link("[#10](https://example.com)")]
    #[case::image("![#10](image.png)")]
    fn test_transform_skips_excluded(#[case] source: &str) {
        let arena = AstArena::new();
        let (_, found) = scan(&arena, source);
        assert_eq!(found, 0);
    }

    #[test]
    fn test_transform_nested_inline() {
        let arena = AstArena::new();
        let (doc, found) = scan(&arena, "**bold #1** and *#2*\n\n> quoted #3");

        assert_eq!(found, 3);
        let strong = doc.children[0].children[0];
        assert_eq!(strong.node_type, NodeType::Strong);
        assert_eq!(strong.children[1].node_type, NodeType::PendingIssue);
    }
}
