//! Resolution of pending issue references.

use std::ops::ControlFlow;

use autoissues_ast::visitor::{rewrite_root, walk_node};
use autoissues_ast::{
    AstArena, MutVisitor, NodeData, NodeType, Rewrite, Span, TxtNode, VisitResult, Visitor,
};
use autoissues_tracker::{Issue, IssueTracker, TrackerConfig};
use tracing::debug;

use crate::{BuildEnvironment, CoreError, format_issue};

/// A pending reference found in a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReference {
    /// The referenced issue id.
    pub target: String,
    /// The display text, unformatted.
    pub display: String,
    /// Tracker configuration of the document.
    pub tracker: TrackerConfig,
    /// Byte span of the reference in the source.
    pub span: Span,
}

impl PendingReference {
    fn from_node(node: &TxtNode<'_>) -> Option<Self> {
        let data = node.data.as_pending_issue()?;
        Some(Self {
            target: data.target.to_string(),
            display: node.plain_text(),
            tracker: TrackerConfig::with_optional_url(data.project, data.url.map(String::from)),
            span: node.span,
        })
    }
}

struct Collector {
    references: Vec<PendingReference>,
}

impl<'a> Visitor<'a> for Collector {
    fn visit_pending_issue(&mut self, node: &TxtNode<'a>) -> VisitResult {
        self.references.extend(PendingReference::from_node(node));
        ControlFlow::Continue(())
    }
}

/// Returns the pending references of `tree` in document order.
pub fn collect_references(tree: &TxtNode<'_>) -> Vec<PendingReference> {
    let mut collector = Collector {
        references: Vec::new(),
    };
    let _ = walk_node(&mut collector, tree);
    collector.references
}

/// Looks up one issue through the build cache.
///
/// Without a tracker nothing is looked up and nothing is cached.
pub fn lookup_issue(
    env: &BuildEnvironment,
    tracker: Option<&dyn IssueTracker>,
    config: &TrackerConfig,
    issue_id: &str,
) -> Result<Option<Issue>, CoreError> {
    match tracker {
        Some(tracker) => env.lookup(tracker, config, issue_id),
        None => Ok(None),
    }
}

/// Looks up every pending reference of `tree`, filling the cache.
///
/// Returns the number of references.
pub fn lookup_issues(
    env: &BuildEnvironment,
    tracker: Option<&dyn IssueTracker>,
    tree: &TxtNode<'_>,
) -> Result<usize, CoreError> {
    let references = collect_references(tree);
    if tracker.is_none() {
        return Ok(references.len());
    }
    for reference in &references {
        lookup_issue(env, tracker, &reference.tracker, &reference.target)?;
    }
    Ok(references.len())
}

/// Creates a resolved reference node for `issue`.
///
/// `content` is the display text, already formatted.
pub fn make_issue_reference<'a>(
    arena: &'a AstArena,
    issue: &Issue,
    content: &str,
    span: Span,
) -> TxtNode<'a> {
    let text = TxtNode::new_text(NodeType::Str, span, arena.alloc_str(content));
    let mut node = TxtNode::new_parent(NodeType::IssueLink, span, arena.alloc_slice_copy(&[text]));
    let title = (!issue.title.is_empty()).then(|| &*arena.alloc_str(&issue.title));
    node.data = NodeData::issue_link(arena.alloc_str(&issue.url), title, issue.closed);
    node
}

/// Tree transform replacing pending references with their resolution.
///
/// A found issue becomes an `IssueLink`. A reference to a missing issue is
/// replaced by its display content.
pub struct ResolveTransform<'a, 'e> {
    arena: &'a AstArena,
    env: &'e BuildEnvironment,
    tracker: Option<&'e dyn IssueTracker>,
    resolved: usize,
    error: Option<CoreError>,
}

impl<'a, 'e> ResolveTransform<'a, 'e> {
    /// Creates the transform.
    pub fn new(
        arena: &'a AstArena,
        env: &'e BuildEnvironment,
        tracker: Option<&'e dyn IssueTracker>,
    ) -> Self {
        Self {
            arena,
            env,
            tracker,
            resolved: 0,
            error: None,
        }
    }

    /// Returns the number of references resolved to a link.
    pub fn resolved(&self) -> usize {
        self.resolved
    }

    /// Returns the first error hit during the transform.
    pub fn into_error(self) -> Option<CoreError> {
        self.error
    }
}

impl<'a> MutVisitor<'a> for ResolveTransform<'a, '_> {
    fn arena(&self) -> &'a AstArena {
        self.arena
    }

    fn visit_pending_issue_mut(&mut self, node: &TxtNode<'a>) -> Rewrite<'a> {
        let Some(reference) = PendingReference::from_node(node) else {
            return Rewrite::Keep;
        };
        if self.error.is_some() {
            return Rewrite::Keep;
        }

        match lookup_issue(self.env, self.tracker, &reference.tracker, &reference.target) {
            Ok(Some(issue)) => {
                let content = format_issue(&reference.display, &issue);
                self.resolved += 1;
                Rewrite::Replace(make_issue_reference(self.arena, &issue, &content, node.span))
            }
            Ok(None) => {
                debug!("Issue {} not found, keeping text", reference.target);
                Rewrite::Splice(node.children.to_vec())
            }
            Err(e) => {
                self.error = Some(e);
                Rewrite::Keep
            }
        }
    }
}

/// Resolves every pending reference of `tree` and returns the new tree.
pub fn resolve_references<'a>(
    arena: &'a AstArena,
    env: &BuildEnvironment,
    tracker: Option<&dyn IssueTracker>,
    tree: &TxtNode<'a>,
) -> Result<TxtNode<'a>, CoreError> {
    let mut transform = ResolveTransform::new(arena, env, tracker);
    let out = rewrite_root(&mut transform, tree);
    debug!("Resolved {} issue references", transform.resolved());
    match transform.into_error() {
        Some(e) => Err(e),
        None => Ok(out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::pending_issue;
    use autoissues_tracker::{Lookup, TrackerError, TrackerState};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedTracker {
        calls: AtomicUsize,
    }

    impl FixedTracker {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl IssueTracker for FixedTracker {
        fn name(&self) -> &str {
            "fixed"
        }

        fn lookup(
            &self,
            _state: &dyn TrackerState,
            config: &TrackerConfig,
            issue_id: &str,
        ) -> Result<Lookup, TrackerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if config.project().is_empty() {
                return Err(TrackerError::config("missing project"));
            }
            Ok(match issue_id {
                "10" => Lookup::Found(Issue::new("10", "Eggs", "https://example.com/10", true)),
                "11" => Lookup::Found(Issue::new("11", "", "https://example.com/11", false)),
                "503" => Lookup::Unavailable,
                _ => Lookup::NotFound,
            })
        }
    }

    fn document<'a>(arena: &'a AstArena, project: &str, refs: &[(&str, &str)]) -> TxtNode<'a> {
        let tracker = TrackerConfig::new(project);
        let mut children = vec![TxtNode::new_text(NodeType::Str, Span::new(0, 4), "See ")];
        let mut offset = 4;
        for (target, display) in refs {
            let end = offset + display.len() as u32;
            children.push(pending_issue(arena, &tracker, target, display, Span::new(offset, end)));
            offset = end;
        }
        let para = TxtNode::new_parent(
            NodeType::Paragraph,
            Span::new(0, offset),
            arena.alloc_slice_copy(&children),
        );
        TxtNode::new_parent(
            NodeType::Document,
            Span::new(0, offset),
            arena.alloc_slice_copy(&[para]),
        )
    }

    #[test]
    fn test_collect_references() {
        let arena = AstArena::new();
        let doc = document(&arena, "owner/repo", &[("10", "#10"), ("12", "{issue.title}")]);

        let refs = collect_references(&doc);

        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].target, "10");
        assert_eq!(refs[0].display, "#10");
        assert_eq!(refs[0].span, Span::new(4, 7));
        assert_eq!(refs[1].display, "{issue.title}");
        assert_eq!(refs[1].tracker, TrackerConfig::new("owner/repo"));
    }

    #[test]
    fn test_lookup_issues_fills_cache() {
        let arena = AstArena::new();
        let env = BuildEnvironment::new();
        let tracker = FixedTracker::new();
        let doc = document(&arena, "owner/repo", &[("10", "#10"), ("10", "#10"), ("404", "#404")]);

        let count = lookup_issues(&env, Some(&tracker), &doc).unwrap();

        assert_eq!(count, 3);
        assert_eq!(tracker.calls.load(Ordering::SeqCst), 2);
        let config = TrackerConfig::new("owner/repo");
        assert!(env.cached(&config, "10").unwrap().is_some());
        assert_eq!(env.cached(&config, "404"), Some(None));
    }

    #[test]
    fn test_lookup_without_tracker_is_skipped() {
        let env = BuildEnvironment::new();
        let config = TrackerConfig::new("owner/repo");

        assert_eq!(lookup_issue(&env, None, &config, "10").unwrap(), None);
        assert!(env.is_empty());
    }

    #[test]
    fn test_make_issue_reference() {
        let arena = AstArena::new();
        let issue = Issue::new("10", "Eggs", "https://example.com/10", true);

        let node = make_issue_reference(&arena, &issue, "#10", Span::new(0, 3));

        assert_eq!(node.node_type, NodeType::IssueLink);
        assert_eq!(
            node.data,
            NodeData::issue_link("https://example.com/10", Some("Eggs"), true)
        );
        assert_eq!(node.plain_text(), "#10");
    }

    #[test]
    fn test_make_issue_reference_without_title() {
        let arena = AstArena::new();
        let issue = Issue::new("11", "", "https://example.com/11", false);

        let node = make_issue_reference(&arena, &issue, "#11", Span::new(0, 3));

        assert_eq!(
            node.data,
            NodeData::issue_link("https://example.com/11", None, false)
        );
    }

    #[test]
    fn test_resolve_references() {
        let arena = AstArena::new();
        let env = BuildEnvironment::new();
        let tracker = FixedTracker::new();
        let doc = document(
            &arena,
            "owner/repo",
            &[("10", "{issue.title} (#{issue.id})"), ("404", "#404")],
        );

        let out = resolve_references(&arena, &env, Some(&tracker), &doc).unwrap();

        let para = out.children[0];
        let kinds: Vec<_> = para
            .children
            .iter()
            .map(|c| (c.node_type, c.plain_text()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (NodeType::Str, "See ".to_string()),
                (NodeType::IssueLink, "Eggs (#10)".to_string()),
                (NodeType::Str, "#404".to_string()),
            ]
        );
        assert!(collect_references(&out).is_empty());
    }

    #[test]
    fn test_resolve_unavailable_issue_keeps_text() {
        let arena = AstArena::new();
        let env = BuildEnvironment::new();
        let tracker = FixedTracker::new();
        let doc = document(&arena, "owner/repo", &[("503", "#503")]);

        let out = resolve_references(&arena, &env, Some(&tracker), &doc).unwrap();

        assert_eq!(out.plain_text(), "See #503");
        assert!(collect_references(&out).is_empty());
    }

    #[test]
    fn test_resolve_without_tracker_keeps_text() {
        let arena = AstArena::new();
        let env = BuildEnvironment::new();
        let doc = document(&arena, "owner/repo", &[("10", "#10")]);

        let out = resolve_references(&arena, &env, None, &doc).unwrap();

        assert_eq!(out.plain_text(), "See #10");
        assert!(collect_references(&out).is_empty());
    }

    #[test]
    fn test_resolve_propagates_config_error() {
        let arena = AstArena::new();
        let env = BuildEnvironment::new();
        let tracker = FixedTracker::new();
        let doc = document(&arena, "", &[("10", "#10")]);

        let err = resolve_references(&arena, &env, Some(&tracker), &doc).unwrap_err();

        assert!(err.is_config());
    }
}
