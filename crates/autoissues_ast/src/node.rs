//! TxtNode definition.
//!
//! The core tree node type used throughout autoissues.

use crate::{NodeType, Span};

/// A node in the document tree.
///
/// # Lifetime
///
/// The `'a` lifetime parameter ties this node to its arena allocator,
/// ensuring that all child references remain valid.
///
/// # Example
///
/// ```rust
/// use autoissues_ast::{AstArena, TxtNode, NodeType, Span};
///
/// let arena = AstArena::new();
/// let text_node = arena.alloc(TxtNode::new_text(NodeType::Str, Span::new(0, 5), "Hello"));
/// let children = arena.alloc_slice_copy(&[*text_node]);
/// let paragraph = TxtNode::new_parent(NodeType::Paragraph, Span::new(0, 5), children);
/// assert_eq!(paragraph.children[0].text(), Some("Hello"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TxtNode<'a> {
    /// The type of this node.
    pub node_type: NodeType,

    /// Byte span in the source text.
    pub span: Span,

    /// Child nodes (for parent nodes).
    pub children: &'a [TxtNode<'a>],

    /// Text value (for text nodes like Str, Code, CodeBlock).
    pub value: Option<&'a str>,

    /// Additional node-specific data.
    pub data: NodeData<'a>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NodeData<'a> {
    #[default]
    None,
    Header(u8),
    List(bool),
    CodeBlock(Option<&'a str>),
    Link(LinkData<'a>),
    PendingIssue(PendingIssueData<'a>),
    IssueLink(IssueLinkData<'a>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkData<'a> {
    pub url: &'a str,
    pub title: Option<&'a str>,
}

/// Data carried by a [`NodeType::PendingIssue`] node.
///
/// `project` and `url` are the tracker configuration that was in effect for
/// the document when the reference was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingIssueData<'a> {
    /// The referenced issue id.
    pub target: &'a str,
    /// Tracker project (e.g. `owner/repo`).
    pub project: &'a str,
    /// Tracker base URL, without trailing slashes.
    pub url: Option<&'a str>,
}

/// Data carried by a [`NodeType::IssueLink`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssueLinkData<'a> {
    /// URL of the issue.
    pub url: &'a str,
    /// Issue title, used as the link title.
    pub title: Option<&'a str>,
    /// Whether the issue is closed.
    pub closed: bool,
}

impl<'a> TxtNode<'a> {
    /// Creates a new parent node with children.
    #[inline]
    pub const fn new_parent(node_type: NodeType, span: Span, children: &'a [TxtNode<'a>]) -> Self {
        Self {
            node_type,
            span,
            children,
            value: None,
            data: NodeData::new(),
        }
    }

    /// Creates a new text node with a value.
    #[inline]
    pub const fn new_text(node_type: NodeType, span: Span, value: &'a str) -> Self {
        Self {
            node_type,
            span,
            children: &[],
            value: Some(value),
            data: NodeData::new(),
        }
    }

    /// Creates a new leaf node (no children, no value).
    #[inline]
    pub const fn new_leaf(node_type: NodeType, span: Span) -> Self {
        Self {
            node_type,
            span,
            children: &[],
            value: None,
            data: NodeData::new(),
        }
    }

    /// Returns a copy of this node with different children.
    #[inline]
    pub const fn with_children(self, children: &'a [TxtNode<'a>]) -> Self {
        Self { children, ..self }
    }

    /// Returns true if this node has children.
    #[inline]
    pub const fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Returns true if this node is a text node.
    #[inline]
    pub const fn is_text(&self) -> bool {
        self.value.is_some()
    }

    /// Returns the raw text content of this node.
    #[inline]
    pub const fn text(&self) -> Option<&'a str> {
        self.value
    }

    /// Concatenates the text of this node and all its descendants.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(value) = self.value {
            out.push_str(value);
        }
        for child in self.children {
            child.collect_text(out);
        }
    }
}

impl<'a> NodeData<'a> {
    /// Creates new empty node data.
    #[inline]
    pub const fn new() -> Self {
        Self::None
    }

    /// Creates node data for a header.
    #[inline]
    pub const fn header(depth: u8) -> Self {
        Self::Header(depth)
    }

    /// Creates node data for a link.
    #[inline]
    pub const fn link(url: &'a str, title: Option<&'a str>) -> Self {
        Self::Link(LinkData { url, title })
    }

    /// Creates node data for a code block.
    #[inline]
    pub const fn code_block(lang: Option<&'a str>) -> Self {
        Self::CodeBlock(lang)
    }

    /// Creates node data for a list.
    #[inline]
    pub const fn list(ordered: bool) -> Self {
        Self::List(ordered)
    }

    /// Creates node data for a pending issue reference.
    #[inline]
    pub const fn pending_issue(target: &'a str, project: &'a str, url: Option<&'a str>) -> Self {
        Self::PendingIssue(PendingIssueData {
            target,
            project,
            url,
        })
    }

    /// Creates node data for a resolved issue link.
    #[inline]
    pub const fn issue_link(url: &'a str, title: Option<&'a str>, closed: bool) -> Self {
        Self::IssueLink(IssueLinkData { url, title, closed })
    }

    /// Returns the pending issue data, if any.
    #[inline]
    pub const fn as_pending_issue(&self) -> Option<&PendingIssueData<'a>> {
        match self {
            Self::PendingIssue(data) => Some(data),
            _ => None,
        }
    }
}
