//! Plain text parser.
//!
//! Splits the source into paragraphs on blank lines. Each paragraph holds a
//! single `Str` node with the paragraph text.

use autoissues_ast::{AstArena, NodeType, Span, TxtNode};

use crate::{ParseError, Parser};

/// Plain text parser implementation.
pub struct PlainTextParser;

impl PlainTextParser {
    /// Creates a new plain text parser.
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlainTextParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for PlainTextParser {
    fn name(&self) -> &str {
        "text"
    }

    fn extensions(&self) -> &[&str] {
        &["txt", "text"]
    }

    fn parse<'a>(&self, arena: &'a AstArena, source: &str) -> Result<TxtNode<'a>, ParseError> {
        ParseError::check_len(source)?;

        let mut paragraphs = Vec::new();
        let mut start: Option<usize> = None;
        let mut end = 0;
        let mut offset = 0;

        for line in source.split_inclusive('\n') {
            let content_len = line.trim_end_matches(['\n', '\r']).len();
            if line.trim().is_empty() {
                if let Some(s) = start.take() {
                    paragraphs.push(paragraph(arena, source, s, end));
                }
            } else {
                start.get_or_insert(offset);
                end = offset + content_len;
            }
            offset += line.len();
        }
        if let Some(s) = start {
            paragraphs.push(paragraph(arena, source, s, end));
        }

        Ok(TxtNode::new_parent(
            NodeType::Document,
            Span::new(0, source.len() as u32),
            arena.alloc_slice_copy(&paragraphs),
        ))
    }
}

fn paragraph<'a>(arena: &'a AstArena, source: &str, start: usize, end: usize) -> TxtNode<'a> {
    let span = Span::new(start as u32, end as u32);
    let text = TxtNode::new_text(NodeType::Str, span, arena.alloc_str(&source[start..end]));
    TxtNode::new_parent(NodeType::Paragraph, span, arena.alloc_slice_copy(&[text]))
}
