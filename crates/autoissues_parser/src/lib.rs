//! # autoissues_parser
//!
//! Turns source documents into the [`autoissues_ast`] tree.
//!
//! This crate provides:
//! - A [`Parser`] trait for document formats
//! - A Markdown parser built on `markdown-rs` (CommonMark + GFM)
//! - A plain text parser
//!
//! ## Example
//!
//! ```rust
//! use autoissues_ast::{AstArena, NodeType};
//! use autoissues_parser::{MarkdownParser, Parser};
//!
//! let arena = AstArena::new();
//! let parser = MarkdownParser::new();
//! let doc = parser.parse(&arena, "Fixed in #10.").unwrap();
//! assert_eq!(doc.node_type, NodeType::Document);
//! ```

mod error;
mod markdown;
mod text;
mod traits;

pub use error::ParseError;
pub use markdown::MarkdownParser;
pub use text::PlainTextParser;
pub use traits::Parser;

/// Returns the built-in parser for a file extension, if any.
pub fn parser_for_extension(extension: &str) -> Option<Box<dyn Parser + Send + Sync>> {
    let markdown = MarkdownParser::new();
    if markdown.can_parse(extension) {
        return Some(Box::new(markdown));
    }
    let text = PlainTextParser::new();
    if text.can_parse(extension) {
        return Some(Box::new(text));
    }
    None
}
