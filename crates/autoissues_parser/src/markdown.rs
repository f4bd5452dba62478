//! Markdown parser using markdown-rs (wooorm/markdown-rs).
//!
//! This parser converts Markdown to the document tree using the `markdown`
//! crate, which provides mdast-compatible AST output.

use std::collections::HashMap;

use autoissues_ast::{AstArena, NodeData, NodeType, Span, TxtNode};
use markdown::mdast::Node;
use markdown::{ParseOptions, to_mdast};

use crate::{ParseError, Parser};

/// Markdown parser implementation.
///
/// Parses CommonMark with the GFM extensions (tables, strikethrough,
/// autolinks). Link and image references are resolved against the
/// document's definitions so they carry their target URL.
pub struct MarkdownParser;

impl MarkdownParser {
    /// Creates a new Markdown parser with default options.
    pub fn new() -> Self {
        Self
    }

    /// Gets default parse options (GFM).
    fn default_options() -> ParseOptions {
        ParseOptions::gfm()
    }
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for MarkdownParser {
    fn name(&self) -> &str {
        "markdown"
    }

    fn extensions(&self) -> &[&str] {
        &["md", "markdown", "mdown", "mkdn", "mkd"]
    }

    fn parse<'a>(&self, arena: &'a AstArena, source: &str) -> Result<TxtNode<'a>, ParseError> {
        ParseError::check_len(source)?;
        let options = Self::default_options();
        let mdast =
            to_mdast(source, &options).map_err(|e| ParseError::invalid_source(e.to_string()))?;

        let mut definitions = HashMap::new();
        collect_definitions(&mdast, &mut definitions);

        let converter = Converter {
            arena,
            definitions: &definitions,
        };
        Ok(converter.convert_node(&mdast))
    }
}

/// Link definitions by normalized identifier: `(url, title)`.
type Definitions<'m> = HashMap<&'m str, (&'m str, Option<&'m str>)>;

fn collect_definitions<'m>(node: &'m Node, out: &mut Definitions<'m>) {
    if let Node::Definition(def) = node {
        // First definition wins, as in CommonMark.
        out.entry(def.identifier.as_str())
            .or_insert((def.url.as_str(), def.title.as_deref()));
    }
    if let Some(children) = node.children() {
        for child in children {
            collect_definitions(child, out);
        }
    }
}

struct Converter<'a, 'm> {
    arena: &'a AstArena,
    definitions: &'m Definitions<'m>,
}

impl<'a> Converter<'a, '_> {
    /// Converts an mdast node to a TxtNode.
    fn convert_node(&self, node: &Node) -> TxtNode<'a> {
        match node {
            Node::Root(root) => self.parent(node, &root.children, NodeType::Document),

            Node::Paragraph(para) => self.parent(node, &para.children, NodeType::Paragraph),

            Node::Heading(heading) => {
                let mut out = self.parent(node, &heading.children, NodeType::Header);
                out.data = NodeData::header(heading.depth);
                out
            }

            Node::Text(text) => self.text(node, &text.value, NodeType::Str),

            Node::Emphasis(em) => self.parent(node, &em.children, NodeType::Emphasis),

            Node::Strong(strong) => self.parent(node, &strong.children, NodeType::Strong),

            Node::Delete(del) => self.parent(node, &del.children, NodeType::Delete),

            Node::InlineCode(code) => self.text(node, &code.value, NodeType::Code),

            Node::Code(code) => {
                let mut out = self.text(node, &code.value, NodeType::CodeBlock);
                if let Some(lang) = &code.lang {
                    out.data = NodeData::code_block(Some(self.arena.alloc_str(lang)));
                }
                out
            }

            Node::Html(html) => self.text(node, &html.value, NodeType::Html),

            Node::Link(link) => {
                let mut out = self.parent(node, &link.children, NodeType::Link);
                out.data = self.link_data(&link.url, link.title.as_deref());
                out
            }

            Node::LinkReference(reference) => {
                let mut out = self.parent(node, &reference.children, NodeType::LinkReference);
                if let Some((url, title)) = self.definitions.get(reference.identifier.as_str()) {
                    out.data = self.link_data(url, *title);
                }
                out
            }

            Node::Image(image) => {
                let mut out = self.text(node, &image.alt, NodeType::Image);
                out.data = self.link_data(&image.url, image.title.as_deref());
                out
            }

            Node::ImageReference(reference) => {
                let mut out = self.text(node, &reference.alt, NodeType::Image);
                if let Some((url, title)) = self.definitions.get(reference.identifier.as_str()) {
                    out.data = self.link_data(url, *title);
                }
                out
            }

            Node::List(list) => {
                let mut out = self.parent(node, &list.children, NodeType::List);
                out.data = NodeData::list(list.ordered);
                out
            }

            Node::ListItem(item) => self.parent(node, &item.children, NodeType::ListItem),

            Node::Blockquote(quote) => self.parent(node, &quote.children, NodeType::BlockQuote),

            Node::ThematicBreak(_) => self.leaf(node, NodeType::HorizontalRule),

            Node::Break(_) => self.leaf(node, NodeType::Break),

            // Table support (GFM)
            Node::Table(table) => self.parent(node, &table.children, NodeType::Table),

            Node::TableRow(row) => self.parent(node, &row.children, NodeType::TableRow),

            Node::TableCell(cell) => self.parent(node, &cell.children, NodeType::TableCell),

            // Definitions, footnotes and other nodes without a rendering of
            // their own become empty raw nodes.
            _ => self.leaf(node, NodeType::Html),
        }
    }

    fn parent(&self, node: &Node, children: &[Node], node_type: NodeType) -> TxtNode<'a> {
        let children = self
            .arena
            .alloc_slice_fill_iter(children.iter().map(|child| self.convert_node(child)));
        TxtNode::new_parent(node_type, node_span(node), children)
    }

    fn text(&self, node: &Node, text: &str, node_type: NodeType) -> TxtNode<'a> {
        TxtNode::new_text(node_type, node_span(node), self.arena.alloc_str(text))
    }

    fn leaf(&self, node: &Node, node_type: NodeType) -> TxtNode<'a> {
        TxtNode::new_leaf(node_type, node_span(node))
    }

    fn link_data(&self, url: &str, title: Option<&str>) -> NodeData<'a> {
        let url = self.arena.alloc_str(url);
        let title = title.map(|t| self.arena.alloc_str(t));
        NodeData::link(url, title)
    }
}

/// Gets the span for an mdast node.
fn node_span(node: &Node) -> Span {
    match node.position() {
        Some(pos) => Span::new(pos.start.offset as u32, pos.end.offset as u32),
        None => Span::new(0, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse<'a>(arena: &'a AstArena, source: &str) -> TxtNode<'a> {
        MarkdownParser::new().parse(arena, source).unwrap()
    }

    #[test]
    fn test_parse_simple_markdown() {
        let arena = AstArena::new();
        let ast = parse(&arena, "# Hello\n\nThis is a paragraph.");

        assert_eq!(ast.node_type, NodeType::Document);
        assert_eq!(ast.children.len(), 2);
        assert_eq!(ast.children[0].data, NodeData::Header(1));
        assert_eq!(ast.children[1].node_type, NodeType::Paragraph);
    }

    #[test]
    fn test_parse_issue_reference_text() {
        let arena = AstArena::new();
        let ast = parse(&arena, "Fixed in #10.");

        let paragraph = &ast.children[0];
        assert_eq!(paragraph.children.len(), 1);
        assert_eq!(paragraph.children[0].node_type, NodeType::Str);
        assert_eq!(paragraph.children[0].text(), Some("Fixed in #10."));
        assert_eq!(paragraph.children[0].span, Span::new(0, 13));
    }

    #[test]
    fn test_parse_role_markup() {
        let arena = AstArena::new();
        let ast = parse(&arena, "See :issue:`10` now");

        let kinds: Vec<_> = ast.children[0]
            .children
            .iter()
            .map(|c| (c.node_type, c.text()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (NodeType::Str, Some("See :issue:")),
                (NodeType::Code, Some("10")),
                (NodeType::Str, Some(" now")),
            ]
        );
    }

    #[test]
    fn test_parse_link() {
        let arena = AstArena::new();
        let ast = parse(&arena, "[Example](https://example.com \"Title\")");

        let link = &ast.children[0].children[0];
        assert_eq!(link.node_type, NodeType::Link);
        assert_eq!(link.data, NodeData::link("https://example.com", Some("Title")));
        assert_eq!(link.plain_text(), "Example");
    }

    #[test]
    fn test_parse_link_reference_resolves_definition() {
        let arena = AstArena::new();
        let ast = parse(&arena, "See [the bug][bug].\n\n[bug]: https://example.com/1");

        let reference = ast.children[0]
            .children
            .iter()
            .find(|c| c.node_type == NodeType::LinkReference)
            .unwrap();
        assert_eq!(reference.data, NodeData::link("https://example.com/1", None));
    }

    #[test]
    fn test_parse_image() {
        let arena = AstArena::new();
        let ast = parse(&arena, "![Alt text](image.png \"Title\")");

        let image = &ast.children[0].children[0];
        assert_eq!(image.node_type, NodeType::Image);
        assert_eq!(image.text(), Some("Alt text"));
        assert_eq!(image.data, NodeData::link("image.png", Some("Title")));
    }

    #[test]
    fn test_parse_code_block() {
        let arena = AstArena::new();
        let ast = parse(&arena, "```rust\nlet x = \"#10\";\n```");

        let code_block = &ast.children[0];
        assert_eq!(code_block.node_type, NodeType::CodeBlock);
        assert_eq!(code_block.data, NodeData::CodeBlock(Some("rust")));
        assert_eq!(code_block.text(), Some("let x = \"#10\";"));
    }

    #[test]
    fn test_parse_code_block_no_language() {
        let arena = AstArena::new();
        let ast = parse(&arena, "```\nplain code\n```");

        assert_eq!(ast.children[0].data, NodeData::None);
    }

    #[test]
    fn test_parse_lists() {
        let arena = AstArena::new();
        let ast = parse(&arena, "- Item 1\n- Item 2\n\n1. First");

        assert_eq!(ast.children[0].data, NodeData::List(false));
        assert_eq!(ast.children[0].children.len(), 2);
        assert!(
            ast.children[0]
                .children
                .iter()
                .all(|c| c.node_type == NodeType::ListItem)
        );
        assert_eq!(ast.children[1].data, NodeData::List(true));
    }

    #[test]
    fn test_parse_table() {
        let arena = AstArena::new();
        let ast = parse(&arena, "| A | B |\n|---|---|\n| #1 | #2 |");

        let table = &ast.children[0];
        assert_eq!(table.node_type, NodeType::Table);
        assert_eq!(table.children[0].node_type, NodeType::TableRow);
        assert_eq!(table.children[0].children[0].node_type, NodeType::TableCell);
    }

    #[test]
    fn test_parse_html_and_breaks() {
        let arena = AstArena::new();
        let ast = parse(&arena, "<div>#10</div>\n\n---");

        assert_eq!(ast.children[0].node_type, NodeType::Html);
        assert_eq!(ast.children[0].text(), Some("<div>#10</div>"));
        assert_eq!(ast.children[1].node_type, NodeType::HorizontalRule);
    }

    #[test]
    fn test_parse_emphasis_and_strikethrough() {
        let arena = AstArena::new();
        let ast = parse(&arena, "*italic* **bold** ~~gone~~");

        let kinds: Vec<_> = ast.children[0].children.iter().map(|c| c.node_type).collect();
        assert!(kinds.contains(&NodeType::Emphasis));
        assert!(kinds.contains(&NodeType::Strong));
        assert!(kinds.contains(&NodeType::Delete));
    }

    #[test]
    fn test_parse_empty_document() {
        let arena = AstArena::new();
        let ast = parse(&arena, "");

        assert_eq!(ast.node_type, NodeType::Document);
        assert!(ast.children.is_empty());
    }

    #[test]
    fn test_extensions() {
        let parser = MarkdownParser::new();

        assert!(parser.can_parse("md"));
        assert!(parser.can_parse("MD"));
        assert!(!parser.can_parse("txt"));
        assert_eq!(parser.name(), "markdown");
    }
}
