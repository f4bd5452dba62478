//! HTML output

use autoissues_ast::{NodeData, NodeType, TxtNode};

use autoissues_core::stylesheet::{STATIC_DIR, STYLESHEET_NAME};

/// Renders a document as a standalone HTML page.
///
/// `depth` is the directory depth of the page below the output directory,
/// used to link the stylesheet.
pub fn render_html(tree: &TxtNode<'_>, depth: usize) -> String {
    let mut renderer = HtmlRenderer::default();
    renderer.node(tree);

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <link rel=\"stylesheet\" href=\"{}{}/{}\">\n</head>\n<body>\n{}</body>\n</html>\n",
        "../".repeat(depth),
        STATIC_DIR,
        STYLESHEET_NAME,
        renderer.out
    )
}

#[derive(Default)]
struct HtmlRenderer {
    out: String,
}

impl HtmlRenderer {
    fn node(&mut self, node: &TxtNode<'_>) {
        match node.node_type {
            NodeType::Document => self.children(node),
            NodeType::Paragraph => self.block("p", node),
            NodeType::Header => {
                let depth = match node.data {
                    NodeData::Header(depth) => depth.clamp(1, 6),
                    _ => 1,
                };
                self.block(&format!("h{depth}"), node);
            }
            NodeType::BlockQuote => self.block("blockquote", node),
            NodeType::List => {
                let tag = match node.data {
                    NodeData::List(true) => "ol",
                    _ => "ul",
                };
                self.block(tag, node);
            }
            NodeType::ListItem => self.block("li", node),
            NodeType::Table => self.block("table", node),
            NodeType::TableRow => self.block("tr", node),
            NodeType::TableCell => self.inline("td", node),
            NodeType::CodeBlock => {
                self.out.push_str("<pre><code>");
                self.text(node.text().unwrap_or_default());
                self.out.push_str("</code></pre>\n");
            }
            NodeType::HorizontalRule => self.out.push_str("<hr>\n"),
            NodeType::Html => self.out.push_str(node.text().unwrap_or_default()),
            NodeType::Str => self.text(node.text().unwrap_or_default()),
            NodeType::Break => self.out.push_str("<br>\n"),
            NodeType::Emphasis => self.inline("em", node),
            NodeType::Strong => self.inline("strong", node),
            NodeType::Delete => self.inline("del", node),
            NodeType::Code => {
                self.out.push_str("<code>");
                self.text(node.text().unwrap_or_default());
                self.out.push_str("</code>");
            }
            NodeType::Link | NodeType::LinkReference => match node.data {
                NodeData::Link(link) => {
                    self.out.push_str("<a href=\"");
                    self.text(link.url);
                    self.out.push('"');
                    if let Some(title) = link.title {
                        self.attr("title", title);
                    }
                    self.out.push('>');
                    self.children(node);
                    self.out.push_str("</a>");
                }
                _ => self.children(node),
            },
            NodeType::Image => {
                self.out.push_str("<img");
                if let NodeData::Link(link) = node.data {
                    self.attr("src", link.url);
                }
                self.attr("alt", node.text().unwrap_or_default());
                self.out.push('>');
            }
            NodeType::PendingIssue => self.children(node),
            NodeType::IssueLink => {
                let NodeData::IssueLink(link) = node.data else {
                    return self.children(node);
                };
                self.out.push_str("<a class=\"reference external\"");
                self.attr("href", link.url);
                if let Some(title) = link.title {
                    self.attr("title", title);
                }
                self.out.push_str("><span class=\"xref issue");
                if link.closed {
                    self.out.push_str(" closed");
                }
                self.out.push_str("\">");
                self.children(node);
                self.out.push_str("</span></a>");
            }
        }
    }

    fn children(&mut self, node: &TxtNode<'_>) {
        for child in node.children {
            self.node(child);
        }
    }

    fn block(&mut self, tag: &str, node: &TxtNode<'_>) {
        self.out.push_str(&format!("<{tag}>"));
        self.children(node);
        self.out.push_str(&format!("</{tag}>\n"));
    }

    fn inline(&mut self, tag: &str, node: &TxtNode<'_>) {
        self.out.push_str(&format!("<{tag}>"));
        self.children(node);
        self.out.push_str(&format!("</{tag}>"));
    }

    fn attr(&mut self, name: &str, value: &str) {
        self.out.push_str(&format!(" {name}=\""));
        self.text(value);
        self.out.push('"');
    }

    fn text(&mut self, text: &str) {
        for c in text.chars() {
            match c {
                '&' => self.out.push_str("&amp;"),
                '<' => self.out.push_str("&lt;"),
                '>' => self.out.push_str("&gt;"),
                '"' => self.out.push_str("&quot;"),
                _ => self.out.push(c),
            }
        }
    }
}
