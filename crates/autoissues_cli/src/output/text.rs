//! Plain text output

use autoissues_ast::{NodeData, NodeType, TxtNode};

/// Renders a document as plain text.
///
/// Issue links are written as `text <url>`.
pub fn render_text(tree: &TxtNode<'_>) -> String {
    let mut blocks = Vec::new();
    collect_blocks(tree, "", &mut blocks);
    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}

fn collect_blocks(node: &TxtNode<'_>, prefix: &str, blocks: &mut Vec<String>) {
    match node.node_type {
        NodeType::Document | NodeType::BlockQuote | NodeType::Table => {
            let prefix = if node.node_type == NodeType::BlockQuote {
                format!("{prefix}> ")
            } else {
                prefix.to_string()
            };
            for child in node.children {
                collect_blocks(child, &prefix, blocks);
            }
        }
        NodeType::List => {
            let ordered = matches!(node.data, NodeData::List(true));
            for (i, item) in node.children.iter().enumerate() {
                let marker = if ordered {
                    format!("{prefix}{}. ", i + 1)
                } else {
                    format!("{prefix}- ")
                };
                let mut inner = Vec::new();
                for child in item.children {
                    collect_blocks(child, "", &mut inner);
                }
                blocks.push(format!("{marker}{}", inner.join(" ")));
            }
        }
        NodeType::CodeBlock => {
            let code = node
                .text()
                .unwrap_or_default()
                .lines()
                .map(|line| format!("{prefix}    {line}"))
                .collect::<Vec<_>>()
                .join("\n");
            blocks.push(code);
        }
        NodeType::HorizontalRule => blocks.push(format!("{prefix}----")),
        NodeType::Header => {
            let depth = match node.data {
                NodeData::Header(depth) => depth as usize,
                _ => 1,
            };
            blocks.push(format!("{prefix}{} {}", "#".repeat(depth), inline(node)));
        }
        NodeType::TableRow => {
            let cells: Vec<String> = node.children.iter().map(inline).collect();
            blocks.push(format!("{prefix}{}", cells.join(" | ")));
        }
        NodeType::Html if node.text().is_none() => {}
        _ => blocks.push(format!("{prefix}{}", inline(node))),
    }
}

fn inline(node: &TxtNode<'_>) -> String {
    let mut out = String::new();
    push_inline(node, &mut out);
    out
}

fn push_inline(node: &TxtNode<'_>, out: &mut String) {
    match node.node_type {
        NodeType::Break => out.push('\n'),
        NodeType::IssueLink => {
            for child in node.children {
                push_inline(child, out);
            }
            if let NodeData::IssueLink(link) = node.data {
                out.push_str(&format!(" <{}>", link.url));
            }
        }
        _ => {
            if let Some(text) = node.text() {
                out.push_str(text);
            }
            for child in node.children {
                push_inline(child, out);
            }
        }
    }
}
