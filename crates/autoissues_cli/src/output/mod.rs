//! Output formatting module

mod html;
mod text;

use autoissues_ast::TxtNode;

use crate::cli::Builder;

/// Renders a resolved document.
///
/// `depth` is the directory depth of the written file below the output
/// directory.
pub fn render(tree: &TxtNode<'_>, builder: Builder, depth: usize) -> String {
    match builder {
        Builder::Html => html::render_html(tree, depth),
        Builder::Text => text::render_text(tree),
    }
}
