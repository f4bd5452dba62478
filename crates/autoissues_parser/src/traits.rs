//! Parser trait definition.

use autoissues_ast::{AstArena, TxtNode};

use crate::ParseError;

/// Trait for parsing source text into a document tree.
///
/// # Example
///
/// ```rust,ignore
/// use autoissues_parser::Parser;
/// use autoissues_ast::AstArena;
///
/// struct RstParser;
///
/// impl Parser for RstParser {
///     fn name(&self) -> &str {
///         "rst"
///     }
///
///     fn extensions(&self) -> &[&str] {
///         &["rst"]
///     }
///
///     fn parse<'a>(
///         &self,
///         arena: &'a AstArena,
///         source: &str,
///     ) -> Result<TxtNode<'a>, ParseError> {
///         todo!()
///     }
/// }
/// ```
pub trait Parser {
    /// Returns the name of this parser.
    fn name(&self) -> &str;

    /// Returns the file extensions this parser handles.
    ///
    /// Extensions should not include the leading dot (e.g., `["md", "markdown"]`).
    fn extensions(&self) -> &[&str];

    /// Parses the source text into a tree rooted at a `Document` node.
    ///
    /// All nodes and strings are allocated in `arena`.
    fn parse<'a>(&self, arena: &'a AstArena, source: &str) -> Result<TxtNode<'a>, ParseError>;

    /// Returns true if this parser can handle the given file extension.
    fn can_parse(&self, extension: &str) -> bool {
        self.extensions()
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}
