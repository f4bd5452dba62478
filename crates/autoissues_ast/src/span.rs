//! Span and position types for source locations.

use serde::{Deserialize, Serialize};

/// A position in source text.
///
/// Uses 1-indexed lines and 0-indexed columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (0-indexed, in characters).
    pub column: u32,
}

impl Position {
    /// Creates a new position.
    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// A span representing a range in source text.
///
/// Uses byte offsets (0-indexed) for efficient slicing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (0-indexed, inclusive).
    pub start: u32,
    /// End byte offset (0-indexed, exclusive).
    pub end: u32,
}

impl Span {
    /// Creates a new span.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Returns the length of the span in bytes.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Returns true if the span is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns true if this span contains the given offset.
    #[inline]
    pub const fn contains(&self, offset: u32) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Returns the sub-span `[start, end)` relative to this span's start.
    #[inline]
    pub const fn subspan(&self, start: u32, end: u32) -> Span {
        Span {
            start: self.start + start,
            end: self.start + end,
        }
    }
}

/// Location information combining start and end positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    /// Start position.
    pub start: Position,
    /// End position.
    pub end: Position,
}

impl Location {
    /// Creates a new location.
    #[inline]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// Maps byte offsets of a source text to line/column positions.
#[derive(Debug, Clone)]
pub struct LineIndex<'s> {
    source: &'s str,
    line_starts: Vec<usize>,
}

impl<'s> LineIndex<'s> {
    /// Builds the index for `source`.
    pub fn new(source: &'s str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    /// Returns the position of a byte offset.
    ///
    /// Offsets past the end are clamped to the end of the source.
    pub fn position(&self, offset: u32) -> Position {
        let offset = (offset as usize).min(self.source.len());
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let line_start = self.line_starts[line];
        let column = self
            .source
            .get(line_start..offset)
            .map(|s| s.chars().count())
            .unwrap_or(offset - line_start);
        Position::new(line as u32 + 1, column as u32)
    }

    /// Returns the location of a span.
    pub fn location(&self, span: Span) -> Location {
        Location::new(self.position(span.start), self.position(span.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_span() {
        let span = Span::new(10, 20);
        assert_eq!(span.len(), 10);
        assert!(!span.is_empty());
        assert!(span.contains(15));
        assert!(!span.contains(5));
        assert!(!span.contains(20));
    }

    #[test]
    fn test_empty_span() {
        let span = Span::new(5, 5);
        assert!(span.is_empty());
        assert!(!span.contains(5));
    }

    #[test]
    fn test_subspan() {
        let span = Span::new(10, 20);
        assert_eq!(span.subspan(2, 5), Span::new(12, 15));
    }

    #[test]
    fn test_span_deserialization() {
        let json = r#"{"start": 5, "end": 15}"#;
        let span: Span = serde_json::from_str(json).unwrap();
        assert_eq!(span, Span::new(5, 15));
    }

    #[rstest]
    #[case::start(0, Position::new(1, 0))]
    #[case::first_line(4, Position::new(1, 4))]
    #[case::second_line_start(7, Position::new(2, 0))]
    #[case::second_line(10, Position::new(2, 3))]
    #[case::past_end(100, Position::new(3, 3))]
    fn test_line_index_position(#[case] offset: u32, #[case] expected: Position) {
        let index = LineIndex::new("fix #1\nsee #22\nend");
        assert_eq!(index.position(offset), expected);
    }

    #[test]
    fn test_line_index_counts_characters() {
        let index = LineIndex::new("é #1");
        // "é" is two bytes but one column.
        assert_eq!(index.position(3), Position::new(1, 2));
    }

    #[test]
    fn test_line_index_location() {
        let index = LineIndex::new("a\n#10 b");
        let loc = index.location(Span::new(2, 5));
        assert_eq!(loc, Location::new(Position::new(2, 0), Position::new(2, 3)));
    }
}
