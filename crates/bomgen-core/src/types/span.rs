//! Source spans
//!
//! Offsets are character (Unicode scalar value) offsets into the source
//! document text, never byte offsets, so they can be handed straight to a
//! text-editing widget.

use serde::{Deserialize, Serialize};

/// Half-open `[start, end)` character range in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Span covering the whole of `text`
    pub fn whole(text: &str) -> Self {
        Self::new(0, text.chars().count())
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_counts_characters() {
        assert_eq!(Span::whole("abc"), Span::new(0, 3));
        assert_eq!(Span::whole("prix: 5€"), Span::new(0, 8));
        assert!(Span::whole("").is_empty());
    }

    #[test]
    fn test_contains_is_half_open() {
        let span = Span::new(2, 5);
        assert!(span.contains(2));
        assert!(span.contains(4));
        assert!(!span.contains(5));
        assert_eq!(span.len(), 3);
    }
}
