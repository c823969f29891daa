//! Diagnostic positioning
//!
//! Diagnostics are anchored on whole lines found by substring search over the
//! raw text: the first line containing `name: <question>` for questions, and
//! the first line containing the product key (then the condition text) for
//! rules. When nothing matches the range is the first character of the
//! document. This is an approximation and is kept as is so that existing
//! documents get the same positions.

use bomgen_core::Span;

#[derive(Debug)]
struct LineInfo<'a> {
    start: usize,
    len: usize,
    text: &'a str,
}

/// Line index over the validated text
#[derive(Debug)]
pub struct LineLocator<'a> {
    lines: Vec<LineInfo<'a>>,
}

impl<'a> LineLocator<'a> {
    /// Create a new locator over `text`
    pub fn new(text: &'a str) -> Self {
        let mut lines = Vec::new();
        let mut start = 0;
        for line in text.split('\n') {
            let len = line.chars().count();
            lines.push(LineInfo {
                start,
                len,
                text: line,
            });
            start += len + 1;
        }
        Self { lines }
    }

    /// Range of the first line containing `needle`
    pub fn find(&self, needle: &str) -> Option<Span> {
        self.lines
            .iter()
            .find(|line| line.text.contains(needle))
            .map(|line| Span::new(line.start, line.start + line.len))
    }

    /// Fallback range when no anchor line exists
    pub fn document_start() -> Span {
        Span::new(0, 1)
    }

    /// Range for diagnostics about a question
    pub fn question(&self, name: Option<&str>) -> Span {
        name.and_then(|name| self.find(&format!("name: {}", name)))
            .unwrap_or_else(Self::document_start)
    }

    /// Range for diagnostics about a product rule
    pub fn rule(&self, product: Option<&str>, condition: Option<&str>) -> Span {
        // An empty needle would match the first line
        product
            .filter(|product| !product.is_empty())
            .and_then(|product| self.find(product))
            .or_else(|| {
                condition
                    .filter(|condition| !condition.is_empty())
                    .and_then(|condition| self.find(condition))
            })
            .unwrap_or_else(Self::document_start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "questions:\n  - name: num_racks\n    default: 2\nproducts:\n  - condition: \"num_racks > 1\"\n    add:\n      product: \"SW-1\"\n";

    fn slice(span: Span) -> String {
        TEXT.chars().skip(span.start).take(span.len()).collect()
    }

    #[test]
    fn test_question_anchor() {
        let locator = LineLocator::new(TEXT);
        let span = locator.question(Some("num_racks"));
        assert_eq!(span, Span::new(11, 30));
        assert_eq!(slice(span), "  - name: num_racks");
    }

    #[test]
    fn test_rule_anchor_prefers_product() {
        let locator = LineLocator::new(TEXT);
        let span = locator.rule(Some("SW-1"), Some("num_racks > 1"));
        assert_eq!(slice(span), "      product: \"SW-1\"");
    }

    #[test]
    fn test_rule_anchor_falls_back_to_condition() {
        let locator = LineLocator::new(TEXT);
        let span = locator.rule(Some("MISSING"), Some("num_racks > 1"));
        assert_eq!(slice(span), "  - condition: \"num_racks > 1\"");
    }

    #[test]
    fn test_empty_product_falls_back_to_condition() {
        let locator = LineLocator::new(TEXT);
        let span = locator.rule(Some(""), Some("num_racks > 1"));
        assert_eq!(slice(span), "  - condition: \"num_racks > 1\"");
        assert_eq!(locator.rule(Some(""), None), Span::new(0, 1));
        assert_eq!(locator.rule(Some(""), Some("")), Span::new(0, 1));
    }

    #[test]
    fn test_fallback_to_document_start() {
        let locator = LineLocator::new(TEXT);
        assert_eq!(locator.question(Some("other")), Span::new(0, 1));
        assert_eq!(locator.question(None), Span::new(0, 1));
        assert_eq!(locator.rule(None, None), Span::new(0, 1));
    }

    #[test]
    fn test_first_matching_line_wins() {
        // The product key also occurs inside the question name
        let text = "questions:\n- name: cables_count\nproducts:\n- add: {product: cables, quantity: 1}\n";
        let locator = LineLocator::new(text);
        assert_eq!(locator.rule(Some("cables"), None), Span::new(11, 31));
    }

    #[test]
    fn test_offsets_count_characters() {
        let text = "# déjà vu\n- name: ü\n";
        let locator = LineLocator::new(text);
        assert_eq!(locator.question(Some("ü")), Span::new(10, 19));
    }
}
