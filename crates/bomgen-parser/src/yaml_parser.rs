//! YAML Parser
//!
//! Parses pattern text into a generic [`Node`] tree. The YAML itself is read by
//! `serde_yaml`; source ranges are attributed afterwards by scanning the text
//! line by line:
//! - the root spans the whole document
//! - each top-level key spans from its line up to the next top-level key
//! - each item of a block sequence under a top-level key spans from its `-`
//!   line up to the next item at the same indentation
//!
//! Anything deeper (and flow-style sequences) inherits the span of its nearest
//! attributed ancestor. Offsets are character offsets.

use crate::error::{ParseError, Result};
use crate::node::{Node, NodeKind};
use bomgen_core::Span;
use serde_yaml::Value as YamlValue;

/// YAML parser utilities
pub struct YamlParser;

impl YamlParser {
    /// Parse YAML text into a node tree
    pub fn parse(text: &str) -> Result<Node> {
        let root_span = Span::whole(text);

        if Self::is_blank_document(text) {
            return Ok(Node::new(NodeKind::Null, root_span));
        }

        let yaml: YamlValue =
            serde_yaml::from_str(text).map_err(|e| Self::syntax_error(text, e))?;
        let layout = SourceLayout::scan(text);

        Ok(Self::build_root(yaml, &layout, root_span))
    }

    /// Documents made only of blank lines, comments and markers
    fn is_blank_document(text: &str) -> bool {
        text.lines().all(|line| {
            let trimmed = line.trim();
            trimmed.is_empty() || trimmed.starts_with('#') || trimmed == "---" || trimmed == "..."
        })
    }

    fn syntax_error(text: &str, error: serde_yaml::Error) -> ParseError {
        let location = error.location();
        ParseError::YamlSyntax {
            message: error.to_string(),
            line: location.as_ref().map(|l| l.line()),
            column: location.as_ref().map(|l| l.column()),
            offset: location.map(|l| char_offset(text, l.index())),
        }
    }

    fn build_root(value: YamlValue, layout: &SourceLayout, root_span: Span) -> Node {
        match value {
            YamlValue::Mapping(map) => {
                let entries = map
                    .into_iter()
                    .map(|(k, v)| {
                        let key = key_string(&k);
                        let node = match layout.section(&key) {
                            Some(section) => Self::build_section(v, section),
                            None => convert(v, root_span),
                        };
                        (key, node)
                    })
                    .collect();
                Node::new(NodeKind::Mapping(entries), root_span)
            }
            YamlValue::Tagged(tagged) => Self::build_root(tagged.value, layout, root_span),
            other => convert(other, root_span),
        }
    }

    fn build_section(value: YamlValue, section: &Section) -> Node {
        match value {
            YamlValue::Sequence(items) if items.len() == section.items.len() => {
                let nodes = items
                    .into_iter()
                    .zip(&section.items)
                    .map(|(item, span)| convert(item, *span))
                    .collect();
                Node::new(NodeKind::Sequence(nodes), section.span)
            }
            other => convert(other, section.span),
        }
    }
}

/// Convert a YAML value, giving every node the same span
fn convert(value: YamlValue, span: Span) -> Node {
    let kind = match value {
        YamlValue::Null => NodeKind::Null,
        YamlValue::Bool(b) => NodeKind::Bool(b),
        YamlValue::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => NodeKind::Integer(i),
            (None, Some(x)) => NodeKind::Float(x),
            (None, None) => NodeKind::String(n.to_string()),
        },
        YamlValue::String(s) => NodeKind::String(s),
        YamlValue::Sequence(items) => {
            NodeKind::Sequence(items.into_iter().map(|item| convert(item, span)).collect())
        }
        YamlValue::Mapping(map) => NodeKind::Mapping(
            map.into_iter()
                .map(|(k, v)| (key_string(&k), convert(v, span)))
                .collect(),
        ),
        YamlValue::Tagged(tagged) => return convert(tagged.value, span),
    };
    Node::new(kind, span)
}

fn key_string(key: &YamlValue) -> String {
    match key {
        YamlValue::String(s) => s.clone(),
        YamlValue::Number(n) => n.to_string(),
        YamlValue::Bool(b) => b.to_string(),
        YamlValue::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// Convert a byte index into a character offset
fn char_offset(text: &str, byte_index: usize) -> usize {
    let mut index = byte_index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    text[..index].chars().count()
}

// =============================================================================
// Line layout
// =============================================================================

/// A top-level key and the ranges of its block sequence items
#[derive(Debug)]
struct Section {
    key: String,
    span: Span,
    items: Vec<Span>,
}

#[derive(Debug)]
struct SourceLayout {
    sections: Vec<Section>,
}

#[derive(Debug)]
struct Line<'a> {
    /// Character offset of the first character
    start: usize,
    indent: usize,
    content: &'a str,
}

impl SourceLayout {
    fn scan(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let lines = split_lines(text);

        let headers: Vec<(usize, String)> = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.indent == 0)
            .filter_map(|(i, line)| top_level_key(line.content).map(|key| (i, key)))
            .collect();

        let mut sections = Vec::with_capacity(headers.len());
        for (n, (header_index, key)) in headers.iter().enumerate() {
            let next_index = headers.get(n + 1).map(|(i, _)| *i).unwrap_or(lines.len());
            let start = lines[*header_index].start;
            let raw_end = lines
                .get(next_index)
                .map(|line| line.start)
                .unwrap_or(chars.len());
            let end = trim_end(&chars, start, raw_end);

            let body = &lines[header_index + 1..next_index];
            let items = sequence_items(body, &chars, end);

            sections.push(Section {
                key: key.clone(),
                span: Span::new(start, end),
                items,
            });
        }

        log::debug!("Scanned {} top-level sections", sections.len());
        Self { sections }
    }

    fn section(&self, key: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.key == key)
    }
}

fn split_lines(text: &str) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut start = 0;
    for raw in text.split('\n') {
        let indent = raw.chars().take_while(|c| *c == ' ' || *c == '\t').count();
        let content = raw.trim_start_matches([' ', '\t']).trim_end_matches('\r');
        lines.push(Line {
            start,
            indent,
            content,
        });
        start += raw.chars().count() + 1;
    }
    lines
}

/// Ranges of the block sequence items found in a section body
fn sequence_items(body: &[Line<'_>], chars: &[char], section_end: usize) -> Vec<Span> {
    let dash_lines: Vec<&Line<'_>> = body.iter().filter(|line| is_item_start(line.content)).collect();
    let Some(item_indent) = dash_lines.iter().map(|line| line.indent).min() else {
        return Vec::new();
    };

    let starts: Vec<usize> = dash_lines
        .iter()
        .filter(|line| line.indent == item_indent)
        .map(|line| line.start + line.indent)
        .collect();

    starts
        .iter()
        .enumerate()
        .map(|(n, &start)| {
            let raw_end = starts.get(n + 1).copied().unwrap_or(section_end);
            Span::new(start, trim_end(chars, start, raw_end))
        })
        .collect()
}

fn is_item_start(content: &str) -> bool {
    let mut chars = content.chars();
    chars.next() == Some('-') && chars.next().map_or(true, char::is_whitespace)
}

/// Key of a `key:` line at column zero, if the line is one
fn top_level_key(content: &str) -> Option<String> {
    if content.is_empty()
        || content.starts_with(['#', '-', '[', '{', '%'])
        || content.starts_with("...")
    {
        return None;
    }

    if let Some(quote) = content.chars().next().filter(|c| *c == '"' || *c == '\'') {
        let rest = &content[1..];
        let close = rest.find(quote)?;
        let after = rest[close + 1..].trim_start();
        return after.starts_with(':').then(|| rest[..close].to_string());
    }

    let mut iter = content.char_indices().peekable();
    while let Some((i, c)) = iter.next() {
        if c == ':' && iter.peek().map_or(true, |(_, next)| next.is_whitespace()) {
            return Some(content[..i].trim().to_string());
        }
    }
    None
}

fn trim_end(chars: &[char], start: usize, end: usize) -> usize {
    let mut end = end.min(chars.len());
    while end > start && chars[end - 1].is_whitespace() {
        end -= 1;
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATTERN: &str = "questions:\n- name: num_racks\n  type: integer\n  default: 2\n- name: power\n  type: boolean\n  default: false\nproducts:\n  - add:\n      product: \"P1\"\n      quantity: 1\n";

    fn slice(text: &str, span: Span) -> String {
        text.chars().skip(span.start).take(span.len()).collect()
    }

    #[test]
    fn test_parse_scalars() {
        let node = YamlParser::parse("a: 1\nb: 2.5\nc: true\nd: text\ne: ~\n").unwrap();
        assert_eq!(node.get("a").unwrap().kind, NodeKind::Integer(1));
        assert_eq!(node.get("b").unwrap().kind, NodeKind::Float(2.5));
        assert_eq!(node.get("c").unwrap().kind, NodeKind::Bool(true));
        assert_eq!(node.get("d").unwrap().kind, NodeKind::String("text".to_string()));
        assert!(node.get("e").unwrap().is_null());
    }

    #[test]
    fn test_capitalized_booleans() {
        let node = YamlParser::parse("flag: True\nother: False\n").unwrap();
        assert_eq!(node.get("flag").unwrap().kind, NodeKind::Bool(true));
        assert_eq!(node.get("other").unwrap().kind, NodeKind::Bool(false));
    }

    #[test]
    fn test_blank_document_is_null() {
        assert!(YamlParser::parse("").unwrap().is_null());
        assert!(YamlParser::parse("# only a comment\n\n").unwrap().is_null());
    }

    #[test]
    fn test_syntax_error_carries_no_tree() {
        let err = YamlParser::parse("questions: [\n").unwrap_err();
        match err {
            ParseError::YamlSyntax { message, .. } => assert!(!message.is_empty()),
            other => panic!("Expected YamlSyntax, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_keys_are_syntax_errors() {
        assert!(YamlParser::parse("a: 1\na: 2\n").is_err());
    }

    #[test]
    fn test_section_and_item_spans() {
        let node = YamlParser::parse(PATTERN).unwrap();
        assert_eq!(node.span, Span::whole(PATTERN));

        let questions = node.get("questions").unwrap();
        assert!(slice(PATTERN, questions.span).starts_with("questions:"));
        assert!(slice(PATTERN, questions.span).ends_with("default: false"));

        let items = questions.as_sequence().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(
            slice(PATTERN, items[0].span),
            "- name: num_racks\n  type: integer\n  default: 2"
        );
        assert!(slice(PATTERN, items[1].span).starts_with("- name: power"));

        // Nested scalars inherit the item span
        assert_eq!(items[1].get("default").unwrap().span, items[1].span);

        let products = node.get("products").unwrap().as_sequence().unwrap();
        assert_eq!(products.len(), 1);
        assert!(slice(PATTERN, products[0].span).starts_with("- add:"));
        assert!(slice(PATTERN, products[0].span).ends_with("quantity: 1"));
    }

    #[test]
    fn test_flow_sequence_inherits_section_span() {
        let text = "questions: []\nproducts: [{add: {product: P1, quantity: 1}}]\n";
        let node = YamlParser::parse(text).unwrap();
        let products = node.get("products").unwrap();
        let item = &products.as_sequence().unwrap()[0];
        assert_eq!(item.span, products.span);
    }

    #[test]
    fn test_spans_are_character_offsets() {
        let text = "# coût\nproducts:\n- add: {product: P1, quantity: 1}\n";
        let node = YamlParser::parse(text).unwrap();
        let products = node.get("products").unwrap();
        assert_eq!(products.span.start, 7);
        assert_eq!(slice(text, products.span), "products:\n- add: {product: P1, quantity: 1}");
    }

    #[test]
    fn test_top_level_key_detection() {
        assert_eq!(top_level_key("questions:"), Some("questions".to_string()));
        assert_eq!(top_level_key("products: []"), Some("products".to_string()));
        assert_eq!(top_level_key("\"rules\": []"), Some("rules".to_string()));
        assert_eq!(top_level_key("- name: x"), None);
        assert_eq!(top_level_key("# questions:"), None);
        assert_eq!(top_level_key("url:http"), None);
    }
}
