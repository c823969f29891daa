//! Variable environment
//!
//! An `Environment` maps question names to typed values. It is built once,
//! either from the question defaults of a document or from caller-supplied
//! answers, and is never updated afterwards.

use super::value::Value;
use crate::ast::PatternDocument;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Immutable mapping from variable name to value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Environment {
    vars: HashMap<String, Value>,
}

impl Environment {
    /// Create an empty environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the environment of question defaults, in document order.
    ///
    /// Questions without a name or a default contribute nothing. When a name
    /// is declared twice the first declaration wins.
    pub fn from_defaults(document: &PatternDocument) -> Self {
        let mut vars = HashMap::new();
        for question in &document.questions {
            if let (Some(name), Some(default)) = (&question.name, &question.default) {
                vars.entry(name.clone()).or_insert_with(|| default.clone());
            }
        }
        log::debug!("Built defaults environment with {} variables", vars.len());
        Self { vars }
    }

    /// A new environment holding every binding of `self`, plus the bindings of
    /// `fallback` for names `self` does not define.
    pub fn with_fallback(&self, fallback: &Environment) -> Self {
        let mut vars = fallback.vars.clone();
        vars.extend(self.vars.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self { vars }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.vars.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Question, QuestionType};
    use crate::types::Span;

    fn question(name: &str, default: Value) -> Question {
        Question {
            name: Some(name.to_string()),
            question_type: Some(QuestionType::Integer),
            type_name: Some("integer".to_string()),
            prompt: Some(format!("{}?", name)),
            description: None,
            default: Some(default),
            choices: None,
            min: None,
            max: None,
            span: Span::default(),
        }
    }

    #[test]
    fn test_from_iterator() {
        let env: Environment = vec![("num_racks", Value::Integer(2)), ("cables", Value::Boolean(true))]
            .into_iter()
            .collect();

        assert_eq!(env.len(), 2);
        assert_eq!(env.get("num_racks"), Some(&Value::Integer(2)));
        assert!(env.contains("cables"));
        assert!(!env.contains("missing"));
    }

    #[test]
    fn test_from_defaults_first_declaration_wins() {
        let document = PatternDocument {
            questions: vec![
                question("num_racks", Value::Integer(2)),
                question("num_racks", Value::Integer(9)),
                question("num_cables", Value::Integer(4)),
            ],
            ..PatternDocument::default()
        };

        let env = Environment::from_defaults(&document);
        assert_eq!(env.len(), 2);
        assert_eq!(env.get("num_racks"), Some(&Value::Integer(2)));
        assert_eq!(env.get("num_cables"), Some(&Value::Integer(4)));
    }

    #[test]
    fn test_with_fallback_prefers_self() {
        let answers: Environment = vec![("a", 1)].into_iter().collect();
        let defaults: Environment = vec![("a", 10), ("b", 20)].into_iter().collect();

        let merged = answers.with_fallback(&defaults);
        assert_eq!(merged.get("a"), Some(&Value::Integer(1)));
        assert_eq!(merged.get("b"), Some(&Value::Integer(20)));
        // Inputs are untouched
        assert_eq!(answers.len(), 1);
    }

    #[test]
    fn test_deserialize_from_json_object() {
        let env: Environment =
            serde_json::from_str(r#"{"needs_cables": true, "num_cables": 3}"#).unwrap();
        assert_eq!(env.get("needs_cables"), Some(&Value::Boolean(true)));
        assert_eq!(env.get("num_cables"), Some(&Value::Integer(3)));
    }
}
