//! Answer checking
//!
//! Checks caller-supplied answers against the question schema before a BOM is
//! resolved from them.

use crate::error::AnswerError;
use bomgen_core::{Environment, PatternDocument, Question, QuestionType, Value};

/// Checks answers against the questions of a pattern
pub struct AnswerChecker;

impl AnswerChecker {
    /// Check every question of the document is answered with a fitting value
    pub fn check(document: &PatternDocument, answers: &Environment) -> Result<(), AnswerError> {
        for question in &document.questions {
            let Some(name) = question.name.as_deref() else {
                tracing::debug!("Skipping answer check for unnamed question");
                continue;
            };
            Self::check_question(name, question, answers.get(name))?;
        }
        Ok(())
    }

    /// Answers completed with question defaults for every unanswered question
    pub fn with_defaults(document: &PatternDocument, answers: &Environment) -> Environment {
        answers.with_fallback(&Environment::from_defaults(document))
    }

    fn check_question(
        name: &str,
        question: &Question,
        answer: Option<&Value>,
    ) -> Result<(), AnswerError> {
        let expected = question.type_name.as_deref().unwrap_or("<missing>");

        let Some(answer) = answer else {
            return Err(AnswerError::MissingAnswer {
                question: name.to_string(),
                expected: expected.to_string(),
            });
        };

        match question.question_type {
            Some(QuestionType::Integer) => {
                let Value::Integer(value) = answer else {
                    return Err(wrong_type(name, "an integer", answer));
                };
                if let Some(min) = question.min.filter(|min| value < min) {
                    return Err(AnswerError::OutOfRange {
                        question: name.to_string(),
                        bound: format!(">= {}", min),
                        value: *value,
                    });
                }
                if let Some(max) = question.max.filter(|max| value > max) {
                    return Err(AnswerError::OutOfRange {
                        question: name.to_string(),
                        bound: format!("<= {}", max),
                        value: *value,
                    });
                }
                Ok(())
            }
            Some(QuestionType::Boolean) => match answer {
                Value::Boolean(_) => Ok(()),
                _ => Err(wrong_type(name, "a boolean", answer)),
            },
            Some(QuestionType::Enum) => {
                let choices = question
                    .choices
                    .as_deref()
                    .filter(|choices| !choices.is_empty())
                    .ok_or_else(|| AnswerError::MissingChoices {
                        question: name.to_string(),
                    })?;

                if question.has_choice(answer) {
                    Ok(())
                } else {
                    Err(AnswerError::NotAChoice {
                        question: name.to_string(),
                        choices: choices
                            .iter()
                            .map(ToString::to_string)
                            .collect::<Vec<_>>()
                            .join(", "),
                        value: answer.clone(),
                    })
                }
            }
            None => Err(AnswerError::UnknownType {
                question: name.to_string(),
                type_name: expected.to_string(),
            }),
        }
    }
}

fn wrong_type(name: &str, expected: &str, answer: &Value) -> AnswerError {
    AnswerError::WrongType {
        question: name.to_string(),
        expected: expected.to_string(),
        found: answer.type_name().to_string(),
    }
}
