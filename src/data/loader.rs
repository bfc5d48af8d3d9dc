use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

use crate::models::{Question, QuestionError};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read questions: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse questions: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("question list is empty")]
    Empty,
    #[error("question {index} is invalid: {reason}")]
    InvalidQuestion { index: usize, reason: QuestionError },
}

/// Checks a producer's output before it may start a session.
pub fn validate_questions(questions: &[Question]) -> Result<(), LoadError> {
    if questions.is_empty() {
        return Err(LoadError::Empty);
    }

    for (index, question) in questions.iter().enumerate() {
        question
            .validate()
            .map_err(|reason| LoadError::InvalidQuestion { index: index + 1, reason })?;
    }

    Ok(())
}

pub fn parse_questions(json: &str) -> Result<Vec<Question>, LoadError> {
    let questions: Vec<Question> = serde_json::from_str(json)?;
    validate_questions(&questions)?;
    Ok(questions)
}

pub fn load_questions_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<Question>, LoadError> {
    let json_content = fs::read_to_string(path.as_ref())?;
    parse_questions(&json_content)
}
