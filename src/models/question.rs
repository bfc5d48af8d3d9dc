use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const NUM_OPTIONS: usize = 4;

/// Positional label of an option within a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    A,
    B,
    C,
    D,
}

impl Label {
    pub const ALL: [Label; NUM_OPTIONS] = [Label::A, Label::B, Label::C, Label::D];

    pub fn index(self) -> usize {
        match self {
            Label::A => 0,
            Label::B => 1,
            Label::C => 2,
            Label::D => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Parses a key press: `a`-`d` in either case, or `1`-`4`.
    pub fn from_key(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' | '1' => Some(Label::A),
            'B' | '2' => Some(Label::B),
            'C' | '3' => Some(Label::C),
            'D' | '4' => Some(Label::D),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Label::A => 'A',
            Label::B => 'B',
            Label::C => 'C',
            Label::D => 'D',
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A multiple-choice question as emitted by a producer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub text: String,
    pub options: [String; NUM_OPTIONS],
    pub answer: Label,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionError {
    #[error("question text is empty")]
    EmptyText,
    #[error("option {0} is empty")]
    EmptyOption(Label),
    #[error("option {0} duplicates an earlier option")]
    DuplicateOption(Label),
}

impl Question {
    pub fn new(text: impl Into<String>, options: [&str; NUM_OPTIONS], answer: Label) -> Self {
        Self {
            text: text.into(),
            options: options.map(String::from),
            answer,
        }
    }

    pub fn option(&self, label: Label) -> &str {
        &self.options[label.index()]
    }

    pub fn is_correct(&self, answer: Option<Label>) -> bool {
        answer == Some(self.answer)
    }

    /// Producer-boundary check. The session engine itself trusts its input.
    pub fn validate(&self) -> Result<(), QuestionError> {
        if self.text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }

        let mut seen = HashSet::with_capacity(NUM_OPTIONS);
        for label in Label::ALL {
            let option = self.option(label).trim();
            if option.is_empty() {
                return Err(QuestionError::EmptyOption(label));
            }
            if !seen.insert(option) {
                return Err(QuestionError::DuplicateOption(label));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_index_round_trip() {
        for (index, label) in Label::ALL.iter().enumerate() {
            assert_eq!(label.index(), index);
            assert_eq!(Label::from_index(index), Some(*label));
        }
        assert_eq!(Label::from_index(4), None);
    }

    #[test]
    fn test_label_from_key() {
        assert_eq!(Label::from_key('a'), Some(Label::A));
        assert_eq!(Label::from_key('D'), Some(Label::D));
        assert_eq!(Label::from_key('3'), Some(Label::C));
        assert_eq!(Label::from_key('e'), None);
        assert_eq!(Label::from_key('5'), None);
    }

    #[test]
    fn test_question_wire_format() {
        let json = r#"{"question":"2 + 2?","options":["3","4","5","6"],"answer":"B"}"#;
        let question: Question = serde_json::from_str(json).unwrap();
        assert_eq!(question.text, "2 + 2?");
        assert_eq!(question.answer, Label::B);
        assert_eq!(question.option(Label::B), "4");

        let back = serde_json::to_string(&question).unwrap();
        assert!(back.contains("\"question\":\"2 + 2?\""));
        assert!(back.contains("\"answer\":\"B\""));
    }

    #[test]
    fn test_wrong_option_count_is_rejected_by_serde() {
        let json = r#"{"question":"q","options":["a","b","c"],"answer":"A"}"#;
        assert!(serde_json::from_str::<Question>(json).is_err());
    }

    #[test]
    fn test_unknown_label_is_rejected_by_serde() {
        let json = r#"{"question":"q","options":["a","b","c","d"],"answer":"E"}"#;
        assert!(serde_json::from_str::<Question>(json).is_err());
    }

    #[test]
    fn test_validate() {
        assert!(Question::new("q", ["a", "b", "c", "d"], Label::A).validate().is_ok());
        assert_eq!(
            Question::new("  ", ["a", "b", "c", "d"], Label::A).validate(),
            Err(QuestionError::EmptyText)
        );
        assert_eq!(
            Question::new("q", ["a", "", "c", "d"], Label::A).validate(),
            Err(QuestionError::EmptyOption(Label::B))
        );
        assert_eq!(
            Question::new("q", ["a", "b", "a", "d"], Label::A).validate(),
            Err(QuestionError::DuplicateOption(Label::C))
        );
    }

    #[test]
    fn test_is_correct() {
        let question = Question::new("q", ["a", "b", "c", "d"], Label::C);
        assert!(question.is_correct(Some(Label::C)));
        assert!(!question.is_correct(Some(Label::A)));
        assert!(!question.is_correct(None));
    }
}
