//! Question producers.
//!
//! A producer turns a [`Document`] into a list of questions. It may report
//! progress while it works; only the final [`GenerationUpdate::Complete`]
//! list is ever used to start a session.

mod bank;
mod document;

use std::path::Path;

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use thiserror::Error;

use crate::data::LoadError;
use crate::models::Question;

pub use bank::BankProducer;
pub use document::{
    DEFAULT_MAX_UPLOAD_BYTES, Document, DocumentError, strip_cache_buster,
};

pub const DEFAULT_TITLE: &str = "Quiz";
const MAX_TITLE_WORDS: usize = 3;

#[derive(Debug, Error)]
pub enum ProducerError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("producer unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationUpdate {
    /// Number of questions produced so far.
    Partial(usize),
    Complete(Vec<Question>),
}

pub type GenerationStream = BoxStream<'static, Result<GenerationUpdate, ProducerError>>;

#[async_trait]
pub trait QuestionProducer: Send + Sync {
    /// Start producing questions for `document`. No determinism is implied:
    /// two calls with the same document may yield different questions.
    fn generate(&self, document: Document) -> GenerationStream;

    /// Short title for the quiz.
    async fn title(&self, document: &Document) -> Result<String, ProducerError> {
        Ok(derive_title(document.display_name()))
    }
}

/// Builds a title of at most three words from a file name, falling back to
/// [`DEFAULT_TITLE`] when the name carries no words.
pub fn derive_title(file_name: &str) -> String {
    let file_name = strip_cache_buster(file_name);
    let stem = Path::new(file_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let words: Vec<String> = stem
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty() && !word.chars().all(|c| c.is_ascii_digit()))
        .take(MAX_TITLE_WORDS)
        .map(capitalize)
        .collect();

    if words.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        words.join(" ")
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
