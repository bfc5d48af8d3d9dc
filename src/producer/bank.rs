use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures_util::{StreamExt, stream};
use rand::seq::SliceRandom;

use crate::data::{LoadError, parse_questions};
use crate::models::Question;

use super::{Document, GenerationStream, GenerationUpdate, ProducerError, QuestionProducer};

const SIDECAR_EXTENSION: &str = "questions.json";

/// Draws questions from a JSON question bank.
///
/// A bank stored next to the document (`notes.pdf` -> `notes.questions.json`)
/// takes precedence over the configured one. Each request shuffles the bank,
/// so regenerating yields a different selection.
#[derive(Debug, Clone)]
pub struct BankProducer {
    bank_path: PathBuf,
    questions_per_quiz: usize,
}

impl BankProducer {
    pub fn new(bank_path: impl Into<PathBuf>, questions_per_quiz: usize) -> Self {
        Self {
            bank_path: bank_path.into(),
            questions_per_quiz: questions_per_quiz.max(1),
        }
    }

    pub fn bank_for(&self, document: &Document) -> PathBuf {
        document
            .path()
            .map(sidecar_path)
            .filter(|sidecar| sidecar.is_file())
            .unwrap_or_else(|| self.bank_path.clone())
    }
}

#[async_trait]
impl QuestionProducer for BankProducer {
    fn generate(&self, document: Document) -> GenerationStream {
        let bank = self.bank_for(&document);
        let limit = self.questions_per_quiz;
        log::info!(
            "drawing up to {} questions for {} from {}",
            limit,
            document.display_name(),
            bank.display()
        );

        stream::once(load_bank(bank))
            .flat_map(move |loaded| match loaded {
                Ok(mut questions) => {
                    questions.shuffle(&mut rand::rng());
                    questions.truncate(limit);
                    stream::iter(progressive_updates(questions)).boxed()
                }
                Err(err) => stream::iter(vec![Err(err)]).boxed(),
            })
            .boxed()
    }
}

fn sidecar_path(document_path: &Path) -> PathBuf {
    document_path.with_extension(SIDECAR_EXTENSION)
}

async fn load_bank(path: PathBuf) -> Result<Vec<Question>, ProducerError> {
    let json = tokio::fs::read_to_string(&path).await.map_err(LoadError::from)?;
    Ok(parse_questions(&json)?)
}

fn progressive_updates(questions: Vec<Question>) -> Vec<Result<GenerationUpdate, ProducerError>> {
    let mut updates: Vec<_> = (1..=questions.len())
        .map(|count| Ok(GenerationUpdate::Partial(count)))
        .collect();
    updates.push(Ok(GenerationUpdate::Complete(questions)));
    updates
}
