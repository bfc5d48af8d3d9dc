mod question;

pub use question::{Label, NUM_OPTIONS, Question, QuestionError};

/// Screen the application is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Waiting for the learner to choose a document.
    Upload,
    /// A producer request is outstanding.
    Generating,
    /// Answering questions.
    Quiz,
    /// Score and review after submission.
    Result,
}
