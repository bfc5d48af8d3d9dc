//! # pdf-quiz
//!
//! Turn a PDF into a timed multiple-choice quiz in the terminal.
//!
//! A [`QuestionProducer`] turns the document into questions, a
//! [`QuizSession`] tracks answers, navigation and the 30-minute countdown,
//! and the result screen scores the attempt and reviews every question.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pdf_quiz::{Config, Quiz, QuizError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     let config = Config::from_args();
//!     Quiz::new(config).run().await
//! }
//! ```

mod app;
pub mod config;
mod data;
pub mod generation;
pub mod logging;
mod models;
pub mod producer;
pub mod session;
pub mod terminal;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use thiserror::Error;
use tokio::sync::mpsc;

pub use app::{App, AppEvent, StatusLevel, StatusMessage};
pub use config::Config;
pub use data::{LoadError, load_questions_from_json, parse_questions, validate_questions};
pub use models::{AppState, Label, NUM_OPTIONS, Question, QuestionError};
pub use producer::{BankProducer, Document, DocumentError, ProducerError, QuestionProducer};
pub use session::review::{OptionMark, QuestionReview, review};
pub use session::{NextOutcome, QuizSession, SessionError, SessionPhase, TickOutcome};

const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Error type for running the application.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error("failed to set up logging: {0}")]
    Logging(String),
}

/// A quiz application bound to a question producer.
pub struct Quiz {
    producer: Arc<dyn QuestionProducer>,
    config: Config,
}

impl Quiz {
    /// Use a [`BankProducer`] over the configured question bank.
    pub fn new(config: Config) -> Self {
        let producer = BankProducer::new(&config.question_bank, config.questions_per_quiz);
        Self::with_producer(Arc::new(producer), config)
    }

    pub fn with_producer(producer: Arc<dyn QuestionProducer>, config: Config) -> Self {
        Self { producer, config }
    }

    /// Run the quiz in the terminal until the user quits.
    ///
    /// Must be called from within a multi-threaded tokio runtime: input is
    /// polled on the calling task while the countdown and producer requests
    /// run on other workers.
    pub async fn run(self) -> Result<(), QuizError> {
        let document = initial_document(&self.config)?;

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = App::new(self.producer, &self.config, tx);
        if let Some(document) = document {
            app.upload(document);
        }

        let mut guard = terminal::TerminalGuard::enter()?;
        run_event_loop(guard.terminal(), &mut app, &mut rx)
    }
}

/// A document named on the command line must be usable before the UI starts.
fn initial_document(config: &Config) -> Result<Option<Document>, QuizError> {
    config
        .document
        .as_ref()
        .map(|path| Document::from_path(path, config.max_upload_bytes))
        .transpose()
        .map_err(QuizError::from)
}

fn run_event_loop(
    terminal: &mut terminal::AppTerminal,
    app: &mut App,
    events: &mut mpsc::UnboundedReceiver<AppEvent>,
) -> Result<(), QuizError> {
    while !app.should_quit {
        while let Ok(app_event) = events.try_recv() {
            app.handle_event(app_event);
        }

        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(INPUT_POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_input(app, key.code);
                }
            }
        }
    }

    Ok(())
}

fn handle_input(app: &mut App, key: KeyCode) {
    match app.state {
        AppState::Upload => handle_upload_input(app, key),
        AppState::Generating => handle_generating_input(app, key),
        AppState::Quiz => handle_quiz_input(app, key),
        AppState::Result => handle_result_input(app, key),
    }
}

fn handle_upload_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Enter => app.submit_path(),
        KeyCode::Backspace => app.path_input_pop(),
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('q') | KeyCode::Char('Q') if app.path_input().is_empty() => {
            app.should_quit = true;
        }
        KeyCode::Char(c) => app.path_input_push(c),
        _ => {}
    }
}

fn handle_generating_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc => app.cancel_generation(),
        KeyCode::Char('q') | KeyCode::Char('Q') => app.should_quit = true,
        _ => {}
    }
}

fn handle_quiz_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.highlight_previous(),
        KeyCode::Down | KeyCode::Char('j') => app.highlight_next(),
        KeyCode::Enter | KeyCode::Char(' ') => app.select_highlighted(),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('n') => app.next_question(),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('p') => app.previous_question(),
        KeyCode::Char('q') | KeyCode::Char('Q') => app.should_quit = true,
        KeyCode::Char(c) => {
            if let Some(label) = Label::from_key(c) {
                app.select_answer(label);
            }
        }
        _ => {}
    }
}

fn handle_result_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.scroll_results_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_results_up(),
        KeyCode::Char('r') | KeyCode::Char('R') => app.retake(),
        KeyCode::Char('g') | KeyCode::Char('G') => app.regenerate(),
        KeyCode::Char('u') | KeyCode::Char('U') => app.clear_document(),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => app.should_quit = true,
        _ => {}
    }
}
