use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::Config;
use crate::generation::{GenerationEvent, GenerationMessage, Generator};
use crate::models::{AppState, Label, NUM_OPTIONS, Question};
use crate::producer::{DEFAULT_TITLE, Document, QuestionProducer};
use crate::session::timer::{Countdown, CountdownTick};
use crate::session::{NextOutcome, QuizSession, TickOutcome};

pub const GENERATION_FAILED_MESSAGE: &str = "Unable to generate the quiz. Try again later.";

/// Everything the event loop feeds back into the app besides key presses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Tick(CountdownTick),
    Generation(GenerationMessage),
}

impl From<CountdownTick> for AppEvent {
    fn from(tick: CountdownTick) -> Self {
        AppEvent::Tick(tick)
    }
}

impl From<GenerationMessage> for AppEvent {
    fn from(message: GenerationMessage) -> Self {
        AppEvent::Generation(message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

pub struct App {
    pub state: AppState,
    pub should_quit: bool,
    events: mpsc::UnboundedSender<AppEvent>,
    generator: Generator,
    max_upload_bytes: u64,
    document: Option<Document>,
    title: String,
    session: Option<QuizSession>,
    countdown: Option<Countdown>,
    epoch: u64,
    generated: usize,
    // Screen to fall back to when a request fails or is cancelled.
    return_state: AppState,
    path_input: String,
    highlighted: usize,
    result_scroll: usize,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(
        producer: Arc<dyn QuestionProducer>,
        config: &Config,
        events: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            state: AppState::Upload,
            should_quit: false,
            events,
            generator: Generator::new(producer, config.questions_per_quiz),
            max_upload_bytes: config.max_upload_bytes,
            document: None,
            title: DEFAULT_TITLE.to_string(),
            session: None,
            countdown: None,
            epoch: 0,
            generated: 0,
            return_state: AppState::Upload,
            path_input: String::new(),
            highlighted: 0,
            result_scroll: 0,
            status: None,
        }
    }

    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// Upload limit in whole mebibytes, as configured.
    pub fn max_upload_mb(&self) -> u64 {
        self.max_upload_bytes / (1024 * 1024)
    }

    pub fn path_input(&self) -> &str {
        &self.path_input
    }

    pub fn highlighted(&self) -> Label {
        Label::from_index(self.highlighted).unwrap_or(Label::A)
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    pub fn is_generating(&self) -> bool {
        self.generator.is_busy()
    }

    pub fn generation_progress(&self) -> u16 {
        self.generator.progress_percent(self.generated)
    }

    pub fn countdown_running(&self) -> bool {
        self.countdown.as_ref().is_some_and(Countdown::is_running)
    }

    pub fn path_input_push(&mut self, c: char) {
        self.status = None;
        self.path_input.push(c);
    }

    pub fn path_input_pop(&mut self) {
        self.status = None;
        self.path_input.pop();
    }

    /// Validate the typed path and start generating from it.
    pub fn submit_path(&mut self) {
        let input = self.path_input.trim().to_string();
        if input.is_empty() {
            return;
        }
        self.upload_path(input);
    }

    pub fn upload_path<P: AsRef<Path>>(&mut self, path: P) {
        match Document::from_path(path.as_ref(), self.max_upload_bytes) {
            Ok(document) => self.upload(document),
            Err(err) => {
                log::warn!("rejected {}: {}", path.as_ref().display(), err);
                self.set_status(StatusLevel::Error, err.to_string());
            }
        }
    }

    /// Start generating a quiz for a newly chosen document.
    pub fn upload(&mut self, document: Document) {
        self.title = DEFAULT_TITLE.to_string();
        self.document = Some(document.clone());
        self.start_generation(document);
    }

    /// Ask for a fresh question set from the same document.
    pub fn regenerate(&mut self) {
        if self.generator.is_busy() {
            return;
        }
        let Some(document) = self.document.as_ref().map(Document::with_cache_buster) else {
            return;
        };

        self.set_status(
            StatusLevel::Info,
            "Generating a new quiz with different questions...".to_string(),
        );
        self.start_generation(document);
    }

    pub fn cancel_generation(&mut self) {
        self.generator.cancel();
        self.state = self.return_state;
        self.status = None;
        if self.session.is_none() {
            self.document = None;
        }
    }

    /// Drop the document and any session, back to the upload screen.
    pub fn clear_document(&mut self) {
        self.generator.cancel();
        self.countdown = None;
        self.session = None;
        self.document = None;
        self.title = DEFAULT_TITLE.to_string();
        self.path_input.clear();
        self.status = None;
        self.state = AppState::Upload;
        self.return_state = AppState::Upload;
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Tick(tick) => self.on_tick(tick),
            AppEvent::Generation(message) => self.on_generation(message),
        }
    }

    pub fn select_answer(&mut self, label: Label) {
        if self.state != AppState::Quiz {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.select_answer(label);
            self.highlighted = label.index();
        }
    }

    pub fn select_highlighted(&mut self) {
        self.select_answer(self.highlighted());
    }

    pub fn highlight_next(&mut self) {
        self.highlighted = (self.highlighted + 1) % NUM_OPTIONS;
    }

    pub fn highlight_previous(&mut self) {
        self.highlighted = (self.highlighted + NUM_OPTIONS - 1) % NUM_OPTIONS;
    }

    pub fn next_question(&mut self) {
        if self.state != AppState::Quiz {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };

        match session.next() {
            NextOutcome::Advanced => self.sync_highlight(),
            NextOutcome::Submitted => self.on_submitted(),
            NextOutcome::Blocked => {}
        }
    }

    pub fn previous_question(&mut self) {
        if self.state != AppState::Quiz {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.previous();
            self.sync_highlight();
        }
    }

    /// Retake the same questions with a fresh timer.
    pub fn retake(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.reset();
        log::info!("retaking quiz \"{}\"", self.title);
        self.enter_quiz();
    }

    pub fn scroll_results_down(&mut self) {
        let max_scroll = self
            .session
            .as_ref()
            .map_or(0, |session| session.total_questions().saturating_sub(1));
        self.result_scroll = (self.result_scroll + 1).min(max_scroll);
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    fn start_generation(&mut self, document: Document) {
        if self.state != AppState::Generating {
            self.return_state = self.state;
        }
        self.generated = 0;
        self.generator.start(document, self.events.clone());
        self.state = AppState::Generating;
    }

    fn on_generation(&mut self, message: GenerationMessage) {
        if !self.generator.is_current(message.request_id) {
            log::debug!("dropping update from abandoned generation {}", message.request_id);
            return;
        }

        match message.event {
            GenerationEvent::Progress(count) => self.generated = count,
            GenerationEvent::Title(title) => self.title = title,
            GenerationEvent::Completed(questions) => {
                self.generator.finish(message.request_id);
                self.begin_session(questions);
            }
            GenerationEvent::Failed(reason) => {
                self.generator.finish(message.request_id);
                log::warn!("generation {} failed: {}", message.request_id, reason);
                self.set_status(StatusLevel::Error, GENERATION_FAILED_MESSAGE.to_string());
                self.state = self.return_state;
                if self.session.is_none() {
                    self.document = None;
                }
            }
        }
    }

    fn begin_session(&mut self, questions: Vec<Question>) {
        let count = questions.len();
        let started = match self.session.as_mut() {
            Some(session) => session.initialize(questions),
            None => match QuizSession::new(questions) {
                Ok(session) => {
                    self.session = Some(session);
                    Ok(())
                }
                Err(err) => Err(err),
            },
        };

        if let Err(err) = started {
            log::warn!("cannot start session: {}", err);
            self.set_status(StatusLevel::Error, GENERATION_FAILED_MESSAGE.to_string());
            self.state = self.return_state;
            return;
        }

        log::info!("session started with {} questions", count);
        self.status = None;
        self.enter_quiz();
    }

    fn enter_quiz(&mut self) {
        self.epoch += 1;
        self.countdown = Some(Countdown::start(self.epoch, self.events.clone()));
        self.result_scroll = 0;
        self.state = AppState::Quiz;
        self.sync_highlight();
    }

    fn on_tick(&mut self, tick: CountdownTick) {
        if tick.epoch != self.epoch {
            log::debug!("ignoring tick from session run {}", tick.epoch);
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };

        match session.tick() {
            TickOutcome::Running(_) => {}
            TickOutcome::Expired => {
                log::info!("time is up, submitting");
                self.on_submitted();
            }
            TickOutcome::Idle => self.countdown = None,
        }
    }

    fn on_submitted(&mut self) {
        self.countdown = None;
        if let Some(session) = self.session.as_ref() {
            log::info!(
                "submitted: {}/{} correct",
                session.score().unwrap_or_default(),
                session.total_questions()
            );
        }
        self.result_scroll = 0;
        self.state = AppState::Result;
    }

    // Put the cursor on the recorded answer of the displayed question.
    fn sync_highlight(&mut self) {
        self.highlighted = self
            .session
            .as_ref()
            .and_then(QuizSession::current_answer)
            .map_or(0, Label::index);
    }

    fn set_status(&mut self, level: StatusLevel, text: String) {
        self.status = Some(StatusMessage { level, text });
    }
}
