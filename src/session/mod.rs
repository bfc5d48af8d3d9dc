//! Quiz session engine.
//!
//! A [`QuizSession`] owns one attempt at a fixed question set: the learner's
//! answers, the displayed position, the countdown budget and, once submitted,
//! the score. Every mutation runs to completion on the caller's thread; the
//! countdown is driven from outside through [`QuizSession::tick`].

pub mod review;
pub mod timer;

use thiserror::Error;

use crate::models::{Label, Question};

/// Time budget of a session, in seconds.
pub const SESSION_TIME_LIMIT_SECS: u32 = 30 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("invalid session state: {0}")]
    InvalidState(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Answers may still change.
    Collecting,
    /// Answers are frozen and the score is known.
    Submitted,
}

/// Result of a forward navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextOutcome {
    /// The current question has no answer yet, or the session is submitted.
    Blocked,
    Advanced,
    /// `next()` on the last question submitted the session.
    Submitted,
}

/// Result of one countdown second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Seconds left after this tick.
    Running(u32),
    /// The budget ran out and the session was submitted by this tick.
    Expired,
    /// The session was already submitted; nothing changed.
    Idle,
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<Question>,
    answers: Vec<Option<Label>>,
    current_index: usize,
    phase: SessionPhase,
    score: Option<usize>,
    remaining_seconds: u32,
}

impl QuizSession {
    /// Create a session over `questions`, which must not be empty.
    pub fn new(questions: Vec<Question>) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::InvalidState("cannot start a session without questions"));
        }

        let num_questions = questions.len();
        Ok(Self {
            questions,
            answers: vec![None; num_questions],
            current_index: 0,
            phase: SessionPhase::Collecting,
            score: None,
            remaining_seconds: SESSION_TIME_LIMIT_SECS,
        })
    }

    /// Replace the question set and start over. On error the session is
    /// left exactly as it was.
    pub fn initialize(&mut self, questions: Vec<Question>) -> Result<(), SessionError> {
        *self = Self::new(questions)?;
        Ok(())
    }

    /// Re-arm the same questions for a retake.
    pub fn reset(&mut self) {
        self.answers = vec![None; self.questions.len()];
        self.current_index = 0;
        self.phase = SessionPhase::Collecting;
        self.score = None;
        self.remaining_seconds = SESSION_TIME_LIMIT_SECS;
    }

    pub fn select_answer(&mut self, label: Label) {
        if self.is_submitted() {
            return;
        }
        self.answers[self.current_index] = Some(label);
    }

    pub fn next(&mut self) -> NextOutcome {
        if self.is_submitted() || self.current_answer().is_none() {
            return NextOutcome::Blocked;
        }

        if self.is_last_question() {
            self.submit();
            NextOutcome::Submitted
        } else {
            self.current_index += 1;
            NextOutcome::Advanced
        }
    }

    pub fn previous(&mut self) {
        self.current_index = self.current_index.saturating_sub(1);
    }

    /// Freeze the answers and compute the score. Calling it again returns
    /// the same score without touching anything.
    pub fn submit(&mut self) -> usize {
        if let Some(score) = self.score {
            return score;
        }

        let score = self
            .answers
            .iter()
            .zip(self.questions.iter())
            .filter(|(answer, question)| question.is_correct(**answer))
            .count();

        self.phase = SessionPhase::Submitted;
        self.score = Some(score);
        score
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.is_submitted() {
            return TickOutcome::Idle;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.submit();
            TickOutcome::Expired
        } else {
            TickOutcome::Running(self.remaining_seconds)
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &[Option<Label>] {
        &self.answers
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current_index]
    }

    pub fn current_answer(&self) -> Option<Label> {
        self.answers[self.current_index]
    }

    pub fn current_question_number(&self) -> usize {
        self.current_index + 1
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|answer| answer.is_some()).count()
    }

    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 == self.questions.len()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_submitted(&self) -> bool {
        self.phase == SessionPhase::Submitted
    }

    pub fn score(&self) -> Option<usize> {
        self.score
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    /// Share of the quiz already passed, for the progress bar.
    pub fn progress_percent(&self) -> u16 {
        ((self.current_index * 100) / self.questions.len()) as u16
    }
}

/// Formats seconds as `m:ss`.
pub fn format_remaining(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_questions() -> Vec<Question> {
        vec![
            Question::new("Capital of France?", ["Paris", "Rome", "Madrid", "Berlin"], Label::A),
            Question::new("2 + 2?", ["3", "4", "5", "22"], Label::B),
            Question::new("Largest planet?", ["Mars", "Venus", "Jupiter", "Earth"], Label::C),
        ]
    }

    fn answer_all(session: &mut QuizSession, labels: &[Label]) {
        for label in labels {
            session.select_answer(*label);
            session.next();
        }
    }

    #[test]
    fn test_new_rejects_empty_question_list() {
        assert_eq!(
            QuizSession::new(Vec::new()).unwrap_err(),
            SessionError::InvalidState("cannot start a session without questions")
        );
    }

    #[test]
    fn test_new_session_starts_collecting() {
        let session = QuizSession::new(sample_questions()).unwrap();
        assert_eq!(session.phase(), SessionPhase::Collecting);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.answers(), &[None, None, None]);
        assert_eq!(session.score(), None);
        assert_eq!(session.remaining_seconds(), 1800);
    }

    #[test]
    fn test_failed_initialize_keeps_prior_state() {
        let mut session = QuizSession::new(sample_questions()).unwrap();
        session.select_answer(Label::A);
        session.next();
        session.tick();

        assert!(session.initialize(Vec::new()).is_err());
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.answers()[0], Some(Label::A));
        assert_eq!(session.remaining_seconds(), 1799);
        assert_eq!(session.total_questions(), 3);
    }

    #[test]
    fn test_initialize_replaces_questions_wholesale() {
        let mut session = QuizSession::new(sample_questions()).unwrap();
        answer_all(&mut session, &[Label::A, Label::B, Label::C]);
        assert!(session.is_submitted());

        let replacement = vec![Question::new("Only one", ["w", "x", "y", "z"], Label::D)];
        session.initialize(replacement.clone()).unwrap();
        assert_eq!(session.questions(), replacement.as_slice());
        assert_eq!(session.answers(), &[None]);
        assert!(!session.is_submitted());
        assert_eq!(session.remaining_seconds(), SESSION_TIME_LIMIT_SECS);
    }

    #[test]
    fn test_select_answer_overwrites() {
        let mut session = QuizSession::new(sample_questions()).unwrap();
        session.select_answer(Label::B);
        session.select_answer(Label::D);
        session.select_answer(Label::D);
        assert_eq!(session.current_answer(), Some(Label::D));
        assert_eq!(session.answered_count(), 1);
    }

    #[test]
    fn test_next_is_blocked_until_answered() {
        let mut session = QuizSession::new(sample_questions()).unwrap();
        assert_eq!(session.next(), NextOutcome::Blocked);
        assert_eq!(session.current_index(), 0);

        session.select_answer(Label::A);
        assert_eq!(session.next(), NextOutcome::Advanced);
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.next(), NextOutcome::Blocked);
    }

    #[test]
    fn test_next_on_last_question_submits() {
        let mut session = QuizSession::new(sample_questions()).unwrap();
        session.select_answer(Label::A);
        session.next();
        session.select_answer(Label::B);
        session.next();
        session.select_answer(Label::C);
        assert_eq!(session.next(), NextOutcome::Submitted);
        assert!(session.is_submitted());
        assert_eq!(session.score(), Some(3));
        assert_eq!(session.current_index(), 2);
    }

    #[test]
    fn test_previous_stops_at_zero() {
        let mut session = QuizSession::new(sample_questions()).unwrap();
        session.previous();
        assert_eq!(session.current_index(), 0);

        session.select_answer(Label::A);
        session.next();
        session.previous();
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.current_answer(), Some(Label::A));
    }

    #[test]
    fn test_submit_scores_matching_answers() {
        let mut session = QuizSession::new(sample_questions()).unwrap();
        answer_all(&mut session, &[Label::A, Label::B, Label::D]);
        assert_eq!(session.score(), Some(2));
    }

    #[test]
    fn test_submit_is_idempotent() {
        let mut session = QuizSession::new(sample_questions()).unwrap();
        session.select_answer(Label::A);
        assert_eq!(session.submit(), 1);
        session.tick();
        assert_eq!(session.submit(), 1);
        assert_eq!(session.remaining_seconds(), SESSION_TIME_LIMIT_SECS);
    }

    #[test]
    fn test_select_after_submit_is_ignored() {
        let mut session = QuizSession::new(sample_questions()).unwrap();
        session.select_answer(Label::B);
        session.submit();

        session.select_answer(Label::A);
        assert_eq!(session.answers(), &[Some(Label::B), None, None]);
        assert_eq!(session.next(), NextOutcome::Blocked);
    }

    #[test]
    fn test_submit_freezes_timer() {
        let mut session = QuizSession::new(sample_questions()).unwrap();
        for _ in 0..10 {
            session.tick();
        }
        session.submit();
        assert_eq!(session.tick(), TickOutcome::Idle);
        assert_eq!(session.remaining_seconds(), 1790);
    }

    #[test]
    fn test_timeout_submits_exactly_once() {
        let mut session = QuizSession::new(sample_questions()).unwrap();
        session.select_answer(Label::A);

        let mut expirations = 0;
        for _ in 0..SESSION_TIME_LIMIT_SECS + 5 {
            if session.tick() == TickOutcome::Expired {
                expirations += 1;
            }
        }

        assert_eq!(expirations, 1);
        assert_eq!(session.remaining_seconds(), 0);
        assert!(session.is_submitted());
        assert_eq!(session.score(), Some(1));
    }

    #[test]
    fn test_timeout_without_answers_scores_zero() {
        let mut session = QuizSession::new(sample_questions()).unwrap();
        for _ in 0..SESSION_TIME_LIMIT_SECS {
            session.tick();
        }
        assert!(session.is_submitted());
        assert_eq!(session.score(), Some(0));
    }

    #[test]
    fn test_reset_rearms_same_questions() {
        let mut session = QuizSession::new(sample_questions()).unwrap();
        answer_all(&mut session, &[Label::A, Label::C, Label::C]);
        let first_score = session.score();

        session.reset();
        assert_eq!(session.answers(), &[None, None, None]);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.phase(), SessionPhase::Collecting);
        assert_eq!(session.score(), None);
        assert_eq!(session.remaining_seconds(), SESSION_TIME_LIMIT_SECS);
        assert_eq!(session.questions(), sample_questions().as_slice());

        answer_all(&mut session, &[Label::A, Label::C, Label::C]);
        assert_eq!(session.score(), first_score);
    }

    #[test]
    fn test_progress_percent() {
        let mut session = QuizSession::new(sample_questions()).unwrap();
        assert_eq!(session.progress_percent(), 0);
        session.select_answer(Label::A);
        session.next();
        assert_eq!(session.progress_percent(), 33);
    }

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(1800), "30:00");
        assert_eq!(format_remaining(61), "1:01");
        assert_eq!(format_remaining(0), "0:00");
    }
}
