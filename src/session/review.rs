//! Per-question breakdown shown after submission.

use crate::models::{Label, NUM_OPTIONS, Question};

use super::QuizSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    /// The correct option, always revealed.
    Correct,
    /// Chosen by the learner but wrong.
    IncorrectlySelected,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    Excellent,
    Good,
    Pass,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionReview<'a> {
    pub index: usize,
    pub question: &'a Question,
    pub answer: Option<Label>,
    pub marks: [OptionMark; NUM_OPTIONS],
    pub is_correct: bool,
}

pub fn classify(label: Label, answer: Option<Label>, correct: Label) -> OptionMark {
    if label == correct {
        OptionMark::Correct
    } else if answer == Some(label) {
        OptionMark::IncorrectlySelected
    } else {
        OptionMark::Neutral
    }
}

pub fn review_question(index: usize, question: &Question, answer: Option<Label>) -> QuestionReview<'_> {
    QuestionReview {
        index,
        question,
        answer,
        marks: Label::ALL.map(|label| classify(label, answer, question.answer)),
        is_correct: question.is_correct(answer),
    }
}

pub fn review(session: &QuizSession) -> Vec<QuestionReview<'_>> {
    session
        .questions()
        .iter()
        .zip(session.answers().iter())
        .enumerate()
        .map(|(index, (question, answer))| review_question(index, question, *answer))
        .collect()
}

pub fn grade_percentage(score: usize, total: usize) -> f64 {
    if total > 0 {
        (score as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

/// Percentage as shown to the learner, rounded half away from zero.
pub fn rounded_percentage(score: usize, total: usize) -> u32 {
    grade_percentage(score, total).round() as u32
}

/// Encouragement shown under the score.
pub fn feedback(percentage: f64) -> &'static str {
    if percentage >= 100.0 {
        "Perfect score! Congratulations!"
    } else if percentage >= 80.0 {
        "Great job! You did excellently!"
    } else if percentage >= 60.0 {
        "Good effort! You're on the right track."
    } else if percentage >= 40.0 {
        "Not bad, but there's room for improvement."
    } else {
        "Keep practicing, you'll improve!"
    }
}

pub fn grade(percentage: f64) -> Grade {
    match percentage as u32 {
        90..=u32::MAX => Grade::Excellent,
        70..=89 => Grade::Good,
        50..=69 => Grade::Pass,
        _ => Grade::Fail,
    }
}
