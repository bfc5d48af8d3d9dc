use std::path::PathBuf;

use clap::Parser;

use crate::generation::DEFAULT_EXPECTED_QUESTIONS;

const BYTES_PER_MB: u64 = 1024 * 1024;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Turn a PDF into a timed multiple-choice quiz", long_about = None)]
pub struct Args {
    /// PDF to generate the first quiz from
    pub document: Option<PathBuf>,

    /// JSON question bank used when no sidecar bank sits next to the PDF
    #[arg(short, long, env = "PDF_QUIZ_QUESTIONS", default_value = "questions.json")]
    pub questions: PathBuf,

    /// Questions per quiz
    #[arg(short, long, env = "PDF_QUIZ_COUNT", default_value_t = DEFAULT_EXPECTED_QUESTIONS)]
    pub count: usize,

    /// Largest accepted PDF, in megabytes
    #[arg(long, env = "PDF_QUIZ_MAX_UPLOAD_MB", default_value_t = 5)]
    pub max_upload_mb: u64,

    /// Write logs to this file (the terminal is taken by the UI)
    #[arg(long, env = "PDF_QUIZ_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub document: Option<PathBuf>,
    pub question_bank: PathBuf,
    pub questions_per_quiz: usize,
    pub max_upload_bytes: u64,
    pub log_file: Option<PathBuf>,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            document: args.document,
            question_bank: args.questions,
            questions_per_quiz: args.count.max(1),
            max_upload_bytes: args.max_upload_mb.max(1) * BYTES_PER_MB,
            log_file: args.log_file,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            document: None,
            question_bank: PathBuf::from("questions.json"),
            questions_per_quiz: DEFAULT_EXPECTED_QUESTIONS,
            max_upload_bytes: 5 * BYTES_PER_MB,
            log_file: None,
        }
    }
}

impl Config {
    pub fn from_args() -> Self {
        Args::parse().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_arguments() {
        let args = Args::try_parse_from([
            "pdf-quiz",
            "notes.pdf",
            "--questions",
            "bank.json",
            "--count",
            "10",
            "--max-upload-mb",
            "2",
            "--log-file",
            "quiz.log",
        ])
        .unwrap();
        let config = Config::from(args);

        assert_eq!(config.document, Some(PathBuf::from("notes.pdf")));
        assert_eq!(config.question_bank, PathBuf::from("bank.json"));
        assert_eq!(config.questions_per_quiz, 10);
        assert_eq!(config.max_upload_bytes, 2 * BYTES_PER_MB);
        assert_eq!(config.log_file, Some(PathBuf::from("quiz.log")));
    }

    #[test]
    fn test_zero_values_are_raised() {
        let args = Args::try_parse_from([
            "pdf-quiz",
            "--questions",
            "bank.json",
            "--count",
            "0",
            "--max-upload-mb",
            "0",
        ])
        .unwrap();
        let config = Config::from(args);
        assert_eq!(config.questions_per_quiz, 1);
        assert_eq!(config.max_upload_bytes, BYTES_PER_MB);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.questions_per_quiz, 30);
        assert_eq!(config.max_upload_bytes, crate::producer::DEFAULT_MAX_UPLOAD_BYTES);
    }
}
