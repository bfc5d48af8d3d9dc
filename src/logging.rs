use std::fs::OpenOptions;
use std::path::Path;

use env_logger::{Builder, Env, Target};

use crate::QuizError;

/// Route log records to `log_file`. Without a file nothing is logged unless
/// `RUST_LOG` asks for it, since stderr shares the terminal with the UI.
pub fn init(log_file: Option<&Path>) -> Result<(), QuizError> {
    let default_filter = if log_file.is_some() { "info" } else { "off" };
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_filter));

    if let Some(path) = log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    builder
        .try_init()
        .map_err(|err| QuizError::Logging(err.to_string()))
}
