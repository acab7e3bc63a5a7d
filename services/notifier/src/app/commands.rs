//! services/notifier/src/app/commands.rs
//!
//! Console commands the notifier accepts on stdin.

use crate::adapters::ConsoleGateway;
use crate::app::coordinator::TriviaCoordinator;
use crate::error::AppError;

/// A parsed line of console input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Answer the latest question with the 1-based choice.
    Answer(usize),
    /// Change the poll interval, in minutes.
    Interval(f64),
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty input")]
    Empty,
    #[error("Unknown command '{0}' (try a number, 'interval <minutes>' or 'quit')")]
    Unknown(String),
    #[error("'{0}' is not a number of minutes")]
    BadInterval(String),
}

impl std::str::FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(CommandError::Empty);
        };

        if let Ok(choice) = head.parse::<usize>() {
            return Ok(Command::Answer(choice));
        }

        match head.to_lowercase().as_str() {
            "quit" | "exit" | "q" => Ok(Command::Quit),
            "interval" => {
                let raw = words.next().unwrap_or_default();
                raw.parse::<f64>()
                    .map(Command::Interval)
                    .map_err(|_| CommandError::BadInterval(raw.to_string()))
            }
            _ => Err(CommandError::Unknown(head.to_string())),
        }
    }
}

/// Whether the console loop keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Runs one command. `answers` is `None` when answers arrive through the
/// notification itself rather than the console.
pub async fn execute(
    command: Command,
    coordinator: &TriviaCoordinator,
    answers: Option<&ConsoleGateway>,
) -> Result<Flow, AppError> {
    match command {
        Command::Answer(choice) => {
            let console = answers.ok_or(AppError::AnswersFromNotification)?;
            console.answer(choice)?;
            Ok(Flow::Continue)
        }
        Command::Interval(minutes) => {
            coordinator.set_interval(minutes).await?;
            Ok(Flow::Continue)
        }
        Command::Quit => Ok(Flow::Quit),
    }
}
