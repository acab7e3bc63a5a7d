//! services/notifier/src/error.rs
//!
//! Defines the primary error type for the notifier service.

use crate::config::ConfigError;
use trivia_core::ports::{FetchError, PortError};

/// The primary error type for the `notifier` service.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents a failure to obtain a trivia question.
    #[error("Trivia fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Represents a standard Input/Output error (e.g., reading the console).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The requested poll interval is not a positive number of minutes a timer
    /// can hold (at most one year).
    #[error("Invalid poll interval: {0} minutes")]
    InvalidInterval(f64),

    /// A numbered answer was typed while a desktop gateway delivers answers.
    #[error(
        "Answers come from the notification itself; the console takes 'interval <minutes>' or 'quit'"
    )]
    AnswersFromNotification,

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}
