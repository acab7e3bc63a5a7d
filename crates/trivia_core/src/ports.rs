//! crates/trivia_core/src/ports.rs
//!
//! Defines the service contracts (traits) the notifier core talks to.
//! These traits form the boundary of the hexagonal architecture, keeping the
//! core independent of the trivia API, the OS notification subsystem and the
//! settings storage.

use crate::domain::{AnswerResult, PresentationOptions, QuestionPrompt, TriviaQuestion, UserResponse};
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

//=========================================================================================
// Error and Result Types
//=========================================================================================

/// Failure to obtain a question from a trivia source.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Malformed trivia payload: {0}")]
    Decode(String),
    #[error("Trivia response contained no questions")]
    Empty,
}

/// A generic error type for the notification and settings ports.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    /// The notification subsystem rejected a submission.
    #[error("Failed to schedule notification: {0}")]
    Schedule(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

/// Inbound user responses, in the order the OS reports them.
pub type ResponseStream = Pin<Box<dyn Stream<Item = UserResponse> + Send>>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait TriviaSource: Send + Sync {
    /// Fetches exactly one multiple-choice question. No retries.
    async fn fetch(&self) -> Result<TriviaQuestion, FetchError>;
}

#[async_trait]
pub trait NotificationGateway: Send + Sync {
    /// Asks for authorization to alert, play sounds and badge.
    async fn request_permission(&self) -> PortResult<bool>;

    /// Shows an interactive notification, one action per answer.
    async fn present(&self, prompt: &QuestionPrompt) -> PortResult<()>;

    /// Shows an informational notification with the outcome of an answer.
    async fn present_result(&self, result: &AnswerResult) -> PortResult<()>;

    /// Subscribes to the user's responses. Gateways hand out a single stream.
    async fn responses(&self) -> PortResult<ResponseStream>;

    /// Notifications are always shown while the app is frontmost.
    fn foreground_presentation(&self) -> PresentationOptions {
        PresentationOptions::ALL
    }
}

#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get_f64(&self, key: &str) -> PortResult<Option<f64>>;

    async fn set_f64(&self, key: &str, value: f64) -> PortResult<()>;
}
