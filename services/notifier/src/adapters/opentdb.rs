//! services/notifier/src/adapters/opentdb.rs
//!
//! This module contains the adapter for the Open Trivia DB HTTP API.
//! It implements the `TriviaSource` port from the `core` crate.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};
use trivia_core::domain::{QuestionId, TriviaQuestion};
use trivia_core::ports::{FetchError, TriviaSource};
use trivia_core::text::decode_html_entities;

//=========================================================================================
// Wire Format
//=========================================================================================

#[derive(Debug, Deserialize)]
struct TriviaEnvelope {
    response_code: i64,
    results: Vec<RawQuestion>,
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    category: String,
    #[serde(rename = "type")]
    kind: String,
    difficulty: String,
    question: String,
    correct_answer: String,
    incorrect_answers: Vec<String>,
}

impl RawQuestion {
    /// Assigns a fresh id and decodes the HTML entities the API sends.
    fn into_domain(self) -> TriviaQuestion {
        TriviaQuestion {
            id: QuestionId::new(),
            category: decode_html_entities(&self.category),
            kind: self.kind,
            difficulty: self.difficulty,
            question: decode_html_entities(&self.question),
            correct_answer: decode_html_entities(&self.correct_answer),
            incorrect_answers: self
                .incorrect_answers
                .iter()
                .map(|answer| decode_html_entities(answer))
                .collect(),
            fetched_at: Utc::now(),
        }
    }
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `TriviaSource` port over HTTP.
#[derive(Clone)]
pub struct OpenTdbAdapter {
    client: reqwest::Client,
    url: String,
}

impl OpenTdbAdapter {
    /// Creates a new `OpenTdbAdapter` for the given endpoint.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("trivia-notifier/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

//=========================================================================================
// `TriviaSource` Trait Implementation
//=========================================================================================

#[async_trait]
impl TriviaSource for OpenTdbAdapter {
    async fn fetch(&self) -> Result<TriviaQuestion, FetchError> {
        debug!("Requesting trivia from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let envelope: TriviaEnvelope =
            serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))?;

        match envelope.results.into_iter().next() {
            Some(raw) => {
                let question = raw.into_domain();
                info!("🎉 Trivia fetched successfully: {}", question.question);
                Ok(question)
            }
            None => {
                warn!(
                    "Trivia response had no results (response_code {}).",
                    envelope.response_code
                );
                Err(FetchError::Empty)
            }
        }
    }
}
