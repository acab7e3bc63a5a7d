//! services/notifier/src/adapters/console.rs
//!
//! A terminal stand-in for the OS notification subsystem. Notices are printed
//! to stdout and answers typed by the user are turned into `UserResponse`s.
//! It implements the `NotificationGateway` port from the `core` crate.

use crate::config::Timings;
use async_trait::async_trait;
use std::fmt::Write as _;
use std::sync::Mutex as StdMutex;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info};
use trivia_core::domain::{AnswerResult, Notice, QuestionPrompt, UserResponse};
use trivia_core::ports::{NotificationGateway, PortError, PortResult, ResponseStream};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

pub struct ConsoleGateway {
    timings: Timings,
    latest: StdMutex<Option<QuestionPrompt>>,
    response_tx: mpsc::UnboundedSender<UserResponse>,
    response_rx: Mutex<Option<mpsc::UnboundedReceiver<UserResponse>>>,
}

impl ConsoleGateway {
    pub fn new(timings: Timings) -> Self {
        let (response_tx, response_rx) = mpsc::unbounded_channel();
        Self {
            timings,
            latest: StdMutex::new(None),
            response_tx,
            response_rx: Mutex::new(Some(response_rx)),
        }
    }

    /// Answers the most recently presented question with the 1-based `choice`.
    pub fn answer(&self, choice: usize) -> PortResult<UserResponse> {
        let latest = self
            .latest
            .lock()
            .map_err(|_| PortError::Unexpected("console state poisoned".to_string()))?;
        let prompt = latest
            .as_ref()
            .ok_or_else(|| PortError::NotFound("no question has been shown yet".to_string()))?;
        let answer = choice
            .checked_sub(1)
            .and_then(|index| prompt.answers.get(index))
            .ok_or_else(|| {
                PortError::NotFound(format!(
                    "choice {} (pick 1-{})",
                    choice,
                    prompt.answers.len()
                ))
            })?;

        let response = UserResponse::new(prompt.id.to_string(), answer.clone());
        self.response_tx
            .send(response.clone())
            .map_err(|_| PortError::Unexpected("response listener has stopped".to_string()))?;
        Ok(response)
    }

    fn show_later(&self, notice: Notice, delay: std::time::Duration) {
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            println!("{}", render_notice(&notice));
        });
    }
}

/// Formats a notice the way the console shows it.
pub fn render_notice(notice: &Notice) -> String {
    let mut out = format!("\n🔔 {}\n{}", notice.title, notice.body);
    for (index, action) in notice.actions.iter().enumerate() {
        let _ = write!(out, "\n  [{}] {}", index + 1, action.title);
    }
    out
}

//=========================================================================================
// `NotificationGateway` Trait Implementation
//=========================================================================================

#[async_trait]
impl NotificationGateway for ConsoleGateway {
    async fn request_permission(&self) -> PortResult<bool> {
        debug!("Console notifications need no authorization.");
        Ok(true)
    }

    async fn present(&self, prompt: &QuestionPrompt) -> PortResult<()> {
        let notice = Notice::for_question(prompt);
        {
            let mut latest = self
                .latest
                .lock()
                .map_err(|_| PortError::Schedule("console state poisoned".to_string()))?;
            *latest = Some(prompt.clone());
        }
        self.show_later(notice, self.timings.send_delay);
        info!("Notification scheduled for trivia: {}", prompt.question);
        Ok(())
    }

    async fn present_result(&self, result: &AnswerResult) -> PortResult<()> {
        self.show_later(Notice::for_result(result), self.timings.result_delay);
        Ok(())
    }

    async fn responses(&self) -> PortResult<ResponseStream> {
        let mut rx = self
            .response_rx
            .lock()
            .await
            .take()
            .ok_or_else(|| PortError::Unexpected("responses already subscribed".to_string()))?;

        let stream = async_stream::stream! {
            while let Some(response) = rx.recv().await {
                yield response;
            }
        };
        Ok(Box::pin(stream))
    }
}
