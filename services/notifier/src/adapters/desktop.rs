//! services/notifier/src/adapters/desktop.rs
//!
//! Desktop notifications through the freedesktop notification server.
//! It implements the `NotificationGateway` port from the `core` crate.

use crate::config::Timings;
use async_trait::async_trait;
use notify_rust::{Hint, Notification};
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tracing::{error, info, warn};
use trivia_core::domain::{
    AnswerResult, Notice, QuestionPrompt, Sound, UserResponse, DEFAULT_ACTION_IDENTIFIER,
    DISMISS_ACTION_IDENTIFIER,
};
use trivia_core::ports::{NotificationGateway, PortError, PortResult, ResponseStream};

const APP_NAME: &str = "Trivia Time";

// Reported by the notification server when a notification is closed without an action.
const CLOSED_ACTION: &str = "__closed";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

pub struct DesktopGateway {
    timings: Timings,
    response_tx: mpsc::UnboundedSender<UserResponse>,
    response_rx: Mutex<Option<mpsc::UnboundedReceiver<UserResponse>>>,
}

impl DesktopGateway {
    pub fn new(timings: Timings) -> Self {
        let (response_tx, response_rx) = mpsc::unbounded_channel();
        Self {
            timings,
            response_tx,
            response_rx: Mutex::new(Some(response_rx)),
        }
    }

    /// Shows `notice` after `delay`. Interactive notices block a worker
    /// thread until the user acts on them.
    fn show_later(&self, notice: Notice, delay: Duration) {
        let response_tx = self.response_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let shown = tokio::task::spawn_blocking(move || show_and_wait(notice, response_tx)).await;
            match shown {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!("Error scheduling notification: {}", e),
                Err(e) => error!("Notification worker failed: {}", e),
            }
        });
    }
}

fn build(notice: &Notice) -> Notification {
    let mut notification = Notification::new();
    notification
        .appname(APP_NAME)
        .summary(&notice.title)
        .body(&notice.body);
    match notice.sound {
        Sound::Default => notification.hint(Hint::SoundName("message-new-instant".to_string())),
        Sound::Subtle => notification.hint(Hint::SoundName("dialog-warning".to_string())),
    };
    for action in &notice.actions {
        notification.action(&action.identifier, &action.title);
    }
    notification
}

fn show_and_wait(
    notice: Notice,
    response_tx: mpsc::UnboundedSender<UserResponse>,
) -> PortResult<()> {
    let handle = build(&notice)
        .show()
        .map_err(|e| PortError::Schedule(e.to_string()))?;

    let Some(category) = notice.category else {
        return Ok(());
    };
    handle.wait_for_action(move |action| {
        let action = match action {
            "default" => DEFAULT_ACTION_IDENTIFIER,
            CLOSED_ACTION => DISMISS_ACTION_IDENTIFIER,
            other => other,
        };
        if response_tx.send(UserResponse::new(category, action)).is_err() {
            warn!("Dropped a notification response: nobody is listening.");
        }
    });
    Ok(())
}

//=========================================================================================
// `NotificationGateway` Trait Implementation
//=========================================================================================

#[async_trait]
impl NotificationGateway for DesktopGateway {
    async fn request_permission(&self) -> PortResult<bool> {
        let server_info = tokio::task::spawn_blocking(notify_rust::get_server_information)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        match server_info {
            Ok(server) => {
                info!("Notification server available: {} {}", server.name, server.version);
                Ok(true)
            }
            Err(e) => {
                warn!("No notification server answered: {}", e);
                Ok(false)
            }
        }
    }

    async fn present(&self, prompt: &QuestionPrompt) -> PortResult<()> {
        self.show_later(Notice::for_question(prompt), self.timings.send_delay);
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
