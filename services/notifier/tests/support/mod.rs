//! In-process fakes for the notifier ports.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use notifier_lib::adapters::MemorySettings;
use notifier_lib::app::{AppState, TriviaCoordinator};
use notifier_lib::config::Timings;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, Notify};
use trivia_core::cache::QuestionCache;
use trivia_core::domain::{
    AnswerResult, PollInterval, QuestionId, QuestionPrompt, TriviaQuestion, UserResponse,
};
use trivia_core::ports::{
    FetchError, NotificationGateway, PortError, PortResult, ResponseStream, SettingsStore,
    TriviaSource,
};

pub const COOLDOWN: Duration = Duration::from_secs(2);

//=========================================================================================
// Scripted trivia source
//=========================================================================================

#[derive(Clone, Debug)]
pub enum Reply {
    Question {
        text: String,
        correct: String,
        incorrect: Vec<String>,
    },
    NetworkError,
    Empty,
}

pub fn question(text: &str, correct: &str, incorrect: &[&str]) -> Reply {
    Reply::Question {
        text: text.to_string(),
        correct: correct.to_string(),
        incorrect: incorrect.iter().map(|s| s.to_string()).collect(),
    }
}

/// Plays back replies in order; the last one repeats forever.
pub struct ScriptedSource {
    replies: Mutex<VecDeque<Reply>>,
    calls: AtomicUsize,
    hold: Option<Arc<Notify>>,
}

impl ScriptedSource {
    pub fn new(replies: Vec<Reply>) -> Self {
        assert!(!replies.is_empty(), "script needs at least one reply");
        Self {
            replies: Mutex::new(replies.into()),
            calls: AtomicUsize::new(0),
            hold: None,
        }
    }

    /// Every fetch waits for a permit on `hold` before answering.
    pub fn held(replies: Vec<Reply>, hold: Arc<Notify>) -> Self {
        Self {
            hold: Some(hold),
            ..Self::new(replies)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_reply(&self) -> Reply {
        let mut replies = self.replies.lock().unwrap();
        if replies.len() > 1 {
            replies.pop_front().unwrap()
        } else {
            replies.front().cloned().unwrap()
        }
    }
}

#[async_trait]
impl TriviaSource for ScriptedSource {
    async fn fetch(&self) -> Result<TriviaQuestion, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(hold) = &self.hold {
            hold.notified().await;
        }
        match self.next_reply() {
            Reply::Question {
                text,
                correct,
                incorrect,
            } => Ok(TriviaQuestion {
                id: QuestionId::new(),
                category: "General Knowledge".to_string(),
                kind: "multiple".to_string(),
                difficulty: "easy".to_string(),
                question: text,
                correct_answer: correct,
                incorrect_answers: incorrect,
                fetched_at: Utc::now(),
            }),
            Reply::NetworkError => Err(FetchError::Network("connection reset".to_string())),
            Reply::Empty => Err(FetchError::Empty),
        }
    }
}

//=========================================================================================
// Recording gateway
//=========================================================================================

pub struct RecordingGateway {
    granted: bool,
    fail_present: bool,
    permission_requests: AtomicUsize,
    presented: Mutex<Vec<QuestionPrompt>>,
    results: Mutex<Vec<AnswerResult>>,
    response_tx: mpsc::UnboundedSender<UserResponse>,
    response_rx: Mutex<Option<mpsc::UnboundedReceiver<UserResponse>>>,
}

impl RecordingGateway {
    pub fn granting() -> Self {
        Self::new(true, false)
    }

    pub fn denying() -> Self {
        Self::new(false, false)
    }

    pub fn failing() -> Self {
        Self::new(true, true)
    }

    fn new(granted: bool, fail_present: bool) -> Self {
        let (response_tx, response_rx) = mpsc::unbounded_channel();
        Self {
            granted,
            fail_present,
            permission_requests: AtomicUsize::new(0),
            presented: Mutex::new(Vec::new()),
            results: Mutex::new(Vec::new()),
            response_tx,
            response_rx: Mutex::new(Some(response_rx)),
        }
    }

    pub fn presented(&self) -> Vec<QuestionPrompt> {
        self.presented.lock().unwrap().clone()
    }

    pub fn results(&self) -> Vec<AnswerResult> {
        self.results.lock().unwrap().clone()
    }

    pub fn permission_requests(&self) -> usize {
        self.permission_requests.load(Ordering::SeqCst)
    }

    /// Simulates the user picking `action` on the notification `category`.
    pub fn respond(&self, category: &str, action: &str) {
        self.response_tx
            .send(UserResponse::new(category, action))
            .unwrap();
    }
}

#[async_trait]
impl NotificationGateway for RecordingGateway {
    async fn request_permission(&self) -> PortResult<bool> {
        self.permission_requests.fetch_add(1, Ordering::SeqCst);
        Ok(self.granted)
    }

    async fn present(&self, prompt: &QuestionPrompt) -> PortResult<()> {
        if self.fail_present {
            return Err(PortError::Schedule("rejected".to_string()));
        }
        self.presented.lock().unwrap().push(prompt.clone());
        Ok(())
    }

    async fn present_result(&self, result: &AnswerResult) -> PortResult<()> {
        self.results.lock().unwrap().push(result.clone());
        Ok(())
    }

    async fn responses(&self) -> PortResult<ResponseStream> {
        let mut rx = self
            .response_rx
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| PortError::Unexpected("already subscribed".to_string()))?;
        let stream = async_stream::stream! {
            while let Some(response) = rx.recv().await {
                yield response;
            }
        };
        Ok(Box::pin(stream))
    }
}

//=========================================================================================
// Wiring
//=========================================================================================

pub struct Harness {
    pub coordinator: TriviaCoordinator,
    pub source: Arc<ScriptedSource>,
    pub gateway: Arc<RecordingGateway>,
    pub settings: Arc<MemorySettings>,
}

pub fn harness(source: ScriptedSource, gateway: RecordingGateway) -> Harness {
    let source = Arc::new(source);
    let gateway = Arc::new(gateway);
    let settings = Arc::new(MemorySettings::new());
    let app_state = AppState {
        source: source.clone(),
        gateway: gateway.clone(),
        settings: settings.clone(),
        cache: QuestionCache::default(),
        timings: Timings {
            send_delay: Duration::ZERO,
            result_delay: Duration::ZERO,
            result_cooldown: COOLDOWN,
        },
        dedup_capacity: 20,
    };
    Harness {
        coordinator: TriviaCoordinator::new(app_state, PollInterval::default()),
        source,
        gateway,
        settings,
    }
}

pub async fn stored_interval(settings: &MemorySettings) -> Option<f64> {
    settings
        .get_f64(notifier_lib::app::coordinator::INTERVAL_KEY)
        .await
        .unwrap()
}
