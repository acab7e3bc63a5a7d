//! services/notifier/src/app/coordinator.rs
//!
//! The central orchestrator. Runs the fetch → dedup → deliver pipeline on
//! every tick and resolves the user's answers into result notifications.

use crate::app::scheduler::{PollScheduler, SchedulerState, Tick};
use crate::app::state::{AppState, Permission, PollState};
use crate::error::AppError;
use futures::StreamExt;
use std::sync::{Arc, Weak};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info, warn};
use trivia_core::cache::QuestionCache;
use trivia_core::domain::{AnswerResult, PollInterval, QuestionId, UserResponse};
use trivia_core::ports::{ResponseStream, SettingsStore};

/// Settings key under which the poll interval (minutes) is persisted.
pub const INTERVAL_KEY: &str = "NotificationInterval";

//=========================================================================================
// Outcomes
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupOutcome {
    /// Permission granted, first question sent and polling started.
    Started,
    /// Nothing will be scheduled until the process restarts.
    PermissionDenied,
}

/// What one `fetch_and_notify` cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Delivered(QuestionId),
    /// The question was delivered recently.
    Duplicate,
    /// An answer was being processed, so the question was dropped.
    Suppressed,
    /// Another cycle was already running.
    InFlight,
    /// Fetching or scheduling failed; the next tick retries.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// Body tap or dismissal, nothing to score.
    Ignored,
    /// The category did not resolve to a cached question.
    LookupMiss,
    Answered(AnswerResult),
}

//=========================================================================================
// The Coordinator
//=========================================================================================

struct Inner {
    app: AppState,
    state: Mutex<PollState>,
    scheduler: Mutex<PollScheduler>,
    tick_rx: Mutex<Option<mpsc::Receiver<Tick>>>,
}

/// Cloneable handle; clones drive the same coordinator.
#[derive(Clone)]
pub struct TriviaCoordinator {
    inner: Arc<Inner>,
}

impl TriviaCoordinator {
    pub fn new(app: AppState, interval: PollInterval) -> Self {
        let (scheduler, tick_rx) = PollScheduler::channel();
        let state = PollState::new(interval, app.dedup_capacity);
        Self {
            inner: Arc::new(Inner {
                app,
                state: Mutex::new(state),
                scheduler: Mutex::new(scheduler),
                tick_rx: Mutex::new(Some(tick_rx)),
            }),
        }
    }

    /// Reads the persisted interval, falling back to the default when it is
    /// missing, not positive or unreadable.
    pub async fn load_interval(settings: &dyn SettingsStore) -> PollInterval {
        match settings.get_f64(INTERVAL_KEY).await {
            Ok(Some(minutes)) => PollInterval::from_minutes(minutes).unwrap_or_else(|| {
                warn!("Ignoring stored interval {} minutes.", minutes);
                PollInterval::default()
            }),
            Ok(None) => PollInterval::default(),
            Err(e) => {
                warn!("Failed to read the stored interval: {}", e);
                PollInterval::default()
            }
        }
    }

    /// Asks for notification permission and, once granted, sends the first
    /// question and starts polling.
    pub async fn setup(&self) -> SetupOutcome {
        info!("🔧 Coordinator setup started");

        let granted = match self.inner.app.gateway.request_permission().await {
            Ok(granted) => granted,
            Err(e) => {
                error!("Permission request failed: {}", e);
                false
            }
        };

        if !granted {
            self.inner.state.lock().await.permission = Permission::Denied;
            warn!("⚠️ Notifications not granted");
            return SetupOutcome::PermissionDenied;
        }

        self.inner.state.lock().await.permission = Permission::Granted;

        self.fetch_and_notify().await;
        {
            // set_interval may have run during the first fetch; read under the
            // scheduler lock so its restart is never overwritten.
            let mut scheduler = self.inner.scheduler.lock().await;
            let interval = self.inner.state.lock().await.interval;
            scheduler.start(interval.as_duration());
        }
        self.spawn_tick_pump().await;

        SetupOutcome::Started
    }

    /// Changes the poll period. Treated as a fresh start: the dedup window is
    /// cleared and the in-flight flag reset.
    pub async fn set_interval(&self, minutes: f64) -> Result<(), AppError> {
        let interval =
            PollInterval::from_minutes(minutes).ok_or(AppError::InvalidInterval(minutes))?;

        let permission = {
            let mut state = self.inner.state.lock().await;
            state.interval = interval;
            state.dedup.clear();
            state.fetch_in_flight = false;
            state.permission
        };

        if let Err(e) = self.inner.app.settings.set_f64(INTERVAL_KEY, minutes).await {
            error!("Failed to persist interval: {}", e);
        }

        if permission == Permission::Granted {
            self.inner
                .scheduler
                .lock()
                .await
                .restart(interval.as_duration());
        } else {
            debug!("Interval stored; polling is not active.");
        }

        info!("Poll interval set to {} minutes.", minutes);
        Ok(())
    }

    /// Runs one fetch → dedup → deliver cycle. A no-op while another cycle
    /// is in flight.
    pub async fn fetch_and_notify(&self) -> FetchOutcome {
        {
            let mut state = self.inner.state.lock().await;
            if state.fetch_in_flight {
                debug!("Fetch already in flight, skipping.");
                return FetchOutcome::InFlight;
            }
            state.fetch_in_flight = true;
        }

        let outcome = self.run_pipeline().await;

        self.inner.state.lock().await.fetch_in_flight = false;
        outcome
    }

    async fn run_pipeline(&self) -> FetchOutcome {
        info!("🌐 Fetching trivia...");
        let question = match self.inner.app.source.fetch().await {
            Ok(question) => question,
            Err(e) => {
                error!("⚠️ Error fetching trivia: {}", e);
                return FetchOutcome::Failed;
            }
        };

        let suppressed = {
            let mut state = self.inner.state.lock().await;
            if state.dedup.contains(&question.question) {
                debug!("Skipping recently delivered question: {}", question.question);
                return FetchOutcome::Duplicate;
            }
            state.dedup.record(question.question.clone());
            state.processing_result
        };

        if suppressed {
            warn!("⚠️ Skipping notification because an answer is being processed.");
            return FetchOutcome::Suppressed;
        }

        let prompt = question.prompt(&mut rand::thread_rng());
        self.inner.app.cache.store(question);

        info!("📨 Sending notification for: {}", prompt.question);
        match self.inner.app.gateway.present(&prompt).await {
            Ok(()) => FetchOutcome::Delivered(prompt.id),
            Err(e) => {
                error!("Error scheduling notification: {}", e);
                FetchOutcome::Failed
            }
        }
    }

    /// Scores the user's choice and shows the result.
    pub async fn handle_user_response(&self, category: &str, action: &str) -> ResponseOutcome {
        if UserResponse::is_sentinel_action(action) {
            debug!("Notification opened or dismissed without an answer.");
            return ResponseOutcome::Ignored;
        }

        let epoch = {
            let mut state = self.inner.state.lock().await;
            state.processing_result = true;
            state.result_epoch += 1;
            state.result_epoch
        };
        info!("User selected answer: {} for question: {}", action, category);

        let cached = QuestionId::parse(category).and_then(|id| self.inner.app.cache.lookup(&id));
        let Some(question) = cached else {
            warn!("Could not find trivia question for identifier: {}", category);
            self.finish_result(epoch).await;
            return ResponseOutcome::LookupMiss;
        };

        let result = AnswerResult {
            is_correct: question.is_correct(action),
            user_answer: action.to_string(),
            correct_answer: question.correct_answer.clone(),
            question: question.question.clone(),
        };
        info!(
            "Correct answer: {}, User answer: {}",
            result.correct_answer, result.user_answer
        );

        if let Err(e) = self.inner.app.gateway.present_result(&result).await {
            error!("Error scheduling result notification: {}", e);
        }

        let coordinator = self.clone();
        let cooldown = self.inner.app.timings.result_cooldown;
        tokio::spawn(async move {
            tokio::time::sleep(cooldown).await;
            coordinator.finish_result(epoch).await;
        });

        ResponseOutcome::Answered(result)
    }

    async fn finish_result(&self, epoch: u64) {
        let mut state = self.inner.state.lock().await;
        if state.result_epoch == epoch {
            state.processing_result = false;
        }
    }

    /// Handles responses until the stream ends.
    pub async fn listen(&self, mut responses: ResponseStream) {
        while let Some(response) = responses.next().await {
            self.handle_user_response(&response.category, &response.action)
                .await;
        }
        info!("Notification response stream ended.");
    }

    pub async fn shutdown(&self) {
        self.inner.scheduler.lock().await.stop();
    }

    /// Forwards ticks to `fetch_and_notify`, each cycle on its own task.
    async fn spawn_tick_pump(&self) {
        let Some(mut tick_rx) = self.inner.tick_rx.lock().await.take() else {
            return;
        };
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);

        tokio::spawn(async move {
            while let Some(tick) = tick_rx.recv().await {
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                debug!("Tick {} received.", tick.seq);
                let coordinator = TriviaCoordinator { inner };
                tokio::spawn(async move {
                    coordinator.fetch_and_notify().await;
                });
            }
        });
    }

    //=====================================================================================
    // Accessors
    //=====================================================================================

    pub async fn interval(&self) -> PollInterval {
        self.inner.state.lock().await.interval
    }

    pub async fn permission(&self) -> Permission {
        self.inner.state.lock().await.permission
    }

    pub async fn is_fetching(&self) -> bool {
        self.inner.state.lock().await.fetch_in_flight
    }

    pub async fn is_processing_result(&self) -> bool {
        self.inner.state.lock().await.processing_result
    }

    pub async fn dedup_len(&self) -> usize {
        self.inner.state.lock().await.dedup.len()
    }

    pub async fn scheduler_state(&self) -> SchedulerState {
        self.inner.scheduler.lock().await.state()
    }

    pub fn cache(&self) -> &QuestionCache {
        &self.inner.app.cache
    }
}
