//! services/notifier/src/app/state.rs
//!
//! Defines the notifier's shared dependencies and the coordinator-owned poll state.

use crate::config::Timings;
use trivia_core::cache::QuestionCache;
use trivia_core::dedup::DedupWindow;
use trivia_core::domain::PollInterval;
use trivia_core::ports::{NotificationGateway, SettingsStore, TriviaSource};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Dependencies)
//=========================================================================================

/// The collaborators, created once at startup and handed to the coordinator.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn TriviaSource>,
    pub gateway: Arc<dyn NotificationGateway>,
    pub settings: Arc<dyn SettingsStore>,
    /// Shared by the send path and the response path.
    pub cache: QuestionCache,
    pub timings: Timings,
    pub dedup_capacity: usize,
}

//=========================================================================================
// PollState (Owned by the Coordinator)
//=========================================================================================

/// Outcome of the one-time permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    NotRequested,
    Granted,
    Denied,
}

/// Mutable coordinator state. Only touched under the coordinator's lock.
#[derive(Debug)]
pub struct PollState {
    pub interval: PollInterval,
    /// At most one fetch pipeline runs at a time.
    pub fetch_in_flight: bool,
    /// New questions are suppressed while an answer is being processed.
    pub processing_result: bool,
    /// Bumped per answer; only the latest cooldown clears `processing_result`.
    pub result_epoch: u64,
    pub permission: Permission,
    pub dedup: DedupWindow,
}

impl PollState {
    pub fn new(interval: PollInterval, dedup_capacity: usize) -> Self {
        Self {
            interval,
            fetch_in_flight: false,
            processing_result: false,
            result_epoch: 0,
            permission: Permission::NotRequested,
            dedup: DedupWindow::new(dedup_capacity),
        }
    }
}
