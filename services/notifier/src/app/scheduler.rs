//! services/notifier/src/app/scheduler.rs
//!
//! The restartable poll timer. It only signals ticks; the coordinator decides
//! what a tick does.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// One timer-driven invocation signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub seq: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchedulerState {
    Stopped,
    Running(Duration),
}

struct RunningTimer {
    period: Duration,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Repeating timer that pushes [`Tick`]s into a channel.
///
/// Ticks are sent with `try_send`, so a tick that finds the previous one still
/// unconsumed is dropped instead of queued.
pub struct PollScheduler {
    tick_tx: mpsc::Sender<Tick>,
    running: Option<RunningTimer>,
}

impl PollScheduler {
    pub fn new(tick_tx: mpsc::Sender<Tick>) -> Self {
        Self {
            tick_tx,
            running: None,
        }
    }

    /// Creates a scheduler together with the receiving end of its ticks.
    pub fn channel() -> (Self, mpsc::Receiver<Tick>) {
        let (tick_tx, tick_rx) = mpsc::channel(1);
        (Self::new(tick_tx), tick_rx)
    }

    /// Starts firing every `period`. The first tick comes one period from now.
    pub fn start(&mut self, period: Duration) {
        self.stop();

        let token = CancellationToken::new();
        let handle = tokio::spawn(run_timer(period, self.tick_tx.clone(), token.clone()));
        info!("Poll timer started, firing every {:?}.", period);
        self.running = Some(RunningTimer {
            period,
            token,
            handle,
        });
    }

    /// Cancels pending ticks. No-op when already stopped.
    pub fn stop(&mut self) {
        if let Some(timer) = self.running.take() {
            timer.token.cancel();
            timer.handle.abort();
            info!("Poll timer stopped.");
        }
    }

    pub fn restart(&mut self, period: Duration) {
        self.stop();
        self.start(period);
    }

    pub fn state(&self) -> SchedulerState {
        match &self.running {
            Some(timer) => SchedulerState::Running(timer.period),
            None => SchedulerState::Stopped,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_timer(period: Duration, tick_tx: mpsc::Sender<Tick>, token: CancellationToken) {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut seq = 0u64;

    loop {
        tokio::select! {
            _ = token.cancelled() => return,
            _ = interval.tick() => {
                seq += 1;
                match tick_tx.try_send(Tick { seq }) {
                    Ok(()) => debug!("Tick {} fired.", seq),
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        debug!("Tick {} dropped: previous tick still pending.", seq)
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => return,
                }
            }
        }
    }
}
