pub mod commands;
pub mod coordinator;
pub mod scheduler;
pub mod state;

// Re-export the coordinator so the binary can wire everything up from one place.
pub use coordinator::{FetchOutcome, ResponseOutcome, SetupOutcome, TriviaCoordinator};
pub use scheduler::{PollScheduler, SchedulerState, Tick};
pub use state::{AppState, Permission, PollState};
