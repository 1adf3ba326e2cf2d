//! Background tasks module
//!
//! The timer controller and the tasks that react to it.

pub mod controller;
pub mod session_tracker;

// Re-export main types and functions
pub use controller::{spawn_timer, StageCompleted, TimerCommand, TimerHandle, TICK_PERIOD};
pub use session_tracker::{record_completion, session_tracker_task};
