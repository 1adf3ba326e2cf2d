//! pomo-timer - A terminal task list with a Pomodoro focus timer
//! 
//! This library provides the focus/break timer engine, the background task
//! that drives it once per second, and the task list that collects completed
//! focus sessions.

pub mod config;
pub mod console;
pub mod runtime;
pub mod timer;
pub mod todo;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use runtime::{spawn_timer, TimerHandle};
pub use timer::{Stage, StageDurations, Status, TimerEngine};
pub use todo::TaskStore;
pub use utils::signals::shutdown_signal;
