//! Timer module
//!
//! The focus/break state machine and the pieces it is built from.

pub mod display;
pub mod durations;
pub mod engine;
pub mod stage;

// Re-export main types
pub use display::{format_clock, progress_bar, progress_fraction};
pub use durations::{
    seconds_from_minutes, ActiveTask, DurationError, StageDurations, DEFAULT_BREAK_MINUTES,
    DEFAULT_FOCUS_MINUTES,
};
pub use engine::{StageTransition, TimerEngine, TimerSnapshot};
pub use stage::{Stage, Status};
