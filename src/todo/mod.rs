//! Task list module
//!
//! The collaborator the timer reports to: task records, the session
//! increment law and JSON persistence.

pub mod store;
pub mod task;

// Re-export main types
pub use store::{DailyProgress, TaskDraft, TaskEdit, TaskStore};
pub use task::{Category, SessionOutcome, Task, TaskCategory, SESSION_INCREMENT};
