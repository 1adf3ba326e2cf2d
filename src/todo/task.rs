//! Task records and the session increment law
//!
//! The serialized shape matches the `todos` array the browser version kept in
//! local storage, so existing exports load unchanged.

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::timer::{seconds_from_minutes, ActiveTask, Stage};

/// Sessions credited to a task for each completed focus stage
pub const SESSION_INCREMENT: f64 = 0.5;

/// Fixed set of task categories
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TaskCategory {
    Work,
    Play,
    Food,
    Learn,
    Sport,
    #[default]
    Others,
}

impl TaskCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskCategory::Work => "work",
            TaskCategory::Play => "play",
            TaskCategory::Food => "food",
            TaskCategory::Learn => "learn",
            TaskCategory::Sport => "sport",
            TaskCategory::Others => "others",
        }
    }

    pub fn from_src(src: &str) -> Self {
        match src.to_lowercase().as_str() {
            "work" => TaskCategory::Work,
            "play" => TaskCategory::Play,
            "food" => TaskCategory::Food,
            "learn" => TaskCategory::Learn,
            "sport" => TaskCategory::Sport,
            _ => TaskCategory::Others,
        }
    }
}

/// Category reference as stored on a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub src: String,
}

impl From<TaskCategory> for Category {
    fn from(category: TaskCategory) -> Self {
        Self {
            src: category.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub category: Category,
    pub todo_name: String,
    pub is_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Focus stage override, in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pomo_duration: Option<f64>,
    /// Break stage override, in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_duration: Option<f64>,
    pub current_session: f64,
    pub total_session: f64,
    /// Local creation time, `HH:MM:SS`
    pub time: String,
}

/// Result of crediting a focus stage to a task
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionOutcome {
    Advanced { current: f64, total: f64 },
    Completed { total: f64 },
    /// The task was already done; nothing changed
    AlreadyCompleted,
}

impl Task {
    /// Create an open task with no sessions done
    pub fn new(id: u64, name: impl Into<String>, category: TaskCategory, total_sessions: u32) -> Self {
        Self {
            id,
            category: category.into(),
            todo_name: name.into(),
            is_completed: false,
            description: None,
            pomo_duration: None,
            break_duration: None,
            current_session: 0.0,
            total_session: f64::from(total_sessions.max(1)),
            time: Local::now().format("%H:%M:%S").to_string(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_durations(mut self, focus_minutes: Option<f64>, break_minutes: Option<f64>) -> Self {
        self.pomo_duration = focus_minutes;
        self.break_duration = break_minutes;
        self
    }

    pub fn category(&self) -> TaskCategory {
        TaskCategory::from_src(&self.category.src)
    }

    /// Credit one completed focus stage.
    ///
    /// The task is marked complete exactly when the counter lands on the
    /// total; the caller is responsible for persisting the change.
    pub fn record_focus_session(&mut self) -> SessionOutcome {
        if self.is_completed {
            return SessionOutcome::AlreadyCompleted;
        }
        self.current_session += SESSION_INCREMENT;
        if self.current_session == self.total_session {
            self.is_completed = true;
            SessionOutcome::Completed {
                total: self.total_session,
            }
        } else {
            SessionOutcome::Advanced {
                current: self.current_session,
                total: self.total_session,
            }
        }
    }

    /// Duration overrides this task hands to the timer.
    ///
    /// Stored values that are not a positive number of minutes are dropped
    /// so the defaults apply for that stage.
    pub fn active_task(&self) -> ActiveTask {
        let resolve = |stage: Stage, minutes: Option<f64>| {
            minutes.and_then(|minutes| match seconds_from_minutes(stage, minutes) {
                Ok(seconds) => Some(seconds),
                Err(e) => {
                    warn!("Task {} has an invalid override: {}", self.id, e);
                    None
                }
            })
        };

        ActiveTask {
            id: self.id,
            focus_seconds: resolve(Stage::Focus, self.pomo_duration),
            break_seconds: resolve(Stage::Break, self.break_duration),
        }
    }

    /// Progress label used by the task list
    pub fn session_label(&self) -> String {
        if self.is_completed {
            "Done".to_string()
        } else {
            format!("session {}/{}", self.current_session, self.total_session)
        }
    }
}
