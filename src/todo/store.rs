//! Task list persistence
//!
//! The whole list lives in a single JSON file, rewritten after every change.
//! A missing or blank file is an empty list.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::task::{SessionOutcome, Task, TaskCategory};

/// Fields for a new task
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub name: String,
    pub category: TaskCategory,
    pub total_sessions: u32,
    pub focus_minutes: Option<f64>,
    pub break_minutes: Option<f64>,
    pub description: Option<String>,
}

/// Fields to change on an existing task; `None` leaves a field alone
#[derive(Debug, Clone, Default)]
pub struct TaskEdit {
    pub category: Option<TaskCategory>,
    pub total_sessions: Option<u32>,
    pub focus_minutes: Option<f64>,
    pub break_minutes: Option<f64>,
    pub description: Option<String>,
}

/// Completed-task summary shown as daily progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyProgress {
    pub completed: usize,
    pub total: usize,
    /// 0 when the list is empty
    pub percentage: f64,
}

pub struct TaskStore {
    path: PathBuf,
    tasks: Vec<Task>,
}

impl TaskStore {
    /// Load the task list from `path`, starting empty if the file does not exist
    pub fn open(path: &Path) -> Result<Self> {
        let tasks = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read task list: {}", path.display()))?;
            if content.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&content)
                    .with_context(|| format!("Failed to parse task list: {}", path.display()))?
            }
        } else {
            Vec::new()
        };

        info!("Loaded {} tasks from {}", tasks.len(), path.display());
        Ok(Self {
            path: path.to_path_buf(),
            tasks,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Persist `tasks`, replacing the in-memory list only once the write succeeded
    fn commit(&mut self, tasks: Vec<Task>) -> Result<()> {
        write_tasks(&self.path, &tasks)?;
        self.tasks = tasks;
        Ok(())
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    /// Create a task and persist the list
    pub fn add(&mut self, draft: TaskDraft) -> Result<Task> {
        let name = draft.name.trim();
        if name.is_empty() {
            bail!("Task name cannot be empty");
        }

        let mut task = Task::new(self.next_id(), name, draft.category, draft.total_sessions)
            .with_durations(draft.focus_minutes, draft.break_minutes);
        task.description = draft.description;

        let mut tasks = self.tasks.clone();
        tasks.push(task.clone());
        self.commit(tasks)?;
        info!("Added task {} ({})", task.id, task.todo_name);
        Ok(task)
    }

    /// Apply an edit; returns the updated task, or `None` if the id is unknown
    pub fn edit(&mut self, id: u64, edit: TaskEdit) -> Result<Option<Task>> {
        let Some(index) = self.position(id) else {
            return Ok(None);
        };

        let mut task = self.tasks[index].clone();
        if let Some(category) = edit.category {
            task.category = category.into();
        }
        if let Some(total) = edit.total_sessions {
            task.total_session = f64::from(total.max(1));
        }
        if let Some(minutes) = edit.focus_minutes {
            task.pomo_duration = Some(minutes);
        }
        if let Some(minutes) = edit.break_minutes {
            task.break_duration = Some(minutes);
        }
        if let Some(description) = edit.description {
            task.description = Some(description);
        }

        let mut tasks = self.tasks.clone();
        tasks[index] = task.clone();
        self.commit(tasks)?;
        info!("Edited task {}", id);
        Ok(Some(task))
    }

    /// Flip a task's completion flag; returns the new value
    pub fn toggle_completed(&mut self, id: u64) -> Result<Option<bool>> {
        let Some(index) = self.position(id) else {
            return Ok(None);
        };
        let mut tasks = self.tasks.clone();
        let completed = !tasks[index].is_completed;
        tasks[index].is_completed = completed;
        self.commit(tasks)?;
        info!("Task {} marked {}", id, if completed { "done" } else { "open" });
        Ok(Some(completed))
    }

    pub fn remove(&mut self, id: u64) -> Result<Option<Task>> {
        let Some(index) = self.position(id) else {
            return Ok(None);
        };
        let mut tasks = self.tasks.clone();
        let removed = tasks.remove(index);
        self.commit(tasks)?;
        info!("Removed task {} ({})", id, removed.todo_name);
        Ok(Some(removed))
    }

    /// Credit a completed focus stage to a task and persist the change
    pub fn record_focus_session(&mut self, id: u64) -> Result<Option<SessionOutcome>> {
        let Some(index) = self.position(id) else {
            return Ok(None);
        };
        let mut tasks = self.tasks.clone();
        let outcome = tasks[index].record_focus_session();
        if outcome != SessionOutcome::AlreadyCompleted {
            self.commit(tasks)?;
        }
        Ok(Some(outcome))
    }

    pub fn progress(&self) -> DailyProgress {
        let total = self.tasks.len();
        let completed = self.tasks.iter().filter(|task| task.is_completed).count();
        let percentage = if total == 0 {
            0.0
        } else {
            completed as f64 / total as f64 * 100.0
        };
        DailyProgress {
            completed,
            total,
            percentage,
        }
    }

    /// Millisecond timestamp ids, bumped past the newest existing id
    fn next_id(&self) -> u64 {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        let newest = self.tasks.iter().map(|task| task.id).max().unwrap_or(0);
        now.max(newest.saturating_add(1))
    }
}

fn write_tasks(path: &Path, tasks: &[Task]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create task directory: {}", parent.display())
            })?;
        }
    }

    let content = serde_json::to_string_pretty(tasks).context("Failed to serialize task list")?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write task list: {}", path.display()))?;
    debug!("Saved {} tasks to {}", tasks.len(), path.display());
    Ok(())
}
