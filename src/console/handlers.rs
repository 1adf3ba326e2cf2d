//! Console command handlers

use anyhow::{anyhow, Result};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use super::{
    commands::{help_text, parse_line, ConsoleCommand},
    responses::{render_progress, render_snapshot, render_task, render_task_list, stage_label},
};
use crate::{
    runtime::TimerHandle,
    timer::{Stage, TimerSnapshot},
    todo::{TaskDraft, TaskEdit, TaskStore},
};

/// What the console loop should do after a line
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Print(String),
    /// Ask a yes/no question; the next line is the answer
    Confirm(String),
    Quit,
}

/// Console session state: the collaborators plus any question awaiting an answer
pub struct Console {
    timer: TimerHandle,
    store: Arc<Mutex<TaskStore>>,
    pending_switch: Option<Stage>,
}

impl Console {
    pub fn new(timer: TimerHandle, store: Arc<Mutex<TaskStore>>) -> Self {
        Self {
            timer,
            store,
            pending_switch: None,
        }
    }

    /// Handle one raw input line
    pub async fn handle_line(&mut self, line: &str) -> Result<Reply> {
        if let Some(stage) = self.pending_switch.take() {
            return self.confirm_switch(stage, line).await;
        }

        match parse_line(line) {
            Ok(Some(command)) => self.handle(command).await,
            Ok(None) => Ok(Reply::Print(String::new())),
            Err(e) => Ok(Reply::Print(e.render().to_string())),
        }
    }

    pub async fn handle(&mut self, command: ConsoleCommand) -> Result<Reply> {
        debug!("Console command: {:?}", command);

        match command {
            ConsoleCommand::Start => {
                let snapshot = self.timer.start().await?;
                self.timer_reply(&snapshot)
            }
            ConsoleCommand::Stop => {
                let snapshot = self.timer.stop().await?;
                self.timer_reply(&snapshot)
            }
            ConsoleCommand::Pause => {
                let snapshot = self.timer.pause().await?;
                self.timer_reply(&snapshot)
            }
            ConsoleCommand::Resume => {
                let snapshot = self.timer.resume().await?;
                self.timer_reply(&snapshot)
            }
            ConsoleCommand::Toggle => {
                let snapshot = self.timer.toggle_pause().await?;
                self.timer_reply(&snapshot)
            }
            ConsoleCommand::Reset => {
                let snapshot = self.timer.reset().await?;
                self.timer_reply(&snapshot)
            }
            ConsoleCommand::Focus => self.request_switch(Stage::Focus).await,
            ConsoleCommand::Break => self.request_switch(Stage::Break).await,
            ConsoleCommand::Custom { minutes } => {
                let snapshot = self
                    .timer
                    .set_custom_duration(minutes.saturating_mul(60))
                    .await?;
                self.timer_reply(&snapshot)
            }
            ConsoleCommand::Status => self.timer_reply(&self.timer.snapshot()),
            ConsoleCommand::Tasks => {
                let active = self.timer.snapshot().active_task;
                let store = self.store()?;
                Ok(Reply::Print(render_task_list(store.tasks(), active)))
            }
            ConsoleCommand::Add {
                name,
                category,
                sessions,
                focus,
                break_minutes,
                note,
            } => {
                let task = self.store()?.add(TaskDraft {
                    name: name.join(" "),
                    category,
                    total_sessions: sessions,
                    focus_minutes: focus,
                    break_minutes,
                    description: note,
                })?;
                Ok(Reply::Print(format!("Added {}", render_task(&task, false).trim())))
            }
            ConsoleCommand::Edit {
                id,
                category,
                sessions,
                focus,
                break_minutes,
                note,
            } => {
                let edit = TaskEdit {
                    category,
                    total_sessions: sessions,
                    focus_minutes: focus,
                    break_minutes,
                    description: note,
                };
                let before = self.store()?.get(id).map(|task| task.active_task());
                let Some(task) = self.store()?.edit(id, edit)? else {
                    return Ok(no_such_task(id));
                };
                // only new durations restart the active task's stage
                let after = task.active_task();
                if self.timer.snapshot().active_task == Some(id) && before != Some(after) {
                    self.timer.select_task(Some(after)).await?;
                }
                Ok(Reply::Print(format!("Updated {}", render_task(&task, false).trim())))
            }
            ConsoleCommand::Select { id } => {
                let current = self.timer.snapshot();
                if current.active_task == Some(id) {
                    return self.timer_reply(&current);
                }
                let active = self.store()?.get(id).map(|task| task.active_task());
                let Some(active) = active else {
                    return Ok(no_such_task(id));
                };
                let snapshot = self.timer.select_task(Some(active)).await?;
                self.timer_reply(&snapshot)
            }
            ConsoleCommand::Deselect => {
                let snapshot = self.timer.select_task(None).await?;
                self.timer_reply(&snapshot)
            }
            ConsoleCommand::Done { id } => match self.store()?.toggle_completed(id)? {
                Some(true) => Ok(Reply::Print(format!("Task {} done", id))),
                Some(false) => Ok(Reply::Print(format!("Task {} reopened", id))),
                None => Ok(no_such_task(id)),
            },
            ConsoleCommand::Remove { id } => {
                let removed = self.store()?.remove(id)?;
                let Some(task) = removed else {
                    return Ok(no_such_task(id));
                };
                if self.timer.snapshot().active_task == Some(id) {
                    self.timer.select_task(None).await?;
                }
                Ok(Reply::Print(format!("Removed {}", task.todo_name)))
            }
            ConsoleCommand::Summary => {
                let progress = self.store()?.progress();
                Ok(Reply::Print(render_progress(&progress)))
            }
            ConsoleCommand::Help => Ok(Reply::Print(help_text())),
            ConsoleCommand::Quit => Ok(Reply::Quit),
        }
    }

    /// Switch immediately unless that would throw away a running stage
    async fn request_switch(&mut self, stage: Stage) -> Result<Reply> {
        if self.timer.snapshot().is_running() {
            self.pending_switch = Some(stage);
            return Ok(Reply::Confirm(format!(
                "The timer is running. Stop it and switch to {}?",
                stage_label(stage)
            )));
        }
        let snapshot = self.timer.switch_stage(stage).await?;
        self.timer_reply(&snapshot)
    }

    async fn confirm_switch(&mut self, stage: Stage, answer: &str) -> Result<Reply> {
        match answer.trim().to_lowercase().as_str() {
            "y" | "yes" => {
                let snapshot = self.timer.switch_stage(stage).await?;
                self.timer_reply(&snapshot)
            }
            _ => Ok(Reply::Print("Timer left running".to_string())),
        }
    }

    fn timer_reply(&self, snapshot: &TimerSnapshot) -> Result<Reply> {
        let task = match snapshot.active_task {
            Some(id) => self.store()?.get(id).cloned(),
            None => None,
        };
        Ok(Reply::Print(render_snapshot(snapshot, task.as_ref())))
    }

    fn store(&self) -> Result<MutexGuard<'_, TaskStore>> {
        self.store
            .lock()
            .map_err(|e| anyhow!("Failed to lock task store: {}", e))
    }
}

fn no_such_task(id: u64) -> Reply {
    Reply::Print(format!("No task with id {}", id))
}
