//! Session tracker background task

use anyhow::{anyhow, Result};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, error, info, warn};

use super::StageCompleted;
use crate::{
    timer::Stage,
    todo::{SessionOutcome, TaskStore},
};

/// Background task that credits completed focus stages to the active task
pub async fn session_tracker_task(
    store: Arc<Mutex<TaskStore>>,
    mut completions: broadcast::Receiver<StageCompleted>,
) {
    info!("Starting session tracker task");

    loop {
        match completions.recv().await {
            Ok(event) => {
                // the store write is blocking file I/O under a std mutex
                let store = Arc::clone(&store);
                let recorded =
                    tokio::task::spawn_blocking(move || record_completion(&store, &event)).await;
                match recorded {
                    Ok(Ok(_)) => {}
                    Ok(Err(e)) => error!("Failed to record session: {:#}", e),
                    Err(e) => error!("Session recording task failed: {}", e),
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Session tracker missed {} stage completions", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }

    info!("Session tracker stopped");
}

/// Apply one stage completion to the task store.
///
/// Only focus stages with an active task count; everything else is ignored
/// and reported as `None`.
pub fn record_completion(
    store: &Mutex<TaskStore>,
    event: &StageCompleted,
) -> Result<Option<SessionOutcome>> {
    if event.completed != Stage::Focus {
        debug!("Break complete, no session credited");
        return Ok(None);
    }
    let Some(task_id) = event.task_id else {
        debug!("Focus complete with no active task");
        return Ok(None);
    };

    let mut store = store
        .lock()
        .map_err(|e| anyhow!("Failed to lock task store: {}", e))?;

    match store.record_focus_session(task_id)? {
        Some(SessionOutcome::Advanced { current, total }) => {
            info!("Task {} advanced to session {}/{}", task_id, current, total);
            Ok(Some(SessionOutcome::Advanced { current, total }))
        }
        Some(SessionOutcome::Completed { total }) => {
            info!("Task {} completed all {} sessions", task_id, total);
            Ok(Some(SessionOutcome::Completed { total }))
        }
        Some(SessionOutcome::AlreadyCompleted) => {
            debug!("Task {} is already complete, not crediting", task_id);
            Ok(Some(SessionOutcome::AlreadyCompleted))
        }
        None => {
            warn!("Active task {} no longer exists", task_id);
            Ok(None)
        }
    }
}
