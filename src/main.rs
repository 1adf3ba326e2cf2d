//! pomo-timer - A terminal task list with a Pomodoro focus timer
//! 
//! This is the main entry point for the pomo-timer application.

use std::sync::{Arc, Mutex};
use tracing::{error, info};

use pomo_timer::{
    config::Config,
    console::{run_console, spawn_stdin_reader},
    runtime::{session_tracker_task, spawn_timer, TICK_PERIOD},
    todo::TaskStore,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr so they stay out of the console output
    tracing_subscriber::fmt()
        .with_env_filter(format!("pomo_timer={}", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting pomo-timer v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: focus={}min, break={}min, tasks={}",
        config.focus_minutes,
        config.break_minutes,
        config.tasks_file.display()
    );

    let defaults = config.default_durations()?;
    let store = Arc::new(Mutex::new(TaskStore::open(&config.tasks_file)?));

    // Start the timer controller and the task that credits focus sessions
    let (timer, controller) = spawn_timer(defaults, TICK_PERIOD);
    let tracker = tokio::spawn(session_tracker_task(
        Arc::clone(&store),
        timer.subscribe_completions(),
    ));

    let lines = spawn_stdin_reader();

    tokio::select! {
        result = run_console(timer.clone(), Arc::clone(&store), lines) => {
            if let Err(e) = result {
                error!("Console error: {:#}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // Dropping the last handle ends the controller, which closes the tracker's channel
    drop(timer);
    if let Err(e) = controller.await {
        error!("Timer controller failed: {}", e);
    }
    if let Err(e) = tracker.await {
        error!("Session tracker failed: {}", e);
    }

    info!("Shutdown complete");
    Ok(())
}
