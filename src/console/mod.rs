//! Console module
//!
//! The interactive host for the timer: reads commands line by line, asks for
//! confirmation before discarding a running stage, and prints stage
//! completions as they happen.

pub mod commands;
pub mod handlers;
pub mod input;
pub mod responses;

use anyhow::Result;
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast::error::RecvError, mpsc};
use tracing::{error, info, warn};

use crate::{runtime::TimerHandle, todo::TaskStore};
pub use commands::{parse_line, ConsoleCommand};
pub use handlers::{Console, Reply};
pub use input::spawn_stdin_reader;
use responses::render_completion;

/// Run the console until `quit`, end of input, or the timer going away
pub async fn run_console(
    timer: TimerHandle,
    store: Arc<Mutex<TaskStore>>,
    mut lines: mpsc::Receiver<String>,
) -> Result<()> {
    let mut completions = timer.subscribe_completions();
    let mut console = Console::new(timer.clone(), store);

    println!("pomo-timer ready. Type `help` for commands.");

    loop {
        tokio::select! {
            line = lines.recv() => {
                let Some(line) = line else {
                    info!("Input closed");
                    break;
                };
                match console.handle_line(&line).await {
                    Ok(Reply::Print(text)) => {
                        if !text.is_empty() {
                            println!("{}", text);
                        }
                    }
                    Ok(Reply::Confirm(question)) => println!("{} [y/N]", question),
                    Ok(Reply::Quit) => break,
                    Err(e) => {
                        error!("Command failed: {:#}", e);
                        println!("error: {:#}", e);
                    }
                }
            }
            event = completions.recv() => match event {
                Ok(event) => {
                    let remaining = timer.snapshot().remaining_seconds;
                    println!("{}", render_completion(&event, remaining));
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Console missed {} stage completions", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    Ok(())
}
