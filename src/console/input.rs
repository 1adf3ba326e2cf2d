//! Stdin line reader
//!
//! Blocking reads cannot be cancelled, so stdin is read on a plain thread
//! rather than the runtime's blocking pool; exiting never waits on it.

use std::io::BufRead;
use std::thread;
use tokio::sync::mpsc;
use tracing::{debug, warn};

const LINE_BUFFER: usize = 16;

/// Spawn a thread forwarding stdin lines; the channel closes at end of input
pub fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (line_tx, line_rx) = mpsc::channel(LINE_BUFFER);

    let spawned = thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        if line_tx.blocking_send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Failed to read from stdin: {}", e);
                        break;
                    }
                }
            }
            debug!("Stdin reader finished");
        });

    if let Err(e) = spawned {
        warn!("Failed to spawn stdin reader: {}", e);
    }
    line_rx
}
