//! Console command parsing

use clap::{Parser, Subcommand};

use crate::todo::TaskCategory;

/// One line typed at the console
#[derive(Parser, Debug)]
#[command(name = "pomo", no_binary_name = true)]
#[command(disable_help_subcommand = true, disable_version_flag = true)]
pub struct ConsoleLine {
    #[command(subcommand)]
    pub command: ConsoleCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    /// Start counting down the current stage
    Start,
    /// Stop and restore the full stage duration
    Stop,
    Pause,
    Resume,
    /// Pause when running, resume when paused
    Toggle,
    /// Restart the current stage from its full duration
    Reset,
    /// Switch to the focus stage
    Focus,
    /// Switch to the break stage
    Break,
    /// Set the remaining time of the current stage
    Custom {
        /// Minutes left on the clock
        minutes: u64,
    },
    /// Show the timer
    Status,
    /// List tasks
    Tasks,
    /// Add a task
    Add {
        /// Task name
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
        #[arg(short, long, value_enum, default_value = "others")]
        category: TaskCategory,
        /// Focus stages needed to finish, counted in sessions
        #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        sessions: u32,
        /// Focus length for this task, in minutes
        #[arg(short, long)]
        focus: Option<f64>,
        /// Break length for this task, in minutes
        #[arg(short, long = "break")]
        break_minutes: Option<f64>,
        #[arg(short, long)]
        note: Option<String>,
    },
    /// Change a task
    Edit {
        id: u64,
        #[arg(short, long, value_enum)]
        category: Option<TaskCategory>,
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        sessions: Option<u32>,
        #[arg(short, long)]
        focus: Option<f64>,
        #[arg(short, long = "break")]
        break_minutes: Option<f64>,
        #[arg(short, long)]
        note: Option<String>,
    },
    /// Make a task the active one
    Select { id: u64 },
    /// Clear the active task
    Deselect,
    /// Toggle a task's completion
    Done { id: u64 },
    /// Delete a task
    Remove { id: u64 },
    /// Show how many tasks are done
    Summary,
    Help,
    #[command(alias = "exit")]
    Quit,
}

/// Parse a console line; blank lines yield `None`
pub fn parse_line(line: &str) -> Result<Option<ConsoleCommand>, clap::Error> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return Ok(None);
    }
    ConsoleLine::try_parse_from(words).map(|parsed| Some(parsed.command))
}

/// Help text listing every console command
pub fn help_text() -> String {
    use clap::CommandFactory;
    ConsoleLine::command().render_help().to_string()
}
