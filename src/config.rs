//! Configuration and CLI argument handling

use clap::Parser;
use std::path::PathBuf;

use crate::timer::{DurationError, StageDurations};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "pomo-timer")]
#[command(about = "A terminal task list with a Pomodoro focus timer")]
#[command(version)]
pub struct Config {
    /// Default focus stage length in minutes
    #[arg(short, long, default_value = "25", value_parser = clap::value_parser!(u64).range(1..))]
    pub focus_minutes: u64,

    /// Default break stage length in minutes
    #[arg(short, long, default_value = "5", value_parser = clap::value_parser!(u64).range(1..))]
    pub break_minutes: u64,

    /// JSON file holding the task list
    #[arg(short, long, default_value = "todos.json")]
    pub tasks_file: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Stage durations used when no task overrides them
    pub fn default_durations(&self) -> Result<StageDurations, DurationError> {
        StageDurations::from_minutes(self.focus_minutes, self.break_minutes)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
