//! Stage duration configuration
//!
//! Durations are always positive; a zero-length stage would make the progress
//! fraction undefined, so it is rejected before it can reach the engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use super::Stage;

/// Focus stage length used when neither the CLI nor the active task says otherwise
pub const DEFAULT_FOCUS_MINUTES: u64 = 25;
/// Break stage length used when neither the CLI nor the active task says otherwise
pub const DEFAULT_BREAK_MINUTES: u64 = 5;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DurationError {
    #[error("{0} duration must be at least 1 second")]
    Zero(Stage),
    #[error("{stage} duration of {minutes} minutes is not a positive number")]
    NotPositive { stage: Stage, minutes: f64 },
}

/// Configured length of each stage, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageDurations {
    focus_seconds: u64,
    break_seconds: u64,
}

impl StageDurations {
    /// Create durations from seconds, rejecting zero-length stages
    pub fn new(focus_seconds: u64, break_seconds: u64) -> Result<Self, DurationError> {
        if focus_seconds == 0 {
            return Err(DurationError::Zero(Stage::Focus));
        }
        if break_seconds == 0 {
            return Err(DurationError::Zero(Stage::Break));
        }
        Ok(Self {
            focus_seconds,
            break_seconds,
        })
    }

    /// Create durations from whole minutes
    pub fn from_minutes(focus_minutes: u64, break_minutes: u64) -> Result<Self, DurationError> {
        Self::new(
            focus_minutes.saturating_mul(60),
            break_minutes.saturating_mul(60),
        )
    }

    pub fn focus_seconds(&self) -> u64 {
        self.focus_seconds
    }

    pub fn break_seconds(&self) -> u64 {
        self.break_seconds
    }

    /// Full length of the given stage
    pub fn for_stage(&self, stage: Stage) -> u64 {
        match stage {
            Stage::Focus => self.focus_seconds,
            Stage::Break => self.break_seconds,
        }
    }

    /// Apply per-task overrides on top of these durations.
    ///
    /// Each override is taken independently; a zero override is ignored and
    /// the corresponding field keeps its current value.
    pub fn with_overrides(&self, focus_seconds: Option<u64>, break_seconds: Option<u64>) -> Self {
        let pick = |stage: Stage, current: u64, candidate: Option<u64>| match candidate {
            Some(0) => {
                warn!("Ignoring zero {} duration override, keeping {}s", stage, current);
                current
            }
            Some(seconds) => seconds,
            None => current,
        };

        Self {
            focus_seconds: pick(Stage::Focus, self.focus_seconds, focus_seconds),
            break_seconds: pick(Stage::Break, self.break_seconds, break_seconds),
        }
    }
}

impl Default for StageDurations {
    fn default() -> Self {
        Self {
            focus_seconds: DEFAULT_FOCUS_MINUTES * 60,
            break_seconds: DEFAULT_BREAK_MINUTES * 60,
        }
    }
}

/// The task whose durations the timer runs with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveTask {
    pub id: u64,
    pub focus_seconds: Option<u64>,
    pub break_seconds: Option<u64>,
}

impl ActiveTask {
    /// Resolve this task's stage durations against the process defaults
    pub fn durations(&self, defaults: &StageDurations) -> StageDurations {
        defaults.with_overrides(self.focus_seconds, self.break_seconds)
    }
}

/// Convert a stored minute count into whole seconds.
///
/// Task records keep durations as plain JSON numbers, so fractional,
/// negative and non-finite values all have to be handled here.
pub fn seconds_from_minutes(stage: Stage, minutes: f64) -> Result<u64, DurationError> {
    if !minutes.is_finite() || minutes <= 0.0 {
        return Err(DurationError::NotPositive { stage, minutes });
    }
    let seconds = (minutes * 60.0).round();
    if seconds < 1.0 {
        return Err(DurationError::Zero(stage));
    }
    Ok(seconds as u64)
}
