//! Stage and status enums for the focus timer

use serde::{Deserialize, Serialize};

/// Which half of a pomodoro cycle the timer is counting
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    #[default]
    Focus,
    Break,
}

impl Stage {
    /// The stage that follows this one when it completes
    pub fn other(self) -> Self {
        match self {
            Stage::Focus => Stage::Break,
            Stage::Break => Stage::Focus,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Focus => "focus",
            Stage::Break => "break",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the tick source is counting down
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Not counting; fresh, stopped or just completed a stage
    #[default]
    Idle,
    Running,
    /// Counting suspended, remaining time retained
    Paused,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Idle => "idle",
            Status::Running => "running",
            Status::Paused => "paused",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_other_alternates() {
        assert_eq!(Stage::Focus.other(), Stage::Break);
        assert_eq!(Stage::Break.other(), Stage::Focus);
        assert_eq!(Stage::Focus.other().other(), Stage::Focus);
    }

    #[test]
    fn test_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Stage::Break).unwrap(), "\"break\"");
        assert_eq!(serde_json::to_string(&Status::Paused).unwrap(), "\"paused\"");
    }

    #[test]
    fn test_defaults_are_fresh_focus() {
        assert_eq!(Stage::default(), Stage::Focus);
        assert_eq!(Status::default(), Status::Idle);
    }
}
