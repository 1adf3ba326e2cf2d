//! Pomodoro timer state machine
//!
//! The engine is a plain value: it knows nothing about wall-clock time and is
//! advanced one second at a time by whoever owns it. Commands that have no
//! meaning in the current status are no-ops and report `false`.

use serde::Serialize;

use super::{
    display::{format_clock, progress_fraction},
    Stage, StageDurations, Status,
};

/// A stage boundary crossed by [`TimerEngine::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTransition {
    pub completed: Stage,
    pub next: Stage,
}

/// Point-in-time view of the timer for display and queries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerSnapshot {
    pub stage: Stage,
    pub status: Status,
    pub remaining_seconds: u64,
    /// Remaining time as `MM:SS`
    pub clock: String,
    /// Elapsed fraction of the current stage, in `[0, 1]`
    pub progress: f64,
    pub durations: StageDurations,
    /// Id of the task whose durations are loaded, if any
    pub active_task: Option<u64>,
}

impl TimerSnapshot {
    pub fn with_active_task(mut self, task_id: Option<u64>) -> Self {
        self.active_task = task_id;
        self
    }

    pub fn is_running(&self) -> bool {
        self.status == Status::Running
    }
}

#[derive(Debug, Clone)]
pub struct TimerEngine {
    stage: Stage,
    status: Status,
    remaining_seconds: u64,
    durations: StageDurations,
}

impl TimerEngine {
    /// Create an idle engine at the start of a focus stage
    pub fn new(durations: StageDurations) -> Self {
        Self {
            stage: Stage::Focus,
            status: Status::Idle,
            remaining_seconds: durations.for_stage(Stage::Focus),
            durations,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn durations(&self) -> StageDurations {
        self.durations
    }

    /// Full length of the stage currently loaded
    pub fn current_stage_duration(&self) -> u64 {
        self.durations.for_stage(self.stage)
    }

    pub fn progress_fraction(&self) -> f64 {
        progress_fraction(self.remaining_seconds, self.current_stage_duration())
    }

    pub fn clock(&self) -> String {
        format_clock(self.remaining_seconds)
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            stage: self.stage,
            status: self.status,
            remaining_seconds: self.remaining_seconds,
            clock: self.clock(),
            progress: self.progress_fraction(),
            durations: self.durations,
            active_task: None,
        }
    }

    /// Idle -> Running, counting down from the current remaining time
    pub fn start(&mut self) -> bool {
        if self.status != Status::Idle {
            return false;
        }
        self.status = Status::Running;
        true
    }

    /// Running -> Paused
    pub fn pause(&mut self) -> bool {
        if self.status != Status::Running {
            return false;
        }
        self.status = Status::Paused;
        true
    }

    /// Paused -> Running
    pub fn resume(&mut self) -> bool {
        if self.status != Status::Paused {
            return false;
        }
        self.status = Status::Running;
        true
    }

    /// Pause when running, resume when paused
    pub fn toggle_pause(&mut self) -> bool {
        match self.status {
            Status::Running => self.pause(),
            Status::Paused => self.resume(),
            Status::Idle => false,
        }
    }

    /// Running/Paused -> Idle with the full stage duration restored
    pub fn stop(&mut self) -> bool {
        if self.status == Status::Idle {
            return false;
        }
        self.status = Status::Idle;
        self.remaining_seconds = self.current_stage_duration();
        true
    }

    /// Restart the current stage from its full duration and keep running
    pub fn reset(&mut self) {
        self.remaining_seconds = self.current_stage_duration();
        self.status = Status::Running;
    }

    /// Jump to `target`, discarding any progress in the current stage
    pub fn switch_stage(&mut self, target: Stage) {
        self.stage = target;
        self.status = Status::Idle;
        self.remaining_seconds = self.current_stage_duration();
    }

    /// Override the remaining time without touching the configured durations.
    ///
    /// The value is capped at the current stage length.
    pub fn set_custom_duration(&mut self, seconds: u64) {
        self.remaining_seconds = seconds.min(self.current_stage_duration());
    }

    /// Load new stage durations and return to an idle, full stage
    pub fn reconfigure(&mut self, durations: StageDurations) {
        self.durations = durations;
        self.status = Status::Idle;
        self.remaining_seconds = self.current_stage_duration();
    }

    /// Advance one second.
    ///
    /// Returns the transition when the counter reaches zero, after which the
    /// engine sits idle at the start of the other stage.
    pub fn tick(&mut self) -> Option<StageTransition> {
        if self.status != Status::Running {
            return None;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds > 0 {
            return None;
        }

        let completed = self.stage;
        let next = completed.other();
        self.switch_stage(next);
        Some(StageTransition { completed, next })
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(StageDurations::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_engine(focus: u64, brk: u64) -> TimerEngine {
        TimerEngine::new(StageDurations::new(focus, brk).unwrap())
    }

    #[test]
    fn test_new_engine_is_idle_focus() {
        let engine = new_engine(1500, 300);
        assert_eq!(engine.stage(), Stage::Focus);
        assert_eq!(engine.status(), Status::Idle);
        assert_eq!(engine.remaining_seconds(), 1500);
        assert_eq!(engine.progress_fraction(), 0.0);
        assert_eq!(engine.clock(), "25:00");
    }

    #[test]
    fn test_tick_decrements_by_one() {
        let mut engine = new_engine(10, 5);
        engine.start();
        for expected in (1..10).rev() {
            assert_eq!(engine.tick(), None);
            assert_eq!(engine.remaining_seconds(), expected);
            assert_eq!(engine.status(), Status::Running);
        }
    }

    #[test]
    fn test_tick_ignored_unless_running() {
        let mut engine = new_engine(10, 5);
        assert_eq!(engine.tick(), None);
        assert_eq!(engine.remaining_seconds(), 10);

        engine.start();
        engine.tick();
        engine.pause();
        assert_eq!(engine.tick(), None);
        assert_eq!(engine.remaining_seconds(), 9);
    }

    #[test]
    fn test_basic_cycle() {
        let mut engine = new_engine(2, 1);
        assert!(engine.start());
        assert_eq!(engine.tick(), None);
        assert_eq!(
            engine.tick(),
            Some(StageTransition {
                completed: Stage::Focus,
                next: Stage::Break,
            })
        );
        assert_eq!(engine.stage(), Stage::Break);
        assert_eq!(engine.remaining_seconds(), 1);
        assert_eq!(engine.status(), Status::Idle);
    }

    #[test]
    fn test_stage_alternation() {
        let mut engine = new_engine(3, 2);
        for completions in 1..=6 {
            engine.start();
            let transition = loop {
                if let Some(transition) = engine.tick() {
                    break transition;
                }
            };
            let expected = if completions % 2 == 0 {
                Stage::Focus
            } else {
                Stage::Break
            };
            assert_eq!(engine.stage(), expected);
            assert_eq!(transition.next, expected);
            assert_eq!(engine.remaining_seconds(), engine.current_stage_duration());
        }
    }

    #[test]
    fn test_pause_resume() {
        let mut engine = new_engine(10, 5);
        engine.start();
        engine.tick();
        assert_eq!(engine.remaining_seconds(), 9);

        assert!(engine.pause());
        assert_eq!(engine.status(), Status::Paused);
        assert!(engine.resume());
        engine.tick();
        assert_eq!(engine.remaining_seconds(), 8);
    }

    #[test]
    fn test_invalid_transitions_are_noops() {
        let mut engine = new_engine(10, 5);
        assert!(!engine.resume());
        assert!(!engine.pause());
        assert!(!engine.toggle_pause());
        assert_eq!(engine.status(), Status::Idle);

        engine.start();
        assert!(!engine.start());
        assert!(!engine.resume());
        assert_eq!(engine.status(), Status::Running);
    }

    #[test]
    fn test_toggle_pause() {
        let mut engine = new_engine(10, 5);
        engine.start();
        assert!(engine.toggle_pause());
        assert_eq!(engine.status(), Status::Paused);
        assert!(engine.toggle_pause());
        assert_eq!(engine.status(), Status::Running);
    }

    #[test]
    fn test_stop_restores_full_duration() {
        let mut engine = new_engine(10, 5);
        engine.start();
        engine.tick();
        engine.tick();
        assert!(engine.stop());
        assert_eq!(engine.status(), Status::Idle);
        assert_eq!(engine.remaining_seconds(), 10);
    }

    #[test]
    fn test_stop_when_idle_is_idempotent() {
        let mut engine = new_engine(1500, 300);
        engine.set_custom_duration(300);
        assert!(!engine.stop());
        assert!(!engine.stop());
        assert_eq!(engine.remaining_seconds(), 300);
        assert_eq!(engine.status(), Status::Idle);
    }

    #[test]
    fn test_reset_restarts_running() {
        let mut engine = new_engine(10, 5);
        engine.start();
        engine.tick();
        engine.pause();
        engine.reset();
        assert_eq!(engine.status(), Status::Running);
        assert_eq!(engine.remaining_seconds(), 10);

        let mut idle = new_engine(10, 5);
        idle.reset();
        assert_eq!(idle.status(), Status::Running);
    }

    #[test]
    fn test_switch_stage() {
        let mut engine = new_engine(10, 5);
        engine.start();
        engine.tick();
        engine.switch_stage(Stage::Break);
        assert_eq!(engine.stage(), Stage::Break);
        assert_eq!(engine.status(), Status::Idle);
        assert_eq!(engine.remaining_seconds(), 5);

        engine.switch_stage(Stage::Focus);
        assert_eq!(engine.remaining_seconds(), 10);
    }

    #[test]
    fn test_custom_duration_override() {
        let mut engine = new_engine(25 * 60, 5 * 60);
        engine.set_custom_duration(300);
        assert_eq!(engine.remaining_seconds(), 300);
        assert_eq!(engine.stage(), Stage::Focus);
        assert_eq!(engine.status(), Status::Idle);
        assert_eq!(engine.durations().focus_seconds(), 25 * 60);

        // start keeps the custom value
        engine.start();
        engine.tick();
        assert_eq!(engine.remaining_seconds(), 299);
    }

    #[test]
    fn test_custom_duration_capped_at_stage_length() {
        let mut engine = new_engine(60, 30);
        engine.set_custom_duration(600);
        assert_eq!(engine.remaining_seconds(), 60);
        assert_eq!(engine.progress_fraction(), 0.0);
    }

    #[test]
    fn test_custom_zero_completes_on_next_tick() {
        let mut engine = new_engine(60, 30);
        engine.set_custom_duration(0);
        engine.start();
        let transition = engine.tick().unwrap();
        assert_eq!(transition.completed, Stage::Focus);
        assert_eq!(engine.remaining_seconds(), 30);
    }

    #[test]
    fn test_progress_bounds() {
        let mut engine = new_engine(4, 2);
        assert_eq!(engine.progress_fraction(), 0.0);
        engine.start();
        let mut last = 0.0;
        for _ in 0..3 {
            engine.tick();
            let progress = engine.progress_fraction();
            assert!((0.0..=1.0).contains(&progress));
            assert!(progress > last);
            last = progress;
        }
        assert_eq!(last, 0.75);
    }

    #[test]
    fn test_reconfigure_resets_to_idle() {
        let mut engine = new_engine(10, 5);
        engine.switch_stage(Stage::Break);
        engine.start();
        engine.tick();

        engine.reconfigure(StageDurations::new(20, 8).unwrap());
        assert_eq!(engine.status(), Status::Idle);
        assert_eq!(engine.stage(), Stage::Break);
        assert_eq!(engine.remaining_seconds(), 8);
        assert_eq!(engine.durations().focus_seconds(), 20);
    }

    #[test]
    fn test_snapshot() {
        let mut engine = new_engine(90, 30);
        engine.start();
        engine.tick();
        let snapshot = engine.snapshot().with_active_task(Some(7));
        assert_eq!(snapshot.clock, "01:29");
        assert_eq!(snapshot.status, Status::Running);
        assert!(snapshot.is_running());
        assert_eq!(snapshot.active_task, Some(7));
    }
}
