//! Timer controller background task
//!
//! One task owns the [`TimerEngine`] and its tick source. Commands arrive over
//! a channel and are handled in the same `select!` loop as the ticks, so a
//! command and a tick never interleave. The tick source only exists while the
//! engine is running.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tokio::{
    sync::{broadcast, mpsc, oneshot, watch},
    task::JoinHandle,
    time::{interval_at, Instant, Interval, MissedTickBehavior},
};
use tracing::{debug, info, trace};

use crate::timer::{ActiveTask, Stage, StageDurations, Status, TimerEngine, TimerSnapshot};

/// Real-time length of one timer second
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

const COMMAND_BUFFER: usize = 32;
const COMPLETION_BUFFER: usize = 16;

/// Commands accepted by the controller
#[derive(Debug, Clone, PartialEq)]
pub enum TimerCommand {
    Start,
    Stop,
    Pause,
    Resume,
    TogglePause,
    Reset,
    SwitchStage(Stage),
    /// New remaining time, in seconds
    SetCustomDuration(u64),
    /// Load another task's durations, or the defaults for `None`
    SelectTask(Option<ActiveTask>),
}

/// Emitted once per stage boundary crossed while running
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageCompleted {
    pub completed: Stage,
    pub next: Stage,
    /// Task that was active when the stage ended
    pub task_id: Option<u64>,
    pub at: DateTime<Utc>,
}

struct Request {
    command: TimerCommand,
    reply: oneshot::Sender<TimerSnapshot>,
}

/// Interval that is armed exactly while the engine is running
struct TickSource {
    period: Duration,
    interval: Option<Interval>,
}

impl TickSource {
    fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    fn is_armed(&self) -> bool {
        self.interval.is_some()
    }

    /// Start a fresh interval whose first tick is one full period away
    fn arm(&mut self) {
        let mut interval = interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
    }

    fn disarm(&mut self) {
        self.interval = None;
    }

    /// Bring the source in line with the engine status
    fn sync(&mut self, status: Status) {
        match (status == Status::Running, self.is_armed()) {
            (true, false) => self.arm(),
            (false, true) => self.disarm(),
            _ => {}
        }
    }

    /// Resolve on the next tick; never resolves while disarmed
    async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

/// Cloneable handle for sending commands to the controller and observing it
#[derive(Debug, Clone)]
pub struct TimerHandle {
    command_tx: mpsc::Sender<Request>,
    snapshot_rx: watch::Receiver<TimerSnapshot>,
    completed_tx: broadcast::Sender<StageCompleted>,
}

impl TimerHandle {
    /// Send a command and wait for the resulting snapshot
    pub async fn send(&self, command: TimerCommand) -> Result<TimerSnapshot> {
        let (reply, response) = oneshot::channel();
        self.command_tx
            .send(Request { command, reply })
            .await
            .map_err(|_| anyhow!("Timer controller is not running"))?;
        response
            .await
            .context("Timer controller dropped the command")
    }

    pub async fn start(&self) -> Result<TimerSnapshot> {
        self.send(TimerCommand::Start).await
    }

    pub async fn stop(&self) -> Result<TimerSnapshot> {
        self.send(TimerCommand::Stop).await
    }

    pub async fn pause(&self) -> Result<TimerSnapshot> {
        self.send(TimerCommand::Pause).await
    }

    pub async fn resume(&self) -> Result<TimerSnapshot> {
        self.send(TimerCommand::Resume).await
    }

    pub async fn toggle_pause(&self) -> Result<TimerSnapshot> {
        self.send(TimerCommand::TogglePause).await
    }

    pub async fn reset(&self) -> Result<TimerSnapshot> {
        self.send(TimerCommand::Reset).await
    }

    pub async fn switch_stage(&self, stage: Stage) -> Result<TimerSnapshot> {
        self.send(TimerCommand::SwitchStage(stage)).await
    }

    pub async fn set_custom_duration(&self, seconds: u64) -> Result<TimerSnapshot> {
        self.send(TimerCommand::SetCustomDuration(seconds)).await
    }

    pub async fn select_task(&self, task: Option<ActiveTask>) -> Result<TimerSnapshot> {
        self.send(TimerCommand::SelectTask(task)).await
    }

    /// Latest published state
    pub fn snapshot(&self) -> TimerSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Receiver that is notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.snapshot_rx.clone()
    }

    pub fn subscribe_completions(&self) -> broadcast::Receiver<StageCompleted> {
        self.completed_tx.subscribe()
    }
}

struct TimerController {
    engine: TimerEngine,
    defaults: StageDurations,
    active_task: Option<u64>,
    ticks: TickSource,
    snapshot_tx: watch::Sender<TimerSnapshot>,
    completed_tx: broadcast::Sender<StageCompleted>,
}

/// Spawn the controller task.
///
/// The task runs until every [`TimerHandle`] has been dropped.
pub fn spawn_timer(defaults: StageDurations, tick_period: Duration) -> (TimerHandle, JoinHandle<()>) {
    let engine = TimerEngine::new(defaults);
    let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
    let (snapshot_tx, snapshot_rx) = watch::channel(engine.snapshot());
    let (completed_tx, _) = broadcast::channel(COMPLETION_BUFFER);

    let controller = TimerController {
        engine,
        defaults,
        active_task: None,
        ticks: TickSource::new(tick_period),
        snapshot_tx,
        completed_tx: completed_tx.clone(),
    };
    let task = tokio::spawn(controller.run(command_rx));

    let handle = TimerHandle {
        command_tx,
        snapshot_rx,
        completed_tx,
    };
    (handle, task)
}

impl TimerController {
    async fn run(mut self, mut command_rx: mpsc::Receiver<Request>) {
        info!("Starting timer controller");

        loop {
            tokio::select! {
                request = command_rx.recv() => {
                    let Some(Request { command, reply }) = request else {
                        break;
                    };
                    self.apply(command);
                    let snapshot = self.publish();
                    if reply.send(snapshot).is_err() {
                        debug!("Command sender went away before the reply");
                    }
                }
                _ = self.ticks.tick() => {
                    self.on_tick();
                }
            }
        }

        self.ticks.disarm();
        info!("Timer controller stopped");
    }

    fn apply(&mut self, command: TimerCommand) {
        let engine = &mut self.engine;
        let changed = match &command {
            TimerCommand::Start => engine.start(),
            TimerCommand::Stop => engine.stop(),
            TimerCommand::Pause => engine.pause(),
            TimerCommand::Resume => engine.resume(),
            TimerCommand::TogglePause => engine.toggle_pause(),
            TimerCommand::Reset => {
                engine.reset();
                // restart the second boundary along with the stage
                self.ticks.disarm();
                true
            }
            TimerCommand::SwitchStage(stage) => {
                engine.switch_stage(*stage);
                true
            }
            TimerCommand::SetCustomDuration(seconds) => {
                engine.set_custom_duration(*seconds);
                true
            }
            TimerCommand::SelectTask(task) => {
                let durations = task
                    .map(|task| task.durations(&self.defaults))
                    .unwrap_or(self.defaults);
                engine.reconfigure(durations);
                self.active_task = task.map(|task| task.id);
                true
            }
        };

        if changed {
            info!(
                "Timer {:?}: {} {} {}",
                command,
                self.engine.stage(),
                self.engine.status(),
                self.engine.clock()
            );
        } else {
            debug!("Ignoring {:?} while {}", command, self.engine.status());
        }

        self.ticks.sync(self.engine.status());
    }

    fn on_tick(&mut self) {
        let transition = self.engine.tick();
        self.ticks.sync(self.engine.status());
        self.publish();

        // listeners reading the snapshot on this event see the new stage
        let Some(transition) = transition else {
            trace!("Tick: {}", self.engine.clock());
            return;
        };
        info!(
            "{} stage complete, {} is next ({})",
            transition.completed,
            transition.next,
            self.engine.clock()
        );
        let event = StageCompleted {
            completed: transition.completed,
            next: transition.next,
            task_id: self.active_task,
            at: Utc::now(),
        };
        if self.completed_tx.send(event).is_err() {
            debug!("No listeners for stage completion");
        }
    }

    fn publish(&self) -> TimerSnapshot {
        let snapshot = self.engine.snapshot().with_active_task(self.active_task);
        self.snapshot_tx.send_replace(snapshot.clone());
        snapshot
    }
}
