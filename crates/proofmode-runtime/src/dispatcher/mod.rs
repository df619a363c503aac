//! Two-lane task dispatcher.
//!
//! The dispatcher serializes the plugin's entire pipeline: editor
//! commands, proof-checker responses, and view traffic all become tasks
//! on one of two lanes, and at most one task executes per lane at a time.
//!
//! ```text
//!                       ┌──────────────────────────────┐
//! dispatch_command ───► │  critical lane   [MultiQueue]│  Escape / input
//! inject_view_event ──► │                              │  method traffic
//!                       │  blocking lane   [MultiQueue]│  commands, checker
//! bridge inject ──────► │                              │  responses, prompts
//!                       │          kick_start          │
//!                       └──────────────────────────────┘
//! ```
//!
//! # Kick-start
//!
//! [`Dispatcher::kick_start`] is the forward-progress procedure. The
//! source design re-entered it recursively from every completion
//! callback; here it is an explicit run loop (long response bursts would
//! otherwise grow the stack). Each round steps the critical lane then the
//! blocking lane; a step runs at most one task. The loop continues while
//! any step executed a task that asked to keep running, which is
//! exactly the re-kick set of the recursive formulation.
//!
//! Re-entrancy is safe by construction: the per-lane `Busy` flag is
//! checked and set under one lock, so overlapping `kick_start` calls
//! (the bridge re-enters from its pump task) skip lanes that are
//! mid-task instead of double-executing.
//!
//! The lane lock is never held across an `await`.

mod executor;

use crate::config::DispatchConfig;
use crate::error::DispatchError;
use crate::queue::{MultiQueue, PeekMode};
use parking_lot::Mutex;
use proofmode_handler::Handlers;
use proofmode_task::{Command, Session, Task, ViewEvent};
use proofmode_types::Source;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// One of the dispatcher's two lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lane {
    /// User-interrupt traffic; skips over gated layers.
    Critical,
    /// Commands, checker responses, prompts; gated by the head layer.
    Blocking,
}

impl Lane {
    /// Returns the lane's display name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Blocking => "blocking",
        }
    }

    fn peek_mode(self) -> PeekMode {
        match self {
            Self::Critical => PeekMode::NonBlocking,
            Self::Blocking => PeekMode::Blocking,
        }
    }
}

/// Re-entrancy flag for one lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneStatus {
    /// No task mid-execution; the lane may be stepped.
    Idle,
    /// Exactly one task mid-execution.
    Busy,
}

impl LaneStatus {
    /// Returns `true` for [`LaneStatus::Busy`].
    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy)
    }
}

/// Both lanes plus their status flags, guarded by one lock.
pub(crate) struct Lanes {
    pub(crate) critical: MultiQueue,
    pub(crate) blocking: MultiQueue,
    status_critical: LaneStatus,
    status_blocking: LaneStatus,
}

impl Lanes {
    fn new() -> Self {
        Self {
            critical: MultiQueue::new(),
            blocking: MultiQueue::new(),
            status_critical: LaneStatus::Idle,
            status_blocking: LaneStatus::Idle,
        }
    }

    pub(crate) fn queue_mut(&mut self, lane: Lane) -> &mut MultiQueue {
        match lane {
            Lane::Critical => &mut self.critical,
            Lane::Blocking => &mut self.blocking,
        }
    }

    fn queue(&self, lane: Lane) -> &MultiQueue {
        match lane {
            Lane::Critical => &self.critical,
            Lane::Blocking => &self.blocking,
        }
    }

    fn status(&self, lane: Lane) -> LaneStatus {
        match lane {
            Lane::Critical => self.status_critical,
            Lane::Blocking => self.status_blocking,
        }
    }

    fn set_status(&mut self, lane: Lane, status: LaneStatus) {
        match lane {
            Lane::Critical => self.status_critical = status,
            Lane::Blocking => self.status_blocking = status,
        }
    }
}

/// Outcome of stepping one lane.
enum StepOutcome {
    /// The lane was busy, gated, or empty.
    NoTask,
    /// One task executed with this keep-running result.
    Ran { keep_running: bool },
}

struct Inner {
    session: Arc<dyn Session>,
    handlers: Arc<dyn Handlers>,
    lanes: Mutex<Lanes>,
    destroyed: AtomicBool,
    config: DispatchConfig,
}

/// The two-lane task dispatcher.
///
/// Cheaply cloneable; the request bridge holds a clone for the lifetime
/// of each proof-checker request and re-enters [`kick_start`]
/// (`Dispatcher::kick_start`) from its pump task.
///
/// # Example
///
/// ```
/// use proofmode_handler::testing::{RecordingHandlers, ScriptedSession};
/// use proofmode_runtime::Dispatcher;
/// use proofmode_task::Command;
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let session = Arc::new(ScriptedSession::new());
/// let handlers = Arc::new(RecordingHandlers::new());
/// let dispatcher = Dispatcher::new(session, handlers.clone());
///
/// dispatcher.dispatch_command(Command::ShowGoals).await.unwrap();
/// assert_eq!(handlers.calls(), vec!["command:ShowGoals"]);
/// # }
/// ```
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Creates a dispatcher with the default configuration.
    #[must_use]
    pub fn new(session: Arc<dyn Session>, handlers: Arc<dyn Handlers>) -> Self {
        Self {
            inner: Arc::new(Inner {
                session,
                handlers,
                lanes: Mutex::new(Lanes::new()),
                destroyed: AtomicBool::new(false),
                config: DispatchConfig::default(),
            }),
        }
    }

    /// Returns a builder for non-default construction.
    #[must_use]
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// Appends a command to its lane and kicks the scheduler.
    ///
    /// The lane is chosen by the command's own
    /// [`is_critical`](Command::is_critical) classification: interrupt
    /// traffic rides the critical lane, everything else queues behind
    /// whatever the blocking lane is waiting on.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::SessionDestroyed`] after `Terminate`.
    pub async fn dispatch_command(&self, command: Command) -> Result<(), DispatchError> {
        if self.is_destroyed() {
            warn!(command = %command, "command after session destruction");
            return Err(DispatchError::SessionDestroyed);
        }

        let lane = if command.is_critical() {
            Lane::Critical
        } else {
            Lane::Blocking
        };
        debug!(command = %command, lane = lane.name(), "dispatching command");

        self.with_lanes(|lanes| {
            lanes
                .queue_mut(lane)
                .add_tasks(Source::Command, vec![Task::DispatchCommand(command)]);
        });
        self.kick_start().await;
        Ok(())
    }

    /// Appends a view lifecycle event to the critical lane and kicks the
    /// scheduler. This is the UI host's injection point.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::SessionDestroyed`] after `Terminate`.
    pub async fn inject_view_event(&self, event: ViewEvent) -> Result<(), DispatchError> {
        if self.is_destroyed() {
            return Err(DispatchError::SessionDestroyed);
        }

        self.with_lanes(|lanes| {
            lanes
                .critical
                .add_tasks(Source::Command, vec![Task::ViewEvent(event)]);
        });
        self.kick_start().await;
        Ok(())
    }

    /// Advances both lanes until neither can make progress.
    ///
    /// Safe to call from any continuation, any number of times;
    /// overlapping calls skip busy lanes. Calling it on an idle
    /// dispatcher changes nothing.
    pub async fn kick_start(&self) {
        loop {
            let critical = self.step(Lane::Critical).await;
            let blocking = self.step(Lane::Blocking).await;

            let re_kicked = matches!(critical, StepOutcome::Ran { keep_running: true })
                || matches!(blocking, StepOutcome::Ran { keep_running: true });
            if !re_kicked {
                break;
            }
        }
    }

    /// Executes at most one task on `lane`.
    async fn step(&self, lane: Lane) -> StepOutcome {
        let task = {
            let mut lanes = self.inner.lanes.lock();
            if lanes.status(lane).is_busy() {
                return StepOutcome::NoTask;
            }
            match lanes.queue_mut(lane).next_task(lane.peek_mode()) {
                Some(task) => {
                    lanes.set_status(lane, LaneStatus::Busy);
                    task
                }
                None => return StepOutcome::NoTask,
            }
        };

        if self.inner.config.log_lane_snapshots {
            debug!(lane = lane.name(), task = %task, lanes = %self.snapshot(), "executing");
        }

        let keep_running = self.execute(task).await;

        self.with_lanes(|lanes| lanes.set_status(lane, LaneStatus::Idle));
        if !keep_running {
            debug!(lane = lane.name(), "lane halted");
        }
        StepOutcome::Ran { keep_running }
    }

    /// Renders both lanes as a one-line snapshot.
    #[must_use]
    pub fn snapshot(&self) -> String {
        let lanes = self.inner.lanes.lock();
        format!("critical {} | blocking {}", lanes.critical, lanes.blocking)
    }

    /// Returns the status flag of `lane`.
    #[must_use]
    pub fn lane_status(&self, lane: Lane) -> LaneStatus {
        self.inner.lanes.lock().status(lane)
    }

    /// Counts the layers tagged `source` on `lane`.
    #[must_use]
    pub fn count_by_source(&self, lane: Lane, source: Source) -> usize {
        self.inner.lanes.lock().queue(lane).count_by_source(source)
    }

    /// Returns the number of queued tasks on `lane`.
    #[must_use]
    pub fn pending_tasks(&self, lane: Lane) -> usize {
        self.inner.lanes.lock().queue(lane).total_len()
    }

    /// Returns `true` once a `Terminate` task has destroyed the session.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.inner.destroyed.load(Ordering::SeqCst)
    }

    pub(crate) fn session(&self) -> &Arc<dyn Session> {
        &self.inner.session
    }

    pub(crate) fn handlers(&self) -> &Arc<dyn Handlers> {
        &self.inner.handlers
    }

    pub(crate) fn config(&self) -> &DispatchConfig {
        &self.inner.config
    }

    pub(crate) fn with_lanes<R>(&self, f: impl FnOnce(&mut Lanes) -> R) -> R {
        f(&mut self.inner.lanes.lock())
    }

    /// Destroys the session on first call; later calls are no-ops.
    pub(crate) async fn destroy_once(&self) {
        if !self.inner.destroyed.swap(true, Ordering::SeqCst) {
            self.inner.session.destroy().await;
        }
    }
}

/// Builder for [`Dispatcher`].
///
/// # Example
///
/// ```
/// use proofmode_handler::testing::{RecordingHandlers, ScriptedSession};
/// use proofmode_runtime::{DispatchConfig, Dispatcher};
/// use std::sync::Arc;
///
/// let dispatcher = Dispatcher::builder()
///     .session(Arc::new(ScriptedSession::new()))
///     .handlers(Arc::new(RecordingHandlers::new()))
///     .config(DispatchConfig {
///         log_lane_snapshots: false,
///         ..DispatchConfig::default()
///     })
///     .build()
///     .unwrap();
/// assert!(!dispatcher.is_destroyed());
/// ```
#[derive(Default)]
pub struct DispatcherBuilder {
    session: Option<Arc<dyn Session>>,
    handlers: Option<Arc<dyn Handlers>>,
    config: DispatchConfig,
}

impl DispatcherBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the session.
    #[must_use]
    pub fn session(mut self, session: Arc<dyn Session>) -> Self {
        self.session = Some(session);
        self
    }

    /// Sets the handlers.
    #[must_use]
    pub fn handlers(mut self, handlers: Arc<dyn Handlers>) -> Self {
        self.handlers = Some(handlers);
        self
    }

    /// Overrides the default configuration.
    #[must_use]
    pub fn config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the dispatcher.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::MissingComponent`] without a session or
    /// handlers, and [`DispatchError::InvalidConfig`] if the
    /// configuration fails validation.
    pub fn build(self) -> Result<Dispatcher, DispatchError> {
        let session = self
            .session
            .ok_or(DispatchError::MissingComponent("session"))?;
        let handlers = self
            .handlers
            .ok_or(DispatchError::MissingComponent("handlers"))?;
        self.config.validate()?;

        Ok(Dispatcher {
            inner: Arc::new(Inner {
                session,
                handlers,
                lanes: Mutex::new(Lanes::new()),
                destroyed: AtomicBool::new(false),
                config: self.config,
            }),
        })
    }
}
