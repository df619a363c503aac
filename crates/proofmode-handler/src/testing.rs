//! Test harness for handlers and the dispatcher.
//!
//! Provides in-memory stand-ins for the two external actors so handler
//! logic and scheduling behavior can be tested without a proof-checker
//! process or a view panel:
//!
//! - [`RecordingHandlers`]: a [`Handlers`] implementation that records
//!   every invocation in order and replies with scripted task lists
//! - [`ScriptedSession`]: a [`Session`] whose response streams and view
//!   responses are scripted per request, and which counts `destroy` calls
//!
//! # Example
//!
//! ```
//! use proofmode_handler::testing::{RecordingHandlers, ScriptedSession};
//! use proofmode_handler::Handlers;
//! use proofmode_task::{Command, Task};
//!
//! let handlers = RecordingHandlers::new()
//!     .with_on_command(|_cmd| vec![Task::Debug("expanded".into())]);
//!
//! let tasks = handlers.on_command(&Command::Load);
//! assert_eq!(tasks.len(), 1);
//! assert_eq!(handlers.calls(), vec!["command:Load"]);
//! ```

use crate::Handlers;
use async_trait::async_trait;
use parking_lot::Mutex;
use proofmode_task::{
    AgdaRequest, AgdaResponse, Command, CoreError, GoalAction, ResponseStream, Session,
    StreamEvent, Task, ViewRequest, ViewResponse,
};
use proofmode_types::ErrorCode;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{mpsc, oneshot};

/// Buffer size for open scripted streams.
const OPEN_STREAM_BUFFER: usize = 64;

type CommandScript = Box<dyn Fn(&Command) -> Vec<Task> + Send + Sync>;
type ResponseScript = Box<dyn Fn(&AgdaResponse) -> Vec<Task> + Send + Sync>;
type ErrorScript = Box<dyn Fn(&CoreError) -> Vec<Task> + Send + Sync>;
type GoalScript = Box<dyn Fn(&GoalAction) -> Vec<Task> + Send + Sync>;

/// Handlers that record every invocation and reply from scripts.
///
/// Invocations are recorded as `"{surface}:{detail}"` strings
/// (`command:Load`, `response:DisplayInfo`, `error:CORE_PARSE_FAILED`,
/// `goal:set-cursor`) in call order across all surfaces. Surfaces without
/// a script reply with the empty list.
#[derive(Default)]
pub struct RecordingHandlers {
    calls: Mutex<Vec<String>>,
    command_script: Option<CommandScript>,
    response_script: Option<ResponseScript>,
    error_script: Option<ErrorScript>,
    goal_script: Option<GoalScript>,
}

impl RecordingHandlers {
    /// Creates recording handlers with no scripts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the command surface.
    #[must_use]
    pub fn with_on_command<F>(mut self, script: F) -> Self
    where
        F: Fn(&Command) -> Vec<Task> + Send + Sync + 'static,
    {
        self.command_script = Some(Box::new(script));
        self
    }

    /// Scripts the response surface.
    #[must_use]
    pub fn with_on_response<F>(mut self, script: F) -> Self
    where
        F: Fn(&AgdaResponse) -> Vec<Task> + Send + Sync + 'static,
    {
        self.response_script = Some(Box::new(script));
        self
    }

    /// Scripts the error surface.
    #[must_use]
    pub fn with_on_error<F>(mut self, script: F) -> Self
    where
        F: Fn(&CoreError) -> Vec<Task> + Send + Sync + 'static,
    {
        self.error_script = Some(Box::new(script));
        self
    }

    /// Scripts the goal surface.
    #[must_use]
    pub fn with_on_goal<F>(mut self, script: F) -> Self
    where
        F: Fn(&GoalAction) -> Vec<Task> + Send + Sync + 'static,
    {
        self.goal_script = Some(Box::new(script));
        self
    }

    /// Returns the recorded invocations, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn record(&self, entry: String) {
        self.calls.lock().push(entry);
    }
}

impl Handlers for RecordingHandlers {
    fn on_command(&self, command: &Command) -> Vec<Task> {
        self.record(format!("command:{}", command));
        match &self.command_script {
            Some(script) => script(command),
            None => Vec::new(),
        }
    }

    fn on_response(&self, response: &AgdaResponse) -> Vec<Task> {
        self.record(format!("response:{}", response.kind));
        match &self.response_script {
            Some(script) => script(response),
            None => Vec::new(),
        }
    }

    fn on_error(&self, error: &CoreError) -> Vec<Task> {
        self.record(format!("error:{}", error.code()));
        match &self.error_script {
            Some(script) => script(error),
            None => Vec::new(),
        }
    }

    fn on_goal(&self, action: &GoalAction) -> Vec<Task> {
        self.record(format!("goal:{}", action.kind));
        match &self.goal_script {
            Some(script) => script(action),
            None => Vec::new(),
        }
    }
}

/// One scripted outcome for a proof-checker request.
pub enum AgdaScript {
    /// The connection attempt fails with this error.
    Fail(CoreError),
    /// The request succeeds and the stream replays these events.
    ///
    /// End the script with [`StreamEvent::Stop`]; a script without it
    /// still terminates the stream by dropping the sender.
    Stream(Vec<StreamEvent>),
    /// Like `Stream`, but the sender is retained so the stream stays
    /// open after the prefilled events. Feed it with
    /// [`ScriptedSession::push_stream_event`] and end it with a `Stop`
    /// event or [`ScriptedSession::close_streams`].
    OpenStream(Vec<StreamEvent>),
}

/// One scripted outcome for a view request.
enum ViewScript {
    /// Answer immediately.
    Ready(ViewResponse),
    /// Hold the request until the paired sender fires.
    Pending(oneshot::Receiver<ViewResponse>),
}

/// A [`Session`] with scripted checker streams and view responses.
///
/// Each `send_agda_request` consumes the next queued [`AgdaScript`];
/// with no script queued it fails with a connection error. Each
/// `send_view_request` consumes the next queued view script (an
/// immediate response or a pending prompt), defaulting to
/// [`ViewResponse::Success`]. All requests are recorded.
#[derive(Default)]
pub struct ScriptedSession {
    agda_scripts: Mutex<VecDeque<AgdaScript>>,
    view_scripts: Mutex<VecDeque<ViewScript>>,
    open_senders: Mutex<Vec<mpsc::Sender<StreamEvent>>>,
    agda_log: Mutex<Vec<AgdaRequest>>,
    view_log: Mutex<Vec<ViewRequest>>,
    destroy_count: AtomicUsize,
}

impl ScriptedSession {
    /// Creates a session with nothing scripted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful request whose stream replays `events`.
    pub fn script_stream(&self, events: Vec<StreamEvent>) {
        self.agda_scripts
            .lock()
            .push_back(AgdaScript::Stream(events));
    }

    /// Queues a successful request whose stream stays open after `events`.
    pub fn script_open_stream(&self, events: Vec<StreamEvent>) {
        self.agda_scripts
            .lock()
            .push_back(AgdaScript::OpenStream(events));
    }

    /// Queues a failing connection attempt.
    pub fn script_connection_failure(&self, error: CoreError) {
        self.agda_scripts.lock().push_back(AgdaScript::Fail(error));
    }

    /// Sends an event into the most recent open stream.
    ///
    /// Returns `false` if no open stream accepts it.
    pub fn push_stream_event(&self, event: StreamEvent) -> bool {
        let senders = self.open_senders.lock();
        match senders.last() {
            Some(sender) => sender.try_send(event).is_ok(),
            None => false,
        }
    }

    /// Drops all retained stream senders, ending their streams.
    pub fn close_streams(&self) {
        self.open_senders.lock().clear();
    }

    /// Queues a view response.
    pub fn script_view_response(&self, response: ViewResponse) {
        self.view_scripts
            .lock()
            .push_back(ViewScript::Ready(response));
    }

    /// Queues a view request that stays pending until the returned
    /// sender fires. Dropping the sender answers with
    /// [`ViewResponse::QueryInterrupted`].
    pub fn script_view_pending(&self) -> oneshot::Sender<ViewResponse> {
        let (tx, rx) = oneshot::channel();
        self.view_scripts
            .lock()
            .push_back(ViewScript::Pending(rx));
        tx
    }

    /// Returns the proof-checker requests received so far.
    #[must_use]
    pub fn agda_requests(&self) -> Vec<AgdaRequest> {
        self.agda_log.lock().clone()
    }

    /// Returns the view requests received so far.
    #[must_use]
    pub fn view_requests(&self) -> Vec<ViewRequest> {
        self.view_log.lock().clone()
    }

    /// Returns how many times `destroy` was called.
    #[must_use]
    pub fn destroy_count(&self) -> usize {
        self.destroy_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Session for ScriptedSession {
    async fn send_agda_request(&self, request: AgdaRequest) -> Result<ResponseStream, CoreError> {
        self.agda_log.lock().push(request);

        let script = self.agda_scripts.lock().pop_front();
        match script {
            None => Err(CoreError::Connection("no script queued".into())),
            Some(AgdaScript::Fail(error)) => Err(error),
            Some(AgdaScript::Stream(events)) => {
                let (tx, rx) = mpsc::channel(events.len().max(1));
                for event in events {
                    // Capacity covers the whole script; send cannot fail.
                    let _ = tx.try_send(event);
                }
                Ok(rx)
            }
            Some(AgdaScript::OpenStream(events)) => {
                let (tx, rx) = mpsc::channel(events.len() + OPEN_STREAM_BUFFER);
                for event in events {
                    let _ = tx.try_send(event);
                }
                self.open_senders.lock().push(tx);
                Ok(rx)
            }
        }
    }

    async fn send_view_request(&self, request: ViewRequest) -> Result<ViewResponse, CoreError> {
        self.view_log.lock().push(request);
        let script = self.view_scripts.lock().pop_front();
        match script {
            None => Ok(ViewResponse::Success),
            Some(ViewScript::Ready(response)) => Ok(response),
            Some(ViewScript::Pending(rx)) => {
                Ok(rx.await.unwrap_or(ViewResponse::QueryInterrupted))
            }
        }
    }

    async fn destroy(&self) {
        self.destroy_count.fetch_add(1, Ordering::SeqCst);
    }
}
