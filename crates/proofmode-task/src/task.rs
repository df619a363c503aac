//! The task union executed by the dispatcher.
//!
//! A [`Task`] is one unit of work on a dispatcher lane. Tasks are produced
//! by the embedder's handlers, by the request bridge, and by each other;
//! the scheduler in `proofmode-runtime` pops them one at a time and
//! interprets them.
//!
//! # Callbacks
//!
//! Two variants carry callbacks: [`Task::ViewRequest`] (invoked once with
//! the view's response) and [`Task::WithState`] (an async callback over
//! the shared [`Session`]). Both are boxed `FnOnce` values owned by the
//! task and dropped when it completes, so a task is consumed by
//! execution. Tasks are deliberately NOT `Clone` and NOT serializable.

use crate::{
    AgdaRequest, Command, CoreError, GoalAction, Session, ViewEvent, ViewRequest, ViewResponse,
};
use futures::future::BoxFuture;
use proofmode_types::ErrorCode;
use std::future::Future;
use std::sync::Arc;

/// Callback invoked once with the response to a view request.
pub type ViewCallback = Box<dyn FnOnce(ViewResponse) -> Vec<Task> + Send>;

/// Async callback over the shared session state.
pub type StateCallback = Box<dyn FnOnce(Arc<dyn Session>) -> BoxFuture<'static, Vec<Task>> + Send>;

/// One unit of work on a dispatcher lane.
///
/// # Variants
///
/// | Variant | Effect when executed |
/// |---------|----------------------|
/// | `DispatchCommand` | Command handler output appended to critical `Command` |
/// | `SendRequest` | One proof-checker request; gates the blocking lane |
/// | `ViewRequest` | One view request; callback output re-enters the lane |
/// | `WithState` | Async state callback; output re-enters the blocking lane |
/// | `Terminate` | Destroys the session and halts the lane |
/// | `Goal` | Goal handler output, routed ahead of pending work |
/// | `ViewEvent` | Panel lifecycle notification |
/// | `Error` | Error handler output, routed ahead of pending work |
/// | `Debug` | Log line |
pub enum Task {
    /// Expand an editor command through the command handler.
    DispatchCommand(Command),
    /// Issue one proof-checker request.
    SendRequest(AgdaRequest),
    /// Issue one view request; the callback maps its response to tasks.
    ViewRequest(ViewRequest, ViewCallback),
    /// Run an async callback against the shared session state.
    WithState(StateCallback),
    /// Destroy the session and stop the lane.
    Terminate,
    /// Apply a goal action through the goal handler.
    Goal(GoalAction),
    /// React to a view lifecycle event.
    ViewEvent(ViewEvent),
    /// Route an error through the error handler.
    Error(CoreError),
    /// Emit a log line.
    Debug(String),
}

impl Task {
    /// Creates a [`Task::ViewRequest`], boxing the callback.
    pub fn view_request<F>(request: ViewRequest, callback: F) -> Self
    where
        F: FnOnce(ViewResponse) -> Vec<Task> + Send + 'static,
    {
        Self::ViewRequest(request, Box::new(callback))
    }

    /// Creates a [`Task::WithState`], boxing the async callback.
    ///
    /// # Example
    ///
    /// ```
    /// use proofmode_task::Task;
    ///
    /// let task = Task::with_state(|_session| async move { Vec::new() });
    /// assert_eq!(task.kind(), "WithState");
    /// ```
    pub fn with_state<F, Fut>(callback: F) -> Self
    where
        F: FnOnce(Arc<dyn Session>) -> Fut + Send + 'static,
        Fut: Future<Output = Vec<Task>> + Send + 'static,
    {
        Self::WithState(Box::new(move |session| Box::pin(callback(session))))
    }

    /// Returns the variant name, used by queue snapshots and tests.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DispatchCommand(_) => "DispatchCommand",
            Self::SendRequest(_) => "SendRequest",
            Self::ViewRequest(..) => "ViewRequest",
            Self::WithState(_) => "WithState",
            Self::Terminate => "Terminate",
            Self::Goal(_) => "Goal",
            Self::ViewEvent(_) => "ViewEvent",
            Self::Error(_) => "Error",
            Self::Debug(_) => "Debug",
        }
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DispatchCommand(command) => write!(f, "DispatchCommand({})", command),
            Self::SendRequest(request) => write!(f, "SendRequest({})", request.command),
            Self::ViewRequest(request, _) if request.is_prompting() => {
                f.write_str("ViewRequest(prompt)")
            }
            Self::ViewRequest(..) => f.write_str("ViewRequest(display)"),
            Self::WithState(_) => f.write_str("WithState"),
            Self::Terminate => f.write_str("Terminate"),
            Self::Goal(action) => write!(f, "Goal({})", action),
            Self::ViewEvent(event) => write!(f, "ViewEvent({:?})", event),
            Self::Error(error) => write!(f, "Error({})", error.code()),
            Self::Debug(message) => write!(f, "Debug({})", message),
        }
    }
}
