#![allow(dead_code)]
//! Shared helpers for dispatcher integration tests.

use proofmode_handler::testing::{RecordingHandlers, ScriptedSession};
use proofmode_runtime::Dispatcher;
use proofmode_task::{Command, Task};
use std::sync::Arc;
use std::time::Duration;

/// Upper bound for any condition a test waits on.
pub const TIMEOUT: Duration = Duration::from_secs(5);

/// Polls `condition` every few milliseconds until it holds.
///
/// Panics when [`TIMEOUT`] elapses first. Prefer this over bare sleeps:
/// the bridge pump runs on its own task and its timing varies under
/// parallel test execution.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + TIMEOUT;
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not met within {:?}",
            TIMEOUT
        );
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
}

/// A task that records `label` when executed.
///
/// Rides the `DispatchCommand` path with an `InputSymbol` payload, so
/// executing it shows up in the handler log as
/// `command:InputSymbol(<label>)` at its execution position.
pub fn marker(label: &str) -> Task {
    Task::DispatchCommand(Command::InputSymbol(label.into()))
}

/// The `calls()` entry a [`marker`] produces.
pub fn marker_call(label: &str) -> String {
    format!("command:InputSymbol({})", label)
}

/// Builds a dispatcher around the given handlers and a fresh session.
pub fn dispatcher_with(
    handlers: RecordingHandlers,
) -> (Dispatcher, Arc<RecordingHandlers>, Arc<ScriptedSession>) {
    let session = Arc::new(ScriptedSession::new());
    let handlers = Arc::new(handlers);
    let dispatcher = Dispatcher::new(session.clone(), handlers.clone());
    (dispatcher, handlers, session)
}

/// Filters the handler log down to marker executions, stripping the
/// `command:InputSymbol(..)` wrapper.
pub fn marker_order(calls: &[String]) -> Vec<String> {
    calls
        .iter()
        .filter_map(|call| {
            call.strip_prefix("command:InputSymbol(")
                .and_then(|rest| rest.strip_suffix(')'))
                .map(str::to_owned)
        })
        .collect()
}
