//! End-to-end dispatcher scenarios against scripted actors.
//!
//! Each test wires a [`Dispatcher`] to a `ScriptedSession` (scripted
//! proof-checker streams and view responses) and `RecordingHandlers`
//! (ordered log of every handler invocation), then drives it through one
//! scheduling scenario.

mod common;

use common::{dispatcher_with, marker, marker_call, marker_order, wait_until};
use proofmode_handler::testing::RecordingHandlers;
use proofmode_runtime::{DispatchError, Lane, LaneStatus};
use proofmode_task::{
    AgdaRequest, AgdaResponse, Command, CoreError, StreamEvent, Task, ViewEvent, ViewRequest,
    ViewResponse,
};
use proofmode_types::Source;
use std::time::Duration;

/// A response-handler-produced `SendRequest` that lands while a request
/// is already in flight is dropped; the in-flight request keeps its
/// layer and the lane halts until the next injection re-kicks it.
#[tokio::test]
async fn second_request_from_response_stream_is_dropped() {
    let handlers = RecordingHandlers::new()
        .with_on_command(|cmd| match cmd {
            Command::Load => vec![Task::SendRequest(AgdaRequest::load("A.agda"))],
            _ => Vec::new(),
        })
        .with_on_response(|resp| match resp.kind.as_str() {
            "MakeCase" => vec![Task::SendRequest(AgdaRequest::load("B.agda"))],
            _ => Vec::new(),
        });
    let (dispatcher, handlers, session) = dispatcher_with(handlers);

    session.script_open_stream(vec![]);
    dispatcher.dispatch_command(Command::Load).await.unwrap();

    let connected_session = session.clone();
    wait_until(move || connected_session.agda_requests().len() == 1).await;
    assert_eq!(dispatcher.count_by_source(Lane::Blocking, Source::Agda), 1);

    // A response whose expansion tries to issue a second request.
    assert!(session.push_stream_event(StreamEvent::Yield(Ok(AgdaResponse::new(
        "MakeCase",
        serde_json::json!({}),
    )))));
    let seen_response = handlers.clone();
    wait_until(move || {
        seen_response
            .calls()
            .iter()
            .any(|call| call == "response:MakeCase")
    })
    .await;
    tokio::time::sleep(Duration::from_millis(20)).await;

    // The offender was dropped: no second connection, layer intact,
    // lane idle (halted, awaiting an explicit re-kick).
    assert_eq!(session.agda_requests().len(), 1);
    assert_eq!(dispatcher.count_by_source(Lane::Blocking, Source::Agda), 1);
    assert_eq!(dispatcher.lane_status(Lane::Blocking), LaneStatus::Idle);

    // The stream end re-kicks and clears the layer.
    assert!(session.push_stream_event(StreamEvent::Stop));
    let cleared = dispatcher.clone();
    wait_until(move || cleared.count_by_source(Lane::Blocking, Source::Agda) == 0).await;
}

/// `Terminate` destroys the session exactly once and refuses later
/// dispatches; a second queued `Terminate` is a no-op.
#[tokio::test]
async fn terminate_destroys_once_and_halts() {
    let handlers = RecordingHandlers::new().with_on_command(|cmd| match cmd {
        Command::Quit => vec![Task::Terminate, Task::Terminate],
        _ => Vec::new(),
    });
    let (dispatcher, _handlers, session) = dispatcher_with(handlers);

    dispatcher.dispatch_command(Command::Quit).await.unwrap();
    assert!(dispatcher.is_destroyed());
    assert_eq!(session.destroy_count(), 1);

    // The first Terminate halted the lane with its twin still queued.
    assert_eq!(dispatcher.pending_tasks(Lane::Blocking), 1);
    dispatcher.kick_start().await;
    assert_eq!(dispatcher.pending_tasks(Lane::Blocking), 0);
    assert_eq!(session.destroy_count(), 1);

    assert_eq!(
        dispatcher.dispatch_command(Command::Load).await,
        Err(DispatchError::SessionDestroyed)
    );
}

/// All tasks produced for one response run before any task produced for
/// the next; the `Agda` layer is gone after the stream stops.
#[tokio::test]
async fn response_tasks_preserve_stream_order() {
    let handlers = RecordingHandlers::new()
        .with_on_command(|cmd| match cmd {
            Command::Load => vec![Task::SendRequest(AgdaRequest::load("A.agda"))],
            _ => Vec::new(),
        })
        .with_on_response(|resp| {
            vec![
                marker(&format!("{}-1", resp.kind)),
                marker(&format!("{}-2", resp.kind)),
            ]
        });
    let (dispatcher, handlers, session) = dispatcher_with(handlers);

    session.script_stream(vec![
        StreamEvent::Yield(Ok(AgdaResponse::new("Resp1", serde_json::json!(1)))),
        StreamEvent::Yield(Ok(AgdaResponse::new("Resp2", serde_json::json!(2)))),
        StreamEvent::Stop,
    ]);

    dispatcher.dispatch_command(Command::Load).await.unwrap();

    let drained = dispatcher.clone();
    wait_until(move || drained.count_by_source(Lane::Blocking, Source::Agda) == 0).await;
    let all_ran = handlers.clone();
    wait_until(move || marker_order(&all_ran.calls()).len() == 4).await;

    assert_eq!(
        marker_order(&handlers.calls()),
        vec!["Resp1-1", "Resp1-2", "Resp2-1", "Resp2-2"]
    );
    assert!(!dispatcher.is_destroyed());
}

/// A prompting view request blocks the blocking lane, not the critical
/// lane: escape traffic still runs, and the prompt's answer pre-empts
/// the command's remaining tasks.
#[tokio::test]
async fn prompt_gates_blocking_lane_but_not_critical() {
    let handlers = RecordingHandlers::new().with_on_command(|cmd| match cmd {
        Command::Give => vec![
            Task::view_request(
                ViewRequest::query("Give", Some("expression".into()), None),
                |response| match response {
                    ViewResponse::QuerySuccess(text) => vec![marker(&format!("answer:{}", text))],
                    _ => vec![marker("interrupted")],
                },
            ),
            marker("after-give"),
        ],
        Command::Escape => vec![marker("escape-ran")],
        _ => Vec::new(),
    });
    let (dispatcher, handlers, session) = dispatcher_with(handlers);

    let answer = session.script_view_pending();

    let give_dispatcher = dispatcher.clone();
    let give = tokio::spawn(async move { give_dispatcher.dispatch_command(Command::Give).await });

    let prompted = session.clone();
    wait_until(move || prompted.view_requests().len() == 1).await;
    assert!(dispatcher.lane_status(Lane::Blocking).is_busy());
    assert_eq!(dispatcher.count_by_source(Lane::Blocking, Source::View), 1);

    // The critical lane is alive while the prompt hangs.
    dispatcher.dispatch_command(Command::Escape).await.unwrap();
    assert_eq!(marker_order(&handlers.calls()), vec!["escape-ran"]);

    // Answering resumes the blocking lane; the callback's output runs
    // ahead of the command's remaining tasks.
    answer
        .send(ViewResponse::QuerySuccess("zero".into()))
        .unwrap();
    give.await.unwrap().unwrap();

    assert_eq!(
        marker_order(&handlers.calls()),
        vec!["escape-ran", "answer:zero", "after-give"]
    );
    assert_eq!(dispatcher.count_by_source(Lane::Blocking, Source::View), 0);
    assert_eq!(dispatcher.lane_status(Lane::Blocking), LaneStatus::Idle);
}

/// A second prompt raised while one is in flight is dropped without
/// reaching the view.
#[tokio::test]
async fn second_prompt_is_dropped_while_one_is_in_flight() {
    let handlers = RecordingHandlers::new().with_on_command(|cmd| match cmd {
        Command::Give => vec![Task::view_request(
            ViewRequest::query("Give", None, None),
            |_| Vec::new(),
        )],
        Command::Escape => vec![Task::view_request(
            ViewRequest::query("Escape", None, None),
            |_| Vec::new(),
        )],
        _ => Vec::new(),
    });
    let (dispatcher, _handlers, session) = dispatcher_with(handlers);

    let answer = session.script_view_pending();

    let give_dispatcher = dispatcher.clone();
    let give = tokio::spawn(async move { give_dispatcher.dispatch_command(Command::Give).await });
    let prompted = session.clone();
    wait_until(move || prompted.view_requests().len() == 1).await;

    // The escape expansion prompts too; the executor refuses it.
    dispatcher.dispatch_command(Command::Escape).await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(session.view_requests().len(), 1);
    assert_eq!(dispatcher.count_by_source(Lane::Blocking, Source::View), 1);

    answer.send(ViewResponse::QueryInterrupted).unwrap();
    give.await.unwrap().unwrap();
    assert_eq!(dispatcher.count_by_source(Lane::Blocking, Source::View), 0);
}

/// Connection failure is translated by the error handler and re-enters
/// the pipeline; the `Agda` layer is released.
#[tokio::test]
async fn connection_failure_routes_through_error_handler() {
    let handlers = RecordingHandlers::new()
        .with_on_command(|cmd| match cmd {
            Command::Load => vec![Task::SendRequest(AgdaRequest::load("A.agda"))],
            _ => Vec::new(),
        })
        .with_on_error(|_| vec![marker("recovered")]);
    let (dispatcher, handlers, session) = dispatcher_with(handlers);

    session.script_connection_failure(CoreError::Connection("agda not installed".into()));
    dispatcher.dispatch_command(Command::Load).await.unwrap();

    let recovered = handlers.clone();
    wait_until(move || marker_order(&recovered.calls()) == vec!["recovered"]).await;

    assert!(handlers
        .calls()
        .iter()
        .any(|call| call == "error:CORE_CONNECTION_FAILED"));
    assert_eq!(dispatcher.count_by_source(Lane::Blocking, Source::Agda), 0);
    assert!(!dispatcher.is_destroyed());
}

/// A malformed frame mid-stream goes through the error handler and the
/// stream keeps flowing.
#[tokio::test]
async fn parse_error_keeps_the_stream_alive() {
    let handlers = RecordingHandlers::new()
        .with_on_command(|cmd| match cmd {
            Command::Load => vec![Task::SendRequest(AgdaRequest::load("A.agda"))],
            _ => Vec::new(),
        })
        .with_on_response(|resp| vec![marker(&resp.kind)])
        .with_on_error(|_| vec![marker("parse-error")]);
    let (dispatcher, handlers, session) = dispatcher_with(handlers);

    session.script_stream(vec![
        StreamEvent::Yield(Ok(AgdaResponse::new("First", serde_json::json!({})))),
        StreamEvent::Yield(Err(CoreError::Parse("unexpected token".into()))),
        StreamEvent::Yield(Ok(AgdaResponse::new("Second", serde_json::json!({})))),
        StreamEvent::Stop,
    ]);

    dispatcher.dispatch_command(Command::Load).await.unwrap();

    let drained = dispatcher.clone();
    wait_until(move || drained.count_by_source(Lane::Blocking, Source::Agda) == 0).await;
    let all_ran = handlers.clone();
    wait_until(move || marker_order(&all_ran.calls()).len() == 3).await;

    assert_eq!(
        marker_order(&handlers.calls()),
        vec!["First", "parse-error", "Second"]
    );
}

/// When the stream stops while the blocking lane is gated, response
/// tasks still queued under `Agda` spill into the `Command` layer and
/// run once the lane resumes.
#[tokio::test]
async fn stream_stop_spills_leftover_tasks_into_command() {
    let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();
    let slot = std::sync::Arc::new(std::sync::Mutex::new(Some(release_rx)));

    let script_slot = slot.clone();
    let handlers = RecordingHandlers::new()
        .with_on_command(move |cmd| match cmd {
            Command::Load => vec![Task::SendRequest(AgdaRequest::load("A.agda"))],
            Command::Escape => {
                // One-shot blocker: holds a Misc layer open on the
                // blocking lane until released.
                let release = script_slot.lock().unwrap().take();
                vec![Task::with_state(move |_session| async move {
                    if let Some(release) = release {
                        let _ = release.await;
                    }
                    Vec::new()
                })]
            }
            _ => Vec::new(),
        })
        .with_on_response(|_| vec![marker("spilled")]);
    let (dispatcher, handlers, session) = dispatcher_with(handlers);

    session.script_open_stream(vec![]);
    dispatcher.dispatch_command(Command::Load).await.unwrap();
    let connected = session.clone();
    wait_until(move || connected.agda_requests().len() == 1).await;

    // The escape expansion parks a WithState on the critical lane; its
    // Misc layer lands on top of the blocking lane and gates it.
    let escape_dispatcher = dispatcher.clone();
    let escape =
        tokio::spawn(async move { escape_dispatcher.dispatch_command(Command::Escape).await });
    let gated = dispatcher.clone();
    wait_until(move || gated.count_by_source(Lane::Blocking, Source::Misc) == 1).await;

    // A response arrives; its task queues under Agda but cannot run.
    assert!(session.push_stream_event(StreamEvent::Yield(Ok(AgdaResponse::new(
        "Spill",
        serde_json::json!({}),
    )))));
    let queued = dispatcher.clone();
    wait_until(move || queued.pending_tasks(Lane::Blocking) == 1).await;

    // The stream ends: the Agda layer goes, its leftover spills down.
    assert!(session.push_stream_event(StreamEvent::Stop));
    let removed = dispatcher.clone();
    wait_until(move || removed.count_by_source(Lane::Blocking, Source::Agda) == 0).await;
    assert_eq!(dispatcher.pending_tasks(Lane::Blocking), 1);
    assert!(marker_order(&handlers.calls()).is_empty());

    // Releasing the blocker resumes the lane; the spilled task runs.
    release_tx.send(()).unwrap();
    escape.await.unwrap().unwrap();
    let ran = handlers.clone();
    wait_until(move || marker_order(&ran.calls()) == vec!["spilled"]).await;
    assert_eq!(dispatcher.count_by_source(Lane::Blocking, Source::Misc), 0);
    assert_eq!(dispatcher.pending_tasks(Lane::Blocking), 0);
}

/// The view panel being torn down terminates the session.
#[tokio::test]
async fn view_destroyed_terminates_the_session() {
    let (dispatcher, _handlers, session) = dispatcher_with(RecordingHandlers::new());

    dispatcher
        .inject_view_event(ViewEvent::Destroyed)
        .await
        .unwrap();

    assert!(dispatcher.is_destroyed());
    assert_eq!(session.destroy_count(), 1);
    assert_eq!(
        dispatcher.inject_view_event(ViewEvent::Initialized).await,
        Err(DispatchError::SessionDestroyed)
    );
}

/// The view panel coming up does nothing observable.
#[tokio::test]
async fn view_initialized_is_quiet() {
    let (dispatcher, handlers, session) = dispatcher_with(RecordingHandlers::new());

    dispatcher
        .inject_view_event(ViewEvent::Initialized)
        .await
        .unwrap();

    assert!(handlers.calls().is_empty());
    assert_eq!(session.destroy_count(), 0);
    assert_eq!(dispatcher.pending_tasks(Lane::Critical), 0);
    assert_eq!(dispatcher.pending_tasks(Lane::Blocking), 0);
}

/// `WithState` output pre-empts the dispatching command's remaining
/// tasks, and its transient `Misc` layer is cleaned up.
#[tokio::test]
async fn with_state_output_runs_ahead_of_remaining_tasks() {
    let handlers = RecordingHandlers::new().with_on_command(|cmd| match cmd {
        Command::InferType => vec![
            Task::with_state(|_session| async move { vec![marker("from-state")] }),
            marker("tail"),
        ],
        _ => Vec::new(),
    });
    let (dispatcher, handlers, _session) = dispatcher_with(handlers);

    dispatcher
        .dispatch_command(Command::InferType)
        .await
        .unwrap();

    assert_eq!(marker_order(&handlers.calls()), vec!["from-state", "tail"]);
    assert_eq!(dispatcher.count_by_source(Lane::Blocking, Source::Misc), 0);
}

/// Non-prompting view requests run through a `View` layer on the
/// critical lane and never touch the blocking lane.
#[tokio::test]
async fn display_view_request_stays_on_the_critical_lane() {
    let handlers = RecordingHandlers::new().with_on_command(|cmd| match cmd {
        Command::Escape => vec![Task::view_request(
            ViewRequest::display("All Goals", "?0 : Nat"),
            |_| vec![marker("displayed")],
        )],
        _ => Vec::new(),
    });
    let (dispatcher, handlers, session) = dispatcher_with(handlers);

    dispatcher.dispatch_command(Command::Escape).await.unwrap();

    assert_eq!(session.view_requests().len(), 1);
    assert_eq!(marker_order(&handlers.calls()), vec!["displayed"]);
    assert_eq!(dispatcher.count_by_source(Lane::Critical, Source::View), 0);
    assert_eq!(dispatcher.pending_tasks(Lane::Blocking), 0);
}

/// Marker assertions rely on this mapping staying stable.
#[test]
fn marker_round_trip() {
    let call = marker_call("x");
    assert_eq!(marker_order(std::slice::from_ref(&call)), vec!["x"]);
}
