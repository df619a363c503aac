//! Proof-checker request/response bridge.
//!
//! One bridge pump runs per `SendRequest`. It owns the response stream
//! receiver for the lifetime of that request; dropping the receiver when
//! the pump returns releases the subscription, on the happy path and on
//! every error path alike.
//!
//! ```text
//! executor ──spawn──► bridge pump (tokio task)
//!                        │ send_agda_request
//!                        ▼
//!                  ResponseStream
//!                        │ Yield(Ok)   → on_response → inject under Agda
//!                        │ Yield(Err)  → on_error    → inject under Agda
//!                        │ Stop / gone → remove Agda layer
//!                        ▼
//!                    kick_start
//! ```
//!
//! The executor has already spawned the `Agda` layer before the pump
//! starts; the pump owns its removal. Leftover tasks spill into the
//! `Command` layer below when the layer goes.

use crate::dispatcher::Dispatcher;
use proofmode_task::{AgdaRequest, StreamEvent};
use proofmode_types::Source;
use tracing::{debug, info, warn};

/// Spawns the bridge pump for one request.
pub(crate) fn spawn(dispatcher: Dispatcher, request: AgdaRequest) {
    tokio::spawn(run(dispatcher, request));
}

/// Pumps one request's response stream into the blocking lane.
async fn run(dispatcher: Dispatcher, request: AgdaRequest) {
    let request_id = request.id;
    debug!(request = %request, "connecting to the proof checker");

    let stream = dispatcher.session().send_agda_request(request).await;
    let mut stream = match stream {
        Ok(stream) => stream,
        Err(error) => {
            warn!(error = %error, "connection failed");
            let tasks = dispatcher.handlers().on_error(&error);
            dispatcher.with_lanes(|lanes| {
                lanes.blocking.add_tasks(Source::Agda, tasks);
                lanes.blocking.remove(Source::Agda);
            });
            dispatcher.kick_start().await;
            return;
        }
    };

    loop {
        match stream.recv().await {
            Some(StreamEvent::Yield(Ok(response))) => {
                info!(">>> {}", response);
                let tasks = dispatcher.handlers().on_response(&response);
                dispatcher.with_lanes(|lanes| lanes.blocking.add_tasks(Source::Agda, tasks));
                dispatcher.kick_start().await;
            }
            Some(StreamEvent::Yield(Err(error))) => {
                warn!(error = %error, "malformed response frame");
                let tasks = dispatcher.handlers().on_error(&error);
                dispatcher.with_lanes(|lanes| lanes.blocking.add_tasks(Source::Agda, tasks));
                dispatcher.kick_start().await;
            }
            Some(StreamEvent::Stop) | None => break,
        }
    }

    info!(">>| [{}]", request_id);
    dispatcher.with_lanes(|lanes| lanes.blocking.remove(Source::Agda));
    dispatcher.kick_start().await;
    // The receiver drops here, releasing the subscription.
}
