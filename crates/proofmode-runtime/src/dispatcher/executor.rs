//! Per-variant task execution.
//!
//! [`Dispatcher::execute`] interprets one task and returns the
//! keep-running flag consumed by the kick-start loop: `true` to keep the
//! lane flowing, `false` to halt it (dispatcher violation or
//! `Terminate`). Execution never raises; failures are translated by the
//! error handler and re-enter the pipeline as tasks.
//!
//! # One-shot routing
//!
//! `Goal`, `ViewEvent`, and `Error` expansions go through a transient
//! `Misc` layer: spawn, add, remove in one step. The remove prepends the
//! expansion onto whatever layer was on top, so these tasks run *ahead*
//! of everything already queued. This reuses the layered queue's
//! pre-emption mechanism for immediate routing.

use super::{Dispatcher, Lane};
use proofmode_task::{CoreError, Task, ViewCallback, ViewEvent, ViewRequest, ViewResponse};
use proofmode_types::Source;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

impl Dispatcher {
    /// Executes one task, returning the keep-running flag.
    pub(crate) async fn execute(&self, task: Task) -> bool {
        match task {
            Task::DispatchCommand(command) => {
                let lane = if command.is_critical() {
                    Lane::Critical
                } else {
                    Lane::Blocking
                };
                let tasks = self.handlers().on_command(&command);
                self.with_lanes(|lanes| {
                    lanes.queue_mut(lane).add_tasks(Source::Command, tasks);
                });
                true
            }

            Task::SendRequest(request) => {
                let violated = self.with_lanes(|lanes| {
                    if lanes.blocking.count_by_source(Source::Agda) > 0 {
                        true
                    } else {
                        lanes.blocking.spawn(Source::Agda);
                        false
                    }
                });
                if violated {
                    warn!(
                        request = %request,
                        "a proof-checker request is already in flight; dropping"
                    );
                    return false;
                }
                crate::bridge::spawn(self.clone(), request);
                // The bridge owns the Agda layer from here; the lane keeps
                // flowing so injected response tasks can run.
                true
            }

            Task::ViewRequest(request, callback) => self.run_view_request(request, callback).await,

            Task::WithState(callback) => {
                self.with_lanes(|lanes| lanes.blocking.spawn(Source::Misc));
                let tasks = callback(Arc::clone(self.session())).await;
                self.with_lanes(|lanes| {
                    lanes.blocking.add_tasks(Source::Misc, tasks);
                    lanes.blocking.remove(Source::Misc);
                });
                true
            }

            Task::Terminate => {
                self.destroy_once().await;
                false
            }

            Task::Goal(action) => {
                let tasks = self.handlers().on_goal(&action);
                self.route_one_shot(Lane::Blocking, tasks);
                true
            }

            Task::ViewEvent(ViewEvent::Initialized) => {
                self.route_one_shot(Lane::Critical, Vec::new());
                true
            }

            Task::ViewEvent(ViewEvent::Destroyed) => {
                self.route_one_shot(Lane::Critical, vec![Task::Terminate]);
                true
            }

            Task::Error(error) => {
                let tasks = self.handlers().on_error(&error);
                self.route_one_shot(Lane::Critical, tasks);
                true
            }

            Task::Debug(message) => {
                debug!("DEBUG {}", message);
                true
            }
        }
    }

    /// Runs one view request through its layer protocol.
    ///
    /// Prompting requests hold a singleton `View` layer on the blocking
    /// lane; displays hold one on the critical lane. Either way the
    /// callback's output is appended under `View` before the layer is
    /// removed, so it runs ahead of whatever the layer was gating.
    async fn run_view_request(&self, request: ViewRequest, callback: ViewCallback) -> bool {
        let lane = if request.is_prompting() {
            Lane::Blocking
        } else {
            Lane::Critical
        };

        if request.is_prompting() {
            let violated = self.with_lanes(|lanes| {
                if lanes.blocking.count_by_source(Source::View) > 0 {
                    true
                } else {
                    lanes.blocking.spawn(Source::View);
                    false
                }
            });
            if violated {
                warn!("a view prompt is already in flight; dropping");
                return false;
            }
        } else {
            self.with_lanes(|lanes| lanes.queue_mut(lane).spawn(Source::View));
        }

        let tasks = match self.send_view_request_bounded(request).await {
            Ok(response) => callback(response),
            Err(error) => {
                warn!(error = %error, "view request failed");
                self.handlers().on_error(&error)
            }
        };

        self.with_lanes(|lanes| {
            let queue = lanes.queue_mut(lane);
            queue.add_tasks(Source::View, tasks);
            queue.remove(Source::View);
        });
        true
    }

    /// Sends a view request, applying the configured timeout if any.
    async fn send_view_request_bounded(
        &self,
        request: ViewRequest,
    ) -> Result<ViewResponse, CoreError> {
        match self.config().view_timeout_ms {
            None => self.session().send_view_request(request).await,
            Some(ms) => {
                let deadline = Duration::from_millis(ms);
                match tokio::time::timeout(deadline, self.session().send_view_request(request))
                    .await
                {
                    Ok(result) => result,
                    Err(_) => Err(CoreError::Connection(format!(
                        "view request timed out after {}ms",
                        ms
                    ))),
                }
            }
        }
    }

    /// Routes tasks through a transient `Misc` layer on `lane`.
    fn route_one_shot(&self, lane: Lane, tasks: Vec<Task>) {
        self.with_lanes(|lanes| {
            let queue = lanes.queue_mut(lane);
            queue.spawn(Source::Misc);
            queue.add_tasks(Source::Misc, tasks);
            queue.remove(Source::Misc);
        });
    }
}
