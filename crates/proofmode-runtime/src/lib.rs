//! Proofmode runtime - the two-lane task scheduling engine.
//!
//! This crate holds the dispatcher at the heart of the proofmode plugin.
//! It is the internal layer: embedders depend on the SDK crates
//! (`proofmode-types`, `proofmode-task`, `proofmode-handler`) for their
//! own code and on this crate only to construct and feed the dispatcher.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       SDK Layer                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  proofmode-types   : Source, RequestId, ErrorCode           │
//! │  proofmode-task    : Task, Command, protocol, Session       │
//! │  proofmode-handler : Handlers trait + test harness          │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                Runtime Layer (THIS CRATE)                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  queue      : MultiQueue, PeekMode                          │
//! │  dispatcher : Dispatcher, lanes, executor                   │
//! │  bridge     : request/response pump                         │
//! │  config     : DispatchConfig                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Scheduling Model
//!
//! Two lanes, each a layered [`MultiQueue`]:
//!
//! - the **blocking** lane carries commands, proof-checker requests, and
//!   their induced work; an in-flight request gates it via an empty live
//!   head layer;
//! - the **critical** lane carries user-interrupt traffic (escape,
//!   input-method keystrokes) and view events, and is never starved by
//!   the blocking lane.
//!
//! At most one task executes per lane at any moment (per-lane `Busy`
//! flags); at most one proof-checker request and at most one prompting
//! view request are in flight at any moment (singleton layers).
//!
//! # Quick Start
//!
//! ```
//! use proofmode_handler::testing::{RecordingHandlers, ScriptedSession};
//! use proofmode_runtime::Dispatcher;
//! use proofmode_task::Command;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let dispatcher = Dispatcher::new(
//!     Arc::new(ScriptedSession::new()),
//!     Arc::new(RecordingHandlers::new()),
//! );
//! dispatcher.dispatch_command(Command::Load).await.unwrap();
//! # }
//! ```

mod bridge;
mod config;
mod dispatcher;
mod error;
pub mod queue;

pub use config::DispatchConfig;
pub use dispatcher::{Dispatcher, DispatcherBuilder, Lane, LaneStatus};
pub use error::DispatchError;
pub use queue::{MultiQueue, PeekMode};

// Re-export the SDK surface embedders need alongside the dispatcher
pub use proofmode_handler::Handlers;
pub use proofmode_task::{Session, Task};
pub use proofmode_types::Source;
