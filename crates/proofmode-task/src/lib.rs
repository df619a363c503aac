//! Task model for the proofmode dispatcher.
//!
//! This crate defines the vocabulary that flows through the two-lane
//! scheduling engine: the [`Task`] work item, the protocol types it
//! carries, and the [`Session`] trait through which tasks reach the
//! proof checker and the view panel.
//!
//! # Crate Architecture
//!
//! This crate is part of the **SDK** layer:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       SDK Layer                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  proofmode-types   : Source, RequestId, ErrorCode           │
//! │  proofmode-task    : Task, Command, protocol  ◄── HERE      │
//! │  proofmode-handler : Handlers trait + test harness          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # The Three Actors
//!
//! ```text
//! ┌──────────┐  Command   ┌────────────────┐  AgdaRequest  ┌──────────┐
//! │  Editor  │ ─────────► │   Dispatcher   │ ────────────► │   Agda   │
//! │          │            │  (two lanes)   │ ◄──────────── │ (stream) │
//! └──────────┘            │                │  StreamEvent  └──────────┘
//!                         │                │
//!                         │                │  ViewRequest  ┌──────────┐
//!                         │                │ ────────────► │   View   │
//!                         │                │ ◄──────────── │  panel   │
//!                         └────────────────┘  ViewResponse └──────────┘
//! ```
//!
//! Every arrow into the dispatcher becomes a [`Task`]; every task is
//! translated by an embedder-supplied handler into further tasks. The
//! scheduling engine itself lives in `proofmode-runtime`.
//!
//! # Contents
//!
//! - [`Task`]: the tagged work-item union the scheduler executes
//! - [`Command`]: parsed editor commands, with the [`Command::is_critical`]
//!   lane oracle
//! - [`AgdaRequest`], [`AgdaResponse`], [`StreamEvent`]: proof-checker
//!   protocol surface
//! - [`ViewRequest`], [`ViewResponse`], [`ViewEvent`]: view-panel protocol
//!   surface, with the [`ViewRequest::is_prompting`] oracle
//! - [`GoalAction`]: opaque input to the goal handler
//! - [`CoreError`]: the error currency of the pipeline
//! - [`Session`]: async access to the proof checker and the view

mod command;
mod error;
mod goal;
mod request;
mod session;
mod task;
mod view;

pub use command::Command;
pub use error::CoreError;
pub use goal::GoalAction;
pub use request::{AgdaRequest, AgdaResponse, StreamEvent};
pub use session::{ResponseStream, Session};
pub use task::{StateCallback, Task, ViewCallback};
pub use view::{ViewBody, ViewEvent, ViewHeader, ViewRequest, ViewResponse};

// Re-export from proofmode_types for convenience
pub use proofmode_types::{RequestId, Source};
