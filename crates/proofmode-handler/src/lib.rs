//! Handler surface for the proofmode dispatcher.
//!
//! The dispatcher core never interprets domain inputs itself: commands,
//! response frames, errors, and goal actions are translated into task
//! lists by an embedder-supplied [`Handlers`] implementation. This crate
//! defines that trait, plus a [`testing`] harness for exercising handlers
//! and the dispatcher without a live proof checker or view panel.
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
//! │  proofmode-task    : Task, Command, protocol types          │
//! │  proofmode-handler : Handlers trait  ◄── HERE               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Translation Flow
//!
//! ```text
//! Command ──► on_command ──► [Task] ──► critical lane, Command layer
//! AgdaResponse ──► on_response ──► [Task] ──► blocking lane, Agda layer
//! CoreError ──► on_error ──► [Task] ──► ahead of pending work
//! GoalAction ──► on_goal ──► [Task] ──► ahead of pending work
//! ```
//!
//! Handlers are pure translators: they must not touch the session, spawn
//! work, or block. Anything effectful belongs in the tasks they return
//! (`WithState` for state access, `SendRequest` for checker traffic).

mod handlers;
pub mod testing;

pub use handlers::Handlers;
