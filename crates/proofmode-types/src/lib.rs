//! Core types for the proofmode dispatcher.
//!
//! This crate provides the foundational tag and identifier types shared by
//! every layer of the proofmode workspace.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       SDK Layer                             │
//! │  (consumed by handler authors and editor integrations)      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  proofmode-types   : Source, RequestId, ErrorCode ◄── HERE  │
//! │  proofmode-task    : Task, Command, protocol types          │
//! │  proofmode-handler : Handlers trait + test harness          │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Runtime Layer                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  proofmode-runtime : MultiQueue, Dispatcher, Bridge         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Contents
//!
//! - [`Source`]: the producer tag that owns a queue layer
//! - [`RequestId`]: correlation id for proof-checker requests
//! - [`ErrorCode`]: unified error code interface, with
//!   [`assert_error_code`]/[`assert_error_codes`] test helpers
//!
//! # Example
//!
//! ```
//! use proofmode_types::{RequestId, Source};
//!
//! let layer_tag = Source::Agda;
//! assert_ne!(layer_tag, Source::Command);
//!
//! let id = RequestId::new();
//! println!("in flight: {}", id);
//! ```

mod error;
mod id;
mod source;

pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::RequestId;
pub use source::Source;
