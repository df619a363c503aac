//! Proof-checker protocol surface.
//!
//! The wire codec (serializing requests, decoding response frames) lives
//! with the editor integration. The dispatcher sees requests and responses
//! in their decoded shape only: a named operation plus a JSON payload.
//!
//! # Request Flow
//!
//! ```text
//! Task::SendRequest(AgdaRequest)
//!     │
//!     ▼
//! Session::send_agda_request ───► proof checker
//!     │
//!     ▼ ResponseStream
//! StreamEvent::Yield(Ok(AgdaResponse))   (zero or more)
//! StreamEvent::Yield(Err(parse error))   (interleaved)
//! StreamEvent::Stop                      (terminal)
//! ```

use crate::CoreError;
use proofmode_types::RequestId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One request to the proof checker.
///
/// Blocks the `Agda` layer of the blocking lane from the moment it is
/// executed until its response stream terminates. A fresh [`RequestId`]
/// is minted at construction for log correlation.
///
/// # Example
///
/// ```
/// use proofmode_task::AgdaRequest;
///
/// let req = AgdaRequest::load("/home/u/Nat.agda");
/// assert_eq!(req.command, "load");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgdaRequest {
    /// Correlation id for this request.
    pub id: RequestId,
    /// Protocol operation name (e.g. `load`, `give`, `auto`).
    pub command: String,
    /// Operation arguments, in the shape the wire codec expects.
    pub payload: Value,
}

impl AgdaRequest {
    /// Creates a request with the given operation name and arguments.
    #[must_use]
    pub fn new(command: impl Into<String>, payload: Value) -> Self {
        Self {
            id: RequestId::new(),
            command: command.into(),
            payload,
        }
    }

    /// Creates a `load` request for a file path.
    #[must_use]
    pub fn load(path: impl Into<String>) -> Self {
        Self::new("load", serde_json::json!({ "path": path.into() }))
    }

    /// Creates a `give` request for a goal.
    #[must_use]
    pub fn give(goal: u32, expression: impl Into<String>) -> Self {
        Self::new(
            "give",
            serde_json::json!({ "goal": goal, "expression": expression.into() }),
        )
    }

    /// Creates an `auto` request for a goal.
    #[must_use]
    pub fn auto(goal: u32) -> Self {
        Self::new("auto", serde_json::json!({ "goal": goal }))
    }
}

impl std::fmt::Display for AgdaRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.command, self.id)
    }
}

/// One decoded frame from the response stream.
///
/// Interpretation (highlighting, goal updates, error display) is the
/// response handler's job; the dispatcher only routes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgdaResponse {
    /// Frame kind (e.g. `DisplayInfo`, `InteractionPoints`).
    pub kind: String,
    /// Frame contents.
    pub payload: Value,
}

impl AgdaResponse {
    /// Creates a response frame.
    #[must_use]
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }
}

impl std::fmt::Display for AgdaResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind, self.payload)
    }
}

/// One event on a proof-checker response stream.
#[derive(Debug)]
pub enum StreamEvent {
    /// A frame arrived: decoded, or a parse failure for that frame.
    Yield(Result<AgdaResponse, CoreError>),
    /// The stream terminated. No further events follow.
    Stop,
}
