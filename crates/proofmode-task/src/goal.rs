//! Goal-manipulation actions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An action on a goal, interpreted by the embedder's goal handler.
///
/// The goal routines (text edits around interaction points, offset
/// bookkeeping) live with the editor integration; the dispatcher routes
/// the action and enqueues whatever tasks the handler produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalAction {
    /// Action kind (e.g. `set-cursor`, `modify`, `remove-boundary`).
    pub kind: String,
    /// Action arguments.
    pub payload: Value,
}

impl GoalAction {
    /// Creates a goal action.
    #[must_use]
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }
}

impl std::fmt::Display for GoalAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.kind)
    }
}
