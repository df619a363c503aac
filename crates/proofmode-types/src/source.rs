//! Producer tags for queue layers.
//!
//! Every layer in a dispatcher lane is owned by exactly one producer,
//! identified by its [`Source`] tag. The tag decides which layer an
//! injected task lands in, and which layer is removed when the owning
//! operation completes.
//!
//! | Source | Owner | Typical tasks |
//! |--------|-------|---------------|
//! | `Command` | Editor commands | dispatched command expansions |
//! | `Agda` | The proof-checker response stream | response-handler output |
//! | `View` | An in-flight view request | view-callback output |
//! | `Misc` | State callbacks and one-shot routing | goal/error expansions |
//!
//! The bottom layer of every lane is tagged `Command` and persists for the
//! lane's lifetime. `Agda` and `View` layers gate lane progress while their
//! operation is in flight.

use serde::{Deserialize, Serialize};

/// Tag identifying which producer owns a queue layer.
///
/// Equality is by tag only; two `Agda` layers spawned at different times
/// compare equal, and queue operations always target the first (topmost)
/// layer with a matching tag.
///
/// # Example
///
/// ```
/// use proofmode_types::Source;
///
/// assert_eq!(Source::Agda, Source::Agda);
/// assert_ne!(Source::Agda, Source::View);
/// assert_eq!(Source::Misc.to_string(), "Misc");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    /// Editor commands. The persistent bottom layer of every lane.
    Command,
    /// The proof-checker. Spawned while a request's response stream is live.
    Agda,
    /// The view panel. Spawned while a view request is in flight.
    View,
    /// State callbacks and one-shot task routing.
    Misc,
}

impl Source {
    /// Returns the display name of this tag.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Command => "Command",
            Self::Agda => "Agda",
            Self::View => "View",
            Self::Misc => "Misc",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
