//! Identifier types for proofmode.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Correlation id for one proof-checker request.
///
/// A fresh id is minted when a request is constructed and carried through
/// log lines so a request can be matched with the response stream it
/// produced. Ids are random (UUID v4); there is no registry.
///
/// # Example
///
/// ```
/// use proofmode_types::RequestId;
///
/// let a = RequestId::new();
/// let b = RequestId::new();
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

#[allow(clippy::new_without_default)] // minted at request construction, never defaulted
impl RequestId {
    /// Creates a new [`RequestId`] with a random UUID v4.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
