//! View-panel protocol surface.
//!
//! The view is the plugin's UI panel. The dispatcher talks to it with
//! [`ViewRequest`]s and receives [`ViewResponse`]s; the panel itself raises
//! [`ViewEvent`]s (lifecycle notifications) back into the pipeline.
//!
//! # Prompting
//!
//! Most view requests only display something. A request whose body is a
//! [`ViewBody::Query`] *prompts*: it waits for user input, and the
//! dispatcher must block further work on its lane until the answer
//! arrives. [`ViewRequest::is_prompting`] is the oracle; it matches
//! exactly the `Plain(_, Query(..))` shape.

use serde::{Deserialize, Serialize};

/// Header line of a view display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewHeader {
    /// Neutral header.
    Plain(String),
    /// Header styled as success.
    Success(String),
    /// Header styled as a warning.
    Warning(String),
    /// Header styled as an error.
    Error(String),
}

impl ViewHeader {
    /// Returns the header text regardless of style.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(t) | Self::Success(t) | Self::Warning(t) | Self::Error(t) => t,
        }
    }
}

/// Body of a view display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewBody {
    /// No body.
    Nothing,
    /// Plain text body.
    Plain(String),
    /// An input prompt. The only body kind that makes a request prompting.
    Query {
        /// Placeholder text shown in the empty input box.
        placeholder: Option<String>,
        /// Pre-filled input value.
        value: Option<String>,
    },
}

/// A request to the view panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewRequest {
    /// Reveal the panel.
    Show,
    /// Hide the panel.
    Hide,
    /// Display a header and body; prompts if the body is a query.
    Plain(ViewHeader, ViewBody),
}

impl ViewRequest {
    /// Creates a display request with a neutral header and plain body.
    #[must_use]
    pub fn display(header: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Plain(ViewHeader::Plain(header.into()), ViewBody::Plain(body.into()))
    }

    /// Creates a prompting request.
    #[must_use]
    pub fn query(
        header: impl Into<String>,
        placeholder: Option<String>,
        value: Option<String>,
    ) -> Self {
        Self::Plain(
            ViewHeader::Plain(header.into()),
            ViewBody::Query { placeholder, value },
        )
    }

    /// Returns `true` if this request waits for user input.
    ///
    /// Prompting requests are serialized: at most one may be in flight,
    /// and it blocks the blocking lane until the user answers. The oracle
    /// matches exactly the `Plain(_, Query { .. })` shape; `Show`, `Hide`,
    /// and plain displays never prompt.
    ///
    /// # Example
    ///
    /// ```
    /// use proofmode_task::ViewRequest;
    ///
    /// assert!(ViewRequest::query("Give", None, None).is_prompting());
    /// assert!(!ViewRequest::display("Goals", "?0 : Nat").is_prompting());
    /// assert!(!ViewRequest::Show.is_prompting());
    /// ```
    #[must_use]
    pub fn is_prompting(&self) -> bool {
        matches!(self, Self::Plain(_, ViewBody::Query { .. }))
    }
}

/// The view panel's answer to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewResponse {
    /// Display handled, nothing to report.
    Success,
    /// The user answered a query with this text.
    QuerySuccess(String),
    /// The user dismissed a query (escape, focus loss).
    QueryInterrupted,
}

/// Lifecycle notification raised by the view panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewEvent {
    /// The panel finished mounting.
    Initialized,
    /// The panel was torn down; the session should terminate.
    Destroyed,
}
