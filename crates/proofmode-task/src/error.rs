//! Pipeline errors.
//!
//! Errors never escape the dispatcher as `Err` values: every failure is
//! translated by the error handler into a task list and re-enters the
//! pipeline, either directly or riding inside a [`Task::Error`] item.
//!
//! [`Task::Error`]: crate::Task::Error
//!
//! # Error Code Convention
//!
//! All core errors use the `CORE_` prefix:
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`CoreError::Connection`] | `CORE_CONNECTION_FAILED` | Yes |
//! | [`CoreError::Parse`] | `CORE_PARSE_FAILED` | No |
//! | [`CoreError::Internal`] | `CORE_INTERNAL` | No |

use proofmode_types::ErrorCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The error currency of the task pipeline.
///
/// # Variants
///
/// | Variant | When | Effect on the pipeline |
/// |---------|------|------------------------|
/// | `Connection` | The proof checker could not be reached | Request aborted, lane continues |
/// | `Parse` | A malformed response frame | Frame skipped, stream continues |
/// | `Internal` | A handler or transport invariant broke | Reported, lane continues |
///
/// # Example
///
/// ```
/// use proofmode_task::CoreError;
/// use proofmode_types::ErrorCode;
///
/// let err = CoreError::Connection("agda exited".into());
/// assert_eq!(err.code(), "CORE_CONNECTION_FAILED");
/// assert!(err.is_recoverable());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum CoreError {
    /// The proof-checker process could not be reached.
    ///
    /// **Recoverable** - the process may come back after a restart.
    #[error("connection to the proof checker failed: {0}")]
    Connection(String),

    /// A response frame could not be decoded.
    ///
    /// **Not recoverable** - the frame is gone; the stream continues with
    /// the next one.
    #[error("failed to parse response frame: {0}")]
    Parse(String),

    /// A handler or transport broke an internal expectation.
    ///
    /// **Not recoverable** - indicates a bug in the embedder or the core.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ErrorCode for CoreError {
    fn code(&self) -> &'static str {
        match self {
            Self::Connection(_) => "CORE_CONNECTION_FAILED",
            Self::Parse(_) => "CORE_PARSE_FAILED",
            Self::Internal(_) => "CORE_INTERNAL",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}
