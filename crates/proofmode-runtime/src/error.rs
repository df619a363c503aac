//! Runtime layer errors.
//!
//! The scheduler itself never raises: pipeline failures are translated
//! into tasks (see `proofmode-task`). The errors here cover the edges of
//! the runtime: construction and the entry points.
//!
//! # Error Code Convention
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`DispatchError::SessionDestroyed`] | `DISPATCH_SESSION_DESTROYED` | No |
//! | [`DispatchError::MissingComponent`] | `DISPATCH_MISSING_COMPONENT` | No |
//! | [`DispatchError::InvalidConfig`] | `DISPATCH_INVALID_CONFIG` | No |

use proofmode_types::ErrorCode;
use thiserror::Error;

/// Runtime layer error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The session was already destroyed by a `Terminate` task.
    ///
    /// Commands and view events dispatched afterwards are refused; the
    /// embedder should build a fresh dispatcher.
    #[error("session already destroyed")]
    SessionDestroyed,

    /// The builder was finalized without a required component.
    #[error("dispatcher builder is missing: {0}")]
    MissingComponent(&'static str),

    /// A configuration value failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ErrorCode for DispatchError {
    fn code(&self) -> &'static str {
        match self {
            Self::SessionDestroyed => "DISPATCH_SESSION_DESTROYED",
            Self::MissingComponent(_) => "DISPATCH_MISSING_COMPONENT",
            Self::InvalidConfig(_) => "DISPATCH_INVALID_CONFIG",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}
