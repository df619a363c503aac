//! Unified error interface for proofmode.
//!
//! Every error type in the workspace implements [`ErrorCode`] so that the
//! dispatcher, handlers, and embedders can log and branch on errors
//! uniformly, without matching on concrete enums from other crates.
//!
//! # Code Format
//!
//! - UPPER_SNAKE_CASE, prefixed with the owning domain
//!   (e.g. `CORE_CONNECTION_FAILED`, `DISPATCH_LANE_HALTED`)
//! - Stable once defined; changing a code is a breaking change
//!
//! # Recoverability
//!
//! An error is **recoverable** when retrying the operation may succeed
//! (connection hiccups, timeouts). Malformed input and logic errors are not.
//!
//! # Example
//!
//! ```
//! use proofmode_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum LoadError {
//!     FileVanished,
//!     CheckerBusy,
//! }
//!
//! impl ErrorCode for LoadError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::FileVanished => "LOAD_FILE_VANISHED",
//!             Self::CheckerBusy => "LOAD_CHECKER_BUSY",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::CheckerBusy)
//!     }
//! }
//!
//! let err = LoadError::CheckerBusy;
//! assert_eq!(err.code(), "LOAD_CHECKER_BUSY");
//! assert!(err.is_recoverable());
//! ```

/// Unified error code interface.
///
/// Implemented by every error enum in the workspace.
pub trait ErrorCode {
    /// Returns a machine-readable error code.
    ///
    /// UPPER_SNAKE_CASE, domain-prefixed, stable across versions.
    fn code(&self) -> &'static str;

    /// Returns whether retrying the failed operation may succeed.
    fn is_recoverable(&self) -> bool;
}

/// Validates that an error code follows workspace conventions.
///
/// Checks that the code is non-empty, UPPER_SNAKE_CASE, and carries the
/// expected domain prefix.
///
/// # Panics
///
/// Panics with a descriptive message if validation fails.
///
/// # Example
///
/// ```
/// use proofmode_types::{assert_error_code, ErrorCode};
///
/// #[derive(Debug)]
/// struct Oops;
///
/// impl ErrorCode for Oops {
///     fn code(&self) -> &'static str { "CORE_OOPS" }
///     fn is_recoverable(&self) -> bool { false }
/// }
///
/// assert_error_code(&Oops, "CORE_");
/// ```
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "Error code must not be empty");

    assert!(
        code.starts_with(expected_prefix),
        "Error code '{}' must start with prefix '{}'",
        code,
        expected_prefix
    );

    assert!(
        is_upper_snake_case(code),
        "Error code '{}' must be UPPER_SNAKE_CASE",
        code
    );
}

/// Validates every variant of an error enum at once.
///
/// # Example
///
/// ```
/// use proofmode_types::{assert_error_codes, ErrorCode};
///
/// #[derive(Debug)]
/// enum E { A, B }
///
/// impl ErrorCode for E {
///     fn code(&self) -> &'static str {
///         match self {
///             Self::A => "CORE_A",
///             Self::B => "CORE_B",
///         }
///     }
///     fn is_recoverable(&self) -> bool { false }
/// }
///
/// assert_error_codes(&[E::A, E::B], "CORE_");
/// ```
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

/// Checks if a string is UPPER_SNAKE_CASE.
fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }

    if s.starts_with('_') || s.ends_with('_') {
        return false;
    }

    if s.contains("__") {
        return false;
    }

    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
