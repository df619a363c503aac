//! Dispatcher configuration.

use crate::DispatchError;
use serde::{Deserialize, Serialize};

/// Tunable dispatcher behavior.
///
/// Loaded by the embedder (typically from the plugin's settings) and
/// passed to the builder. All fields have working defaults.
///
/// # Example
///
/// ```
/// use proofmode_runtime::DispatchConfig;
///
/// let config: DispatchConfig = serde_json::from_str(
///     r#"{ "view_timeout_ms": 30000 }"#,
/// ).unwrap();
/// assert_eq!(config.view_timeout_ms, Some(30_000));
/// assert!(config.log_lane_snapshots);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Abort a view request that has not answered within this many
    /// milliseconds, treating it as a transport failure. `None` waits
    /// forever (prompts legitimately wait on the user).
    pub view_timeout_ms: Option<u64>,

    /// Log a snapshot of both lanes before each task execution.
    pub log_lane_snapshots: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            view_timeout_ms: None,
            log_lane_snapshots: true,
        }
    }
}

impl DispatchConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidConfig`] for a zero view timeout.
    pub fn validate(&self) -> Result<(), DispatchError> {
        if self.view_timeout_ms == Some(0) {
            return Err(DispatchError::InvalidConfig(
                "view_timeout_ms must be nonzero; omit it to wait forever".into(),
            ));
        }
        Ok(())
    }
}
