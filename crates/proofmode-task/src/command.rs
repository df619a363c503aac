//! Parsed editor commands.
//!
//! Commands arrive from the editor already parsed; the command parser
//! itself lives with the editor integration. The dispatcher only needs two
//! things from a command: its identity (for the command handler) and its
//! [`criticality`](Command::is_critical).
//!
//! # Criticality
//!
//! The dispatcher runs two lanes. Most commands ride the blocking lane
//! behind any in-flight proof-checker request. `Escape` and input-method
//! keystrokes must never wait behind a long type-check, so their producers
//! feed the critical lane instead. [`Command::is_critical`] is the oracle
//! producers consult.

use serde::{Deserialize, Serialize};

/// A parsed editor command.
///
/// The set mirrors the interactive surface of the proof assistant:
/// file-level operations, goal navigation, and per-goal actions, plus the
/// two interrupt-class inputs (`Escape`, `InputSymbol`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Load (type-check) the current file.
    Load,
    /// Quit the session.
    Quit,
    /// Restart the proof-checker process.
    Restart,
    /// Display all goals.
    ShowGoals,
    /// Move the cursor to the next goal.
    NextGoal,
    /// Move the cursor to the previous goal.
    PreviousGoal,
    /// Give the goal its content as a solution.
    Give,
    /// Refine the goal with its content.
    Refine,
    /// Run the automatic proof search on the goal.
    Auto,
    /// Case-split on the variable in the goal.
    Case,
    /// Infer the type of an expression.
    InferType,
    /// Solve all known constraints.
    SolveConstraints,
    /// Abort whatever the view is prompting for.
    Escape,
    /// An input-method keystroke (e.g. `\lambda`).
    InputSymbol(String),
}

impl Command {
    /// Returns `true` if this command must ride the critical lane.
    ///
    /// Critical commands are user-interrupt traffic: they must stay
    /// responsive even while a proof-checker request is blocking the other
    /// lane. The classification is consulted by the command *producer*
    /// when it decides which lane to feed.
    ///
    /// # Example
    ///
    /// ```
    /// use proofmode_task::Command;
    ///
    /// assert!(Command::Escape.is_critical());
    /// assert!(Command::InputSymbol("lambda".into()).is_critical());
    /// assert!(!Command::Load.is_critical());
    /// ```
    #[must_use]
    pub fn is_critical(&self) -> bool {
        matches!(self, Self::Escape | Self::InputSymbol(_))
    }

    /// Returns the display name of this command.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Load => "Load",
            Self::Quit => "Quit",
            Self::Restart => "Restart",
            Self::ShowGoals => "ShowGoals",
            Self::NextGoal => "NextGoal",
            Self::PreviousGoal => "PreviousGoal",
            Self::Give => "Give",
            Self::Refine => "Refine",
            Self::Auto => "Auto",
            Self::Case => "Case",
            Self::InferType => "InferType",
            Self::SolveConstraints => "SolveConstraints",
            Self::Escape => "Escape",
            Self::InputSymbol(_) => "InputSymbol",
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InputSymbol(sequence) => write!(f, "InputSymbol({})", sequence),
            other => f.write_str(other.name()),
        }
    }
}
