//! The handler trait consumed by the dispatcher.

use proofmode_task::{AgdaResponse, Command, CoreError, GoalAction, Task};

/// Translates domain inputs into task lists.
///
/// One implementation is supplied per session by the embedder. Every
/// method is a pure translation: input in, ordered task list out. The
/// dispatcher enqueues the output; an empty list means "nothing to do".
///
/// All methods default to the empty list so an embedder implements only
/// the surfaces it uses.
///
/// # Example
///
/// ```
/// use proofmode_handler::Handlers;
/// use proofmode_task::{AgdaRequest, Command, Task};
///
/// struct MyHandlers;
///
/// impl Handlers for MyHandlers {
///     fn on_command(&self, command: &Command) -> Vec<Task> {
///         match command {
///             Command::Load => vec![Task::SendRequest(AgdaRequest::load("Current.agda"))],
///             _ => Vec::new(),
///         }
///     }
/// }
/// ```
pub trait Handlers: Send + Sync {
    /// Translates an editor command into tasks.
    fn on_command(&self, command: &Command) -> Vec<Task> {
        let _ = command;
        Vec::new()
    }

    /// Translates one proof-checker response frame into tasks.
    fn on_response(&self, response: &AgdaResponse) -> Vec<Task> {
        let _ = response;
        Vec::new()
    }

    /// Translates an error into tasks (typically view displays).
    fn on_error(&self, error: &CoreError) -> Vec<Task> {
        let _ = error;
        Vec::new()
    }

    /// Translates a goal action into tasks.
    fn on_goal(&self, action: &GoalAction) -> Vec<Task> {
        let _ = action;
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proofmode_task::AgdaRequest;

    struct LoadOnly;

    impl Handlers for LoadOnly {
        fn on_command(&self, command: &Command) -> Vec<Task> {
            match command {
                Command::Load => vec![Task::SendRequest(AgdaRequest::load("A.agda"))],
                _ => Vec::new(),
            }
        }
    }

    #[test]
    fn defaults_are_empty() {
        let handlers = LoadOnly;
        assert!(handlers
            .on_response(&AgdaResponse::new("DisplayInfo", serde_json::json!({})))
            .is_empty());
        assert!(handlers
            .on_error(&CoreError::Parse("x".into()))
            .is_empty());
        assert!(handlers
            .on_goal(&GoalAction::new("set-cursor", serde_json::json!({})))
            .is_empty());
    }

    #[test]
    fn implemented_surface_translates() {
        let handlers = LoadOnly;
        let tasks = handlers.on_command(&Command::Load);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].kind(), "SendRequest");

        assert!(handlers.on_command(&Command::Escape).is_empty());
    }
}
