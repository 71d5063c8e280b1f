//! Dispatch of classified events to configured actions.
//!
//! The dispatcher owns nothing but the registry: a map from event kind to
//! a fallible zero-argument action. Each classified event invokes its
//! action exactly once, synchronously; failures are reported to the
//! caller, never swallowed and never retried.

use crate::core::PressPattern;
use std::collections::HashMap;
use std::process::Command;

/// A registered action: invoked once per classified event, may fail.
pub type Action = Box<dyn FnMut() -> Result<(), ActionError> + Send>;

/// Failure raised by an action itself.
#[derive(Debug, Clone)]
pub enum ActionError {
    /// The configured command line was empty
    EmptyCommand,
    /// The command could not be spawned
    Spawn(String),
    /// The command ran but exited non-zero
    Exited(Option<i32>),
    /// Any other action failure
    Other(String),
}

impl std::fmt::Display for ActionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionError::EmptyCommand => write!(f, "empty command line"),
            ActionError::Spawn(e) => write!(f, "could not run command: {e}"),
            ActionError::Exited(Some(code)) => write!(f, "command exited with status {code}"),
            ActionError::Exited(None) => write!(f, "command terminated by signal"),
            ActionError::Other(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ActionError {}

/// Errors reported by [`Dispatcher::dispatch`].
#[derive(Debug)]
pub enum DispatchError {
    /// No action is bound for the classified event kind
    NotRegistered(PressPattern),
    /// The bound action ran and failed
    ActionFailed {
        pattern: PressPattern,
        source: ActionError,
    },
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchError::NotRegistered(pattern) => {
                write!(f, "no action registered for {pattern}")
            }
            DispatchError::ActionFailed { pattern, source } => {
                write!(f, "action for {pattern} failed: {source}")
            }
        }
    }
}

impl std::error::Error for DispatchError {}

/// Build an action that runs a command line and checks its exit status.
pub fn command_action(argv: Vec<String>) -> Action {
    Box::new(move || {
        let (program, args) = argv.split_first().ok_or(ActionError::EmptyCommand)?;
        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|e| ActionError::Spawn(e.to_string()))?;
        if status.success() {
            Ok(())
        } else {
            Err(ActionError::Exited(status.code()))
        }
    })
}

/// The event-kind -> action registry.
#[derive(Default)]
pub struct Dispatcher {
    actions: HashMap<PressPattern, Action>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an action to an event kind, replacing any previous binding.
    pub fn register(&mut self, pattern: PressPattern, action: Action) {
        self.actions.insert(pattern, action);
    }

    /// Bind a shell command to an event kind.
    pub fn register_command(&mut self, pattern: PressPattern, argv: Vec<String>) {
        self.register(pattern, command_action(argv));
    }

    /// Whether an action is bound for the given kind.
    pub fn is_registered(&self, pattern: PressPattern) -> bool {
        self.actions.contains_key(&pattern)
    }

    /// Invoke the action bound to `pattern` exactly once.
    pub fn dispatch(&mut self, pattern: PressPattern) -> Result<(), DispatchError> {
        let action = self
            .actions
            .get_mut(&pattern)
            .ok_or(DispatchError::NotRegistered(pattern))?;
        action().map_err(|source| DispatchError::ActionFailed { pattern, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_dispatch_invokes_exactly_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let mut dispatcher = Dispatcher::new();
        dispatcher.register(
            PressPattern::OneShort,
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        );

        dispatcher.dispatch(PressPattern::OneShort).expect("ok");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dispatch_unregistered() {
        let mut dispatcher = Dispatcher::new();
        let err = dispatcher.dispatch(PressPattern::ThreeShort);
        assert!(matches!(
            err,
            Err(DispatchError::NotRegistered(PressPattern::ThreeShort))
        ));
    }

    #[test]
    fn test_action_failure_is_reported() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.register(
            PressPattern::Hold,
            Box::new(|| Err(ActionError::Other("reboot unavailable".into()))),
        );

        match dispatcher.dispatch(PressPattern::Hold) {
            Err(DispatchError::ActionFailed { pattern, .. }) => {
                assert_eq!(pattern, PressPattern::Hold);
            }
            other => panic!("expected ActionFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_command_action_exit_status() {
        let mut ok = command_action(vec!["true".to_string()]);
        assert!(ok().is_ok());

        let mut failing = command_action(vec!["false".to_string()]);
        assert!(matches!(failing(), Err(ActionError::Exited(Some(1)))));
    }

    #[test]
    fn test_command_action_empty() {
        let mut empty = command_action(vec![]);
        assert!(matches!(empty(), Err(ActionError::EmptyCommand)));
    }
}
