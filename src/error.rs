//! Error types for machine configuration and state lifecycle failures.

use thiserror::Error;

use crate::core::StateKind;

/// What a state's lifecycle hooks return on failure.
///
/// Boxed so concrete states can surface whatever error type their wiring
/// produces.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by [`StateMachine`](crate::StateMachine) operations.
///
/// Two families exist. Configuration errors ([`KindConstraint`]) mean the
/// request itself was invalid for this machine; they are raised when a state
/// type is first resolved and never at steady state. Hook failures
/// ([`EnterHook`], [`ExitHook`]) mean a state's own lifecycle code failed
/// mid-transition.
///
/// The guarded entry points (`change_state`, `change_state_with`,
/// `clear_state`) log and swallow configuration errors but propagate hook
/// failures. The force entry points and `resolve` propagate both.
///
/// [`KindConstraint`]: MachineError::KindConstraint
/// [`EnterHook`]: MachineError::EnterHook
/// [`ExitHook`]: MachineError::ExitHook
#[derive(Debug, Error)]
pub enum MachineError {
    /// The requested state type does not declare the kind this machine
    /// requires. The machine and its cache are untouched.
    #[error("state {state} does not satisfy the machine constraint {required}")]
    KindConstraint {
        /// Display name of the rejected state type.
        state: &'static str,
        /// The kind the machine requires.
        required: StateKind,
    },

    /// The incoming state's enter hook failed. The state is current but its
    /// entry did not complete; the machine accepts further transitions, so
    /// the caller decides whether to retry, move elsewhere, or clear.
    #[error("enter hook of state {state} failed")]
    EnterHook {
        /// Display name of the state whose hook failed.
        state: &'static str,
        /// The underlying hook error.
        #[source]
        source: HookError,
    },

    /// The outgoing state's exit hook failed. The transition stopped before
    /// the state swap, so the outgoing state is still current and still
    /// cached.
    #[error("exit hook of state {state} failed")]
    ExitHook {
        /// Display name of the state whose hook failed.
        state: &'static str,
        /// The underlying hook error.
        #[source]
        source: HookError,
    },
}

impl MachineError {
    /// Whether this is a configuration error (invalid request, machine
    /// untouched).
    pub fn is_configuration(&self) -> bool {
        matches!(self, MachineError::KindConstraint { .. })
    }

    /// Whether this is a lifecycle hook failure.
    pub fn is_hook_failure(&self) -> bool {
        matches!(
            self,
            MachineError::EnterHook { .. } | MachineError::ExitHook { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn constraint_error_names_state_and_kind() {
        let error = MachineError::KindConstraint {
            state: "Paused",
            required: StateKind::new("screen"),
        };
        assert_eq!(
            error.to_string(),
            "state Paused does not satisfy the machine constraint screen"
        );
        assert!(error.is_configuration());
        assert!(!error.is_hook_failure());
    }

    #[test]
    fn hook_errors_keep_their_source() {
        let error = MachineError::EnterHook {
            state: "Loading",
            source: "asset bundle missing".into(),
        };
        assert!(error.is_hook_failure());
        assert_eq!(
            error.source().map(|source| source.to_string()),
            Some("asset bundle missing".to_owned())
        );
    }

    #[test]
    fn exit_hook_error_mentions_the_state() {
        let error = MachineError::ExitHook {
            state: "Playing",
            source: "save failed".into(),
        };
        assert_eq!(error.to_string(), "exit hook of state Playing failed");
    }
}
