//! The state contract.
//!
//! A state is identified by its concrete Rust type. The machine constructs
//! instances through [`Default`], caches at most one instance per type, and
//! drives the lifecycle hooks defined here. States talk back to their owning
//! machine through the `owner` argument passed to every hook rather than
//! through a stored back reference.

use std::any::Any;

use crate::core::kind::StateKind;
use crate::error::HookError;
use crate::runtime::StateMachine;

/// Upcast helper so cached states can be downcast to their concrete type.
///
/// Blanket-implemented for every `'static` type. Implementors of [`State`]
/// never write this by hand.
pub trait AsAny: Any {
    /// Returns `self` as a shared [`Any`] reference.
    fn as_any(&self) -> &dyn Any;

    /// Returns `self` as a mutable [`Any`] reference.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A unit of behavior a [`StateMachine`] can activate.
///
/// Exactly one state is active per machine at a time. Instances are created
/// lazily on first request, cached per concrete type, and destroyed when the
/// machine transitions away, so every activation starts from a fresh
/// [`Default`] value.
///
/// The two listener hooks are the required surface: wire up whatever the
/// state needs to observe in `add_listeners` and undo all of it in
/// `remove_listeners`. The machine never removes observers on a state's
/// behalf, so every subscription made on entry must be paired with a removal
/// on exit. `on_enter` and `on_exit` default to calling the listener hooks
/// and can be overridden when entry or exit involves more than wiring.
///
/// # Example
///
/// ```
/// use statehouse::{HookError, State, StateMachine};
///
/// #[derive(Default)]
/// struct Paused;
///
/// impl State for Paused {
///     fn name(&self) -> &'static str {
///         "Paused"
///     }
///
///     fn add_listeners(&mut self, _owner: &mut StateMachine) -> Result<(), HookError> {
///         Ok(())
///     }
///
///     fn remove_listeners(&mut self, _owner: &mut StateMachine) -> Result<(), HookError> {
///         Ok(())
///     }
/// }
///
/// let mut machine = StateMachine::new();
/// machine.change_state::<Paused>().unwrap();
/// assert_eq!(machine.current_state_name(), Some("Paused"));
/// ```
pub trait State: AsAny {
    /// Display name used in logs, errors, journal entries, and snapshots.
    ///
    /// Defaults to the full type name.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Capability markers this state type satisfies.
    ///
    /// A machine built with a kind constraint only accepts state types whose
    /// `kinds` list contains the required kind. Defaults to none.
    fn kinds(&self) -> &'static [StateKind] {
        &[]
    }

    /// Wires up everything this state observes while active.
    ///
    /// Runs as part of entry, before the "state changed" notification fires.
    fn add_listeners(&mut self, owner: &mut StateMachine) -> Result<(), HookError>;

    /// Undoes every subscription made in [`State::add_listeners`].
    ///
    /// Runs as part of exit, after the "state will change" notification and
    /// before the instance is destroyed.
    fn remove_listeners(&mut self, owner: &mut StateMachine) -> Result<(), HookError>;

    /// Entry hook. The machine already reports this state as current when it
    /// runs, and any parameters have already been written.
    fn on_enter(&mut self, owner: &mut StateMachine) -> Result<(), HookError> {
        self.add_listeners(owner)
    }

    /// Exit hook. Runs while this state is still current; the instance is
    /// dropped right after it returns successfully.
    fn on_exit(&mut self, owner: &mut StateMachine) -> Result<(), HookError> {
        self.remove_listeners(owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Bare;

    impl State for Bare {
        fn add_listeners(&mut self, _owner: &mut StateMachine) -> Result<(), HookError> {
            Ok(())
        }

        fn remove_listeners(&mut self, _owner: &mut StateMachine) -> Result<(), HookError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct Named;

    impl State for Named {
        fn name(&self) -> &'static str {
            "Named"
        }

        fn add_listeners(&mut self, _owner: &mut StateMachine) -> Result<(), HookError> {
            Ok(())
        }

        fn remove_listeners(&mut self, _owner: &mut StateMachine) -> Result<(), HookError> {
            Ok(())
        }
    }

    #[test]
    fn default_name_is_the_type_name() {
        let state = Bare;
        assert!(state.name().ends_with("Bare"));
    }

    #[test]
    fn name_override_wins() {
        let state = Named;
        assert_eq!(state.name(), "Named");
    }

    #[test]
    fn kinds_default_to_empty() {
        let state = Bare;
        assert!(state.kinds().is_empty());
    }

    #[test]
    fn downcasting_through_a_trait_object_recovers_the_concrete_type() {
        let boxed: Box<dyn State> = Box::new(Named);
        let state: &dyn State = boxed.as_ref();
        assert!(state.as_any().downcast_ref::<Named>().is_some());
        assert!(state.as_any().downcast_ref::<Bare>().is_none());
    }
}
