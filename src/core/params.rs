//! Typed parameters for states that need input at transition time.
//!
//! A state that wants data from the caller implements
//! [`ParameterizedState`] and is entered through the `*_with` entry points.
//! The machine writes the parameters into the cached instance strictly
//! before the enter hook runs, so `on_enter` always sees them.

use std::fmt;

use crate::core::state::State;

/// A state that accepts a typed parameter payload.
///
/// The machine calls [`write_params`](ParameterizedState::write_params) right
/// after resolving the instance and before any transition work starts. A
/// repeated request to the already-current state still overwrites the
/// parameters even though no transition runs.
///
/// # Example
///
/// ```
/// use statehouse::{HookError, ParameterizedState, Params, State, StateMachine};
///
/// #[derive(Default)]
/// struct Loading {
///     request: Params<String>,
/// }
///
/// impl State for Loading {
///     fn name(&self) -> &'static str {
///         "Loading"
///     }
///
///     fn add_listeners(&mut self, _owner: &mut StateMachine) -> Result<(), HookError> {
///         assert!(self.request.is_set());
///         Ok(())
///     }
///
///     fn remove_listeners(&mut self, _owner: &mut StateMachine) -> Result<(), HookError> {
///         Ok(())
///     }
/// }
///
/// impl ParameterizedState for Loading {
///     type Params = String;
///
///     fn write_params(&mut self, params: String) {
///         self.request.set(params);
///     }
/// }
///
/// let mut machine = StateMachine::new();
/// machine
///     .change_state_with::<Loading>("level-7".to_owned())
///     .unwrap();
/// assert_eq!(
///     machine.state::<Loading>().and_then(|s| s.request.get()),
///     Some(&"level-7".to_owned()),
/// );
/// ```
pub trait ParameterizedState: State {
    /// The payload this state accepts.
    type Params: 'static;

    /// Stores the payload on the instance. Overwrites any previous value.
    fn write_params(&mut self, params: Self::Params);
}

/// A ready-made slot for holding a state's parameters.
///
/// Purely a convenience: embed it as a field and forward
/// [`ParameterizedState::write_params`] to [`Params::set`]. The manual
/// `Default` and `Debug` impls put no bounds on `P`, so the surrounding
/// state can keep deriving both whatever the payload type is.
pub struct Params<P> {
    value: Option<P>,
}

impl<P> Params<P> {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self { value: None }
    }

    /// Stores a payload, replacing any previous one.
    pub fn set(&mut self, value: P) {
        self.value = Some(value);
    }

    /// Borrows the stored payload, if any.
    pub fn get(&self) -> Option<&P> {
        self.value.as_ref()
    }

    /// Removes and returns the stored payload.
    pub fn take(&mut self) -> Option<P> {
        self.value.take()
    }

    /// Whether a payload is currently stored.
    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }
}

impl<P> Default for Params<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> fmt::Debug for Params<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Params")
            .field("set", &self.value.is_some())
            .finish()
    }
}
