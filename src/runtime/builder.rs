//! Fluent construction of configured machines.

use crate::core::{State, StateKind};
use crate::error::MachineError;
use crate::journal::TransitionJournal;
use crate::runtime::machine::StateMachine;

type DefaultEntry = fn(&mut StateMachine) -> Result<(), MachineError>;

/// Builds a [`StateMachine`] with a label, a kind constraint, a default
/// state, or a transition journal.
///
/// The default state is entered during [`build`](MachineBuilder::build),
/// unconditionally: no state exists yet, so no lock can apply, and the
/// machine's very first activation happens before the caller ever sees it.
/// A default state that violates the constraint, or whose enter hook fails,
/// turns into the build error.
///
/// # Example
///
/// ```
/// use statehouse::{declare_states, StateKind, StateMachine};
///
/// const SCREEN: StateKind = StateKind::new("screen");
///
/// declare_states! {
///     pub struct Splash: SCREEN;
/// }
///
/// let machine = StateMachine::builder()
///     .label("frontend")
///     .constraint(SCREEN)
///     .default_state::<Splash>()
///     .journal_capacity(32)
///     .build()
///     .unwrap();
///
/// assert!(machine.is_current::<Splash>());
/// assert_eq!(machine.journal().len(), 1);
/// ```
pub struct MachineBuilder {
    label: Option<String>,
    constraint: Option<StateKind>,
    journal_capacity: usize,
    default_entry: Option<DefaultEntry>,
}

impl MachineBuilder {
    /// Starts with no label, no constraint, no default state, and the
    /// journal disabled.
    pub fn new() -> Self {
        Self {
            label: None,
            constraint: None,
            journal_capacity: 0,
            default_entry: None,
        }
    }

    /// Human-readable machine name, used in logs and snapshots.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Restricts the machine to state types whose
    /// [`kinds`](crate::State::kinds) list contains `kind`.
    pub fn constraint(mut self, kind: StateKind) -> Self {
        self.constraint = Some(kind);
        self
    }

    /// The state the machine enters as soon as it is built.
    pub fn default_state<T: State + Default>(mut self) -> Self {
        fn enter<T: State + Default>(machine: &mut StateMachine) -> Result<(), MachineError> {
            machine.force_state::<T>()
        }
        self.default_entry = Some(enter::<T>);
        self
    }

    /// Keeps the `capacity` most recent transitions in the machine's
    /// journal. Zero (the default) disables recording.
    pub fn journal_capacity(mut self, capacity: usize) -> Self {
        self.journal_capacity = capacity;
        self
    }

    /// Constructs the machine and enters the default state, if one was
    /// configured.
    pub fn build(self) -> Result<StateMachine, MachineError> {
        let mut machine = StateMachine::from_parts(
            self.label,
            self.constraint,
            TransitionJournal::with_capacity(self.journal_capacity),
        );
        if let Some(enter) = self.default_entry {
            enter(&mut machine)?;
            if let Some(name) = machine.current_state_name() {
                machine.set_default_state_name(name);
            }
        }
        Ok(machine)
    }
}

impl Default for MachineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
