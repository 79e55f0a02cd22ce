//! The state machine runtime.
//!
//! A [`StateMachine`] owns at most one active state at a time, resolves
//! state instances lazily by type, enforces per-state transition locks and
//! an optional per-machine kind constraint, and fires lifecycle
//! notifications in a fixed order. All of it runs synchronously on the
//! calling thread; observer callbacks are reference-counted and not `Send`,
//! so a machine stays on the thread that created it.

use std::any::TypeId;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::core::{ParameterizedState, State, StateKind};
use crate::error::MachineError;
use crate::journal::TransitionJournal;
use crate::runtime::builder::MachineBuilder;
use crate::runtime::observers::{Channel, ObserverId, ObserverSet};
use crate::runtime::registry::StateRegistry;
use crate::snapshot::MachineSnapshot;

/// A type-driven state machine with cached states, transition locking, and
/// lifecycle notifications.
///
/// States are identified by their concrete type. The first request for a
/// type constructs it through [`Default`], validates it against the
/// machine's kind constraint, and caches it; leaving a state destroys the
/// cached instance, so the next activation starts fresh.
///
/// Transitions follow a fixed protocol: the "state will change"
/// notification fires while the outgoing state is still current, the
/// outgoing state's exit hook runs and the instance is destroyed, the
/// machine swaps to the incoming state, its enter hook runs, and finally
/// "state changed" fires. A reentrancy guard turns any transition request
/// made from inside that window into a silent no-op.
///
/// # Example
///
/// ```
/// use statehouse::{declare_states, StateMachine};
///
/// declare_states! {
///     pub struct Menu;
///     pub struct Playing;
/// }
///
/// let mut machine = StateMachine::builder()
///     .label("game")
///     .default_state::<Menu>()
///     .build()
///     .unwrap();
///
/// machine.on_state_changed(|m| {
///     println!("now in {:?}", m.current_state_name());
/// });
///
/// machine.change_state::<Playing>().unwrap();
/// assert!(machine.is_current::<Playing>());
/// ```
pub struct StateMachine {
    label: Option<String>,
    registry: StateRegistry,
    current: Option<TypeId>,
    in_transition: bool,
    constraint: Option<StateKind>,
    default_state: Option<&'static str>,
    observers: ObserverSet,
    journal: TransitionJournal,
}

impl StateMachine {
    /// Creates an unconfigured machine: no label, no constraint, no default
    /// state, journal disabled.
    pub fn new() -> Self {
        Self::from_parts(None, None, TransitionJournal::disabled())
    }

    /// Starts configuring a machine. See [`MachineBuilder`].
    pub fn builder() -> MachineBuilder {
        MachineBuilder::new()
    }

    pub(crate) fn from_parts(
        label: Option<String>,
        constraint: Option<StateKind>,
        journal: TransitionJournal,
    ) -> Self {
        Self {
            label,
            registry: StateRegistry::new(),
            current: None,
            in_transition: false,
            constraint,
            default_state: None,
            observers: ObserverSet::new(),
            journal,
        }
    }

    pub(crate) fn set_default_state_name(&mut self, name: &'static str) {
        self.default_state = Some(name);
    }

    /// Requests a transition to `T`, resolving (and caching) it on first
    /// use.
    ///
    /// This is the guarded entry point: a locked current state drops the
    /// request silently, and a kind-constraint rejection is logged and
    /// swallowed. Failures in the states' own enter or exit hooks do
    /// propagate. Requesting the already-current type is a no-op.
    pub fn change_state<T: State + Default>(&mut self) -> Result<(), MachineError> {
        if self.refuse_when_locked() {
            return Ok(());
        }
        match self.resolve_entry::<T>() {
            Ok(id) => self.run_transition(Some(id)),
            Err(error) => {
                warn!(machine = self.display_label(), %error, "state change request rejected");
                Ok(())
            }
        }
    }

    /// Like [`change_state`](Self::change_state), but writes `params` into
    /// the resolved instance first.
    ///
    /// The parameters are guaranteed to be in place before the enter hook
    /// runs. When `T` is already current, the parameters are still
    /// overwritten even though no transition runs. A repeat request made
    /// from inside one of `T`'s own hooks cannot reach the checked-out
    /// instance directly; its write is staged and lands once the hook
    /// returns, or dies with the activation if the hook was exiting it.
    pub fn change_state_with<T>(&mut self, params: T::Params) -> Result<(), MachineError>
    where
        T: ParameterizedState + Default,
    {
        if self.refuse_when_locked() {
            return Ok(());
        }
        match self.resolve_entry_with::<T>(params) {
            Ok(id) => self.run_transition(Some(id)),
            Err(error) => {
                warn!(machine = self.display_label(), %error, "state change request rejected");
                Ok(())
            }
        }
    }

    /// Requests a transition to the idle state. Lock-gated like any other
    /// outgoing transition; the outgoing state is exited and destroyed.
    pub fn clear_state(&mut self) -> Result<(), MachineError> {
        if self.refuse_when_locked() {
            return Ok(());
        }
        self.run_transition(None)
    }

    /// Transitions to `T` regardless of the current state's lock.
    ///
    /// Unlike [`change_state`](Self::change_state) this propagates
    /// every failure, including kind-constraint rejections.
    pub fn force_state<T: State + Default>(&mut self) -> Result<(), MachineError> {
        let id = self.resolve_entry::<T>()?;
        self.run_transition(Some(id))
    }

    /// Parameterized form of [`force_state`](Self::force_state).
    pub fn force_state_with<T>(&mut self, params: T::Params) -> Result<(), MachineError>
    where
        T: ParameterizedState + Default,
    {
        let id = self.resolve_entry_with::<T>(params)?;
        self.run_transition(Some(id))
    }

    /// Transitions to idle regardless of the current state's lock.
    pub fn force_clear(&mut self) -> Result<(), MachineError> {
        self.run_transition(None)
    }

    /// Resolves and caches `T` without transitioning to it.
    ///
    /// Useful for pre-warming a state or validating a type against the
    /// machine's constraint ahead of time.
    pub fn resolve<T: State + Default>(&mut self) -> Result<(), MachineError> {
        self.resolve_entry::<T>().map(|_| ())
    }

    /// Like [`resolve`](Self::resolve), but also writes `params` into the
    /// cached instance.
    pub fn resolve_with<T>(&mut self, params: T::Params) -> Result<(), MachineError>
    where
        T: ParameterizedState + Default,
    {
        self.resolve_entry_with::<T>(params).map(|_| ())
    }

    /// Locks the current state, blocking all guarded outgoing transitions
    /// until [`unlock_current_state`](Self::unlock_current_state) runs.
    ///
    /// Ignored (with a warning) when the machine is idle.
    pub fn lock_current_state(&mut self) {
        match self.current {
            Some(id) => {
                self.registry.set_locked(id, true);
                debug!(
                    machine = self.display_label(),
                    state = self.registry.name_of(id).unwrap_or("<unknown>"),
                    "state locked"
                );
            }
            None => warn!(machine = self.display_label(), "no current state to lock"),
        }
    }

    /// Locks the current state and registers `on_unlock` as a one-shot
    /// subscriber on the "state unlocked" channel.
    ///
    /// The callback fires on the next unlock and is removed once that
    /// unlock finishes dispatching, unless the unlock opts to keep
    /// callbacks. Ignored (with a warning, and without registering the
    /// callback) when the machine is idle.
    pub fn lock_current_state_with<F>(&mut self, on_unlock: F)
    where
        F: Fn(&mut StateMachine) + 'static,
    {
        match self.current {
            Some(id) => {
                self.registry.set_locked(id, true);
                let observer = self.observers.subscribe(Channel::Unlocked, Rc::new(on_unlock));
                self.observers.push_pending_unlock(observer);
                debug!(
                    machine = self.display_label(),
                    state = self.registry.name_of(id).unwrap_or("<unknown>"),
                    "state locked with unlock callback"
                );
            }
            None => warn!(machine = self.display_label(), "no current state to lock"),
        }
    }

    /// Unlocks the current state, fires "state unlocked", and consumes all
    /// one-shot unlock callbacks after they run.
    ///
    /// Fires even if the state was not locked. Ignored (with a warning)
    /// when the machine is idle. Consumption happens once the notification
    /// finishes dispatching, so a re-entrant unlock from inside it can fire
    /// a not-yet-consumed callback again.
    pub fn unlock_current_state(&mut self) {
        self.unlock_inner(true);
    }

    /// Like [`unlock_current_state`](Self::unlock_current_state), but
    /// leaves one-shot unlock callbacks registered for the next unlock.
    pub fn unlock_current_state_keeping_callbacks(&mut self) {
        self.unlock_inner(false);
    }

    fn unlock_inner(&mut self, consume: bool) {
        let id = match self.current {
            Some(id) => id,
            None => {
                warn!(machine = self.display_label(), "no current state to unlock");
                return;
            }
        };
        self.registry.set_locked(id, false);
        debug!(
            machine = self.display_label(),
            state = self.registry.name_of(id).unwrap_or("<unknown>"),
            "state unlocked"
        );
        let pending = self.observers.take_pending_unlock();
        self.emit(Channel::Unlocked);
        if consume {
            for observer in pending {
                self.observers.unsubscribe(observer);
            }
        } else {
            self.observers.restore_pending_unlock(pending);
        }
    }

    /// Subscribes to the "state will change" notification, fired while the
    /// outgoing state is still current. Transition requests made from this
    /// callback are dropped by the reentrancy guard.
    pub fn on_state_will_change<F>(&mut self, callback: F) -> ObserverId
    where
        F: Fn(&mut StateMachine) + 'static,
    {
        self.observers.subscribe(Channel::WillChange, Rc::new(callback))
    }

    /// Subscribes to the "state changed" notification, fired after the
    /// incoming state's enter hook completed. The transition is over by
    /// then, so this callback may start the next one.
    pub fn on_state_changed<F>(&mut self, callback: F) -> ObserverId
    where
        F: Fn(&mut StateMachine) + 'static,
    {
        self.observers.subscribe(Channel::Changed, Rc::new(callback))
    }

    /// Subscribes to the "state unlocked" notification.
    pub fn on_state_unlocked<F>(&mut self, callback: F) -> ObserverId
    where
        F: Fn(&mut StateMachine) + 'static,
    {
        self.observers.subscribe(Channel::Unlocked, Rc::new(callback))
    }

    /// Removes a subscription. Returns false when the id is unknown or was
    /// already removed.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Display name of the current state, or `None` when idle.
    pub fn current_state_name(&self) -> Option<&'static str> {
        self.current.and_then(|id| self.registry.name_of(id))
    }

    /// Whether `T` is the current state.
    pub fn is_current<T: State>(&self) -> bool {
        self.current == Some(TypeId::of::<T>())
    }

    /// Whether the machine has no current state.
    pub fn is_idle(&self) -> bool {
        self.current.is_none()
    }

    /// Whether a transition is running right now. Only ever true when
    /// called from inside a hook or a "state will change" callback.
    pub fn in_transition(&self) -> bool {
        self.in_transition
    }

    /// Whether the current state is locked. False when idle.
    pub fn is_locked(&self) -> bool {
        self.current
            .map(|id| self.registry.is_locked(id))
            .unwrap_or(false)
    }

    /// Borrows the cached instance of `T`.
    ///
    /// `None` when `T` was never resolved, was destroyed on exit, or is
    /// currently running one of its own hooks.
    pub fn state<T: State>(&self) -> Option<&T> {
        self.registry.downcast_ref::<T>(TypeId::of::<T>())
    }

    /// Whether an instance of `T` is currently cached.
    pub fn is_cached<T: State>(&self) -> bool {
        self.registry.contains(TypeId::of::<T>())
    }

    /// Names of all cached state types, sorted.
    pub fn cached_states(&self) -> Vec<&'static str> {
        self.registry.names()
    }

    /// The kind this machine requires of its states, if any.
    pub fn constraint(&self) -> Option<StateKind> {
        self.constraint
    }

    /// The machine's label, if one was configured.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The transition journal. Empty unless the machine was built with a
    /// journal capacity.
    pub fn journal(&self) -> &TransitionJournal {
        &self.journal
    }

    /// A serializable view of the machine's current shape.
    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot {
            label: self.label.clone(),
            current_state: self.current_state_name().map(str::to_owned),
            locked: self.is_locked(),
            in_transition: self.in_transition,
            constraint: self.constraint.map(|kind| kind.name().to_owned()),
            default_state: self.default_state.map(str::to_owned),
            cached_states: self
                .registry
                .names()
                .into_iter()
                .map(str::to_owned)
                .collect(),
        }
    }

    fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or("state machine")
    }

    fn refuse_when_locked(&self) -> bool {
        match self.current {
            Some(id) if self.registry.is_locked(id) => {
                debug!(
                    machine = self.display_label(),
                    state = self.registry.name_of(id).unwrap_or("<unknown>"),
                    "state is locked, unlock it to change state"
                );
                true
            }
            _ => false,
        }
    }

    fn resolve_entry<T: State + Default>(&mut self) -> Result<TypeId, MachineError> {
        let id = TypeId::of::<T>();
        if self.registry.contains(id) {
            return Ok(id);
        }
        let candidate = T::default();
        if let Some(required) = self.constraint {
            if !candidate.kinds().contains(&required) {
                return Err(MachineError::KindConstraint {
                    state: candidate.name(),
                    required,
                });
            }
        }
        debug!(
            machine = self.display_label(),
            state = candidate.name(),
            "caching state instance"
        );
        self.registry.insert(id, Box::new(candidate));
        Ok(id)
    }

    fn resolve_entry_with<T>(&mut self, params: T::Params) -> Result<TypeId, MachineError>
    where
        T: ParameterizedState + Default,
    {
        let id = self.resolve_entry::<T>()?;
        match self.registry.downcast_mut::<T>(id) {
            Some(instance) => instance.write_params(params),
            // only reachable when the target is mid-hook on itself
            None => {
                debug!(
                    machine = self.display_label(),
                    "target instance is checked out, staging parameter write"
                );
                self.registry.stage_write::<T>(id, params);
            }
        }
        Ok(id)
    }

    /// The transition protocol. `next` must already be resolved.
    ///
    /// Ordering: reentrancy and same-state checks, "state will change",
    /// exit and destroy the outgoing instance, swap, enter the incoming
    /// instance, release the guard, record, "state changed". A hook failure
    /// stops the sequence but always releases the guard first.
    fn run_transition(&mut self, next: Option<TypeId>) -> Result<(), MachineError> {
        if next == self.current {
            return Ok(());
        }
        if self.in_transition {
            debug!(
                machine = self.display_label(),
                "transition already running, request dropped"
            );
            return Ok(());
        }
        self.in_transition = true;
        self.emit(Channel::WillChange);

        let from = self.current.and_then(|id| self.registry.name_of(id));
        let to = next.and_then(|id| self.registry.name_of(id));

        if let Some(id) = self.current {
            if let Some(mut instance) = self.registry.checkout(id) {
                match instance.on_exit(self) {
                    Ok(()) => {
                        // destroy on exit: the next activation starts fresh
                        self.registry.remove(id);
                    }
                    Err(source) => {
                        let state = instance.name();
                        self.registry.checkin(id, instance);
                        self.in_transition = false;
                        return Err(MachineError::ExitHook { state, source });
                    }
                }
            }
        }

        self.current = next;

        if let Some(id) = next {
            if let Some(mut instance) = self.registry.checkout(id) {
                let state = instance.name();
                let outcome = instance.on_enter(self);
                self.registry.checkin(id, instance);
                if let Err(source) = outcome {
                    self.in_transition = false;
                    return Err(MachineError::EnterHook { state, source });
                }
            }
        }

        self.in_transition = false;
        self.journal.record(from, to);
        debug!(
            machine = self.display_label(),
            from = from.unwrap_or("<idle>"),
            to = to.unwrap_or("<idle>"),
            "state changed"
        );
        self.emit(Channel::Changed);
        Ok(())
    }

    fn emit(&mut self, channel: Channel) {
        let callbacks = self.observers.snapshot(channel);
        for callback in callbacks {
            (*callback)(self);
        }
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("label", &self.label)
            .field("current", &self.current_state_name())
            .field("locked", &self.is_locked())
            .field("in_transition", &self.in_transition)
            .field("constraint", &self.constraint)
            .field("cached", &self.registry.len())
            .finish()
    }
}
