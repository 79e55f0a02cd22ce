//! Statehouse: a type-driven state machine runtime
//!
//! A [`StateMachine`] holds exactly one active state at a time. States are
//! plain Rust types: the machine constructs them through [`Default`] on
//! first request, caches one instance per type, and destroys the instance
//! when the state is exited. Transitions run a fixed, synchronous protocol
//! with notifications at both edges, a per-state lock can veto outgoing
//! transitions, and states can receive typed parameters written before
//! their enter hook runs.
//!
//! # Core Concepts
//!
//! - **State**: a unit of behavior identified by its concrete type, with
//!   enter/exit hooks and listener wiring via the [`State`] trait
//! - **Locking**: the current state can be locked to block guarded
//!   transitions until it is explicitly unlocked
//! - **Parameters**: states implementing [`ParameterizedState`] receive a
//!   typed payload before entry
//! - **Notifications**: "state will change", "state changed", and "state
//!   unlocked" channels with synchronous, ordered dispatch
//!
//! # Example
//!
//! ```rust
//! use statehouse::{declare_states, HookError, State, StateMachine};
//!
//! declare_states! {
//!     pub struct MainMenu;
//!     pub struct Paused;
//! }
//!
//! #[derive(Default)]
//! struct Playing;
//!
//! impl State for Playing {
//!     fn name(&self) -> &'static str {
//!         "Playing"
//!     }
//!
//!     fn add_listeners(&mut self, owner: &mut StateMachine) -> Result<(), HookError> {
//!         // refuse to leave until the host unlocks us
//!         owner.lock_current_state_with(|machine| {
//!             println!("unlocked while in {:?}", machine.current_state_name());
//!         });
//!         Ok(())
//!     }
//!
//!     fn remove_listeners(&mut self, _owner: &mut StateMachine) -> Result<(), HookError> {
//!         Ok(())
//!     }
//! }
//!
//! let mut machine = StateMachine::builder()
//!     .label("game")
//!     .default_state::<MainMenu>()
//!     .journal_capacity(16)
//!     .build()
//!     .unwrap();
//!
//! machine.on_state_changed(|m| {
//!     println!("-> {}", m.current_state_name().unwrap_or("<idle>"));
//! });
//!
//! machine.change_state::<Playing>().unwrap();
//!
//! // Playing locked itself on entry, so guarded requests bounce off
//! machine.change_state::<Paused>().unwrap();
//! assert!(machine.is_current::<Playing>());
//!
//! machine.unlock_current_state();
//! machine.change_state::<Paused>().unwrap();
//! assert!(machine.is_current::<Paused>());
//! ```

pub mod core;
pub mod error;
pub mod journal;
pub mod runtime;
pub mod snapshot;

mod macros;

// Re-export the public surface
pub use crate::core::{AsAny, ParameterizedState, Params, State, StateKind};
pub use crate::error::{HookError, MachineError};
pub use crate::journal::{JournalEntry, TransitionJournal};
pub use crate::runtime::{MachineBuilder, ObserverId, StateMachine};
pub use crate::snapshot::MachineSnapshot;
