//! Core state machine contracts.
//!
//! This module defines what a state is, independent of the runtime that
//! drives it:
//! - The `State` trait and its lifecycle hooks
//! - Capability markers via `StateKind`
//! - Typed transition parameters via `ParameterizedState` and `Params`

mod kind;
mod params;
mod state;

pub use kind::StateKind;
pub use params::{ParameterizedState, Params};
pub use state::{AsAny, State};
