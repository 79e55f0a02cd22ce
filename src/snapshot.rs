//! Serializable point-in-time view of a machine.
//!
//! A snapshot captures everything about a machine that serializes cleanly:
//! its label, where it is, whether it is locked, and which state types are
//! cached. It does not capture live state instances, observers, or pending
//! unlock callbacks (not serializable), so it is a diagnostic view rather
//! than a restore point.

use serde::{Deserialize, Serialize};

/// What [`StateMachine::snapshot`](crate::StateMachine::snapshot) returns.
///
/// # Example
///
/// ```
/// use statehouse::{declare_states, StateMachine};
///
/// declare_states! {
///     pub struct Menu;
/// }
///
/// let mut machine = StateMachine::builder()
///     .label("frontend")
///     .default_state::<Menu>()
///     .build()
///     .unwrap();
/// machine.lock_current_state();
///
/// let snapshot = machine.snapshot();
/// assert_eq!(snapshot.label.as_deref(), Some("frontend"));
/// assert_eq!(snapshot.current_state.as_deref(), Some("Menu"));
/// assert!(snapshot.locked);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineSnapshot {
    /// The machine's label, if one was configured.
    pub label: Option<String>,
    /// Name of the current state, or `None` when idle.
    pub current_state: Option<String>,
    /// Whether the current state is locked.
    pub locked: bool,
    /// Whether a transition was running when the snapshot was taken. Only
    /// observable from inside hooks and "state will change" callbacks.
    pub in_transition: bool,
    /// Name of the kind constraint, if the machine has one.
    pub constraint: Option<String>,
    /// Name of the configured default state, if any.
    pub default_state: Option<String>,
    /// Names of all cached state types, sorted.
    pub cached_states: Vec<String>,
}

impl MachineSnapshot {
    /// Serializes the snapshot as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Reads a snapshot back from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MachineSnapshot {
        MachineSnapshot {
            label: Some("frontend".to_owned()),
            current_state: Some("Playing".to_owned()),
            locked: true,
            in_transition: false,
            constraint: Some("screen".to_owned()),
            default_state: Some("Menu".to_owned()),
            cached_states: vec!["Menu".to_owned(), "Playing".to_owned()],
        }
    }

    #[test]
    fn json_round_trip_preserves_every_field() {
        let snapshot = sample();
        let json = snapshot.to_json().unwrap();
        let restored = MachineSnapshot::from_json(&json).unwrap();
        assert_eq!(restored, snapshot);
    }

    #[test]
    fn json_uses_readable_field_names() {
        let json = sample().to_json().unwrap();
        assert!(json.contains("\"current_state\""));
        assert!(json.contains("\"cached_states\""));
        assert!(json.contains("\"locked\": true"));
    }
}
