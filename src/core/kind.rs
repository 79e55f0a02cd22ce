//! Capability markers for state types.
//!
//! A machine can be restricted to accept only states that declare a given
//! [`StateKind`]. Kinds are plain `const`-friendly tags compared by name,
//! so a state type can satisfy several of them at once.

use std::fmt;

/// A named capability a state type can declare through [`State::kinds`].
///
/// [`State::kinds`]: crate::State::kinds
///
/// # Example
///
/// ```
/// use statehouse::StateKind;
///
/// pub const SCREEN: StateKind = StateKind::new("screen");
/// pub const OVERLAY: StateKind = StateKind::new("overlay");
///
/// assert_eq!(SCREEN.name(), "screen");
/// assert_ne!(SCREEN, OVERLAY);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateKind(&'static str);

impl StateKind {
    /// Creates a kind with the given display name.
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// The display name this kind was created with.
    pub const fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAMEPLAY: StateKind = StateKind::new("gameplay");
    const UI: StateKind = StateKind::new("ui");

    #[test]
    fn kinds_compare_by_name() {
        assert_eq!(GAMEPLAY, StateKind::new("gameplay"));
        assert_ne!(GAMEPLAY, UI);
    }

    #[test]
    fn kind_displays_its_name() {
        assert_eq!(GAMEPLAY.to_string(), "gameplay");
        assert_eq!(UI.name(), "ui");
    }

    #[test]
    fn kinds_work_in_const_slices() {
        const ALL: &[StateKind] = &[GAMEPLAY, UI];
        assert!(ALL.contains(&GAMEPLAY));
    }
}
