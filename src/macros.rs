//! Declaration helper for simple states.

/// Declares unit states with empty listener hooks.
///
/// Each declaration produces a `Default` unit struct implementing
/// [`State`](crate::State), named after itself. An optional list of
/// [`StateKind`](crate::StateKind) constants after a colon becomes the
/// state's [`kinds`](crate::State::kinds). Good for menu screens, phases,
/// and test fixtures; states with real wiring implement the trait by hand.
///
/// # Example
///
/// ```
/// use statehouse::{declare_states, StateKind, StateMachine};
///
/// const SCREEN: StateKind = StateKind::new("screen");
///
/// declare_states! {
///     pub struct Title;
///     pub struct Settings: SCREEN;
/// }
///
/// let mut machine = StateMachine::new();
/// machine.change_state::<Title>().unwrap();
/// assert_eq!(machine.current_state_name(), Some("Title"));
/// ```
#[macro_export]
macro_rules! declare_states {
    ($($(#[$meta:meta])* $vis:vis struct $name:ident $(: $($kind:expr),+)? ;)+) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Default)]
            $vis struct $name;

            impl $crate::State for $name {
                fn name(&self) -> &'static str {
                    stringify!($name)
                }

                fn kinds(&self) -> &'static [$crate::StateKind] {
                    &[$($($kind),+)?]
                }

                fn add_listeners(
                    &mut self,
                    _owner: &mut $crate::StateMachine,
                ) -> Result<(), $crate::HookError> {
                    Ok(())
                }

                fn remove_listeners(
                    &mut self,
                    _owner: &mut $crate::StateMachine,
                ) -> Result<(), $crate::HookError> {
                    Ok(())
                }
            }
        )+
    };
}
