//! The machine runtime: transition protocol, instance registry, observer
//! channels, and fluent construction.

mod builder;
mod machine;
mod observers;
mod registry;

pub use builder::MachineBuilder;
pub use machine::StateMachine;
pub use observers::ObserverId;
