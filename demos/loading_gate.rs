//! Loading Gate
//!
//! This example demonstrates kind constraints and typed parameters.
//!
//! Key concepts:
//! - Restricting a machine to states tagged with a kind
//! - Passing typed parameters into a state before it enters
//! - Inspecting the machine through a serializable snapshot
//!
//! Run with: cargo run --example loading_gate

use statehouse::{
    declare_states, HookError, ParameterizedState, Params, State, StateKind, StateMachine,
};

const SCREEN: StateKind = StateKind::new("screen");

declare_states! {
    pub struct Home: SCREEN;
    pub struct Credits: SCREEN;
    pub struct DebugOverlay;
}

#[derive(Debug, Clone)]
struct LoadRequest {
    level: String,
    checkpoint: u32,
}

/// A screen that streams in a level described by its parameters.
#[derive(Debug, Default)]
struct Loading {
    request: Params<LoadRequest>,
}

impl State for Loading {
    fn name(&self) -> &'static str {
        "Loading"
    }

    fn kinds(&self) -> &'static [StateKind] {
        &[SCREEN]
    }

    fn add_listeners(&mut self, _owner: &mut StateMachine) -> Result<(), HookError> {
        Ok(())
    }

    fn remove_listeners(&mut self, _owner: &mut StateMachine) -> Result<(), HookError> {
        Ok(())
    }

    fn on_enter(&mut self, owner: &mut StateMachine) -> Result<(), HookError> {
        match self.request.take() {
            Some(request) => println!(
                "  [Loading] streaming {} from checkpoint {}",
                request.level, request.checkpoint
            ),
            None => println!("  [Loading] no request, streaming the hub level"),
        }
        self.add_listeners(owner)
    }
}

impl ParameterizedState for Loading {
    type Params = LoadRequest;

    fn write_params(&mut self, params: LoadRequest) {
        self.request.set(params);
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    println!("=== Loading Gate Example ===\n");

    let mut machine = StateMachine::builder()
        .label("screen-flow")
        .constraint(SCREEN)
        .default_state::<Home>()
        .journal_capacity(4)
        .build()
        .unwrap();

    println!("Machine starts in: {:?}\n", machine.current_state_name());

    println!("Requesting a state without the \"screen\" kind:");
    machine.change_state::<DebugOverlay>().unwrap();
    println!("  request refused, still in: {:?}", machine.current_state_name());

    match machine.force_state::<DebugOverlay>() {
        Ok(()) => {}
        Err(error) => println!("  forcing reports: {error}"),
    }

    println!("\nLoading with parameters:");
    machine
        .change_state_with::<Loading>(LoadRequest {
            level: "crystal-caverns".to_owned(),
            checkpoint: 3,
        })
        .unwrap();

    println!("\nRe-entering Loading later starts from a fresh instance:");
    machine.change_state::<Credits>().unwrap();
    machine.change_state::<Loading>().unwrap();

    println!("\nSnapshot:");
    println!("{}", machine.snapshot().to_json().unwrap());

    println!("\n=== Example Complete ===");
}
