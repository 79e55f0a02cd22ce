//! Menu Flow
//!
//! This example demonstrates a small game UI flow with locking.
//!
//! Key concepts:
//! - States declared as types and resolved on demand
//! - Lifecycle hooks on a hand-written state
//! - Locking the current state against regular requests
//! - One-shot callbacks that run when the state unlocks
//!
//! Run with: cargo run --example menu_flow

use statehouse::{declare_states, HookError, State, StateMachine};

declare_states! {
    pub struct MainMenu;
    pub struct Paused;
}

// A state with hand-written lifecycle hooks.
#[derive(Debug, Default)]
struct Playing;

impl State for Playing {
    fn name(&self) -> &'static str {
        "Playing"
    }

    fn add_listeners(&mut self, _owner: &mut StateMachine) -> Result<(), HookError> {
        Ok(())
    }

    fn remove_listeners(&mut self, _owner: &mut StateMachine) -> Result<(), HookError> {
        Ok(())
    }

    fn on_enter(&mut self, owner: &mut StateMachine) -> Result<(), HookError> {
        println!("  [Playing] session started");
        self.add_listeners(owner)
    }

    fn on_exit(&mut self, owner: &mut StateMachine) -> Result<(), HookError> {
        println!("  [Playing] session ended");
        self.remove_listeners(owner)
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    println!("=== Menu Flow Example ===\n");

    let mut machine = StateMachine::builder()
        .label("game-ui")
        .default_state::<MainMenu>()
        .journal_capacity(8)
        .build()
        .unwrap();

    machine.on_state_changed(|m| {
        println!("  now showing: {}", m.current_state_name().unwrap_or("<idle>"));
    });

    println!("Machine starts in: {:?}\n", machine.current_state_name());

    println!("Starting a session:");
    machine.change_state::<Playing>().unwrap();

    // Lock the session and queue a callback for when it unlocks.
    machine.lock_current_state_with(|m| {
        println!("  unlock callback: heading to the pause menu");
        let _ = m.change_state::<Paused>();
    });

    println!("\nWhile locked, regular requests are refused:");
    machine.change_state::<MainMenu>().unwrap();
    println!("  still in: {:?}", machine.current_state_name());

    println!("\nUnlocking runs the queued callback:");
    machine.unlock_current_state();
    println!("  now in: {:?}", machine.current_state_name());

    println!("\nBack to the menu:");
    machine.change_state::<MainMenu>().unwrap();

    println!("\nTransition journal:");
    for entry in machine.journal().entries() {
        println!(
            "  {} -> {}",
            entry.from.as_deref().unwrap_or("<idle>"),
            entry.to.as_deref().unwrap_or("<idle>"),
        );
    }

    println!("\n=== Example Complete ===");
}
