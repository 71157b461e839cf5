// Control sequencing for the RoverC runtime
//
// Provides:
// - Control states with a pure transition function
// - The state machine driving intake, execution and stop phases
// - The 1 Hz tick gate

mod machine;
pub mod state;

pub use machine::{ControlStateMachine, TickGate};
pub use state::{ControlState, Event};
