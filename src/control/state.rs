// Control states and the transition table
//
//  Stopped ──[motors halted]──▶ AwaitingCommands
//     ▲                              │
//     │                       [input available]
//     │                              ▼
//     │                       ReceivingCommands
//     │                              │
//     │                  [terminator | receive timeout]
//     │                              ▼
//     └────[queue drained]──── RunningProgram
//
//  Any state ──[demo requested]──▶ RunningProgram

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlState {
    #[default]
    Stopped,
    AwaitingCommands,
    ReceivingCommands,
    RunningProgram,
}

/// Something that happened while handling the current state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// All wheels ramped down to zero
    MotorsHalted,
    /// The command source has bytes waiting
    InputAvailable,
    /// `*` received
    Terminator,
    /// No input for the receive timeout
    ReceiveTimeout,
    /// Every queued command has been executed (or the drain was cut short)
    QueueDrained,
    /// The demo path was queued
    DemoRequested,
}

impl ControlState {
    /// Next state after `event`. Events that do not apply leave the state unchanged.
    pub fn next(self, event: Event) -> ControlState {
        use ControlState::*;

        match (self, event) {
            (_, Event::DemoRequested) => RunningProgram,
            (Stopped, Event::MotorsHalted) => AwaitingCommands,
            (AwaitingCommands, Event::InputAvailable) => ReceivingCommands,
            (ReceivingCommands, Event::Terminator) => RunningProgram,
            (ReceivingCommands, Event::ReceiveTimeout) => RunningProgram,
            (RunningProgram, Event::QueueDrained) => Stopped,
            (state, _) => state,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ControlState::Stopped => "Stopped",
            ControlState::AwaitingCommands => "AwaitingCommands",
            ControlState::ReceivingCommands => "ReceivingCommands",
            ControlState::RunningProgram => "RunningProgram",
        }
    }
}

impl std::fmt::Display for ControlState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
