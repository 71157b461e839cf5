// Command intake for the RoverC runtime
//
// Provides:
// - FIFO command queue
// - Byte-wise token parser ("90 180 *")
// - Command sources (Bluetooth serial, zenoh topic, preset script)
// - Built-in demo path

pub mod demo;
pub mod parser;
pub mod queue;
pub mod source;

pub use demo::demo_path;
pub use parser::{Feed, TokenParser, parse_command};
pub use queue::CommandQueue;
pub use source::{CommandInput, CommandSource, ScriptSource, SerialCommandSource, ZenohCommandSource};
