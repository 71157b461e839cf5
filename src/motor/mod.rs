// Motor control module for the RoverC omni base
//
// Provides:
// - Heading/speed inverse kinematics (angle -> wheel targets)
// - Per-wheel acceleration limiting
// - Acceleration-limited drive loop
// - Output sinks (RoverC serial bridge, zenoh, simulation)

mod driver;
pub mod kinematics;
pub mod output;
pub mod ramp;
pub mod roverc;

pub use driver::MotorDriveLoop;
pub use kinematics::{MotorSpeeds, wheel_targets};
pub use output::{MotorOutput, MotorSink, OutputError, RovercOutput, SimulatedOutput, ZenohOutput};
pub use ramp::ramp_step;
pub use roverc::{RovercBus, RovercError};
