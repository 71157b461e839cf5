// Timing, topics, drivetrain limits and command-line options
use std::time::Duration;

use clap::{Parser, ValueEnum};

// Outer state machine runs at most once per second
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

// How often the runtime loop checks the tick gate and the demo trigger
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

// Speed ramp: max change per step and step cadence (~250 units/s)
pub const RAMP_STEP: i16 = 5;
pub const RAMP_PERIOD: Duration = Duration::from_millis(20);

// Wheel speed limit (both directions)
pub const MAX_WHEEL_SPEED: i8 = 100;

// Program execution
pub const EXECUTION_SPEED: i32 = 50;
pub const COMMAND_DWELL: Duration = Duration::from_millis(250);

// Give up waiting for more command bytes after this much silence
pub const RECEIVE_TIMEOUT: Duration = Duration::from_millis(5000);

// Grace period between a demo request and the first motion
pub const DEMO_START_DELAY: Duration = Duration::from_secs(3);

// Accepted command range (degrees)
pub const MIN_ANGLE: i64 = 0;
pub const MAX_ANGLE: i64 = 360;

// Zenoh topics
pub const TOPIC_CMD_TEXT: &str = "roverc/cmd/text"; // raw command bytes
pub const TOPIC_CMD_DEMO: &str = "roverc/cmd/demo"; // demo trigger
pub const TOPIC_RT_MOTORS: &str = "roverc/rt/motors"; // actuation
pub const TOPIC_STATUS: &str = "roverc/state/status"; // state + queue

// Serial links
pub const BT_BAUDRATE: u32 = 115_200;
pub const ROVERC_BAUDRATE: u32 = 115_200;

// I2C address of the RoverC hat, forwarded by the serial bridge
pub const ROVERC_I2C_ADDRESS: u8 = 0x38;

/// What happens when new input arrives while a program is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DrainPolicy {
    /// Run every queued command, ignore input until done
    #[default]
    ToExhaustion,
    /// Abandon the rest of the program when new input is waiting
    InterruptOnInput,
}

/// Tunables used by the control state machine
#[derive(Debug, Clone)]
pub struct ControlConfig {
    pub execution_speed: i32,
    pub command_dwell: Duration,
    pub receive_timeout: Duration,
    pub ramp_period: Duration,
    pub drain: DrainPolicy,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            execution_speed: EXECUTION_SPEED,
            command_dwell: COMMAND_DWELL,
            receive_timeout: RECEIVE_TIMEOUT,
            ramp_period: RAMP_PERIOD,
            drain: DrainPolicy::ToExhaustion,
        }
    }
}

/// Command-line options for the runtime binary
#[derive(Debug, Clone, Parser)]
#[command(name = "roverc-runtime", version, about = "RoverC direction command runtime")]
pub struct Args {
    /// Bluetooth SPP serial device to read commands from (e.g. /dev/rfcomm0).
    /// Without it, commands are read from the zenoh text topic.
    #[arg(long)]
    pub bt_port: Option<String>,

    /// Serial bridge to the RoverC motor board.
    /// Without it, motor speeds are published on zenoh.
    #[arg(long)]
    pub motor_port: Option<String>,

    /// Log motor speeds instead of sending them anywhere
    #[arg(long, conflicts_with = "motor_port")]
    pub simulate: bool,

    /// Wheel speed used when executing a program (-100..=100)
    #[arg(long, default_value_t = EXECUTION_SPEED, allow_negative_numbers = true)]
    pub speed: i32,

    /// Behaviour when new input arrives during a program
    #[arg(long, value_enum, default_value_t = DrainPolicy::ToExhaustion)]
    pub drain: DrainPolicy,

    /// Queue the demo path right after startup
    #[arg(long)]
    pub demo: bool,

    /// Preset command bytes to run instead of a live source, e.g. "0 90 180 270 *"
    #[arg(long, conflicts_with = "bt_port")]
    pub script: Option<String>,
}

impl Args {
    pub fn control_config(&self) -> ControlConfig {
        ControlConfig {
            execution_speed: self.speed.clamp(-(MAX_WHEEL_SPEED as i32), MAX_WHEEL_SPEED as i32),
            drain: self.drain,
            ..ControlConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_control_config() {
        let cfg = ControlConfig::default();
        assert_eq!(cfg.execution_speed, 50);
        assert_eq!(cfg.command_dwell, Duration::from_millis(250));
        assert_eq!(cfg.receive_timeout, Duration::from_millis(5000));
        assert_eq!(cfg.ramp_period, Duration::from_millis(20));
        assert_eq!(cfg.drain, DrainPolicy::ToExhaustion);
    }

    #[test]
    fn test_args_speed_clamped() {
        let args = Args::parse_from(["roverc-runtime", "--speed", "250", "--drain", "interrupt-on-input"]);
        let cfg = args.control_config();
        assert_eq!(cfg.execution_speed, 100);
        assert_eq!(cfg.drain, DrainPolicy::InterruptOnInput);
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["roverc-runtime"]);
        assert!(args.bt_port.is_none());
        assert!(args.motor_port.is_none());
        assert!(!args.simulate);
        assert!(!args.demo);
        assert_eq!(args.speed, EXECUTION_SPEED);
    }
}
