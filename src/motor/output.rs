// Motor output sinks
//
// The drive loop writes every ramp step through `MotorOutput`. Writes are
// fire-and-forget: errors are reported back but the drive loop only logs them.

use tracing::info;
use zenoh::pubsub::Publisher;

use super::kinematics::MotorSpeeds;
use super::roverc::{RovercBus, RovercError};

/// Error types for motor output sinks
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("RoverC bridge error: {0}")]
    Bus(#[from] RovercError),

    #[error("Failed to encode motor speeds: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Zenoh publish failed: {0}")]
    Zenoh(String),
}

/// Destination for commanded wheel speeds
#[allow(async_fn_in_trait)]
pub trait MotorOutput {
    /// Send one full speed vector to the drivetrain
    async fn write(&mut self, speeds: MotorSpeeds) -> Result<(), OutputError>;
}

/// Writes speeds to the RoverC board through the serial bridge
pub struct RovercOutput {
    bus: RovercBus,
}

impl RovercOutput {
    pub fn new(bus: RovercBus) -> Self {
        Self { bus }
    }
}

impl MotorOutput for RovercOutput {
    async fn write(&mut self, speeds: MotorSpeeds) -> Result<(), OutputError> {
        self.bus.write_speeds(speeds)?;
        Ok(())
    }
}

/// Publishes speeds as JSON on a zenoh topic
pub struct ZenohOutput {
    publisher: Publisher<'static>,
}

impl ZenohOutput {
    pub fn new(publisher: Publisher<'static>) -> Self {
        Self { publisher }
    }
}

impl MotorOutput for ZenohOutput {
    async fn write(&mut self, speeds: MotorSpeeds) -> Result<(), OutputError> {
        let json = serde_json::to_string(&speeds)?;
        self.publisher
            .put(json)
            .await
            .map_err(|e| OutputError::Zenoh(e.to_string()))
    }
}

/// Logs speed changes, nothing is sent to hardware
#[derive(Debug, Default)]
pub struct SimulatedOutput {
    last: MotorSpeeds,
    frames: usize,
}

impl SimulatedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last vector written
    pub fn last(&self) -> MotorSpeeds {
        self.last
    }

    /// Number of vectors written so far
    pub fn frames(&self) -> usize {
        self.frames
    }
}

impl MotorOutput for SimulatedOutput {
    async fn write(&mut self, speeds: MotorSpeeds) -> Result<(), OutputError> {
        self.frames += 1;
        self.last = speeds;
        info!(
            "[sim] M1={:4} M2={:4} M3={:4} M4={:4}",
            speeds.m1, speeds.m2, speeds.m3, speeds.m4
        );
        Ok(())
    }
}

/// Output selected at startup
pub enum MotorSink {
    Roverc(RovercOutput),
    Zenoh(ZenohOutput),
    Simulated(SimulatedOutput),
}

impl MotorOutput for MotorSink {
    async fn write(&mut self, speeds: MotorSpeeds) -> Result<(), OutputError> {
        match self {
            MotorSink::Roverc(out) => out.write(speeds).await,
            MotorSink::Zenoh(out) => out.write(speeds).await,
            MotorSink::Simulated(out) => out.write(speeds).await,
        }
    }
}
