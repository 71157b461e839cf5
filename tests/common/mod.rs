//! Shared test doubles for the scenario and property tests.

use roverc_runtime::motor::{MotorOutput, MotorSpeeds, OutputError};

/// Records every vector the drive loop writes
#[derive(Debug, Default)]
pub struct RecordingOutput {
    pub frames: Vec<MotorSpeeds>,
}

#[allow(dead_code)]
impl RecordingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Largest per-wheel change between two consecutive frames (starting from rest)
    pub fn max_step(&self) -> i16 {
        std::iter::once(MotorSpeeds::zero())
            .chain(self.frames.iter().copied())
            .collect::<Vec<_>>()
            .windows(2)
            .flat_map(|w| {
                w[0].as_array()
                    .into_iter()
                    .zip(w[1].as_array())
                    .map(|(a, b)| (a as i16 - b as i16).abs())
            })
            .max()
            .unwrap_or(0)
    }
}

impl MotorOutput for RecordingOutput {
    async fn write(&mut self, speeds: MotorSpeeds) -> Result<(), OutputError> {
        self.frames.push(speeds);
        Ok(())
    }
}
