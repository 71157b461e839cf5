// Acceleration-limited drive loop for the RoverC base
//
// Owns the commanded wheel speeds and ramps them toward a heading target,
// writing every intermediate step to the motor output.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::kinematics::{MotorSpeeds, wheel_targets};
use super::output::MotorOutput;
use crate::config::RAMP_PERIOD;

/// Drive loop for the four-wheel omni base
pub struct MotorDriveLoop<O> {
    output: O,
    current: MotorSpeeds,
    period: Duration,
}

impl<O: MotorOutput> MotorDriveLoop<O> {
    /// Create a drive loop, assuming the wheels are at rest
    pub fn new(output: O) -> Self {
        Self::with_period(output, RAMP_PERIOD)
    }

    /// Create with a custom ramp step period
    pub fn with_period(output: O, period: Duration) -> Self {
        Self {
            output,
            current: MotorSpeeds::zero(),
            period,
        }
    }

    /// Move in the direction `angle` (degrees) at `speed`
    ///
    /// Returns once every wheel has reached its target. The duration depends
    /// on how far the wheels are from the new target (20ms per 5 speed units).
    pub async fn move_to(&mut self, angle: f64, speed: i32) {
        let target = wheel_targets(angle, speed);
        debug!("Heading {}° at {} -> target {:?}", angle, speed, target);
        self.ramp_to(target).await;
    }

    /// Ramp every wheel down to zero
    pub async fn stop(&mut self) {
        if !self.current.is_zero() {
            info!("Stopping all motors");
        }
        self.ramp_to(MotorSpeeds::zero()).await;
    }

    async fn ramp_to(&mut self, target: MotorSpeeds) {
        let steps = self.current.steps_to(target);

        for _ in 0..steps {
            self.current = self.current.ramp_toward(target);
            if let Err(e) = self.output.write(self.current).await {
                warn!("Motor write failed: {}", e);
            }
            sleep(self.period).await;
        }

        debug_assert_eq!(self.current, target);
        debug!("Reached {:?} in {} steps", self.current, steps);
    }

    /// Currently commanded wheel speeds
    pub fn speeds(&self) -> MotorSpeeds {
        self.current
    }

    pub fn output(&self) -> &O {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motor::output::OutputError;
    use tokio::time::Instant;

    #[derive(Default)]
    struct Recorder {
        frames: Vec<MotorSpeeds>,
    }

    impl MotorOutput for Recorder {
        async fn write(&mut self, speeds: MotorSpeeds) -> Result<(), OutputError> {
            self.frames.push(speeds);
            Ok(())
        }
    }

    struct Failing {
        attempts: usize,
    }

    impl MotorOutput for Failing {
        async fn write(&mut self, _speeds: MotorSpeeds) -> Result<(), OutputError> {
            self.attempts += 1;
            Err(OutputError::Zenoh("link down".to_string()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_move_to_forward() {
        let mut drive = MotorDriveLoop::new(Recorder::default());
        let start = Instant::now();

        drive.move_to(0.0, 50).await;

        assert_eq!(drive.speeds(), MotorSpeeds::new(50, 50, 50, 50));
        let frames = &drive.output().frames;
        assert_eq!(frames.len(), 10);
        assert_eq!(frames[0], MotorSpeeds::new(5, 5, 5, 5));
        assert_eq!(frames[9], MotorSpeeds::new(50, 50, 50, 50));
        // 10 steps of 20ms
        assert_eq!(start.elapsed(), Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_move_to_same_target_is_immediate() {
        let mut drive = MotorDriveLoop::new(Recorder::default());
        drive.move_to(90.0, 50).await;
        let written = drive.output().frames.len();

        let start = Instant::now();
        drive.move_to(90.0, 50).await;
        assert_eq!(drive.output().frames.len(), written);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_ramps_down() {
        let mut drive = MotorDriveLoop::new(Recorder::default());
        drive.move_to(270.0, 50).await;
        assert_eq!(drive.speeds(), MotorSpeeds::new(-50, 50, 50, -50));

        drive.stop().await;
        assert!(drive.speeds().is_zero());

        let frames = &drive.output().frames;
        for pair in frames.windows(2) {
            for (a, b) in pair[0].as_array().iter().zip(pair[1].as_array()) {
                assert!((*a as i16 - b as i16).abs() <= 5);
            }
        }
        assert_eq!(*frames.last().unwrap(), MotorSpeeds::zero());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_at_rest_writes_nothing() {
        let mut drive = MotorDriveLoop::new(Recorder::default());
        drive.stop().await;
        assert!(drive.output().frames.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reversal_takes_bounded_steps() {
        let mut drive = MotorDriveLoop::new(Recorder::default());
        drive.move_to(0.0, 100).await;
        let before = drive.output().frames.len();

        let start = Instant::now();
        drive.move_to(180.0, 100).await;
        assert_eq!(drive.output().frames.len() - before, 40);
        assert_eq!(start.elapsed(), Duration::from_millis(800));
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_failures_absorbed() {
        let mut drive = MotorDriveLoop::new(Failing { attempts: 0 });
        drive.move_to(0.0, 20).await;
        // Ramp still completes, one attempt per step
        assert_eq!(drive.speeds(), MotorSpeeds::new(20, 20, 20, 20));
        assert_eq!(drive.output().attempts, 4);
    }
}
