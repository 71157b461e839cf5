// Mecanum/omni inverse kinematics for the RoverC 4-wheel base
// Converts a heading (degrees) and a speed into per-wheel speed targets.
//
// Motor layout (top view, M5 display facing back):
//   1 ------ 2
//     |    |
//     | M5 |
//   3 ------ 4

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::ramp::ramp_step;
use crate::config::{MAX_WHEEL_SPEED, RAMP_STEP};

/// Commanded speeds for the four wheels, each in [-100, 100]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotorSpeeds {
    pub m1: i8, // front left
    pub m2: i8, // front right
    pub m3: i8, // rear left
    pub m4: i8, // rear right
}

impl MotorSpeeds {
    pub fn new(m1: i8, m2: i8, m3: i8, m4: i8) -> Self {
        Self { m1, m2, m3, m4 }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Returns speeds as array [m1, m2, m3, m4]
    pub fn as_array(&self) -> [i8; 4] {
        [self.m1, self.m2, self.m3, self.m4]
    }

    pub fn from_array(speeds: [i8; 4]) -> Self {
        Self::new(speeds[0], speeds[1], speeds[2], speeds[3])
    }

    pub fn is_zero(&self) -> bool {
        self.as_array().iter().all(|&s| s == 0)
    }

    /// One acceleration-limited step of every wheel toward `target`
    pub fn ramp_toward(&self, target: MotorSpeeds) -> MotorSpeeds {
        let current = self.as_array();
        let target = target.as_array();
        MotorSpeeds::from_array(std::array::from_fn(|i| ramp_step(current[i], target[i])))
    }

    /// Number of ramp steps needed to reach `target` (slowest wheel wins)
    pub fn steps_to(&self, target: MotorSpeeds) -> usize {
        self.as_array()
            .iter()
            .zip(target.as_array())
            .map(|(&c, t)| (t as i16 - c as i16).unsigned_abs().div_ceil(RAMP_STEP as u16) as usize)
            .max()
            .unwrap_or(0)
    }

    /// True if every wheel is inside the [-100, 100] envelope
    pub fn in_range(&self) -> bool {
        self.as_array()
            .iter()
            .all(|s| (-MAX_WHEEL_SPEED..=MAX_WHEEL_SPEED).contains(s))
    }
}

/// Round to the nearest wheel speed and saturate to the wheel envelope
fn to_wheel_speed(value: f64) -> i8 {
    let limit = MAX_WHEEL_SPEED as f64;
    value.round().clamp(-limit, limit) as i8
}

/// Convert a heading and speed to wheel targets
///
/// # Arguments
/// * `angle` - Heading in degrees: 0 = forward, 90 = right, 180 = backward, 270 = left
/// * `speed` - Travel speed, clamped to [-100, 100] (negative reverses the heading)
///
/// # Returns
/// Target speed for each wheel. Wheels 1 and 4 share the `vy + vx` term,
/// wheels 2 and 3 the `vy - vx` term. Diagonals at full speed saturate at 100.
pub fn wheel_targets(angle: f64, speed: i32) -> MotorSpeeds {
    let limit = MAX_WHEEL_SPEED as i32;
    let speed = speed.clamp(-limit, limit) as f64;

    let angle_rad = angle * PI / 180.0;
    let vx = angle_rad.sin() * speed;
    let vy = angle_rad.cos() * speed;

    let diag_a = to_wheel_speed(vy + vx);
    let diag_b = to_wheel_speed(vy - vx);

    MotorSpeeds {
        m1: diag_a,
        m2: diag_b,
        m3: diag_b,
        m4: diag_a,
    }
}
