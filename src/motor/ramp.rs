// Acceleration limit for a single wheel
//
// Larger jumps make the rover "jumpy", so every call moves a wheel by at most
// RAMP_STEP. With a 20ms cadence that is ~250 speed units per second.

use crate::config::{MAX_WHEEL_SPEED, RAMP_STEP};

/// Move `current` one acceleration-limited step toward `target`
///
/// Differences within RAMP_STEP are applied directly, larger ones move by
/// exactly RAMP_STEP. The result always lies in [-100, 100].
pub fn ramp_step(current: i8, target: i8) -> i8 {
    let current = current as i16;
    let target = target as i16;
    let delta = target - current;

    let next = if delta.abs() > RAMP_STEP {
        current + RAMP_STEP * delta.signum()
    } else {
        target
    };

    let limit = MAX_WHEEL_SPEED as i16;
    next.clamp(-limit, limit) as i8
}
