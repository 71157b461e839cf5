// Define message types published by the runtime

use serde::{Deserialize, Serialize};

use crate::control::ControlState;
use crate::motor::MotorSpeeds;

/// Status published by runtime -> displays/dashboards
/// Carries what a status display needs: state, pending program, wheel speeds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeStatus {
    pub state: ControlState,
    pub queued: Vec<i32>,
    pub motors: MotorSpeeds,
}
