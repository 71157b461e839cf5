// RoverC serial bridge
//
// The RoverC hat listens on I2C (address 0x38) and takes the four motor speeds
// as signed bytes starting at register 0x00. A host without I2C talks to it
// through a USB-serial bridge; every speed update is one fixed-size frame that
// the bridge replays as a single I2C write:
//
//   0xFF 0xFF | addr | len=6 | reg=0x00 | m1 m2 m3 m4 | sum
//
// `sum` is the inverted low byte of addr..m4. Nothing is sent back.

use std::io::Write;
use std::time::Duration;

use serialport::SerialPort;
use tracing::debug;

use super::kinematics::MotorSpeeds;
use crate::config::{ROVERC_BAUDRATE, ROVERC_I2C_ADDRESS};

/// Bytes in a speed frame
pub const FRAME_LEN: usize = 10;

const SYNC: u8 = 0xFF;

/// First speed register (M1); M2..M4 follow
const REG_MOTOR_SPEED: u8 = 0x00;

/// Bytes counted by the length field: register, four speeds, sum
const PAYLOAD_LEN: u8 = 6;

const WRITE_TIMEOUT: Duration = Duration::from_millis(100);

#[derive(Debug, thiserror::Error)]
pub enum RovercError {
    #[error("Cannot open RoverC bridge: {0}")]
    Serial(#[from] serialport::Error),

    #[error("RoverC bridge write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Inverted low byte of the sum of `bytes`
fn frame_sum(bytes: &[u8]) -> u8 {
    !bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// Encode the four wheel speeds for the hat at `address`
pub fn encode_speeds(address: u8, speeds: MotorSpeeds) -> [u8; FRAME_LEN] {
    let [m1, m2, m3, m4] = speeds.as_array().map(|s| s as u8);
    let mut frame = [
        SYNC,
        SYNC,
        address,
        PAYLOAD_LEN,
        REG_MOTOR_SPEED,
        m1,
        m2,
        m3,
        m4,
        0,
    ];
    frame[FRAME_LEN - 1] = frame_sum(&frame[2..FRAME_LEN - 1]);
    frame
}

/// True if `frame` has the sync bytes and a matching sum
pub fn frame_is_valid(frame: &[u8; FRAME_LEN]) -> bool {
    frame[..2] == [SYNC, SYNC] && frame[FRAME_LEN - 1] == frame_sum(&frame[2..FRAME_LEN - 1])
}

/// Write-only link to the RoverC hat
pub struct RovercBus {
    port: Box<dyn SerialPort>,
    address: u8,
}

impl RovercBus {
    pub fn open(port_name: &str) -> Result<Self, RovercError> {
        let port = serialport::new(port_name, ROVERC_BAUDRATE)
            .timeout(WRITE_TIMEOUT)
            .open()?;
        Ok(Self {
            port,
            address: ROVERC_I2C_ADDRESS,
        })
    }

    /// Push one speed update to the hat
    pub fn write_speeds(&mut self, speeds: MotorSpeeds) -> Result<(), RovercError> {
        let frame = encode_speeds(self.address, speeds);
        debug!("RoverC frame: {:02X?}", frame);
        self.port.write_all(&frame)?;
        self.port.flush()?;
        Ok(())
    }
}
