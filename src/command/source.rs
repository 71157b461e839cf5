// Command byte sources
//
// The state machine polls a `CommandSource` for ASCII command bytes. Whether
// they come from a Bluetooth serial link, a zenoh topic or a preset script
// makes no difference to the parser.

use std::collections::VecDeque;
use std::io::Read;
use std::time::Duration;

use serialport::SerialPort;
use tracing::{info, warn};
use zenoh::handlers::FifoChannelHandler;
use zenoh::pubsub::Subscriber;
use zenoh::sample::Sample;

use crate::config::BT_BAUDRATE;

/// Non-blocking byte stream of commands
pub trait CommandSource {
    /// True if at least one byte can be read right now
    fn available(&mut self) -> bool;

    /// Next byte, `None` if nothing is waiting
    fn read_byte(&mut self) -> Option<u8>;
}

/// In-memory bytes, for preset programs and tests
#[derive(Debug, Default, Clone)]
pub struct ScriptSource {
    bytes: VecDeque<u8>,
}

impl ScriptSource {
    pub fn new(bytes: impl AsRef<[u8]>) -> Self {
        Self {
            bytes: bytes.as_ref().iter().copied().collect(),
        }
    }

    /// Make more bytes available
    pub fn push(&mut self, bytes: impl AsRef<[u8]>) {
        self.bytes.extend(bytes.as_ref());
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len()
    }
}

impl CommandSource for ScriptSource {
    fn available(&mut self) -> bool {
        !self.bytes.is_empty()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.bytes.pop_front()
    }
}

/// Bluetooth SPP link exposed as a serial device (e.g. /dev/rfcomm0)
pub struct SerialCommandSource {
    port: Box<dyn SerialPort>,
}

impl SerialCommandSource {
    pub fn open(port_name: &str) -> Result<Self, serialport::Error> {
        info!("Opening command link on {}", port_name);
        let port = serialport::new(port_name, BT_BAUDRATE)
            .timeout(Duration::from_millis(10))
            .open()?;
        Ok(Self { port })
    }
}

impl CommandSource for SerialCommandSource {
    fn available(&mut self) -> bool {
        match self.port.bytes_to_read() {
            Ok(n) => n > 0,
            Err(e) => {
                warn!("Command link unavailable: {}", e);
                false
            }
        }
    }

    fn read_byte(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        match self.port.read(&mut byte) {
            Ok(1) => Some(byte[0]),
            Ok(_) => None,
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => None,
            Err(e) => {
                warn!("Command link read failed: {}", e);
                None
            }
        }
    }
}

/// Command bytes published on a zenoh topic
pub struct ZenohCommandSource {
    subscriber: Subscriber<FifoChannelHandler<Sample>>,
    pending: VecDeque<u8>,
}

impl ZenohCommandSource {
    pub fn new(subscriber: Subscriber<FifoChannelHandler<Sample>>) -> Self {
        Self {
            subscriber,
            pending: VecDeque::new(),
        }
    }

    /// Move every received sample into the byte buffer (non-blocking)
    fn fill(&mut self) {
        while let Ok(Some(sample)) = self.subscriber.try_recv() {
            let payload = sample.payload().to_bytes();
            self.pending.extend(payload.iter());
        }
    }
}

impl CommandSource for ZenohCommandSource {
    fn available(&mut self) -> bool {
        if self.pending.is_empty() {
            self.fill();
        }
        !self.pending.is_empty()
    }

    fn read_byte(&mut self) -> Option<u8> {
        if self.pending.is_empty() {
            self.fill();
        }
        self.pending.pop_front()
    }
}

/// Source selected at startup
pub enum CommandInput {
    Serial(SerialCommandSource),
    Zenoh(ZenohCommandSource),
    Script(ScriptSource),
}

impl CommandSource for CommandInput {
    fn available(&mut self) -> bool {
        match self {
            CommandInput::Serial(src) => src.available(),
            CommandInput::Zenoh(src) => src.available(),
            CommandInput::Script(src) => src.available(),
        }
    }

    fn read_byte(&mut self) -> Option<u8> {
        match self {
            CommandInput::Serial(src) => src.read_byte(),
            CommandInput::Zenoh(src) => src.read_byte(),
            CommandInput::Script(src) => src.read_byte(),
        }
    }
}
