// Byte-wise parser for the direction command stream
//
// Grammar: digits form an angle token, a space ends a token, `*` ends the
// last token (if any) and starts the program. Anything else is ignored, so
// terminal line endings or a stray '-' do no harm. A space with no digits
// before it queues heading 0.
//
//   "0 90 180*"  -> 0, 90, 180, start
//   "90  180*"   -> 90, 0, 180, start

use tracing::debug;

use crate::config::{MAX_ANGLE, MIN_ANGLE};

pub const DELIMITER: u8 = b' ';
pub const TERMINATOR: u8 = b'*';

/// Result of feeding one byte
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Feed {
    /// A complete, in-range command
    pub command: Option<i32>,
    /// The terminator was seen
    pub start: bool,
}

/// Accumulates digits until a delimiter or the terminator
#[derive(Debug, Default)]
pub struct TokenParser {
    token: String,
}

impl TokenParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop any partial token
    pub fn reset(&mut self) {
        self.token.clear();
    }

    /// Digits received since the last delimiter
    pub fn pending(&self) -> &str {
        &self.token
    }

    pub fn feed(&mut self, byte: u8) -> Feed {
        let mut feed = Feed::default();

        if byte.is_ascii_digit() {
            self.token.push(byte as char);
        }

        if byte == DELIMITER && self.token.is_empty() {
            // A delimiter with no digits reads as heading 0
            feed.command = Some(0);
        } else if byte == DELIMITER || (byte == TERMINATOR && !self.token.is_empty()) {
            feed.command = parse_command(&self.token);
            self.token.clear();
        }

        if byte == TERMINATOR {
            feed.start = true;
        }

        feed
    }
}

/// Parse a digit token into a command, `None` if empty or out of range
pub fn parse_command(token: &str) -> Option<i32> {
    match token.parse::<i64>() {
        Ok(value) if (MIN_ANGLE..=MAX_ANGLE).contains(&value) => Some(value as i32),
        Ok(value) => {
            debug!("Dropping out-of-range command {}", value);
            None
        }
        Err(_) => {
            if !token.is_empty() {
                debug!("Dropping malformed command {:?}", token);
            }
            None
        }
    }
}
