//! Line oriented command channel of the PDU.
//!
//! One ASCII command per line, the device answers with a single line that may
//! carry a `>` prompt.

use thiserror::Error;

/// Reads the power usage sensor (kWh counter) of line 1.
pub const CMD_USAGE_SHOW: &str = "linesensor 1 9 value show";
/// Resets the energy counter of line 1.
pub const CMD_COUNTER_RESET: &str = "linesensor 1 counter reset";

const PROMPT: char = '>';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineError {
    #[error("command {0:?} is not ASCII")]
    NonAsciiCommand(String),
    #[error("reply is not ASCII")]
    NonAsciiReply,
}

/// Frames `command` as a request line.
pub fn encode_command(command: &str) -> Result<Vec<u8>, LineError> {
    if !command.is_ascii() {
        return Err(LineError::NonAsciiCommand(command.to_string()));
    }
    let mut line: Vec<u8> = Vec::with_capacity(command.len() + 1);
    line.extend_from_slice(command.as_bytes());
    line.push(b'\n');
    Ok(line)
}

/// Turns a reply line into the bare value.
///
/// `line` must already be free of telnet negotiation (see
/// [`crate::telnet::first_line`]). Every prompt character is removed and the
/// result is trimmed.
pub fn decode_reply(line: &[u8]) -> Result<String, LineError> {
    if !line.is_ascii() {
        return Err(LineError::NonAsciiReply);
    }
    let text: String = String::from_utf8_lossy(line).replace(PROMPT, "");
    Ok(text.trim().to_string())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
