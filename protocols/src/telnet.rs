//! Telnet in-band negotiation filter.
//!
//! The PDU command channel is a telnet server. Option negotiation bytes may
//! show up in front of a reply and must not reach the ASCII decoder. We never
//! negotiate, so every sequence is simply dropped.

const IAC: u8 = 0xff;
const SE: u8 = 0xf0;
const SB: u8 = 0xfa;
const WILL: u8 = 0xfb;
const WONT: u8 = 0xfc;
const DO: u8 = 0xfd;
const DONT: u8 = 0xfe;

/// Removes IAC command sequences, keeping escaped `0xff` data bytes.
pub fn strip_iac(data: &[u8]) -> Vec<u8> {
    let mut out: Vec<u8> = Vec::with_capacity(data.len());
    let mut cursor: usize = 0;

    while cursor < data.len() {
        let byte: u8 = data[cursor];
        if byte != IAC {
            out.push(byte);
            cursor += 1;
            continue;
        }

        match data.get(cursor + 1) {
            Some(&IAC) => {
                out.push(IAC);
                cursor += 2;
            }
            Some(&(WILL | WONT | DO | DONT)) => cursor += 3,
            Some(&SB) => cursor = skip_subnegotiation(data, cursor + 2),
            Some(_) => cursor += 2,
            None => cursor += 1,
        }
    }

    out
}

/// Returns the first line of `raw` with negotiation removed, newline
/// included, or `None` while no newline has arrived yet.
///
/// Option bytes may be `0x0a`, so the newline is looked up after filtering.
pub fn first_line(raw: &[u8]) -> Option<Vec<u8>> {
    let mut data: Vec<u8> = strip_iac(raw);
    let end: usize = data.iter().position(|&b| b == b'\n')?;
    data.truncate(end + 1);
    Some(data)
}

/// Returns the index right after the `IAC SE` closing a subnegotiation.
fn skip_subnegotiation(data: &[u8], mut cursor: usize) -> usize {
    while cursor + 1 < data.len() {
        if data[cursor] == IAC && data[cursor + 1] == SE {
            return cursor + 2;
        }
        cursor += 1;
    }
    data.len()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
