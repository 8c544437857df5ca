//! # GBL discovery framing
//!
//! Gude devices answer a fixed UDP broadcast probe on port 50123 with a reply
//! whose fields sit at fixed offsets:
//!
//! | offset | len | field            |
//! |--------|-----|------------------|
//! | 0      | 3   | `"GBL"`          |
//! | 3      | 1   | protocol version |
//! | 4      | 1   | command code     |
//! | 5      | 6   | MAC address      |
//! | 17     | 1   | bootloader flag  |
//! | 18     | 4   | IPv4 address     |

use std::net::Ipv4Addr;

use pnet::util::MacAddr;
use thiserror::Error;

use pductl_common::network::device::{DeviceRecord, GBL_CMD_SEARCH, GBL_VERSION};

pub const GBL_PORT: u16 = 50123;

/// `"GBL"`, version 4, command 1 (search) and a trailing checksum byte.
pub const SEARCH_PROBE: [u8; 6] = [0x47, 0x42, 0x4c, GBL_VERSION, GBL_CMD_SEARCH, 0x4c];

pub const MIN_REPLY_LEN: usize = 22;

const VERSION_OFFSET: usize = 3;
const COMMAND_OFFSET: usize = 4;
const MAC_OFFSET: usize = 5;
const BOOTLOADER_OFFSET: usize = 17;
const IP_OFFSET: usize = 18;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GblError {
    #[error("reply too short: {len} bytes, need at least {MIN_REPLY_LEN}")]
    TooShort { len: usize },
    #[error("not a version 4 search reply (version {version}, command {command})")]
    NotASearchReply { version: u8, command: u8 },
}

/// Decodes a discovery reply into a [`DeviceRecord`].
///
/// Only version 4 search replies are accepted. Anything else on the port is
/// reported as an error so the caller can drop it.
pub fn parse_reply(data: &[u8]) -> Result<DeviceRecord, GblError> {
    if data.len() < MIN_REPLY_LEN {
        return Err(GblError::TooShort { len: data.len() });
    }

    let m: &[u8] = &data[MAC_OFFSET..MAC_OFFSET + 6];
    let ip: &[u8] = &data[IP_OFFSET..IP_OFFSET + 4];

    let record: DeviceRecord = DeviceRecord {
        version: data[VERSION_OFFSET],
        command: data[COMMAND_OFFSET],
        mac: MacAddr::new(m[0], m[1], m[2], m[3], m[4], m[5]),
        bootloader: data[BOOTLOADER_OFFSET],
        ip: Ipv4Addr::new(ip[0], ip[1], ip[2], ip[3]),
    };

    if !record.is_valid() {
        return Err(GblError::NotASearchReply {
            version: record.version,
            command: record.command,
        });
    }
    Ok(record)
}

/// Builds a search reply the way a device lays it out.
///
/// Used by tests and fake devices, the padding bytes between the MAC and the
/// bootloader flag are left zeroed.
pub fn encode_reply(record: &DeviceRecord) -> Vec<u8> {
    let mut buffer: Vec<u8> = vec![0u8; MIN_REPLY_LEN];
    buffer[..3].copy_from_slice(b"GBL");
    buffer[VERSION_OFFSET] = record.version;
    buffer[COMMAND_OFFSET] = record.command;
    buffer[MAC_OFFSET..MAC_OFFSET + 6].copy_from_slice(&record.mac.octets());
    buffer[BOOTLOADER_OFFSET] = record.bootloader;
    buffer[IP_OFFSET..IP_OFFSET + 4].copy_from_slice(&record.ip.octets());
    buffer
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
