//! # Discovered PDU
//!
//! A [`DeviceRecord`] is built from one GBL discovery reply and lives for a
//! single discovery pass. Nothing is cached between invocations.

use std::fmt;
use std::net::Ipv4Addr;

use pnet::util::MacAddr;

/// GBL protocol version spoken by supported devices.
pub const GBL_VERSION: u8 = 4;
/// GBL command code of a discovery ("search") exchange.
pub const GBL_CMD_SEARCH: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceRecord {
    pub version: u8,
    pub command: u8,
    /// Rendered as lowercase, colon separated hex pairs.
    pub mac: MacAddr,
    pub bootloader: u8,
    pub ip: Ipv4Addr,
}

impl DeviceRecord {
    /// Only version 4 search replies describe a device we can talk to.
    pub fn is_valid(&self) -> bool {
        self.version == GBL_VERSION && self.command == GBL_CMD_SEARCH
    }

    pub fn in_bootloader(&self) -> bool {
        self.bootloader != 0
    }
}

impl fmt::Display for DeviceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.ip, self.mac)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
