//! # PDU Discovery
//!
//! Finds Gude PDUs on the local segment with the GBL search broadcast.
//!
//! A [`PduScanner`] owns one UDP socket. [`PduScanner::search`] consumes the
//! scanner, so the socket is closed as soon as the pass is over, whichever
//! way it ends.

use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::{Duration, Instant};

use pnet::datalink::NetworkInterface;
use socket2::Socket;
use thiserror::Error;
use tokio::net::UdpSocket;
use tokio::time::timeout;
use tracing::{debug, trace};

use pductl_common::network::device::DeviceRecord;
use pductl_common::network::interface::{self, InterfaceError, NetworkInterfaceExtension};
use pductl_common::{success, warn};
use pductl_protocols::gbl;

use crate::network::socket;

/// Upper bound for a single receive, the deadline is re-checked after each.
pub const RECV_TIMEOUT: Duration = Duration::from_secs(1);
const RECV_BUFFER_LEN: usize = 1024;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("failed to set up discovery socket: {0}")]
    Socket(io::Error),
    #[error("failed to send search probe to {target}: {source}")]
    Send {
        target: SocketAddr,
        #[source]
        source: io::Error,
    },
}

pub struct PduScanner {
    socket: Socket,
    target: SocketAddr,
    bound_to_interface: bool,
}

impl PduScanner {
    /// Opens the broadcast socket and tries to tie it to `interface`.
    ///
    /// Failing to bind to the interface only degrades the scanner, the probe
    /// then leaves through whatever interface the routing table picks.
    pub fn new(interface: &str) -> Result<Self, DiscoveryError> {
        let socket: Socket = socket::broadcast_socket().map_err(DiscoveryError::Socket)?;

        let known: Result<NetworkInterface, InterfaceError> = interface::find_by_name(interface);

        let bound_to_interface: bool = match socket::bind_to_interface(&socket, interface) {
            Ok(()) => true,
            Err(e) => {
                warn!("{}", bind_warning(interface, &e, known.as_ref().err()));
                false
            }
        };

        if let Ok(found) = &known {
            log_interface(found);
        }

        socket::bind_ephemeral(&socket).map_err(DiscoveryError::Socket)?;

        Ok(Self {
            socket,
            target: SocketAddr::from((Ipv4Addr::BROADCAST, gbl::GBL_PORT)),
            bound_to_interface,
        })
    }

    /// Sends the probe to `target` instead of `255.255.255.255:50123`.
    pub fn with_target(mut self, target: SocketAddr) -> Self {
        self.target = target;
        self
    }

    pub fn is_bound_to_interface(&self) -> bool {
        self.bound_to_interface
    }

    /// Broadcasts one search probe and collects replies.
    ///
    /// Returns as soon as `expected` devices answered, or once `max_wait` has
    /// passed since the probe went out. The result may be empty.
    pub async fn search(
        self,
        max_wait: Duration,
        expected: Option<usize>,
    ) -> Result<Vec<DeviceRecord>, DiscoveryError> {
        let target: SocketAddr = self.target;
        let socket: UdpSocket = UdpSocket::from_std(self.socket.into()).map_err(DiscoveryError::Socket)?;

        socket
            .send_to(&gbl::SEARCH_PROBE, target)
            .await
            .map_err(|source| DiscoveryError::Send { target, source })?;
        debug!("Search probe sent to {target}");

        let started: Instant = Instant::now();
        let mut devices: Vec<DeviceRecord> = Vec::new();
        let mut buffer = [0u8; RECV_BUFFER_LEN];

        loop {
            if expected.is_some_and(|count| devices.len() >= count) {
                break;
            }

            let elapsed: Duration = started.elapsed();
            if elapsed >= max_wait {
                break;
            }
            let wait: Duration = RECV_TIMEOUT.min(max_wait - elapsed);

            match timeout(wait, socket.recv_from(&mut buffer)).await {
                Ok(Ok((len, source))) => {
                    if let Some(device) = accept_reply(&buffer[..len], source) {
                        devices.push(device);
                    }
                }
                Ok(Err(e)) => debug!("Ignoring receive error: {e}"),
                Err(_elapsed) => {}
            }
        }

        Ok(devices)
    }
}

fn accept_reply(data: &[u8], source: SocketAddr) -> Option<DeviceRecord> {
    match gbl::parse_reply(data) {
        Ok(device) => {
            success!("Found PDU at {device}");
            Some(device)
        }
        Err(e) => {
            trace!("Ignoring datagram from {source}: {e}");
            None
        }
    }
}

/// One line for a failed bind. An unknown interface is the likelier cause, so
/// it wins over the raw socket error.
fn bind_warning(interface: &str, bind_err: &io::Error, lookup: Option<&InterfaceError>) -> String {
    match lookup {
        Some(InterfaceError::NotFound { available, .. }) => format!(
            "Unable to bind to interface {interface}: not found (available: {})",
            available.join(", ")
        ),
        None => format!("Unable to bind to interface {interface}: {bind_err}"),
    }
}

fn log_interface(found: &NetworkInterface) {
    let nets: Vec<String> = found
        .get_ipv4_nets()
        .iter()
        .map(|net| net.to_string())
        .collect();

    if nets.is_empty() {
        warn!("Interface {} has no IPv4 address", found.name);
    } else {
        debug!("Searching on {} ({})", found.name, nets.join(", "));
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
