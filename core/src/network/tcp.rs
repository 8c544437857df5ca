//! # Command channel
//!
//! One short lived TCP connection per command: connect, send one line, read
//! one line, close. Nothing is retried.

use std::io;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use pductl_common::error;
use pductl_protocols::linesensor::{self, LineError};
use pductl_protocols::telnet;

pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(1);
pub const READ_TIMEOUT: Duration = Duration::from_secs(1);
const READ_CHUNK_LEN: usize = 256;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Codec(#[from] LineError),
    #[error("connect timed out after {0:?}")]
    ConnectTimeout(Duration),
    #[error("connect failed: {0}")]
    Connect(io::Error),
    #[error("sending command failed: {0}")]
    Write(io::Error),
    #[error("no reply within {0:?}")]
    ReadTimeout(Duration),
    #[error("reading reply failed: {0}")]
    Read(io::Error),
    #[error("connection closed before a reply arrived")]
    ConnectionClosed,
}

/// Sends `command` to `host:port` and returns the cleaned reply line.
pub async fn execute_command(host: IpAddr, port: u16, command: &str) -> Result<String, CommandError> {
    let request: Vec<u8> = linesensor::encode_command(command)?;
    let addr: SocketAddr = SocketAddr::new(host, port);

    let mut stream: TcpStream = match timeout(CONNECT_TIMEOUT, TcpStream::connect(addr)).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(e)) => return Err(CommandError::Connect(e)),
        Err(_elapsed) => return Err(CommandError::ConnectTimeout(CONNECT_TIMEOUT)),
    };

    stream.write_all(&request).await.map_err(CommandError::Write)?;

    let line: Vec<u8> = timeout(READ_TIMEOUT, read_line(&mut stream))
        .await
        .map_err(|_elapsed| CommandError::ReadTimeout(READ_TIMEOUT))??;

    Ok(linesensor::decode_reply(&line)?)
}

/// Reads until the first newline outside of telnet negotiation.
///
/// Negotiation may carry a `0x0a` option byte, so the newline is searched
/// for in the filtered data, never in the raw stream.
async fn read_line(stream: &mut TcpStream) -> Result<Vec<u8>, CommandError> {
    let mut raw: Vec<u8> = Vec::new();
    let mut chunk = [0u8; READ_CHUNK_LEN];

    loop {
        let read: usize = stream.read(&mut chunk).await.map_err(CommandError::Read)?;
        if read == 0 {
            if raw.is_empty() {
                return Err(CommandError::ConnectionClosed);
            }
            return Ok(telnet::strip_iac(&raw));
        }

        raw.extend_from_slice(&chunk[..read]);
        if let Some(line) = telnet::first_line(&raw) {
            return Ok(line);
        }
    }
}

/// Like [`execute_command`], but reports failures to the operator and yields
/// `None` instead of an error.
pub async fn query(host: IpAddr, port: u16, command: &str) -> Option<String> {
    match execute_command(host, port, command).await {
        Ok(reply) => Some(reply),
        Err(e) => {
            error!("Failed to execute command {command} on host {host}:{port}. Error: {e}");
            None
        }
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
