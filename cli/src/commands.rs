pub mod control;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use pductl_common::config::{Config, DEFAULT_EXPECTED_DEVICES, DEFAULT_LOG_FILE, DEFAULT_PORT};

#[derive(Parser)]
#[command(name = "pductl")]
#[command(about = "Read or reset the power counter of a Gude PDU found on the local network.")]
pub struct CommandLine {
    /// The network interface to search on
    pub interface: String,
    /// The action to perform: print_usage_in_kw, log_usage_in_kw or reset_counter
    #[arg(long, default_value = "print_usage_in_kw")]
    pub action: String,
    /// The file readings are appended to by log_usage_in_kw
    #[arg(long = "log-file", alias = "log_file", default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,
    /// The port of the PDU command channel
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,
    /// Seconds to wait for discovery replies
    #[arg(long, default_value = "1.0", value_parser = parse_wait)]
    pub wait: Duration,
    /// Stop searching once this many devices answered
    #[arg(long, default_value_t = DEFAULT_EXPECTED_DEVICES, value_parser = parse_count, conflicts_with = "all")]
    pub expected: usize,
    /// Keep listening for replies until the wait time is over
    #[arg(long)]
    pub all: bool,
    /// Send the search request here instead of broadcasting it
    #[arg(long, value_name = "ADDR")]
    pub target: Option<SocketAddr>,
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn to_config(&self) -> Config {
        Config {
            interface: self.interface.clone(),
            port: self.port,
            log_file: self.log_file.clone(),
            max_wait: self.wait,
            expected_devices: if self.all { None } else { Some(self.expected) },
            discovery_target: self.target,
        }
    }
}

fn parse_wait(s: &str) -> Result<Duration, String> {
    let secs: f64 = s.parse().map_err(|_| format!("invalid number of seconds: {s}"))?;
    Duration::try_from_secs_f64(secs).map_err(|_| format!("wait must be a non-negative number of seconds: {s}"))
}

fn parse_count(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) | Err(_) => Err(format!("expected a positive device count: {s}")),
        Ok(count) => Ok(count),
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
