//! # Device Actions
//!
//! The closed set of things `pductl` can do with a discovered PDU. Each
//! action knows which command it sends and where the reply goes.

use std::fmt;
use std::net::IpAddr;
use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use chrono::{Local, NaiveDateTime};
use thiserror::Error;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use pductl_common::config::Config;
use pductl_common::info;
use pductl_protocols::linesensor;

use crate::network::tcp;

/// Placeholder for a reading that could not be obtained.
pub const NOT_AVAILABLE: &str = "N/A";

const LOG_TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Print the power usage reading to stdout.
    PrintUsage,
    /// Append a timestamped power usage reading to the log file.
    LogUsage,
    /// Reset the energy counter.
    ResetCounter,
}

/// Where the reply of an action ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Stdout,
    LogFile,
    Discard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// A value the caller should show to the operator.
    Print(String),
    /// The line that was appended to the log file.
    Logged(String),
    Discarded,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid action: {0}")]
pub struct UnknownAction(pub String);

impl Action {
    pub const ALL: [Action; 3] = [Action::LogUsage, Action::PrintUsage, Action::ResetCounter];

    pub fn name(self) -> &'static str {
        match self {
            Action::PrintUsage => "print_usage_in_kw",
            Action::LogUsage => "log_usage_in_kw",
            Action::ResetCounter => "reset_counter",
        }
    }

    pub fn command(self) -> &'static str {
        match self {
            Action::PrintUsage | Action::LogUsage => linesensor::CMD_USAGE_SHOW,
            Action::ResetCounter => linesensor::CMD_COUNTER_RESET,
        }
    }

    pub fn delivery(self) -> Delivery {
        match self {
            Action::PrintUsage => Delivery::Stdout,
            Action::LogUsage => Delivery::LogFile,
            Action::ResetCounter => Delivery::Discard,
        }
    }
}

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.name() == s)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runs `action` against the PDU at `host`.
///
/// A failed command exchange is not an error here, readings fall back to
/// [`NOT_AVAILABLE`]. Only log file I/O can fail.
pub async fn perform(action: Action, host: IpAddr, cfg: &Config) -> anyhow::Result<ActionOutcome> {
    info!("Running {action} on {host}:{}", cfg.port);
    let reply: Option<String> = tcp::query(host, cfg.port, action.command()).await;

    match action.delivery() {
        Delivery::Stdout => Ok(ActionOutcome::Print(reading_or_placeholder(reply))),
        Delivery::LogFile => {
            let line: String = log_line(Local::now().naive_local(), &reading_or_placeholder(reply));
            append_line(&cfg.log_file, &line).await?;
            Ok(ActionOutcome::Logged(line))
        }
        Delivery::Discard => Ok(ActionOutcome::Discarded),
    }
}

/// An empty reply is as useless as none at all.
fn reading_or_placeholder(reply: Option<String>) -> String {
    reply
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn log_line(timestamp: NaiveDateTime, value: &str) -> String {
    format!("{} - {}", timestamp.format(LOG_TIMESTAMP_FORMAT), value)
}

async fn append_line(path: &Path, line: &str) -> anyhow::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .with_context(|| format!("opening log file {}", path.display()))?;

    file.write_all(format!("{line}\n").as_bytes())
        .await
        .with_context(|| format!("writing to log file {}", path.display()))?;
    file.flush().await?;
    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
