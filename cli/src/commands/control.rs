use std::net::IpAddr;
use std::process::ExitCode;

use pductl_common::config::Config;
use pductl_common::network::device::DeviceRecord;
use pductl_common::{info, warn};
use pductl_core::actions::{self, Action, ActionOutcome};
use pductl_core::discovery::PduScanner;

use crate::terminal::print;

/// Parses `name` and runs it, refusing unknown actions before any socket is
/// opened.
pub async fn run(name: &str, cfg: &Config) -> anyhow::Result<ExitCode> {
    match resolve_action(name) {
        Ok(action) => control(action, cfg).await,
        Err(code) => Ok(code),
    }
}

/// Maps an action name to its [`Action`], telling the operator when it does
/// not exist.
pub fn resolve_action(name: &str) -> Result<Action, ExitCode> {
    name.parse().map_err(|e: actions::UnknownAction| {
        print::print(&e.to_string());
        ExitCode::FAILURE
    })
}

/// Finds the PDU on `cfg.interface` and runs `action` against it.
pub async fn control(action: Action, cfg: &Config) -> anyhow::Result<ExitCode> {
    let mut scanner: PduScanner = PduScanner::new(&cfg.interface)?;
    if let Some(target) = cfg.discovery_target {
        scanner = scanner.with_target(target);
    }
    let devices: Vec<DeviceRecord> = scanner.search(cfg.max_wait, cfg.expected_devices).await?;

    let Some(device) = devices.first() else {
        print::print("No devices found.");
        return Ok(ExitCode::FAILURE);
    };

    if devices.len() > 1 {
        warn!("{} devices answered, using {device}", devices.len());
    }
    if device.in_bootloader() {
        warn!("{device} is in bootloader mode, commands may not be answered");
    }

    match actions::perform(action, IpAddr::V4(device.ip), cfg).await? {
        ActionOutcome::Print(value) => print::print(&value),
        ActionOutcome::Logged(line) => info!("Appended \"{line}\" to {}", cfg.log_file.display()),
        ActionOutcome::Discarded => info!("{action} sent to {device}"),
    }

    Ok(ExitCode::SUCCESS)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
