#![cfg(test)]
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;
use std::time::Duration;

use pductl_common::config::Config;
use pductl_common::network::device::DeviceRecord;
use pductl_core::actions::{self, Action, ActionOutcome};
use pductl_core::discovery::PduScanner;
use pductl_protocols::gbl;

use crate::utils::{NO_SUCH_INTERFACE, closed_port, device, spawn_gbl_responder, spawn_line_server};

/// A PDU that announces itself on loopback.
fn loopback_device() -> DeviceRecord {
    DeviceRecord {
        ip: Ipv4Addr::LOCALHOST,
        ..device(1)
    }
}

fn config(port: u16, log_file: &Path) -> Config {
    let mut cfg: Config = Config::new(NO_SUCH_INTERFACE);
    cfg.port = port;
    cfg.log_file = log_file.to_path_buf();
    cfg.max_wait = Duration::from_secs(3);
    cfg
}

async fn discover_first(cfg: &Config) -> anyhow::Result<IpAddr> {
    let (target, _responder) =
        spawn_gbl_responder(vec![gbl::encode_reply(&loopback_device())], Duration::ZERO).await;

    let devices: Vec<DeviceRecord> = PduScanner::new(&cfg.interface)?
        .with_target(target)
        .search(cfg.max_wait, cfg.expected_devices)
        .await?;

    let first: &DeviceRecord = devices
        .first()
        .ok_or_else(|| anyhow::anyhow!("No devices found."))?;
    Ok(IpAddr::V4(first.ip))
}

#[tokio::test]
async fn discovered_device_reports_usage() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let (port, pdu) = spawn_line_server("12.75>\r\n").await;
    let cfg: Config = config(port, &dir.path().join("stat.txt"));

    let host: IpAddr = discover_first(&cfg).await?;
    let outcome: ActionOutcome = actions::perform(Action::PrintUsage, host, &cfg).await?;

    assert_eq!(outcome, ActionOutcome::Print("12.75".into()));
    assert_eq!(pdu.await?, "linesensor 1 9 value show\n");
    Ok(())
}

#[tokio::test]
async fn discovered_device_counter_is_reset() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let (port, pdu) = spawn_line_server("OK\r\n>").await;
    let cfg: Config = config(port, &dir.path().join("stat.txt"));

    let host: IpAddr = discover_first(&cfg).await?;
    let outcome: ActionOutcome = actions::perform(Action::ResetCounter, host, &cfg).await?;

    assert_eq!(outcome, ActionOutcome::Discarded);
    assert_eq!(pdu.await?, "linesensor 1 counter reset\n");
    Ok(())
}

#[tokio::test]
async fn unreachable_device_is_logged_as_not_available() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let log_file = dir.path().join("stat.txt");
    let cfg: Config = config(closed_port().await, &log_file);

    let host: IpAddr = discover_first(&cfg).await?;
    actions::perform(Action::LogUsage, host, &cfg).await?;
    actions::perform(Action::LogUsage, host, &cfg).await?;

    let contents: String = std::fs::read_to_string(&log_file)?;
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    for line in lines {
        let (timestamp, value) = line.split_once(" - ").expect("missing separator");
        assert_eq!(value, "N/A");
        assert_eq!(timestamp.len(), "DD-MM-YYYY HH:MM:SS".len());
    }
    Ok(())
}

#[test]
fn unknown_action_name_has_operator_message() {
    let err = "foo".parse::<Action>().unwrap_err();
    assert_eq!(err.to_string(), "Invalid action: foo");
}
