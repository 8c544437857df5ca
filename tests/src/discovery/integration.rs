#![cfg(test)]
use std::net::{Ipv4Addr, SocketAddr};
use std::time::{Duration, Instant};

use pductl_common::network::device::DeviceRecord;
use pductl_core::discovery::{PduScanner, RECV_TIMEOUT};
use pductl_protocols::gbl;

use crate::utils::{NO_SUCH_INTERFACE, device, spawn_gbl_responder};

async fn search(target: SocketAddr, max_wait: Duration, expected: Option<usize>) -> Vec<DeviceRecord> {
    PduScanner::new(NO_SUCH_INTERFACE)
        .expect("scanner construction must survive a missing interface")
        .with_target(target)
        .search(max_wait, expected)
        .await
        .expect("search failed")
}

/// A device reply laid out byte by byte, as seen on the wire.
#[tokio::test]
async fn wire_reply_yields_device_record() {
    let mut reply: Vec<u8> = vec![0x47, 0x42, 0x4c, 0x04, 0x01];
    reply.extend_from_slice(&[0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]);
    reply.extend_from_slice(&[0x00; 6]);
    reply.push(0x07);
    reply.extend_from_slice(&[0x0a, 0x0a, 0x0a, 0x01]);

    let (target, responder) = spawn_gbl_responder(vec![reply], Duration::ZERO).await;
    let devices: Vec<DeviceRecord> = search(target, Duration::from_secs(3), Some(1)).await;

    assert_eq!(responder.await.unwrap(), vec![0x47, 0x42, 0x4c, 0x04, 0x01, 0x4c]);
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].mac.to_string(), "aa:bb:cc:dd:ee:ff");
    assert_eq!(devices[0].bootloader, 0x07);
    assert_eq!(devices[0].ip, Ipv4Addr::new(10, 10, 10, 1));
    assert_eq!(devices[0].ip.to_string(), "10.10.10.1");
}

#[tokio::test]
async fn single_expected_device_returns_before_deadline() {
    let (target, _responder) =
        spawn_gbl_responder(vec![gbl::encode_reply(&device(1))], Duration::ZERO).await;

    let start: Instant = Instant::now();
    let devices: Vec<DeviceRecord> = search(target, Duration::from_secs(5), Some(1)).await;

    assert!(start.elapsed() < Duration::from_secs(2), "took {:?}", start.elapsed());
    assert_eq!(devices, vec![device(1)]);
}

#[tokio::test]
async fn stops_at_expected_count_even_if_more_answer() {
    let replies: Vec<Vec<u8>> = (1..=3).map(|n| gbl::encode_reply(&device(n))).collect();
    let (target, _responder) = spawn_gbl_responder(replies, Duration::from_millis(20)).await;

    let devices: Vec<DeviceRecord> = search(target, Duration::from_secs(5), Some(2)).await;

    assert_eq!(devices, vec![device(1), device(2)]);
}

#[tokio::test]
async fn without_expected_count_collects_until_deadline() {
    let replies: Vec<Vec<u8>> = (1..=3).map(|n| gbl::encode_reply(&device(n))).collect();
    let (target, _responder) = spawn_gbl_responder(replies, Duration::from_millis(20)).await;
    let max_wait: Duration = Duration::from_millis(600);

    let start: Instant = Instant::now();
    let devices: Vec<DeviceRecord> = search(target, max_wait, None).await;
    let elapsed: Duration = start.elapsed();

    assert_eq!(devices, vec![device(1), device(2), device(3)]);
    assert!(elapsed >= max_wait, "returned early after {elapsed:?}");
    assert!(elapsed < max_wait + RECV_TIMEOUT, "overran after {elapsed:?}");
}

#[tokio::test]
async fn foreign_traffic_contributes_nothing() {
    let mut wrong_version: Vec<u8> = gbl::encode_reply(&device(1));
    wrong_version[3] = 3;
    let mut wrong_command: Vec<u8> = gbl::encode_reply(&device(2));
    wrong_command[4] = 2;
    let truncated: Vec<u8> = gbl::encode_reply(&device(3))[..gbl::MIN_REPLY_LEN - 1].to_vec();
    let noise: Vec<Vec<u8>> = vec![
        wrong_version,
        wrong_command,
        truncated,
        gbl::SEARCH_PROBE.to_vec(),
        Vec::new(),
    ];

    let (target, _responder) = spawn_gbl_responder(noise, Duration::ZERO).await;
    let devices: Vec<DeviceRecord> = search(target, Duration::from_millis(400), Some(1)).await;

    assert!(devices.is_empty(), "unexpected devices: {devices:?}");
}

#[tokio::test]
async fn noise_after_a_valid_reply_is_skipped() {
    let mut wrong_version: Vec<u8> = gbl::encode_reply(&device(9));
    wrong_version[3] = 5;
    let replies: Vec<Vec<u8>> = vec![
        wrong_version,
        vec![0xde, 0xad],
        gbl::encode_reply(&device(4)),
    ];

    let (target, _responder) = spawn_gbl_responder(replies, Duration::ZERO).await;
    let devices: Vec<DeviceRecord> = search(target, Duration::from_secs(3), Some(1)).await;

    assert_eq!(devices, vec![device(4)]);
}

#[tokio::test]
async fn constant_noise_does_not_extend_the_deadline() {
    let noise: Vec<Vec<u8>> = (0..200).map(|_| vec![0x47, 0x42, 0x4c]).collect();
    let (target, _responder) = spawn_gbl_responder(noise, Duration::from_millis(10)).await;
    let max_wait: Duration = Duration::from_millis(500);

    let start: Instant = Instant::now();
    let devices: Vec<DeviceRecord> = search(target, max_wait, Some(1)).await;
    let elapsed: Duration = start.elapsed();

    assert!(devices.is_empty());
    assert!(elapsed < max_wait + RECV_TIMEOUT, "overran after {elapsed:?}");
}
