// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Shared test helpers for server integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use ntp_weave_server::protocol::{
    ConstPackedSizeBytes, Mode, Packet, ReadBytes, TimestampFormat, Version, WriteBytes,
};
use tokio::net::UdpSocket;

/// Spawn a test server on an ephemeral port and return its bound address.
///
/// The server runs in a background tokio task. It will shut down when the
/// tokio runtime is dropped.
pub(crate) async fn spawn_test_server(
    builder: ntp_weave_server::server::NtpServerBuilder,
) -> SocketAddr {
    let server = builder
        .listen("127.0.0.1:0")
        .build()
        .await
        .expect("failed to bind test server");
    let addr = server.local_addr().expect("failed to get local addr");
    tokio::spawn(async move {
        let _ = server.run().await;
    });
    // Small yield to ensure the server task is running.
    tokio::time::sleep(Duration::from_millis(10)).await;
    addr
}

/// Build a version-3 client request with the given timestamp fields.
pub(crate) fn build_client_packet(
    origin: u64,
    receive: u64,
    transmit: u64,
) -> [u8; Packet::PACKED_SIZE_BYTES] {
    let packet = Packet {
        version: Version::V3,
        mode: Mode::Client,
        poll: 6,
        origin_timestamp: TimestampFormat::from_u64(origin),
        receive_timestamp: TimestampFormat::from_u64(receive),
        transmit_timestamp: TimestampFormat::from_u64(transmit),
        ..Packet::default()
    };
    let mut buf = [0u8; Packet::PACKED_SIZE_BYTES];
    (&mut buf[..])
        .write_bytes(packet)
        .expect("failed to serialize");
    buf
}

/// Send a raw UDP packet to `addr` and receive the response with a timeout.
///
/// Returns `None` if the server doesn't respond within the timeout.
pub(crate) async fn send_receive_raw(
    addr: SocketAddr,
    packet: &[u8],
    timeout: Duration,
) -> Option<Vec<u8>> {
    let sock = UdpSocket::bind("127.0.0.1:0").await.expect("bind failed");
    sock.send_to(packet, addr).await.expect("send failed");

    let mut buf = vec![0u8; 2048];
    match tokio::time::timeout(timeout, sock.recv_from(&mut buf)).await {
        Ok(Ok((len, _))) => {
            buf.truncate(len);
            Some(buf)
        }
        _ => None,
    }
}

/// Parse a response buffer into a Packet.
pub(crate) fn parse_response(buf: &[u8]) -> Packet {
    (&buf[..]).read_bytes().expect("failed to parse response")
}
