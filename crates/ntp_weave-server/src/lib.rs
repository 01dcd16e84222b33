// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! NTP/SNTP server with interleaved mode support.
//!
//! This crate provides a tokio-based NTP server that answers client requests
//! in either basic or interleaved mode. In interleaved mode (RFC 9769) the
//! server reports the precise transmit timestamp of the *previous* exchange
//! with a client, a value it could only measure after that response had left.
//! A bounded FIFO cache of receive/transmit timestamp pairs makes this
//! possible without unbounded memory growth under spoofed or high-rate
//! traffic.

#![warn(missing_docs)]

// Re-export protocol types from ntp_weave_proto for convenience.
pub use ntp_weave_proto::{protocol, unix_time};

/// Custom error types for the NTP server.
pub mod error;

/// Clock reading with randomized low-order jitter.
pub mod clock;

/// Shared types and logic for the NTP server.
///
/// Provides request validation, response building, and the interleaved-mode
/// timestamp cache.
pub mod server_common;

/// NTP server using the Tokio runtime.
pub mod server;

/// Default listen address for the given port (IPv6 dual-stack).
pub(crate) fn default_listen_addr(port: u16) -> String {
    format!("[::]:{port}")
}
