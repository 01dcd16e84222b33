// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! NTP server using the Tokio runtime.
//!
//! Provides a configurable NTP server that answers client requests in basic
//! or interleaved mode (RFC 9769). Exchanges are processed strictly one at a
//! time on a single async task: the timestamp cache has exactly one writer,
//! which keeps the ensure-unique-key and insert steps of an exchange atomic
//! without locking.
//!
//! # Examples
//!
//! ```no_run
//! # async fn example() -> std::io::Result<()> {
//! use ntp_weave_server::protocol::Stratum;
//! use ntp_weave_server::server::NtpServer;
//!
//! let server = NtpServer::builder()
//!     .listen("[::]:123")
//!     .stratum(Stratum(2))
//!     .build()
//!     .await?;
//!
//! server.run().await
//! # }
//! ```

use std::io;

use log::debug;
use tokio::net::UdpSocket;

use crate::clock::{SystemClock, TimeSource};
use crate::protocol;
use crate::server_common::{
    HandleResult, ServerSystemState, TimestampCache, handle_request, unique_receive_timestamp,
};

/// Builder for configuring and creating an [`NtpServer`].
pub struct NtpServerBuilder {
    listen_addr: String,
    system_state: ServerSystemState,
    max_timestamps: usize,
}

impl NtpServerBuilder {
    fn new() -> Self {
        NtpServerBuilder {
            listen_addr: crate::default_listen_addr(protocol::PORT),
            system_state: ServerSystemState::default(),
            max_timestamps: 1000,
        }
    }

    /// Set the listen address (default: `"[::]:123"`).
    pub fn listen(mut self, addr: impl Into<String>) -> Self {
        self.listen_addr = addr.into();
        self
    }

    /// Set the server's stratum level.
    pub fn stratum(mut self, stratum: protocol::Stratum) -> Self {
        self.system_state.stratum = stratum;
        self
    }

    /// Set the server's clock precision in log2 seconds (e.g., -20 ≈ 1μs).
    ///
    /// The precision also sets the bit-width of the random jitter applied to
    /// clock readings (`32 + precision` bits).
    pub fn precision(mut self, precision: i8) -> Self {
        self.system_state.precision = precision;
        self
    }

    /// Set the server's root delay.
    pub fn root_delay(mut self, delay: protocol::ShortFormat) -> Self {
        self.system_state.root_delay = delay;
        self
    }

    /// Set the server's root dispersion.
    pub fn root_dispersion(mut self, disp: protocol::ShortFormat) -> Self {
        self.system_state.root_dispersion = disp;
        self
    }

    /// Set the server's reference identifier.
    pub fn reference_id(mut self, id: protocol::ReferenceIdentifier) -> Self {
        self.system_state.reference_id = id;
        self
    }

    /// Set the maximum number of cached timestamp pairs (default: 1000).
    ///
    /// Each successfully answered exchange caches one receive/transmit pair
    /// for a possible interleaved follow-up; the oldest pair is evicted once
    /// this bound is exceeded.
    pub fn max_timestamps(mut self, max: usize) -> Self {
        self.max_timestamps = max;
        self
    }

    /// Build the server. Binds to the configured listen address.
    pub async fn build(self) -> io::Result<NtpServer> {
        let sock = UdpSocket::bind(&self.listen_addr).await?;
        debug!("NTP server listening on {}", self.listen_addr);

        let clock = SystemClock::new(self.system_state.precision);
        Ok(NtpServer {
            sock,
            state: self.system_state,
            cache: TimestampCache::new(self.max_timestamps),
            clock,
        })
    }
}

/// An NTP server that responds to client requests.
///
/// Created via [`NtpServer::builder()`]. Call [`run()`](NtpServer::run) to
/// start serving requests.
pub struct NtpServer {
    sock: UdpSocket,
    state: ServerSystemState,
    cache: TimestampCache,
    clock: SystemClock,
}

impl NtpServer {
    /// Create a builder for configuring the server.
    pub fn builder() -> NtpServerBuilder {
        NtpServerBuilder::new()
    }

    /// Get the local address the server is bound to.
    pub fn local_addr(&self) -> io::Result<std::net::SocketAddr> {
        self.sock.local_addr()
    }

    /// Run the server, processing incoming NTP requests indefinitely.
    ///
    /// Each exchange runs to completion (dropped or answered-and-recorded)
    /// before the next datagram is considered. The future runs until an I/O
    /// error occurs on the socket receive path; send failures abandon the
    /// affected exchange only.
    pub async fn run(mut self) -> io::Result<()> {
        let mut recv_buf = [0u8; 2048];

        loop {
            let (recv_len, src_addr) = self.sock.recv_from(&mut recv_buf).await?;

            // Timestamp the receipt first, bumped past any cached key so the
            // entry recorded for this exchange is unique.
            let receive_ts = unique_receive_timestamp(&mut self.clock, &self.cache);

            let result = handle_request(
                &recv_buf,
                recv_len,
                src_addr.ip(),
                &self.state,
                &self.cache,
                &mut self.clock,
                receive_ts,
            );

            match result {
                HandleResult::Response(resp_buf) => {
                    match self.sock.send_to(&resp_buf, src_addr).await {
                        Ok(_) => {
                            // Read the clock again now that the datagram has
                            // left; this is the transmit timestamp a future
                            // interleaved request will retrieve.
                            let actual_transmit_ts = self.clock.read_clock().as_u64();
                            self.cache.insert(receive_ts, actual_transmit_ts);
                        }
                        Err(e) => {
                            // The client won't see this response, so it must
                            // not be remembered either.
                            debug!("send to {} failed, exchange abandoned: {}", src_addr, e);
                        }
                    }
                }
                HandleResult::Drop => {
                    debug!("dropped packet from {}", src_addr);
                }
            }
        }
    }
}
