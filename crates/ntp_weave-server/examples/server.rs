// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Example NTP server with interleaved mode support.
//!
//! Run with: `cargo run --example server`
//!
//! Set `RUST_LOG=debug` to see per-exchange diagnostics.

use ntp_weave_server::protocol::Stratum;
use ntp_weave_server::server::NtpServer;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let server = NtpServer::builder()
        .listen("[::]:1123")
        .stratum(Stratum(2))
        .build()
        .await?;

    println!("NTP server listening on {}", server.local_addr()?);

    server.run().await
}
