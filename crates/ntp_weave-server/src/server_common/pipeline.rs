use std::net::IpAddr;

use log::debug;

use crate::clock::TimeSource;
use crate::protocol::{self, ConstPackedSizeBytes, WriteBytes};

use super::{
    ServerSystemState, TimestampCache, build_basic_response, build_interleaved_response,
    validate_request,
};

/// The complete result of handling a client request.
pub(crate) enum HandleResult {
    /// Send this response buffer to the client (fixed 48 bytes). The caller
    /// records the cache entry for `receive_ts` only after the send succeeds.
    Response([u8; protocol::Packet::PACKED_SIZE_BYTES]),
    /// Drop the packet (invalid request, silently ignored).
    Drop,
}

/// Read a receive timestamp that is not already a cache key.
///
/// A repeated clock value can occur after a backward step of the clock (or
/// under the randomized low-order jitter). The colliding value is incremented
/// by the smallest representable unit until free, so the key used for this
/// exchange's later cache insertion is guaranteed unique. The bump and the
/// eventual insert form one logical transaction; both must stay on the single
/// task that owns the cache.
pub(crate) fn unique_receive_timestamp(
    clock: &mut impl TimeSource,
    cache: &TimestampCache,
) -> u64 {
    let mut receive_ts = clock.read_clock().as_u64();
    while cache.contains(receive_ts) {
        receive_ts = receive_ts.wrapping_add(1);
    }
    receive_ts
}

/// Read a pre-transmit timestamp, re-reading until it differs from the
/// receive timestamp so the two are always distinguishable.
pub(crate) fn pre_transmit_timestamp(clock: &mut impl TimeSource, receive_ts: u64) -> u64 {
    let mut pre_transmit_ts = clock.read_clock().as_u64();
    while pre_transmit_ts == receive_ts {
        pre_transmit_ts = clock.read_clock().as_u64();
    }
    pre_transmit_ts
}

/// Handle a single incoming NTP request (no socket I/O).
///
/// `receive_ts` is the already-uniquified receive timestamp for this
/// exchange. The request is validated, classified as interleaved or basic,
/// and serialized; the caller transmits the buffer and, on success, records
/// the exchange in the cache.
pub(crate) fn handle_request(
    recv_buf: &[u8],
    recv_len: usize,
    src_ip: IpAddr,
    state: &ServerSystemState,
    cache: &TimestampCache,
    clock: &mut impl TimeSource,
    receive_ts: u64,
) -> HandleResult {
    // 1. Validate the request.
    let request = match validate_request(recv_buf, recv_len) {
        Ok(req) => req,
        Err(e) => {
            debug!("dropping invalid request from {}: {}", src_ip, e);
            return HandleResult::Drop;
        }
    };

    debug!(
        "request from {}: org={} rx={} tx={}",
        src_ip, request.origin_timestamp, request.receive_timestamp, request.transmit_timestamp
    );

    // 2. Pre-transmit estimate, distinct from the receive timestamp.
    let pre_transmit_ts = pre_transmit_timestamp(clock, receive_ts);

    // 3. Interleaved if the request qualifies, basic otherwise.
    let response = build_interleaved_response(&request, state, cache, receive_ts)
        .unwrap_or_else(|| build_basic_response(&request, state, receive_ts, pre_transmit_ts));

    debug!(
        "reply to {}: org={} rx={} tx={}",
        src_ip, response.origin_timestamp, response.receive_timestamp, response.transmit_timestamp
    );

    // 4. Serialize.
    let mut buf = [0u8; protocol::Packet::PACKED_SIZE_BYTES];
    match (&mut buf[..]).write_bytes(response) {
        Ok(()) => HandleResult::Response(buf),
        Err(e) => {
            debug!("failed to serialize response for {}: {}", src_ip, e);
            HandleResult::Drop
        }
    }
}
