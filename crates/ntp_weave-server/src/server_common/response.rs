use log::debug;

use crate::protocol::{self, TimestampFormat};

use super::{ServerSystemState, TimestampCache};

/// Attempt to build an interleaved-mode response for the request.
///
/// A request asks for interleaved mode by carrying distinct receive and
/// transmit timestamps while echoing one of our recent receive timestamps as
/// its origin. Returns `Some(packet)` with the cached post-send transmit
/// timestamp of that earlier exchange, or `None` for basic mode.
pub(crate) fn build_interleaved_response(
    request: &protocol::Packet,
    state: &ServerSystemState,
    cache: &TimestampCache,
    receive_ts: u64,
) -> Option<protocol::Packet> {
    // Equal receive and transmit timestamps always mean basic mode,
    // regardless of what the cache holds.
    if request.receive_timestamp == request.transmit_timestamp {
        return None;
    }

    let prior_transmit = cache.lookup(request.origin_timestamp.as_u64())?;

    debug!(
        "interleaved mode: origin {} matches a cached receive timestamp",
        request.origin_timestamp
    );

    Some(reply_packet(
        request,
        state,
        receive_ts,
        // Interleaved: origin echoes the request's receive timestamp.
        request.receive_timestamp,
        TimestampFormat::from_u64(prior_transmit),
    ))
}

/// Build a basic-mode response.
///
/// The origin echoes the request's transmit timestamp and the reply's
/// transmit timestamp is the pre-transmit clock reading, the server's best
/// estimate before the datagram actually leaves.
pub(crate) fn build_basic_response(
    request: &protocol::Packet,
    state: &ServerSystemState,
    receive_ts: u64,
    pre_transmit_ts: u64,
) -> protocol::Packet {
    reply_packet(
        request,
        state,
        receive_ts,
        request.transmit_timestamp,
        TimestampFormat::from_u64(pre_transmit_ts),
    )
}

/// Assemble a reply header around the mode-dependent timestamps.
///
/// The first byte follows the low-six-bits-plus-one rule: leap bits cleared,
/// version echoed, mode incremented. Poll is echoed; stratum, precision, the
/// root fields, and the reference identifier come from the server state. The
/// reference timestamp mirrors the receive timestamp.
fn reply_packet(
    request: &protocol::Packet,
    state: &ServerSystemState,
    receive_ts: u64,
    origin_timestamp: TimestampFormat,
    transmit_timestamp: TimestampFormat,
) -> protocol::Packet {
    protocol::Packet {
        leap_indicator: protocol::LeapIndicator::NoWarning,
        version: request.version,
        mode: reply_mode(request.mode),
        stratum: state.stratum,
        poll: request.poll,
        precision: state.precision,
        root_delay: state.root_delay,
        root_dispersion: state.root_dispersion,
        reference_id: state.reference_id,
        reference_timestamp: TimestampFormat::from_u64(receive_ts),
        origin_timestamp,
        receive_timestamp: TimestampFormat::from_u64(receive_ts),
        transmit_timestamp,
    }
}

/// The reply mode is the request mode plus one (client 3 → server 4,
/// symmetric active 1 → symmetric passive 2). Validation limits requests to
/// modes 1-4, so the fallback arm is unreachable in practice.
fn reply_mode(request_mode: protocol::Mode) -> protocol::Mode {
    match request_mode {
        protocol::Mode::SymmetricActive => protocol::Mode::SymmetricPassive,
        protocol::Mode::SymmetricPassive => protocol::Mode::Client,
        protocol::Mode::Client => protocol::Mode::Server,
        protocol::Mode::Server => protocol::Mode::Broadcast,
        other => other,
    }
}
