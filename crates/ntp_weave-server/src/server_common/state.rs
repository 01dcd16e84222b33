use crate::protocol;

/// Server-wide system variables (RFC 5905 Section 11).
///
/// These values are fixed at construction time and included in every
/// response packet.
#[derive(Clone, Debug)]
pub struct ServerSystemState {
    /// Stratum level of this server.
    pub stratum: protocol::Stratum,
    /// Precision of the server's clock, in log2 seconds (e.g., -20 ≈ 1μs).
    /// Also sets the bit-width of the clock jitter.
    pub precision: i8,
    /// Total round-trip delay to the primary reference source.
    pub root_delay: protocol::ShortFormat,
    /// Total dispersion to the primary reference source.
    pub root_dispersion: protocol::ShortFormat,
    /// Reference clock identifier (e.g., the upstream server IP).
    pub reference_id: protocol::ReferenceIdentifier,
}

impl Default for ServerSystemState {
    fn default() -> Self {
        ServerSystemState {
            stratum: protocol::Stratum(5),
            precision: -20,
            root_delay: protocol::ShortFormat::default(),
            root_dispersion: protocol::ShortFormat::default(),
            reference_id: protocol::ReferenceIdentifier::from_ipv4(std::net::Ipv4Addr::LOCALHOST),
        }
    }
}
