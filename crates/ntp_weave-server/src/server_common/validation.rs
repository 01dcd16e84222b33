use std::io;

use crate::error::{NtpServerError, ProtocolError};
use crate::protocol::{self, ConstPackedSizeBytes, ReadBytes};

/// Validate an incoming NTP request packet.
///
/// Performs the server-side checks before any response work:
/// - Minimum packet size (48 bytes; trailing bytes are ignored)
/// - Mode is in the accepted set: SymmetricActive (1), SymmetricPassive (2),
///   Client (3), or Server (4)
/// - Version is in the accepted set: 1-3
///
/// Returns the parsed packet on success. Field values beyond mode and
/// version are not judged here; the responder echoes or replaces them.
pub(crate) fn validate_request(recv_buf: &[u8], recv_len: usize) -> io::Result<protocol::Packet> {
    if recv_len < protocol::Packet::PACKED_SIZE_BYTES {
        return Err(NtpServerError::Protocol(ProtocolError::RequestTooShort {
            received: recv_len,
        })
        .into());
    }

    let request: protocol::Packet =
        (&recv_buf[..protocol::Packet::PACKED_SIZE_BYTES]).read_bytes()?;

    let valid_mode = matches!(
        request.mode,
        protocol::Mode::SymmetricActive
            | protocol::Mode::SymmetricPassive
            | protocol::Mode::Client
            | protocol::Mode::Server
    );
    if !valid_mode {
        return Err(NtpServerError::Protocol(ProtocolError::UnexpectedMode {
            mode: request.mode as u8,
        })
        .into());
    }

    if !(1..=3).contains(&request.version.value()) {
        return Err(
            NtpServerError::Protocol(ProtocolError::UnsupportedVersion {
                version: request.version.value(),
            })
            .into(),
        );
    }

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Mode, Packet, TimestampFormat, Version, WriteBytes};

    fn make_valid_client_buf() -> [u8; Packet::PACKED_SIZE_BYTES] {
        let pkt = Packet {
            version: Version::V3,
            mode: Mode::Client,
            poll: 6,
            transmit_timestamp: TimestampFormat {
                seconds: 1000,
                fraction: 1,
            },
            ..Packet::default()
        };
        let mut buf = [0u8; Packet::PACKED_SIZE_BYTES];
        (&mut buf[..]).write_bytes(pkt).unwrap();
        buf
    }

    #[test]
    fn valid_client_request() {
        let buf = make_valid_client_buf();
        let result = validate_request(&buf, buf.len());
        assert!(result.is_ok());
        let pkt = result.unwrap();
        assert_eq!(pkt.mode, Mode::Client);
        assert_eq!(pkt.version, Version::V3);
    }

    #[test]
    fn buffer_too_short_0() {
        let buf = [];
        assert!(validate_request(&buf, 0).is_err());
    }

    #[test]
    fn buffer_too_short_47() {
        let buf = [0u8; 47];
        let result = validate_request(&buf, 47);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("too short"));
    }

    #[test]
    fn buffer_exactly_48() {
        let buf = make_valid_client_buf();
        assert!(validate_request(&buf, 48).is_ok());
    }

    #[test]
    fn trailing_bytes_accepted() {
        let mut long = [0u8; 96];
        long[..48].copy_from_slice(&make_valid_client_buf());
        assert!(validate_request(&long, 96).is_ok());
    }

    #[test]
    fn mode_reserved_rejected() {
        let mut buf = make_valid_client_buf();
        // Byte 0: LI(2)|VN(3)|Mode(3). Clear the mode bits (mode 0).
        buf[0] &= 0b1111_1000;
        let result = validate_request(&buf, buf.len());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("mode"));
    }

    #[test]
    fn mode_broadcast_rejected() {
        let mut buf = make_valid_client_buf();
        buf[0] = (buf[0] & 0b1111_1000) | 5; // Mode::Broadcast
        assert!(validate_request(&buf, buf.len()).is_err());
    }

    #[test]
    fn modes_1_through_4_accepted() {
        for mode in 1..=4u8 {
            let mut buf = make_valid_client_buf();
            buf[0] = (buf[0] & 0b1111_1000) | mode;
            let result = validate_request(&buf, buf.len());
            assert!(result.is_ok(), "mode {mode} should be accepted");
            assert_eq!(result.unwrap().mode as u8, mode);
        }
    }

    #[test]
    fn version_0_rejected() {
        let mut buf = make_valid_client_buf();
        // Byte 0: LI(2)|VN(3)|Mode(3). Set VN=0.
        buf[0] &= 0b1100_0111;
        assert!(validate_request(&buf, buf.len()).is_err());
    }

    #[test]
    fn versions_1_through_3_accepted() {
        for version in 1..=3u8 {
            let mut buf = make_valid_client_buf();
            buf[0] = (buf[0] & 0b11_000_111) | (version << 3);
            assert!(
                validate_request(&buf, buf.len()).is_ok(),
                "version {version} should be accepted"
            );
        }
    }

    #[test]
    fn version_4_rejected() {
        let mut buf = make_valid_client_buf();
        buf[0] = (buf[0] & 0b11_000_111) | (4 << 3);
        let result = validate_request(&buf, buf.len());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("version"));
    }

    #[test]
    fn leap_indicator_bits_do_not_affect_validity() {
        let mut buf = make_valid_client_buf();
        buf[0] |= 0b1100_0000; // LI = 3 (unsynchronized)
        assert!(validate_request(&buf, buf.len()).is_ok());
    }
}
