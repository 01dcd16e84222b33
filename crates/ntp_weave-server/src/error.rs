// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Custom error types for the NTP server.
//!
//! All public APIs return `io::Result<T>`. Internally, errors are constructed
//! as `NtpServerError` variants and converted to `io::Error` automatically via
//! `From<NtpServerError> for io::Error`.
//!
//! Users who want programmatic error matching can downcast via
//! `io::Error::get_ref()`:
//!
//! ```no_run
//! use ntp_weave_server::error::NtpServerError;
//!
//! # fn example(result: std::io::Result<()>) {
//! match result {
//!     Ok(()) => println!("server running"),
//!     Err(e) => {
//!         if let Some(srv_err) = e.get_ref()
//!             .and_then(|inner| inner.downcast_ref::<NtpServerError>())
//!         {
//!             match srv_err {
//!                 NtpServerError::Protocol(p) => eprintln!("protocol error: {p}"),
//!                 _ => eprintln!("server error: {srv_err}"),
//!             }
//!         }
//!     }
//! }
//! # }
//! ```

use std::fmt;
use std::io;

/// Errors that can occur during NTP server operations.
#[derive(Debug)]
pub enum NtpServerError {
    /// NTP protocol validation failure (malformed requests, unexpected fields).
    Protocol(ProtocolError),
    /// Underlying I/O error (socket bind, send/recv, etc.).
    Io(io::Error),
}

/// NTP protocol validation errors for incoming client requests.
///
/// These correspond to the checks performed in `server_common::validation`.
#[derive(Clone, Debug)]
pub enum ProtocolError {
    /// Request packet too short (< 48 bytes).
    RequestTooShort {
        /// Number of bytes received.
        received: usize,
    },
    /// Request has a mode outside the accepted set (1-4).
    UnexpectedMode {
        /// The mode value received.
        mode: u8,
    },
    /// Unsupported NTP version in request (accepted: 1-3).
    UnsupportedVersion {
        /// The version value received.
        version: u8,
    },
}

// ── Display implementations ─────────────────────────────────────────

impl fmt::Display for NtpServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NtpServerError::Protocol(e) => write!(f, "NTP server protocol error: {e}"),
            NtpServerError::Io(e) => write!(f, "{e}"),
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::RequestTooShort { received } => {
                write!(f, "NTP request too short ({received} bytes)")
            }
            ProtocolError::UnexpectedMode { mode } => {
                write!(f, "unexpected request mode: {mode}")
            }
            ProtocolError::UnsupportedVersion { version } => {
                write!(f, "unsupported NTP version: {version}")
            }
        }
    }
}

// ── Error trait implementations ─────────────────────────────────────

impl std::error::Error for NtpServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NtpServerError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for ProtocolError {}

// ── From conversions ────────────────────────────────────────────────

impl From<NtpServerError> for io::Error {
    fn from(err: NtpServerError) -> io::Error {
        // Preserve the original io::Error directly for the Io variant.
        match err {
            NtpServerError::Io(e) => e,
            NtpServerError::Protocol(_) => io::Error::new(io::ErrorKind::InvalidData, err),
        }
    }
}

impl From<io::Error> for NtpServerError {
    fn from(err: io::Error) -> NtpServerError {
        NtpServerError::Io(err)
    }
}

impl From<ProtocolError> for NtpServerError {
    fn from(err: ProtocolError) -> NtpServerError {
        NtpServerError::Protocol(err)
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_error_display() {
        let e = ProtocolError::RequestTooShort { received: 10 };
        assert_eq!(e.to_string(), "NTP request too short (10 bytes)");
    }

    #[test]
    fn test_protocol_error_unexpected_mode() {
        let e = ProtocolError::UnexpectedMode { mode: 5 };
        assert_eq!(e.to_string(), "unexpected request mode: 5");
    }

    #[test]
    fn test_protocol_error_unsupported_version() {
        let e = ProtocolError::UnsupportedVersion { version: 7 };
        assert_eq!(e.to_string(), "unsupported NTP version: 7");
    }

    #[test]
    fn test_server_error_to_io_error_kind() {
        let io_err: io::Error =
            NtpServerError::Protocol(ProtocolError::RequestTooShort { received: 0 }).into();
        assert_eq!(io_err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_server_error_downcast_roundtrip() {
        let err = NtpServerError::Protocol(ProtocolError::UnexpectedMode { mode: 0 });
        let io_err: io::Error = err.into();

        let inner = io_err
            .get_ref()
            .unwrap()
            .downcast_ref::<NtpServerError>()
            .unwrap();
        assert!(matches!(
            inner,
            NtpServerError::Protocol(ProtocolError::UnexpectedMode { mode: 0 })
        ));
    }

    #[test]
    fn test_io_error_passthrough() {
        let orig = io::Error::new(io::ErrorKind::ConnectionReset, "reset");
        let kind = orig.kind();
        let srv_err = NtpServerError::Io(orig);
        let io_err: io::Error = srv_err.into();
        assert_eq!(io_err.kind(), kind);
        assert_eq!(io_err.to_string(), "reset");
    }

    #[test]
    fn test_from_protocol_error() {
        let proto_err = ProtocolError::UnsupportedVersion { version: 0 };
        let srv_err: NtpServerError = proto_err.into();
        assert!(matches!(srv_err, NtpServerError::Protocol(_)));
    }
}
