//! Types and constants that precisely match the NTP packet header.
//!
//! Provides `ReadBytes` and `WriteBytes` implementations which extend the byteorder crate
//! `WriteBytesExt` and `ReadBytesExt` traits with the ability to read and write types from the NTP
//! protocol respectively.
//!
//! Documentation is largely derived from IETF RFC 5905.

/// NTP port number.
pub const PORT: u16 = 123;

mod io;
mod traits;
mod types;

pub use self::traits::*;
pub use self::types::*;
