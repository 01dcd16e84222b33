// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! NTP wire format types and timestamp conversions.
//!
//! This crate provides the foundational types and codec for the fixed
//! 48-byte Network Time Protocol header (RFC 5905), used by the
//! interleaved-capable server in `ntp_weave-server`.

#![warn(missing_docs)]

/// NTP protocol types, constants, and the packet codec (RFC 5905).
pub mod protocol;

/// Unix time conversion utilities for NTP timestamps.
pub mod unix_time;
