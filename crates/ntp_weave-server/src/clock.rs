//! Clock reading with randomized low-order jitter.
//!
//! The responder timestamps every exchange with [`TimeSource::read_clock`].
//! The production implementation, [`SystemClock`], converts the system wall
//! clock to NTP fixed-point representation and perturbs the low-order
//! fraction bits with a random value whose bit-width is `32 + precision`
//! (precision is negative, e.g. -20, so the randomized span is small). The
//! jitter limits the clock resolution an observer can infer from response
//! timestamps while keeping the values usable as cache keys.

use crate::protocol::TimestampFormat;
use crate::unix_time;

/// A source of NTP timestamps for the responder.
///
/// Implementations must be callable at high frequency, never block, and have
/// no observable side effects beyond the returned value.
pub trait TimeSource {
    /// Read the current time as an NTP timestamp.
    fn read_clock(&mut self) -> TimestampFormat;
}

/// The system wall clock with randomized low-order jitter.
pub struct SystemClock {
    jitter_mask: u64,
}

impl SystemClock {
    /// Create a clock whose jitter width is derived from the given precision
    /// exponent (log2 seconds, e.g. -20).
    pub fn new(precision: i8) -> Self {
        SystemClock {
            jitter_mask: jitter_mask(precision),
        }
    }
}

impl TimeSource for SystemClock {
    fn read_clock(&mut self) -> TimestampFormat {
        let now: TimestampFormat = unix_time::Instant::now().into();
        let jitter = rand::random::<u64>() & self.jitter_mask;
        TimestampFormat::from_u64(now.as_u64() ^ jitter)
    }
}

/// Mask selecting the `32 + precision` low-order bits to randomize.
fn jitter_mask(precision: i8) -> u64 {
    let bits = (32 + i32::from(precision)).clamp(0, 63);
    (1u64 << bits) - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_width_for_typical_precision() {
        // precision -20 randomizes the low 12 bits.
        assert_eq!(jitter_mask(-20), 0xFFF);
    }

    #[test]
    fn mask_width_extremes() {
        assert_eq!(jitter_mask(-32), 0);
        assert_eq!(jitter_mask(-31), 1);
        assert_eq!(jitter_mask(0), 0xFFFF_FFFF);
        // Anything below -32 still produces an empty mask.
        assert_eq!(jitter_mask(-100), 0);
    }

    #[test]
    fn jitter_confined_to_masked_bits() {
        let mask = jitter_mask(-20);
        let mut clock = SystemClock::new(-20);

        let before: TimestampFormat = unix_time::Instant::now().into();
        let read = clock.read_clock();
        let after: TimestampFormat = unix_time::Instant::now().into();

        // Only the low 12 bits may differ from the true time, so with the
        // masked bits cleared the reading must fall between the bracketing
        // true readings.
        let high = read.as_u64() & !mask;
        assert!(high >= before.as_u64() & !mask);
        assert!(high <= after.as_u64() & !mask);
    }

    #[test]
    fn unjittered_clock_tracks_system_time() {
        let mut clock = SystemClock::new(-32);
        let expected: TimestampFormat = unix_time::Instant::now().into();
        let read = clock.read_clock();
        assert!(read.seconds.abs_diff(expected.seconds) <= 1);
    }
}
