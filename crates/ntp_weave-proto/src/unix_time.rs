use crate::protocol;
use std::time;

/// The number of seconds from 1st January 1900 UTC to the start of the Unix epoch.
pub const EPOCH_DELTA: i64 = 2_208_988_800;

// The NTP fractional scale (32-bit).
const NTP_SCALE: f64 = u32::MAX as f64;

/// Describes an instant relative to the `UNIX_EPOCH` - 00:00:00 Coordinated Universal Time (UTC),
/// Thursday, 1 January 1970 in seconds with the fractional part in nanoseconds.
///
/// If the **Instant** describes some moment prior to `UNIX_EPOCH`, both the `secs` and
/// `subsec_nanos` components will be negative.
///
/// The sole purpose of this type is for retrieving the "current" time using the `std::time` module
/// and for converting into the NTP timestamp format.
#[derive(Copy, Clone, Debug)]
pub struct Instant {
    secs: i64,
    subsec_nanos: i32,
}

impl Instant {
    /// Create a new **Instant** given its `secs` and `subsec_nanos` components.
    ///
    /// To indicate a time following `UNIX_EPOCH`, both `secs` and `subsec_nanos` must be positive.
    /// To indicate a time prior to `UNIX_EPOCH`, both `secs` and `subsec_nanos` must be negative.
    /// Violating these invariants will result in a **panic!**.
    pub fn new(secs: i64, subsec_nanos: i32) -> Instant {
        if secs > 0 && subsec_nanos < 0 {
            panic!("invalid instant: secs was positive but subsec_nanos was negative");
        }
        if secs < 0 && subsec_nanos > 0 {
            panic!("invalid instant: secs was negative but subsec_nanos was positive");
        }
        Instant { secs, subsec_nanos }
    }

    /// Uses `std::time::SystemTime::now` and `std::time::UNIX_EPOCH` to determine the current
    /// **Instant**.
    pub fn now() -> Self {
        match time::SystemTime::now().duration_since(time::UNIX_EPOCH) {
            Ok(duration) => {
                let secs = duration.as_secs() as i64;
                let subsec_nanos = duration.subsec_nanos() as i32;
                Instant::new(secs, subsec_nanos)
            }
            Err(sys_time_err) => {
                let duration_pre_unix_epoch = sys_time_err.duration();
                let secs = -(duration_pre_unix_epoch.as_secs() as i64);
                let subsec_nanos = -(duration_pre_unix_epoch.subsec_nanos() as i32);
                Instant::new(secs, subsec_nanos)
            }
        }
    }

    /// The "seconds" component of the **Instant**.
    pub fn secs(&self) -> i64 {
        self.secs
    }

    /// The fractional component of the **Instant** in nanoseconds.
    pub fn subsec_nanos(&self) -> i32 {
        self.subsec_nanos
    }
}

impl From<Instant> for protocol::TimestampFormat {
    /// Converts a Unix [`Instant`] to a 32-bit NTP timestamp.
    ///
    /// **Note**: This truncates to 32 bits, losing era information. The resulting
    /// [`protocol::TimestampFormat`] is correct for NTPv4 on-wire use.
    fn from(t: Instant) -> Self {
        let sec = t.secs() + EPOCH_DELTA;
        let frac = t.subsec_nanos() as f64 * NTP_SCALE / 1e9;
        protocol::TimestampFormat {
            seconds: sec as u32,
            fraction: frac as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_epoch_maps_to_epoch_delta() {
        let ts: protocol::TimestampFormat = Instant::new(0, 0).into();
        assert_eq!(ts.seconds, EPOCH_DELTA as u32);
        assert_eq!(ts.fraction, 0);
    }

    #[test]
    fn known_date_conversion() {
        // 2024-01-01 00:00:00 UTC: Unix=1704067200, NTP=3913056000.
        let ts: protocol::TimestampFormat = Instant::new(1_704_067_200, 0).into();
        assert_eq!(ts.seconds, 3_913_056_000);
    }

    #[test]
    fn half_second_fraction() {
        let ts: protocol::TimestampFormat = Instant::new(0, 500_000_000).into();
        // Half a second is half of the 32-bit fraction range, within rounding.
        let expected = (u32::MAX / 2) as i64;
        assert!((i64::from(ts.fraction) - expected).abs() <= 4);
    }

    #[test]
    fn now_is_past_2020() {
        let ts: protocol::TimestampFormat = Instant::now().into();
        // 2020-01-01 00:00:00 UTC in NTP seconds.
        assert!(ts.seconds > 3_786_825_600);
    }

    #[test]
    #[should_panic]
    fn mixed_sign_instant_panics() {
        let _ = Instant::new(1, -1);
    }
}
