//! Human-readable rendering of rates and intervals, in `tc` style.
//!
//! # Example
//!
//! ```
//! use mcq::output::formatting::{format_rate, format_usecs};
//!
//! assert_eq!(format_rate(1_250_000), "10Mbit");
//! assert_eq!(format_usecs(100_000), "100ms");
//! ```

use crate::util::rate;

/// Format a rate given in bytes/sec as a bit rate.
///
/// A unit is only taken when the value divides evenly, or is large enough
/// that the remainder does not matter (at least a million of the smaller
/// unit).
///
/// ```
/// use mcq::output::formatting::format_rate;
///
/// assert_eq!(format_rate(0), "0bit");
/// assert_eq!(format_rate(125), "1Kbit");
/// assert_eq!(format_rate(500_000), "4Mbit");
/// assert_eq!(format_rate(12_345), "98760bit");
/// ```
pub fn format_rate(bytes_per_sec: u64) -> String {
    const UNITS: [&str; 5] = ["bit", "Kbit", "Mbit", "Gbit", "Tbit"];

    let mut rate = rate::bytes_to_bits(bytes_per_sec);
    let mut unit = 0;
    while unit < UNITS.len() - 1 && rate >= 1000 && (rate % 1000 == 0 || rate >= 1_000_000) {
        rate /= 1000;
        unit += 1;
    }
    format!("{}{}", rate, UNITS[unit])
}

/// Format a time interval given in microseconds.
///
/// ```
/// use mcq::output::formatting::format_usecs;
///
/// assert_eq!(format_usecs(250), "250us");
/// assert_eq!(format_usecs(1_500), "1.5ms");
/// assert_eq!(format_usecs(2_000_000), "2s");
/// ```
pub fn format_usecs(usecs: u64) -> String {
    if usecs < 1_000 {
        return format!("{}us", usecs);
    }

    // Round to one decimal before choosing the unit, so 999_999us is 1s
    // rather than 1000.0ms.
    let ms = (usecs as f64 / 100.0).round() / 10.0;
    if ms < 1_000.0 {
        return with_unit(ms, "ms");
    }
    with_unit((usecs as f64 / 100_000.0).round() / 10.0, "s")
}

fn with_unit(value: f64, unit: &str) -> String {
    if value.fract() == 0.0 {
        format!("{}{}", value as u64, unit)
    } else {
        format!("{:.1}{}", value, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(1), "8bit");
        assert_eq!(format_rate(1_250_000), "10Mbit");
        assert_eq!(format_rate(125_000_000), "1Gbit");
        assert_eq!(format_rate(u64::MAX), "18446744Tbit");
    }

    #[test]
    fn test_format_usecs() {
        assert_eq!(format_usecs(0), "0us");
        assert_eq!(format_usecs(100_000), "100ms");
        assert_eq!(format_usecs(1_234), "1.2ms");
        assert_eq!(format_usecs(2_500_000), "2.5s");
    }

    #[test]
    fn test_format_usecs_unit_boundaries() {
        assert_eq!(format_usecs(999), "999us");
        assert_eq!(format_usecs(999_949), "999.9ms");
        assert_eq!(format_usecs(999_999), "1s");
        assert_eq!(format_usecs(1_999_999), "2s");
        assert_eq!(format_usecs(1_049_999), "1s");
    }
}
