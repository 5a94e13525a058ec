//! Rate conversion utilities.
//!
//! Rate strings parse to bits per second, while the kernel takes rates in
//! bytes per second.
//!
//! # Example
//!
//! ```
//! use mcq::util::rate;
//!
//! // Convert 1 Mbps to bytes per second
//! let bps = rate::mbps_to_bytes(1);
//! assert_eq!(bps, Some(125_000));
//! ```

/// Convert megabits per second (as reported for link speeds) to bytes per
/// second. `None` on overflow.
///
/// # Example
///
/// ```
/// use mcq::util::rate::mbps_to_bytes;
///
/// assert_eq!(mbps_to_bytes(1), Some(125_000));       // 1 Mbps
/// assert_eq!(mbps_to_bytes(1000), Some(125_000_000)); // 1 Gbps
/// ```
#[inline]
pub const fn mbps_to_bytes(mbps: u64) -> Option<u64> {
    match mbps.checked_mul(1_000_000) {
        Some(bits) => Some(bits / 8),
        None => None,
    }
}

/// Convert bits per second to bytes per second.
///
/// # Example
///
/// ```
/// use mcq::util::rate::bits_to_bytes;
///
/// assert_eq!(bits_to_bytes(1_000_000), 125_000); // 1 Mbps
/// assert_eq!(bits_to_bytes(8), 1);               // 8 bps = 1 Bps
/// ```
#[inline]
pub const fn bits_to_bytes(bps: u64) -> u64 {
    bps / 8
}

/// Convert bytes per second to bits per second.
///
/// # Example
///
/// ```
/// use mcq::util::rate::bytes_to_bits;
///
/// assert_eq!(bytes_to_bits(125_000), 1_000_000); // 1 Mbps
/// assert_eq!(bytes_to_bits(1), 8);               // 1 Bps = 8 bps
/// ```
///
/// Saturates at `u64::MAX`.
#[inline]
pub const fn bytes_to_bits(bps: u64) -> u64 {
    bps.saturating_mul(8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mbps_to_bytes() {
        assert_eq!(mbps_to_bytes(0), Some(0));
        assert_eq!(mbps_to_bytes(100), Some(12_500_000));
        assert_eq!(mbps_to_bytes(u64::MAX), None);
    }

    #[test]
    fn test_bits_bytes() {
        assert_eq!(bits_to_bytes(8), 1);
        assert_eq!(bits_to_bytes(10_000_000), 1_250_000);
        assert_eq!(bytes_to_bits(1), 8);
        assert_eq!(bytes_to_bits(125_000), 1_000_000);
        assert_eq!(bytes_to_bits(u64::MAX), u64::MAX);
    }
}
