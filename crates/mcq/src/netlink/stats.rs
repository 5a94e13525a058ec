//! Decoding of version-skewed statistics blobs.
//!
//! The kernel reports qdisc extended statistics (`TCA_XSTATS`) as a raw C
//! structure whose size depends on the kernel version. A reader copies at
//! most its own structure size, so:
//!
//! - a newer, larger blob decodes without error and its extra trailing
//!   bytes are ignored;
//! - an older, smaller blob decodes without error and the fields it does
//!   not carry read as zero.
//!
//! # Example
//!
//! ```
//! use mcq::netlink::stats::parse_mc_xstats;
//!
//! // An old kernel that only knew about `gc_flows`.
//! let stats = parse_mc_xstats(&7u64.to_ne_bytes());
//! assert_eq!(stats.gc_flows, 7);
//! assert_eq!(stats.throttled, 0);
//! ```

use zerocopy::{FromBytes, FromZeros, IntoBytes};

use super::types::tc::qdisc::mc::TcMcQdStats;

/// Zero `dst`, then copy the common prefix of `src` into it.
///
/// Returns the number of bytes copied, `min(src.len(), dst.len())`.
pub fn copy_truncated(src: &[u8], dst: &mut [u8]) -> usize {
    let n = src.len().min(dst.len());
    dst.fill(0);
    dst[..n].copy_from_slice(&src[..n]);
    n
}

/// Decode a fixed-layout structure from a blob of any length.
///
/// Never fails and never reads past either buffer.
pub fn decode_stats_blob<T: FromBytes + IntoBytes + FromZeros>(src: &[u8]) -> T {
    let mut out = T::new_zeroed();
    let expected = std::mem::size_of::<T>();
    let copied = copy_truncated(src, out.as_mut_bytes());
    if src.len() != expected {
        tracing::debug!(
            received = src.len(),
            expected,
            copied,
            "stats blob size differs from local structure"
        );
    }
    out
}

/// Decode mc extended statistics.
pub fn parse_mc_xstats(data: &[u8]) -> TcMcQdStats {
    decode_stats_blob(data)
}
