//! Typed TC (Traffic Control) configuration and the options encoder.
//!
//! # Example
//!
//! ```
//! use mcq::netlink::tc::{McConfig, encode_options};
//! use mcq::netlink::DEFAULT_OPTIONS_CAPACITY;
//! use std::time::Duration;
//!
//! let mc = McConfig::new()
//!     .maxrate(1_250_000) // 10mbit
//!     .sync(Duration::from_millis(100))
//!     .build();
//!
//! let block = encode_options(&mc, DEFAULT_OPTIONS_CAPACITY)?;
//! assert_eq!(block.len(), 4 + 8 + 8);
//! # Ok::<(), mcq::netlink::Error>(())
//! ```

use std::time::Duration;

use super::builder::AttrBuilder;
use super::error::{Error, Result};
use super::types::tc::TcaAttr;
use super::types::tc::qdisc::mc;

// ============================================================================
// QdiscConfig trait
// ============================================================================

/// Trait for qdisc configurations that can be encoded.
pub trait QdiscConfig {
    /// Get the qdisc kind (e.g., "mc").
    fn kind(&self) -> &'static str;

    /// Write the qdisc options into an open `TCA_OPTIONS` nest.
    fn write_options(&self, builder: &mut AttrBuilder) -> Result<()>;
}

/// Encode a configuration as a `TCA_OPTIONS` nested attribute.
///
/// The block is bounded to `capacity` bytes. An empty configuration still
/// produces the (empty) options nest.
pub fn encode_options(config: &impl QdiscConfig, capacity: usize) -> Result<Vec<u8>> {
    let mut builder = AttrBuilder::with_capacity(capacity);
    builder.nest_start(TcaAttr::Options as u16)?;
    config.write_options(&mut builder)?;
    builder.nest_end()?;
    let block = builder.finish()?;
    tracing::trace!(kind = config.kind(), len = block.len(), "encoded qdisc options");
    Ok(block)
}

// ============================================================================
// McConfig
// ============================================================================

/// Largest accepted bucket count (2^31); larger counts would need a log2
/// of 32, which the kernel cannot shift by.
pub const MAX_BUCKETS: u32 = 1 << 31;

/// mc (multi-queue fair queue) qdisc configuration.
///
/// Every field is optional; an unset field is left out of the encoded block
/// so the kernel keeps its default.
///
/// # Example
///
/// ```
/// use mcq::netlink::tc::McConfig;
///
/// let config = McConfig::new().maxrate(500_000).buckets(1024).build();
/// assert_eq!(config.buckets_log(), Some(10));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct McConfig {
    /// Maximum rate in bytes/sec.
    pub maxrate: Option<u32>,
    /// Synchronization interval.
    pub sync: Option<Duration>,
    /// Number of flow buckets (rounded up to a power of two on the wire).
    pub buckets: Option<u32>,
}

impl McConfig {
    /// Create a new mc configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum rate in bytes/sec.
    pub fn maxrate(mut self, bytes_per_sec: u32) -> Self {
        self.maxrate = Some(bytes_per_sec);
        self
    }

    /// Set the synchronization interval.
    pub fn sync(mut self, interval: Duration) -> Self {
        self.sync = Some(interval);
        self
    }

    /// Set the number of flow buckets.
    pub fn buckets(mut self, count: u32) -> Self {
        self.buckets = Some(count);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Self {
        self
    }

    /// Check if no option is set.
    pub fn is_empty(&self) -> bool {
        self.maxrate.is_none() && self.sync.is_none() && self.buckets.is_none()
    }

    /// The bucket count as sent to the kernel (log2, rounded up).
    pub fn buckets_log(&self) -> Option<u32> {
        self.buckets.map(ilog2_ceil)
    }

    /// The synchronization interval in microseconds, if it fits in a u32.
    fn sync_usecs(&self) -> Result<Option<u32>> {
        self.sync
            .map(|d| {
                u32::try_from(d.as_micros()).map_err(|_| Error::InvalidDuration {
                    token: format!("{:?}", d),
                })
            })
            .transpose()
    }

    /// The bucket log to send, if the count is in `1..=MAX_BUCKETS`.
    fn checked_buckets_log(&self) -> Result<Option<u32>> {
        match self.buckets {
            Some(n) if !(1..=MAX_BUCKETS).contains(&n) => Err(Error::InvalidNumber {
                option: "buckets",
                token: n.to_string(),
            }),
            _ => Ok(self.buckets_log()),
        }
    }
}

impl QdiscConfig for McConfig {
    fn kind(&self) -> &'static str {
        mc::KIND
    }

    fn write_options(&self, builder: &mut AttrBuilder) -> Result<()> {
        // Check values before appending so a failure leaves nothing behind.
        let sync = self.sync_usecs()?;
        let buckets_log = self.checked_buckets_log()?;

        if let Some(rate) = self.maxrate {
            builder.append_attr_u32(mc::TCA_MC_MAX_RATE, rate)?;
        }
        if let Some(usecs) = sync {
            builder.append_attr_u32(mc::TCA_MC_SYNC_TIME, usecs)?;
        }
        if let Some(log) = buckets_log {
            builder.append_attr_u32(mc::TCA_MC_BUCKETS_LOG, log)?;
        }
        Ok(())
    }
}

/// Number of bits needed to index `val` slots: `ceil(log2(val))`.
///
/// `ilog2_ceil(1) == 0`, `ilog2_ceil(1000) == 10`, `ilog2_ceil(1024) == 10`.
/// Zero maps to zero.
pub fn ilog2_ceil(val: u32) -> u32 {
    match val {
        0 | 1 => 0,
        v => u32::BITS - (v - 1).leading_zeros(),
    }
}
