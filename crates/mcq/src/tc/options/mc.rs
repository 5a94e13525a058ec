//! mc qdisc options.

use crate::netlink::tc::{McConfig, QdiscConfig};
use crate::netlink::{AttrBuilder, Error, Result};
use crate::util::{parse, rate};

pub use crate::netlink::tc::MAX_BUCKETS;

/// Parse mc qdisc parameters into a configuration.
///
/// Supported parameters:
/// - `maxrate RATE` - Maximum rate (e.g., "10mbit", or "50%" of `link_speed`)
/// - `sync TIME` - Synchronization interval (e.g., "100ms")
/// - `buckets NUMBER` - Number of flow buckets (rounded up to a power of two)
///
/// `link_speed` is the device speed in bytes/sec, needed only for
/// percentage rates. Parameters are consumed as keyword/value pairs; a
/// repeated keyword replaces the earlier value. The first invalid
/// parameter aborts parsing.
pub fn parse_params<S: AsRef<str>>(params: &[S], link_speed: Option<u64>) -> Result<McConfig> {
    let mut config = McConfig::new();
    let mut args = params.iter().map(AsRef::as_ref);

    while let Some(keyword) = args.next() {
        match keyword {
            "maxrate" => {
                let value = args.next().ok_or(Error::MissingValue { option: "maxrate" })?;
                let rate = parse_maxrate(value, link_speed)?;
                tracing::debug!(option = "maxrate", rate, "parsed mc option");
                config.maxrate = Some(rate);
            }
            "sync" => {
                let value = args.next().ok_or(Error::MissingValue { option: "sync" })?;
                let interval = parse::get_time(value)
                    .ok()
                    .filter(|d| u32::try_from(d.as_micros()).is_ok())
                    .ok_or_else(|| Error::InvalidDuration {
                        token: value.to_string(),
                    })?;
                tracing::debug!(option = "sync", ?interval, "parsed mc option");
                config.sync = Some(interval);
            }
            "buckets" => {
                let value = args.next().ok_or(Error::MissingValue { option: "buckets" })?;
                let buckets = parse::get_u32(value)
                    .ok()
                    .filter(|n| (1..=MAX_BUCKETS).contains(n))
                    .ok_or_else(|| Error::InvalidNumber {
                        option: "buckets",
                        token: value.to_string(),
                    })?;
                tracing::debug!(option = "buckets", buckets, "parsed mc option");
                config.buckets = Some(buckets);
            }
            other => {
                return Err(Error::UnrecognizedOption {
                    token: other.to_string(),
                });
            }
        }
    }

    Ok(config)
}

/// Build mc qdisc options from parameters into an open `TCA_OPTIONS` nest.
///
/// Nothing is appended unless every parameter is valid.
pub fn build<S: AsRef<str>>(
    builder: &mut AttrBuilder,
    params: &[S],
    link_speed: Option<u64>,
) -> Result<()> {
    parse_params(params, link_speed)?.write_options(builder)
}

/// Resolve a `maxrate` value to bytes/sec.
///
/// `u32::MAX` is the kernel's "unlimited" value and is rejected, since it
/// would not read back as a rate.
fn parse_maxrate(value: &str, link_speed: Option<u64>) -> Result<u32> {
    let invalid = || Error::InvalidRate {
        token: value.to_string(),
    };

    let bytes = if value.contains('%') {
        let fraction = parse::get_percent(value).map_err(|_| invalid())?;
        let speed = link_speed.ok_or_else(invalid)?;
        (speed as f64 * fraction) as u64
    } else {
        rate::bits_to_bytes(parse::get_rate(value).map_err(|_| invalid())?)
    };

    u32::try_from(bytes)
        .ok()
        .filter(|&rate| rate != u32::MAX)
        .ok_or_else(invalid)
}
