//! Encoding and decoding of traffic control attributes for the `mc`
//! (multi-queue fair queue) qdisc.
//!
//! # Modules
//!
//! - [`netlink`] - attribute builder, iterator, options and stats decoders
//! - [`tc`] - `tc qdisc ... mc PARAMS` argument validation
//! - [`util`] - rate, time and number parsing
//! - `output` - text/JSON presentation (feature `output`)
//!
//! # Example
//!
//! ```
//! use mcq::netlink::tc::encode_options;
//! use mcq::netlink::tc_options::parse_mc_options;
//! use mcq::netlink::DEFAULT_OPTIONS_CAPACITY;
//! use mcq::tc::options::mc;
//!
//! let config = mc::parse_params(&["maxrate", "10mbit", "sync", "100ms"], None)?;
//! let block = encode_options(&config, DEFAULT_OPTIONS_CAPACITY)?;
//!
//! let decoded = parse_mc_options(&block)?;
//! assert_eq!(decoded.maxrate, Some(1_250_000));
//! # Ok::<(), mcq::Error>(())
//! ```

pub mod netlink;
pub mod tc;
pub mod util;

#[cfg(feature = "output")]
pub mod output;

pub use netlink::{Error, Result};
