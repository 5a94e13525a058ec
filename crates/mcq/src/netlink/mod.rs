//! Netlink attribute codec for the mc qdisc.
//!
//! This module provides:
//! - [`AttrBuilder`] for encoding nested attribute blocks under a size bound
//! - [`AttrIter`] and [`parse_attrs`] for walking received blocks
//! - typed qdisc configuration ([`tc`]) and options decoding ([`tc_options`])
//! - version-tolerant statistics decoding ([`stats`])

pub mod attr;
pub mod builder;
mod error;
pub mod messages;
pub mod parse;
pub mod stats;
pub mod tc;
pub mod tc_options;
pub mod types;

pub use attr::{AttrIter, AttrTable, NlAttr, parse_attrs};
pub use builder::{AttrBuilder, DEFAULT_OPTIONS_CAPACITY};
pub use error::{Error, Result};
