//! Shared utilities for mcq.

pub mod parse;
pub mod rate;

pub use parse::{get_percent, get_rate, get_time, get_u32};
