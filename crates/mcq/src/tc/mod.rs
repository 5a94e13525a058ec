//! Traffic control utilities for mcq.
//!
//! This module turns `tc qdisc ... mc PARAMS` argument lists into typed
//! qdisc configurations.

pub mod options;
