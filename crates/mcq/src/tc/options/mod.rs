//! Qdisc option parsers.
//!
//! Each qdisc type has its own module that knows how to parse
//! command-line parameters and build netlink attributes.

pub mod mc;
