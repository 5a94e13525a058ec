//! tc subcommands.

pub mod qdisc;
