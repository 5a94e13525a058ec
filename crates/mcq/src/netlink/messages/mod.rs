//! Strongly-typed netlink messages.

mod tc;

pub use tc::TcMessage;
