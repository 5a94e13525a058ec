//! Kernel structures and attribute constants.

pub mod tc;
