//! Printable implementations for decoded mc data.

mod mc;
