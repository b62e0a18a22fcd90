//! Database query implementations.

pub mod businesses;
