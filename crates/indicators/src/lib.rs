//! Turns raw per-record trade data into per-entity indicator values.

pub mod aggregate;
pub mod balance;

pub use aggregate::*;
pub use balance::*;
