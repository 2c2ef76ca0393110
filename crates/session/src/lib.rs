//! The interactive session: configuration, load-token lifecycle, gesture
//! routing, hit-testing, and per-frame overlay extraction.

pub mod config;
pub mod controller;
pub mod errors;
pub mod hit;

pub use config::*;
pub use controller::*;
pub use errors::*;
