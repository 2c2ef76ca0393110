//! Reference tables the atlas joins against: countries, continents,
//! indicator kinds, and base-map resolutions.

pub mod indicators;
pub mod reference;
pub mod resolutions;

pub use indicators::*;
pub use reference::*;
pub use resolutions::*;
