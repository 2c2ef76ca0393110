//! Base-map geometry: feature model, GeoJSON decoding, and the cached
//! per-resolution store.

pub mod feature;
pub mod geojson;
pub mod merge;
pub mod store;

pub use feature::*;
pub use merge::*;
pub use store::*;
