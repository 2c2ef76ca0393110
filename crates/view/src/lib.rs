//! One logical view (zoom + geographic center) kept consistent across
//! planar pan/zoom and quaternion globe rotation.

pub mod globe;
pub mod planar;
pub mod state;

pub use globe::*;
pub use planar::*;
pub use state::*;
