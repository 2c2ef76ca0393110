pub mod families;
pub mod handle;
pub mod rotation;

pub use handle::*;
pub use rotation::*;
