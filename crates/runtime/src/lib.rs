pub mod event_bus;
pub mod frame;
pub mod transitions;

pub use event_bus::*;
pub use frame::*;
pub use transitions::*;
