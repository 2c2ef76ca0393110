//! Overlay extraction: turns aggregated indicator values plus the live
//! projection into plain display-list snapshots (circles, flow arcs,
//! region fills, legend geometry).

pub mod choropleth;
pub mod circles;
pub mod flows;
pub mod legend;
pub mod palette;

pub use choropleth::*;
pub use circles::*;
pub use flows::*;
pub use legend::*;
pub use palette::*;

/// Which overlay the session is rendering.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum OverlayMode {
    #[default]
    Proportional,
    Flow,
    Balance,
}
