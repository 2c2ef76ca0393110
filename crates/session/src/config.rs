use catalog::{IndicatorKind, Measure, ProductFilter, Resolution};
use foundation::math::{LonLat, Vec2};
use indicators::{BalanceKind, EntityMode};

/// Everything the host can reconfigure mid-session.
///
/// A change arrives as a whole new value; the controller diffs it against
/// the current one to decide what needs reloading.
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasConfig {
    /// Projection family name, resolved through the factory.
    pub projection_family: String,
    pub resolution: Resolution,
    pub entity_mode: EntityMode,
    pub indicator: IndicatorKind,
    /// Measure used when deriving the balance.
    pub balance_measure: Measure,
    /// Absolute difference or normalized share.
    pub balance_kind: BalanceKind,
    pub year: u16,
    /// `0` selects the annual total.
    pub month_id: u8,
    pub products: ProductFilter,
    /// Markers keep constant screen size under zoom when set.
    pub static_markers: bool,
    /// Swap to the colorblind-safe diverging palette.
    pub cvd: bool,
    pub viewport: Vec2,
    pub base_scale: f64,
    pub initial_center: LonLat,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            projection_family: "equal-earth".to_string(),
            resolution: Resolution::Low,
            entity_mode: EntityMode::Countries,
            indicator: IndicatorKind::ExportValue,
            balance_measure: Measure::Value,
            balance_kind: BalanceKind::Relative,
            year: 2024,
            month_id: 0,
            products: ProductFilter::All,
            static_markers: true,
            cvd: false,
            viewport: Vec2::new(960.0, 500.0),
            base_scale: 160.0,
            initial_center: LonLat { lon: 0.0, lat: 0.0 },
        }
    }
}
