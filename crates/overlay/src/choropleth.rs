use catalog::Measure;
use foundation::math::StableF64;
use indicators::{AggregatedValue, BalanceKind, trade_balance};

use crate::palette::{Color, DivergingPalette, NO_DATA_FILL};

/// Fill decision for one region.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum RegionShade {
    /// No stored series matched this region at all.
    NoData,
    Balance { balance: f64, color: Color },
}

impl RegionShade {
    pub fn color(&self) -> Color {
        match self {
            RegionShade::NoData => NO_DATA_FILL,
            RegionShade::Balance { color, .. } => *color,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionFill {
    pub entity: String,
    pub shade: RegionShade,
}

/// Steps in the rasterized legend gradient.
pub const RAMP_STEPS: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub struct BalanceSnapshot {
    /// One fill per region the caller asked about, in the given order.
    pub fills: Vec<RegionFill>,
    /// Legend gradient from the import-dominant end to the
    /// export-dominant end.
    pub ramp: Vec<Color>,
}

/// Computes the diverging choropleth for the named regions.
///
/// A region absent from the aggregation (or carrying neither stored
/// series) gets the no-data fill; a balanced region gets the neutral
/// stop. That distinction is the whole point of keying by absence.
///
/// Relative balances are already in `[-1, 1]` and sample the palette
/// directly; absolute balances are normalized by the largest magnitude
/// among the regions so the hue encodes the within-frame share.
pub fn extract_balance(
    entities: &[String],
    agg: &AggregatedValue,
    measure: Measure,
    kind: BalanceKind,
    cvd: bool,
) -> BalanceSnapshot {
    let palette = DivergingPalette::for_cvd(cvd);
    let balances: Vec<Option<f64>> = entities
        .iter()
        .map(|entity| {
            agg.get(entity)
                .and_then(|types| trade_balance(types, measure, kind))
        })
        .collect();
    let norm = match kind {
        BalanceKind::Relative => 1.0,
        BalanceKind::Absolute => balances
            .iter()
            .flatten()
            .map(|b| StableF64(b.abs()))
            .max()
            .map(|v| v.0)
            .filter(|m| *m > 0.0)
            .unwrap_or(1.0),
    };
    let fills = entities
        .iter()
        .zip(&balances)
        .map(|(entity, balance)| {
            let shade = balance.map_or(RegionShade::NoData, |balance| RegionShade::Balance {
                balance,
                color: palette.sample(balance / norm),
            });
            RegionFill {
                entity: entity.clone(),
                shade,
            }
        })
        .collect();
    BalanceSnapshot {
        fills,
        ramp: palette.ramp(RAMP_STEPS),
    }
}
