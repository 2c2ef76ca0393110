use std::collections::BTreeMap;

use catalog::{IndicatorKind, Measure};

/// Which balance figure to derive from the export/import pair.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum BalanceKind {
    /// Raw difference `export - import`, in the measure's own unit.
    Absolute,
    /// Normalized `(export - import) / (export + import)`, in `[-1, 1]`.
    #[default]
    Relative,
}

/// Trade balance of one entity for the given measure and kind.
///
/// Returns `None` when neither stored series is present (no data). A
/// present-but-zero pair yields `0.0`, keeping "no data" and "balanced"
/// distinct.
pub fn trade_balance(values: &BTreeMap<u8, f64>, measure: Measure, kind: BalanceKind) -> Option<f64> {
    let (export_kind, import_kind) = IndicatorKind::balance_inputs(measure);
    let export = values.get(&export_kind.type_id()).copied();
    let import = values.get(&import_kind.type_id()).copied();
    if export.is_none() && import.is_none() {
        return None;
    }
    let e = export.unwrap_or(0.0);
    let i = import.unwrap_or(0.0);
    match kind {
        BalanceKind::Absolute => Some(e - i),
        BalanceKind::Relative => {
            let denom = e + i;
            if denom == 0.0 {
                return Some(0.0);
            }
            Some((e - i) / denom)
        }
    }
}

/// Relative trade balance, the choropleth default.
pub fn relative_balance(values: &BTreeMap<u8, f64>, measure: Measure) -> Option<f64> {
    trade_balance(values, measure, BalanceKind::Relative)
}
