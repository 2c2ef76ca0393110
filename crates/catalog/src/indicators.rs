use serde::{Deserialize, Serialize};

/// Trade flow direction of an indicator series.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Export,
    Import,
}

/// What an indicator series measures.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Measure {
    Volume,
    Value,
}

/// The indicator series the atlas can display.
///
/// Numeric ids match the published dataset: 0/1 are volumes, 2/3 are
/// monetary values, 4 is the derived export/import balance.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndicatorKind {
    ExportVolume,
    ImportVolume,
    ExportValue,
    ImportValue,
    Balance,
}

impl IndicatorKind {
    pub fn type_id(self) -> u8 {
        match self {
            IndicatorKind::ExportVolume => 0,
            IndicatorKind::ImportVolume => 1,
            IndicatorKind::ExportValue => 2,
            IndicatorKind::ImportValue => 3,
            IndicatorKind::Balance => 4,
        }
    }

    pub fn from_type_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(IndicatorKind::ExportVolume),
            1 => Some(IndicatorKind::ImportVolume),
            2 => Some(IndicatorKind::ExportValue),
            3 => Some(IndicatorKind::ImportValue),
            4 => Some(IndicatorKind::Balance),
            _ => None,
        }
    }

    /// `None` for the derived balance, which has no direction of its own.
    pub fn direction(self) -> Option<Direction> {
        match self {
            IndicatorKind::ExportVolume | IndicatorKind::ExportValue => Some(Direction::Export),
            IndicatorKind::ImportVolume | IndicatorKind::ImportValue => Some(Direction::Import),
            IndicatorKind::Balance => None,
        }
    }

    pub fn measure(self) -> Option<Measure> {
        match self {
            IndicatorKind::ExportVolume | IndicatorKind::ImportVolume => Some(Measure::Volume),
            IndicatorKind::ExportValue | IndicatorKind::ImportValue => Some(Measure::Value),
            IndicatorKind::Balance => None,
        }
    }

    /// Whether the series is derived from other series rather than stored.
    pub fn is_derived(self) -> bool {
        self == IndicatorKind::Balance
    }

    /// The pair of stored series the balance is computed from, for a given
    /// measure.
    pub fn balance_inputs(measure: Measure) -> (IndicatorKind, IndicatorKind) {
        match measure {
            Measure::Volume => (IndicatorKind::ExportVolume, IndicatorKind::ImportVolume),
            Measure::Value => (IndicatorKind::ExportValue, IndicatorKind::ImportValue),
        }
    }

    pub const STORED: [IndicatorKind; 4] = [
        IndicatorKind::ExportVolume,
        IndicatorKind::ImportVolume,
        IndicatorKind::ExportValue,
        IndicatorKind::ImportValue,
    ];
}

/// Narrows aggregation to a set of product groups.
///
/// `All` is the explicit "unfiltered" sentinel; `Only` with an empty list
/// matches nothing, which is distinct from matching everything.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductFilter {
    #[default]
    All,
    Only(Vec<u16>),
}

impl ProductFilter {
    pub fn matches(&self, product_id: u16) -> bool {
        match self {
            ProductFilter::All => true,
            ProductFilter::Only(ids) => ids.contains(&product_id),
        }
    }
}
