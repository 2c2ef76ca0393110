use std::collections::BTreeMap;

use catalog::{ProductFilter, ReferenceCatalog};
use foundation::math::StableF64;

/// One raw observation from the yearly dataset.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct IndicatorRecord {
    pub entity_id: u32,
    pub type_id: u8,
    /// `1..=12` for calendar months, `0` for the annual total.
    pub month_id: u8,
    pub product_id: u16,
    pub value: f64,
}

impl IndicatorRecord {
    pub fn new(entity_id: u32, type_id: u8, month_id: u8, product_id: u16, value: f64) -> Self {
        Self {
            entity_id,
            type_id,
            month_id,
            product_id,
            value,
        }
    }
}

/// Whether entities are countries or their continents.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum EntityMode {
    #[default]
    Countries,
    Continents,
}

/// Per-entity, per-type sums.
///
/// Key absence means no record matched; `0.0` is a real observed value
/// and the two must never be conflated downstream.
pub type AggregatedValue = BTreeMap<String, BTreeMap<u8, f64>>;

/// Sums matching records into per-entity indicator values.
///
/// Month `0` is the annual-total pseudo-month and only matches itself.
/// In continent mode each country contributes to its continent; ids the
/// reference tables do not carry are dropped silently (they cannot be
/// drawn anyway). Summation is order-independent.
pub fn aggregate(
    records: &[IndicatorRecord],
    month_id: u8,
    products: &ProductFilter,
    mode: EntityMode,
    tables: &ReferenceCatalog,
) -> AggregatedValue {
    let mut out = AggregatedValue::new();
    for record in records {
        if record.month_id != month_id || !products.matches(record.product_id) {
            continue;
        }
        let Ok(country) = tables.country(record.entity_id) else {
            continue;
        };
        let entity = match mode {
            EntityMode::Countries => country.name.clone(),
            EntityMode::Continents => country.continent.clone(),
        };
        *out.entry(entity)
            .or_default()
            .entry(record.type_id)
            .or_insert(0.0) += record.value;
    }
    out
}

/// Largest value of one indicator type across all entities, or `None` when
/// no entity carries that type.
pub fn max_of_type(agg: &AggregatedValue, type_id: u8) -> Option<f64> {
    agg.values()
        .filter_map(|types| types.get(&type_id))
        .copied()
        .map(StableF64)
        .max()
        .map(|v| v.0)
}
