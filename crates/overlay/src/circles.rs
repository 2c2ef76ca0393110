use std::collections::BTreeMap;

use foundation::math::{LonLat, Vec2};
use indicators::AggregatedValue;
use projection::ProjectionHandle;
use runtime::transitions::{Phase, Transitions};

use crate::legend::{LegendPanel, LegendScale};
use crate::palette::{ColorRegistry, MarkerPalette};

/// Enter/update/exit tween length for proportional markers.
pub const MARKER_TRANSITION_S: f64 = 0.25;

#[derive(Debug, Clone, PartialEq)]
pub struct CircleMarker {
    pub entity: String,
    pub value: f64,
    pub center: Vec2,
    /// Animated screen radius; entering markers grow from zero, exiting
    /// markers shrink toward it.
    pub radius: f64,
    pub palette: MarkerPalette,
    pub phase: Phase,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LegendCircle {
    pub value: f64,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CirclesSnapshot {
    pub markers: Vec<CircleMarker>,
    pub legend: Vec<LegendCircle>,
    pub panel: LegendPanel,
}

/// Retargets the marker tweens against the current aggregation.
///
/// Entities present in the aggregation head toward their scaled radius;
/// entities that vanished start their exit tween. Idempotent under
/// repeated application with the same inputs.
pub fn reconcile_circles(
    transitions: &mut Transitions,
    agg: &AggregatedValue,
    type_id: u8,
    scale: &LegendScale,
    k: f64,
) {
    let stale: Vec<String> = transitions
        .keys()
        .filter(|key| !agg.get(*key).is_some_and(|t| t.contains_key(&type_id)))
        .map(|k| k.to_string())
        .collect();
    for key in stale {
        transitions.remove(&key, MARKER_TRANSITION_S);
    }

    for (entity, types) in agg {
        if let Some(value) = types.get(&type_id) {
            let radius = scale.rendered_extent(*value, k);
            transitions.target(entity, radius, MARKER_TRANSITION_S);
        }
    }
}

/// Extracts the circle display list for the current frame.
///
/// Entities with no anchor in the reference tables, or whose anchor falls
/// on the globe's far hemisphere, produce no marker. Note that an entity
/// with a real `0.0` value still gets a marker (of minimal radius); only
/// key absence means "no data".
pub fn extract_circles(
    transitions: &Transitions,
    agg: &AggregatedValue,
    type_id: u8,
    anchors: &BTreeMap<String, LonLat>,
    projection: &ProjectionHandle,
    colors: &mut ColorRegistry,
    scale: &LegendScale,
    k: f64,
) -> CirclesSnapshot {
    let mut markers = Vec::new();
    for entity in transitions.keys().map(|s| s.to_string()).collect::<Vec<_>>() {
        let Some(anchor) = anchors.get(&entity) else {
            continue;
        };
        let Some(center) = projection.forward(*anchor) else {
            continue;
        };
        let radius = transitions.value(&entity).unwrap_or(0.0);
        let phase = transitions.phase(&entity).unwrap_or(Phase::Active);
        let value = agg
            .get(&entity)
            .and_then(|t| t.get(&type_id))
            .copied()
            .unwrap_or(0.0);
        markers.push(CircleMarker {
            palette: colors.assign(&entity),
            entity,
            value,
            center,
            radius,
            phase,
        });
    }

    let legend: Vec<LegendCircle> = if markers.is_empty() {
        Vec::new()
    } else {
        scale
            .legend_values()
            .iter()
            .map(|v| LegendCircle {
                value: *v,
                radius: scale.rendered_extent(*v, k),
            })
            .collect()
    };
    let panel = LegendPanel::layout(legend.len(), k);

    CirclesSnapshot {
        markers,
        legend,
        panel,
    }
}
