use std::collections::BTreeMap;

use foundation::math::{LonLat, Vec2, angular_distance_deg, great_circle_interpolate};
use indicators::{AggregatedValue, max_of_type};
use projection::ProjectionHandle;
use runtime::transitions::{Phase, Transitions};

use crate::legend::{LegendPanel, LegendScale};

/// All flow arcs originate here.
pub const FLOW_ORIGIN: LonLat = LonLat {
    lon: 2.3522,
    lat: 48.8566,
};

/// Samples per arc; enough that dropping far-hemisphere samples leaves a
/// smooth visible run.
pub const ARC_SAMPLES: usize = 101;

const ARROWHEAD_BASE: f64 = 3.0;
const ARROWHEAD_GAIN: f64 = 17.0;

/// Fraction of the draw-in animation after which the arrowhead shows.
const ARROWHEAD_AT: f64 = 0.9;

/// Dash-offset draw-in length.
pub const FLOW_TRANSITION_S: f64 = 0.6;

#[derive(Debug, Clone, PartialEq)]
pub struct FlowArc {
    pub entity: String,
    pub value: f64,
    /// Projected samples of the great-circle path, hidden samples dropped.
    pub points: Vec<Vec2>,
    pub stroke_width: f64,
    pub arrowhead_size: f64,
    pub arrowhead_visible: bool,
    /// Draw-in progress in `[0, 1]`, rendered as a dash offset.
    pub progress: f64,
    pub phase: Phase,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowsSnapshot {
    pub arcs: Vec<FlowArc>,
    pub panel: LegendPanel,
}

/// Retargets the draw-in tweens: present entities animate toward fully
/// drawn, vanished ones retract.
pub fn reconcile_flows(transitions: &mut Transitions, agg: &AggregatedValue, type_id: u8) {
    let stale: Vec<String> = transitions
        .keys()
        .filter(|key| !agg.get(*key).is_some_and(|t| t.contains_key(&type_id)))
        .map(|k| k.to_string())
        .collect();
    for key in stale {
        transitions.remove(&key, FLOW_TRANSITION_S);
    }
    for (entity, types) in agg {
        if types.contains_key(&type_id) {
            transitions.target(entity, 1.0, FLOW_TRANSITION_S);
        }
    }
}

/// Extracts the flow display list.
///
/// On a globe an arc is drawn only when its start or end lies on the near
/// hemisphere (within 90 degrees of the view center); a fully far-side
/// arc is skipped outright instead of producing an empty path.
pub fn extract_flows(
    transitions: &Transitions,
    agg: &AggregatedValue,
    type_id: u8,
    anchors: &BTreeMap<String, LonLat>,
    projection: &ProjectionHandle,
    scale: &LegendScale,
    k: f64,
) -> FlowsSnapshot {
    let max = max_of_type(agg, type_id).unwrap_or(0.0);
    let view_center = projection.rotation().center();

    let mut arcs = Vec::new();
    for entity in transitions.keys().map(|s| s.to_string()).collect::<Vec<_>>() {
        let Some(target) = anchors.get(&entity) else {
            continue;
        };
        if projection.is_globe()
            && angular_distance_deg(FLOW_ORIGIN, view_center) > 90.0
            && angular_distance_deg(*target, view_center) > 90.0
        {
            continue;
        }

        let points: Vec<Vec2> = (0..ARC_SAMPLES)
            .filter_map(|i| {
                let t = i as f64 / (ARC_SAMPLES - 1) as f64;
                projection.forward(great_circle_interpolate(FLOW_ORIGIN, *target, t))
            })
            .collect();
        if points.len() < 2 {
            continue;
        }

        let value = agg
            .get(&entity)
            .and_then(|t| t.get(&type_id))
            .copied()
            .unwrap_or(0.0);
        let progress = transitions.value(&entity).unwrap_or(0.0).clamp(0.0, 1.0);
        let arrowhead_size = if max > 0.0 {
            ARROWHEAD_BASE + ARROWHEAD_GAIN * (value / max).clamp(0.0, 1.0).sqrt()
        } else {
            ARROWHEAD_BASE
        };
        arcs.push(FlowArc {
            stroke_width: scale.rendered_extent(value, k),
            arrowhead_size,
            arrowhead_visible: progress >= ARROWHEAD_AT,
            progress,
            phase: transitions.phase(&entity).unwrap_or(Phase::Active),
            entity,
            value,
            points,
        });
    }

    let rows = if arcs.is_empty() { 0 } else { LegendPanel::ROW_CAPACITY };
    FlowsSnapshot {
        arcs,
        panel: LegendPanel::layout(rows, k),
    }
}

#[cfg(test)]
mod tests {
    use super::{ARC_SAMPLES, FLOW_TRANSITION_S, extract_flows, reconcile_flows};
    use crate::legend::LegendScale;
    use foundation::math::{LonLat, Vec2};
    use indicators::AggregatedValue;
    use projection::{Family, ProjectionFactory, ProjectionOptions, Rotation};
    use runtime::transitions::Transitions;
    use std::collections::BTreeMap;

    fn agg_of(entries: &[(&str, u8, f64)]) -> AggregatedValue {
        let mut out = AggregatedValue::new();
        for (entity, type_id, value) in entries {
            out.entry(entity.to_string())
                .or_default()
                .insert(*type_id, *value);
        }
        out
    }

    fn anchors() -> BTreeMap<String, LonLat> {
        let mut out = BTreeMap::new();
        out.insert("AS".to_string(), LonLat::new(90.0, 40.0));
        out.insert("SA".to_string(), LonLat::new(-58.0, -14.0));
        out
    }

    fn planar() -> projection::ProjectionHandle {
        ProjectionFactory::create_family(
            Family::EqualEarth,
            ProjectionOptions::fit(Vec2::new(960.0, 500.0), 160.0),
        )
    }

    #[test]
    fn arcs_draw_in_and_reveal_arrowheads_late() {
        let mut transitions = Transitions::new();
        let agg = agg_of(&[("AS", 1, 400.0)]);
        let scale = LegendScale::stroke(400.0, true);
        let proj = planar();

        reconcile_flows(&mut transitions, &agg, 1);
        let snap = extract_flows(&transitions, &agg, 1, &anchors(), &proj, &scale, 1.0);
        assert_eq!(snap.arcs.len(), 1);
        assert_eq!(snap.arcs[0].points.len(), ARC_SAMPLES);
        assert!(!snap.arcs[0].arrowhead_visible);

        transitions.advance(FLOW_TRANSITION_S * 0.95);
        let snap = extract_flows(&transitions, &agg, 1, &anchors(), &proj, &scale, 1.0);
        assert!(snap.arcs[0].arrowhead_visible);
        assert!(snap.arcs[0].progress > 0.9);
    }

    #[test]
    fn arrowhead_size_scales_with_sqrt_of_share() {
        let mut transitions = Transitions::new();
        let agg = agg_of(&[("AS", 1, 400.0), ("SA", 1, 100.0)]);
        let scale = LegendScale::stroke(400.0, true);
        let proj = planar();

        reconcile_flows(&mut transitions, &agg, 1);
        let snap = extract_flows(&transitions, &agg, 1, &anchors(), &proj, &scale, 1.0);
        let by_name: BTreeMap<&str, f64> = snap
            .arcs
            .iter()
            .map(|a| (a.entity.as_str(), a.arrowhead_size))
            .collect();
        assert!((by_name["AS"] - 20.0).abs() < 1e-9);
        assert!((by_name["SA"] - (3.0 + 17.0 * 0.5)).abs() < 1e-9);
    }

    #[test]
    fn fully_far_side_arcs_are_skipped_on_globe() {
        let mut opts = ProjectionOptions::fit(Vec2::new(960.0, 500.0), 200.0);
        // Center the globe on the Pacific antipode of the origin region.
        opts.rotation = Rotation::centering(LonLat::new(-177.0, -48.0));
        let globe = ProjectionFactory::create_family(Family::Orthographic, opts);

        let mut transitions = Transitions::new();
        let agg = agg_of(&[("SA", 1, 100.0)]);
        let scale = LegendScale::stroke(100.0, false);
        let mut far_anchor = BTreeMap::new();
        // Target also on the far side for this view.
        far_anchor.insert("SA".to_string(), LonLat::new(10.0, 45.0));

        reconcile_flows(&mut transitions, &agg, 1);
        let snap = extract_flows(&transitions, &agg, 1, &far_anchor, &globe, &scale, 1.0);
        assert!(snap.arcs.is_empty());
    }

    #[test]
    fn hidden_samples_are_dropped_on_globe() {
        let mut opts = ProjectionOptions::fit(Vec2::new(960.0, 500.0), 200.0);
        opts.rotation = Rotation::centering(super::FLOW_ORIGIN);
        let globe = ProjectionFactory::create_family(Family::Orthographic, opts);

        let mut transitions = Transitions::new();
        let agg = agg_of(&[("AS", 1, 100.0)]);
        let scale = LegendScale::stroke(100.0, false);
        let mut anchor = BTreeMap::new();
        // Endpoint just past the limb: part of the arc is hidden.
        anchor.insert("AS".to_string(), LonLat::new(130.0, -20.0));

        reconcile_flows(&mut transitions, &agg, 1);
        let snap = extract_flows(&transitions, &agg, 1, &anchor, &globe, &scale, 1.0);
        assert_eq!(snap.arcs.len(), 1);
        assert!(snap.arcs[0].points.len() < ARC_SAMPLES);
        assert!(snap.arcs[0].points.len() >= 2);
    }
}
