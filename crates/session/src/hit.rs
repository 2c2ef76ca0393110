//! Pointer hit-testing against extracted overlay geometry.

use foundation::math::{LonLat, Vec2};
use overlay::CircleMarker;
use topology::Topology;

/// Topmost circle under the pointer, preferring the smallest hit so a
/// small marker inside a large one stays clickable.
pub fn pick_circle<'a>(markers: &'a [CircleMarker], pointer: Vec2) -> Option<&'a CircleMarker> {
    markers
        .iter()
        .filter(|m| {
            let dx = pointer.x - m.center.x;
            let dy = pointer.y - m.center.y;
            (dx * dx + dy * dy).sqrt() <= m.radius
        })
        .min_by(|a, b| a.radius.total_cmp(&b.radius))
}

/// Region containing the geographic point, by even-odd ring test.
///
/// The test runs in lon/lat space; rings near the antimeridian are the
/// known blind spot and acceptable for tooltip picking.
pub fn pick_region<'a>(topology: &'a Topology, point: LonLat) -> Option<&'a str> {
    topology
        .features
        .iter()
        .find(|f| f.rings.iter().any(|ring| ring_contains(ring, point)))
        .map(|f| f.name.as_str())
}

fn ring_contains(ring: &[LonLat], p: LonLat) -> bool {
    let mut inside = false;
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let a = ring[i];
        let b = ring[j];
        if (a.lat > p.lat) != (b.lat > p.lat) {
            let x = (b.lon - a.lon) * (p.lat - a.lat) / (b.lat - a.lat) + a.lon;
            if p.lon < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::{pick_circle, pick_region};
    use foundation::math::{LonLat, Vec2};
    use overlay::{CircleMarker, ColorRegistry};
    use runtime::transitions::Phase;
    use topology::{GeoFeature, Topology};

    fn marker(entity: &str, center: Vec2, radius: f64) -> CircleMarker {
        let mut colors = ColorRegistry::new();
        CircleMarker {
            entity: entity.to_string(),
            value: 1.0,
            center,
            radius,
            palette: colors.assign(entity),
            phase: Phase::Active,
        }
    }

    #[test]
    fn picks_smallest_containing_circle() {
        let markers = vec![
            marker("big", Vec2::new(100.0, 100.0), 50.0),
            marker("small", Vec2::new(110.0, 100.0), 10.0),
        ];
        let hit = pick_circle(&markers, Vec2::new(112.0, 100.0)).unwrap();
        assert_eq!(hit.entity, "small");
        assert!(pick_circle(&markers, Vec2::new(300.0, 300.0)).is_none());
    }

    #[test]
    fn region_test_is_even_odd() {
        let topo = Topology::new(vec![GeoFeature::new(
            "box",
            vec![vec![
                LonLat::new(0.0, 0.0),
                LonLat::new(10.0, 0.0),
                LonLat::new(10.0, 10.0),
                LonLat::new(0.0, 10.0),
            ]],
        )]);
        assert_eq!(pick_region(&topo, LonLat::new(5.0, 5.0)), Some("box"));
        assert_eq!(pick_region(&topo, LonLat::new(15.0, 5.0)), None);
    }
}
