use foundation::math::{LonLat, Vec2};
use projection::{ProjectionHandle, Rotation};

/// Affine view transform over a base projection, d3-zoom style:
/// `screen = k * projected + [x, y]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UnifiedTransform {
    pub x: f64,
    pub y: f64,
    pub k: f64,
}

impl UnifiedTransform {
    pub fn identity() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            k: 1.0,
        }
    }

    pub fn apply(&self, p: Vec2) -> Vec2 {
        Vec2::new(self.k * p.x + self.x, self.k * p.y + self.y)
    }

    pub fn unapply(&self, screen: Vec2) -> Vec2 {
        Vec2::new((screen.x - self.x) / self.k, (screen.y - self.y) / self.k)
    }
}

/// Single authoritative zoom/center state.
///
/// Two update paths feed it (affine planar transforms and globe
/// rotations); both reduce to the same `(k, center)` pair, which is what
/// survives a projection-family switch.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewState {
    viewport_center: Vec2,
    k: f64,
    center: LonLat,
}

impl ViewState {
    pub fn new(viewport_center: Vec2, initial_center: LonLat) -> Self {
        Self {
            viewport_center,
            k: 1.0,
            center: initial_center,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.k
    }

    pub fn center(&self) -> LonLat {
        self.center
    }

    pub fn viewport_center(&self) -> Vec2 {
        self.viewport_center
    }

    /// Planar update path: the gesture hands over its affine transform and
    /// the center is re-derived by inverse-projecting the screen center.
    ///
    /// A transform that pans the map past its edge can put the screen
    /// center outside the projection's range; the previous center is kept
    /// in that case rather than inventing one.
    pub fn apply_planar_transform(
        &mut self,
        projection: &ProjectionHandle,
        k: f64,
        tx: f64,
        ty: f64,
    ) {
        self.k = k;
        let transform = UnifiedTransform { x: tx, y: ty, k };
        let projected = transform.unapply(self.viewport_center);
        if let Some(center) = projection.invert(projected) {
            self.center = center;
        }
    }

    /// Globe update path: the rotation itself encodes the center.
    pub fn apply_globe_rotation(&mut self, k: f64, rotation: Rotation) {
        self.k = k;
        self.center = rotation.center();
    }

    /// Re-derives the affine transform from the stored center and the
    /// *current* projection's forward map, so a generic zoom handler works
    /// regardless of family.
    ///
    /// Returns `None` only if the stored center is not representable in
    /// the projection, which cannot happen for a rotation-synchronized
    /// globe and does not happen for the planar families.
    pub fn unified_transform(&self, projection: &ProjectionHandle) -> Option<UnifiedTransform> {
        let projected = projection.forward(self.center)?;
        Some(UnifiedTransform {
            x: self.viewport_center.x - self.k * projected.x,
            y: self.viewport_center.y - self.k * projected.y,
            k: self.k,
        })
    }

    /// The globe rotation that realizes the stored center.
    pub fn rotation(&self) -> Rotation {
        Rotation::centering(self.center)
    }
}

#[cfg(test)]
mod tests {
    use super::ViewState;
    use foundation::math::{LonLat, Vec2};
    use projection::{Family, ProjectionFactory, ProjectionOptions, Rotation};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn options() -> ProjectionOptions {
        ProjectionOptions::fit(Vec2::new(960.0, 500.0), 160.0)
    }

    fn handle(family: Family) -> projection::ProjectionHandle {
        let mut opts = options();
        opts.rotation = Rotation::default();
        ProjectionFactory::create_family(family, opts)
    }

    #[test]
    fn planar_transform_derives_center() {
        let proj = handle(Family::EqualEarth);
        let mut view = ViewState::new(Vec2::new(480.0, 250.0), LonLat::new(0.0, 0.0));

        // Project a known point, then build the transform that puts it at
        // the screen center under k = 2.
        let target = LonLat::new(30.0, 10.0);
        let p = proj.forward(target).unwrap();
        let k = 2.0;
        view.apply_planar_transform(&proj, k, 480.0 - k * p.x, 250.0 - k * p.y);

        assert_close(view.center().lon, 30.0, 1e-6);
        assert_close(view.center().lat, 10.0, 1e-6);
    }

    #[test]
    fn globe_rotation_derives_center() {
        let mut view = ViewState::new(Vec2::new(480.0, 250.0), LonLat::new(0.0, 0.0));
        view.apply_globe_rotation(3.0, Rotation::new(-2.3522, -48.8566, 0.0));
        assert_close(view.center().lon, 2.3522, 1e-12);
        assert_close(view.center().lat, 48.8566, 1e-12);
        assert_close(view.zoom(), 3.0, 1e-12);
    }

    #[test]
    fn unified_transform_reproduces_center() {
        for family in Family::ALL {
            let mut proj = handle(family);
            let mut view = ViewState::new(Vec2::new(480.0, 250.0), LonLat::new(0.0, 0.0));
            view.apply_globe_rotation(2.5, Rotation::new(-40.0, 20.0, 0.0));
            if proj.is_globe() {
                proj.set_rotation(view.rotation());
            }

            let t = view.unified_transform(&proj).unwrap();
            let projected = t.unapply(Vec2::new(480.0, 250.0));
            let derived = proj.invert(projected).unwrap();
            assert_close(derived.lon, view.center().lon, 1e-6);
            assert_close(derived.lat, view.center().lat, 1e-6);
        }
    }

    #[test]
    fn family_switch_preserves_center() {
        let pairs = [
            (Family::EqualEarth, Family::Orthographic),
            (Family::Orthographic, Family::Mercator),
            (Family::Mercator, Family::NaturalEarth),
        ];
        for (from, to) in pairs {
            let mut view = ViewState::new(Vec2::new(480.0, 250.0), LonLat::new(0.0, 0.0));
            let mut old = handle(from);
            view.apply_globe_rotation(1.8, Rotation::new(-15.0, 30.0, 0.0));
            if old.is_globe() {
                old.set_rotation(view.rotation());
            }
            let before = view.center();

            let mut next = handle(to);
            if next.is_globe() {
                next.set_rotation(view.rotation());
            }
            let t = view.unified_transform(&next).unwrap();
            let derived = next.invert(t.unapply(Vec2::new(480.0, 250.0))).unwrap();
            assert_close(derived.lon, before.lon, 1e-6);
            assert_close(derived.lat, before.lat, 1e-6);
        }
    }

    #[test]
    fn out_of_range_planar_center_keeps_previous() {
        let proj = handle(Family::EqualEarth);
        let mut view = ViewState::new(Vec2::new(480.0, 250.0), LonLat::new(12.0, 34.0));
        // A translation so large the screen center falls off the map.
        view.apply_planar_transform(&proj, 1.0, 1e7, 1e7);
        assert_close(view.center().lon, 12.0, 1e-12);
        assert_close(view.center().lat, 34.0, 1e-12);
    }
}
