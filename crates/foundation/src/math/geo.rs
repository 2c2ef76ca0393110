/// Geographic coordinates in degrees.
///
/// Longitude is in `[-180, 180]`, latitude in `[-90, 90]`. Values outside
/// those ranges are accepted and interpreted on the sphere; callers that
/// need canonical values should go through `normalized`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Wraps longitude into `[-180, 180]` and clamps latitude to `[-90, 90]`.
    pub fn normalized(self) -> Self {
        Self {
            lon: wrap_longitude_deg(self.lon),
            lat: self.lat.clamp(-90.0, 90.0),
        }
    }

    /// Unit-sphere cartesian coordinates `[x, y, z]`.
    pub fn to_cartesian(self) -> [f64; 3] {
        let lon = self.lon.to_radians();
        let lat = self.lat.to_radians();
        let cos_lat = lat.cos();
        [cos_lat * lon.cos(), cos_lat * lon.sin(), lat.sin()]
    }

    pub fn from_cartesian(v: [f64; 3]) -> Self {
        let lon = v[1].atan2(v[0]).to_degrees();
        let hyp = (v[0] * v[0] + v[1] * v[1]).sqrt();
        let lat = v[2].atan2(hyp).to_degrees();
        Self::new(lon, lat)
    }
}

/// Wraps a longitude in degrees into `[-180, 180]`.
pub fn wrap_longitude_deg(lon: f64) -> f64 {
    let mut l = (lon + 180.0) % 360.0;
    if l < 0.0 {
        l += 360.0;
    }
    l - 180.0
}

/// Great-circle (angular) distance between two points, in degrees.
pub fn angular_distance_deg(a: LonLat, b: LonLat) -> f64 {
    let va = a.to_cartesian();
    let vb = b.to_cartesian();
    let dot = (va[0] * vb[0] + va[1] * vb[1] + va[2] * vb[2]).clamp(-1.0, 1.0);
    dot.acos().to_degrees()
}

/// Interpolates along the great circle from `a` to `b`.
///
/// `t = 0` yields `a`, `t = 1` yields `b`. Antipodal endpoints have no
/// unique great circle; this picks the path through `a`'s meridian, which
/// is stable enough for arc rendering.
pub fn great_circle_interpolate(a: LonLat, b: LonLat, t: f64) -> LonLat {
    let va = a.to_cartesian();
    let vb = b.to_cartesian();
    let dot = (va[0] * vb[0] + va[1] * vb[1] + va[2] * vb[2]).clamp(-1.0, 1.0);
    let d = dot.acos();
    if d <= f64::EPSILON {
        return a;
    }

    let sin_d = d.sin();
    let wa = ((1.0 - t) * d).sin() / sin_d;
    let wb = (t * d).sin() / sin_d;
    LonLat::from_cartesian([
        wa * va[0] + wb * vb[0],
        wa * va[1] + wb * vb[1],
        wa * va[2] + wb * vb[2],
    ])
}
