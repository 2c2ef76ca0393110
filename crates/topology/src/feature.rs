use foundation::math::LonLat;

/// A named polygonal region of the base map.
///
/// Rings are stored as geographic vertex lists; holes are not
/// distinguished from outer rings because the atlas only strokes and
/// fills whole features.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoFeature {
    pub name: String,
    pub rings: Vec<Vec<LonLat>>,
    pub centroid: LonLat,
}

impl GeoFeature {
    pub fn new(name: impl Into<String>, rings: Vec<Vec<LonLat>>) -> Self {
        let centroid = centroid_of_rings(&rings);
        Self {
            name: name.into(),
            rings,
            centroid,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.rings.iter().map(|r| r.len()).sum()
    }
}

/// One decoded base map: features in name order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Topology {
    pub features: Vec<GeoFeature>,
}

impl Topology {
    pub fn new(mut features: Vec<GeoFeature>) -> Self {
        features.sort_by(|a, b| a.name.cmp(&b.name));
        Self { features }
    }

    pub fn feature(&self, name: &str) -> Option<&GeoFeature> {
        self.features
            .binary_search_by(|f| f.name.as_str().cmp(name))
            .ok()
            .map(|i| &self.features[i])
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Spherical mean of all ring vertices, mapped back to the sphere.
///
/// Cheaper than an exact area centroid and stable for the anchor-point
/// use the atlas puts it to.
pub fn centroid_of_rings(rings: &[Vec<LonLat>]) -> LonLat {
    let mut sum = [0.0_f64; 3];
    let mut n = 0usize;
    for ring in rings {
        for p in ring {
            let c = p.to_cartesian();
            sum[0] += c[0];
            sum[1] += c[1];
            sum[2] += c[2];
            n += 1;
        }
    }
    if n == 0 {
        return LonLat::new(0.0, 0.0);
    }
    let len = (sum[0] * sum[0] + sum[1] * sum[1] + sum[2] * sum[2]).sqrt();
    if len == 0.0 {
        return LonLat::new(0.0, 0.0);
    }
    LonLat::from_cartesian([sum[0] / len, sum[1] / len, sum[2] / len])
}
