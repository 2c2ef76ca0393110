use foundation::math::LonLat;

/// Three-axis spherical rotation `[lambda, phi, gamma]` in degrees.
///
/// This is how a rotatable globe expresses its position: rotating by
/// `[-lon, -lat, 0]` brings `(lon, lat)` to the projection center.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Rotation {
    pub lambda: f64,
    pub phi: f64,
    pub gamma: f64,
}

impl Rotation {
    pub fn new(lambda: f64, phi: f64, gamma: f64) -> Self {
        Self { lambda, phi, gamma }
    }

    pub fn from_angles(angles: [f64; 3]) -> Self {
        Self::new(angles[0], angles[1], angles[2])
    }

    pub fn angles(self) -> [f64; 3] {
        [self.lambda, self.phi, self.gamma]
    }

    /// The rotation that centers the view on `center`.
    pub fn centering(center: LonLat) -> Self {
        Self::new(-center.lon, -center.lat, 0.0)
    }

    /// The geographic point this rotation brings to the center.
    pub fn center(self) -> LonLat {
        LonLat::new(-self.lambda, -self.phi).normalized()
    }

    pub fn is_identity(self) -> bool {
        self.lambda == 0.0 && self.phi == 0.0 && self.gamma == 0.0
    }

    /// Applies the rotation to a geographic point.
    pub fn rotate(self, p: LonLat) -> LonLat {
        if self.is_identity() {
            return p;
        }
        // Longitude shift first, then the phi/gamma rotation on the sphere.
        let shifted = LonLat::new(p.lon + self.lambda, p.lat);
        rotate_phi_gamma(shifted, self.phi.to_radians(), self.gamma.to_radians())
    }

    /// Inverse of `rotate`.
    pub fn unrotate(self, p: LonLat) -> LonLat {
        if self.is_identity() {
            return p;
        }
        let unspun = unrotate_phi_gamma(p, self.phi.to_radians(), self.gamma.to_radians());
        LonLat::new(unspun.lon - self.lambda, unspun.lat).normalized()
    }
}

fn rotate_phi_gamma(p: LonLat, delta_phi: f64, delta_gamma: f64) -> LonLat {
    let lambda = p.lon.to_radians();
    let phi = p.lat.to_radians();

    let cos_dphi = delta_phi.cos();
    let sin_dphi = delta_phi.sin();
    let cos_dgamma = delta_gamma.cos();
    let sin_dgamma = delta_gamma.sin();

    let cos_phi = phi.cos();
    let x = cos_phi * lambda.cos();
    let y = cos_phi * lambda.sin();
    let z = phi.sin();
    let k = z * cos_dphi + x * sin_dphi;

    let out_lambda = (y * cos_dgamma - k * sin_dgamma).atan2(x * cos_dphi - z * sin_dphi);
    let out_phi = (k * cos_dgamma + y * sin_dgamma).clamp(-1.0, 1.0).asin();
    LonLat::new(out_lambda.to_degrees(), out_phi.to_degrees())
}

fn unrotate_phi_gamma(p: LonLat, delta_phi: f64, delta_gamma: f64) -> LonLat {
    let lambda = p.lon.to_radians();
    let phi = p.lat.to_radians();

    let cos_dphi = delta_phi.cos();
    let sin_dphi = delta_phi.sin();
    let cos_dgamma = delta_gamma.cos();
    let sin_dgamma = delta_gamma.sin();

    let cos_phi = phi.cos();
    let x = cos_phi * lambda.cos();
    let y = cos_phi * lambda.sin();
    let z = phi.sin();
    let k = z * cos_dgamma - y * sin_dgamma;

    let out_lambda = (y * cos_dgamma + z * sin_dgamma).atan2(x * cos_dphi + k * sin_dphi);
    let out_phi = (k * cos_dphi - x * sin_dphi).clamp(-1.0, 1.0).asin();
    LonLat::new(out_lambda.to_degrees(), out_phi.to_degrees())
}
