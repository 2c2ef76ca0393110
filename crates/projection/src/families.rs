//! Raw projection math, radians in and projection units out.
//!
//! Each family maps a rotated geographic point `(lambda, phi)` to planar
//! coordinates with the usual orientation (x east, y north). Screen-space
//! flipping and scaling happen in the handle, not here.

const EE_A1: f64 = 1.340_264;
const EE_A2: f64 = -0.081_106;
const EE_A3: f64 = 0.000_893;
const EE_A4: f64 = 0.003_796;

const NEWTON_EPS: f64 = 1e-12;
const NEWTON_MAX_ITER: usize = 12;

fn equal_earth_m() -> f64 {
    3.0_f64.sqrt() / 2.0
}

/// Equal Earth forward projection.
pub fn equal_earth_forward(lambda: f64, phi: f64) -> (f64, f64) {
    let m = equal_earth_m();
    let theta = (m * phi.sin()).asin();
    let t2 = theta * theta;
    let t6 = t2 * t2 * t2;
    let x = lambda * theta.cos()
        / (m * (EE_A1 + 3.0 * EE_A2 * t2 + t6 * (7.0 * EE_A3 + 9.0 * EE_A4 * t2)));
    let y = theta * (EE_A1 + EE_A2 * t2 + t6 * (EE_A3 + EE_A4 * t2));
    (x, y)
}

/// Equal Earth inverse, solved by Newton iteration on the parametric latitude.
pub fn equal_earth_invert(x: f64, y: f64) -> Option<(f64, f64)> {
    let m = equal_earth_m();
    let mut theta = y;
    for _ in 0..NEWTON_MAX_ITER {
        let t2 = theta * theta;
        let t6 = t2 * t2 * t2;
        let f = theta * (EE_A1 + EE_A2 * t2 + t6 * (EE_A3 + EE_A4 * t2)) - y;
        let fp = EE_A1 + 3.0 * EE_A2 * t2 + t6 * (7.0 * EE_A3 + 9.0 * EE_A4 * t2);
        let delta = f / fp;
        theta -= delta;
        if delta.abs() < NEWTON_EPS {
            break;
        }
    }
    let t2 = theta * theta;
    let t6 = t2 * t2 * t2;
    let sin_phi = theta.sin() / m;
    if sin_phi.abs() > 1.0 + 1e-9 {
        return None;
    }
    let phi = sin_phi.clamp(-1.0, 1.0).asin();
    let lambda =
        m * x * (EE_A1 + 3.0 * EE_A2 * t2 + t6 * (7.0 * EE_A3 + 9.0 * EE_A4 * t2)) / theta.cos();
    if lambda.abs() > std::f64::consts::PI + 1e-9 {
        return None;
    }
    Some((lambda, phi))
}

/// Natural Earth I forward projection (polynomial form).
pub fn natural_earth_forward(lambda: f64, phi: f64) -> (f64, f64) {
    let p2 = phi * phi;
    let p4 = p2 * p2;
    let x = lambda
        * (0.870_7 - 0.131_979 * p2 + p4 * (-0.013_791 + p4 * (0.003_971 * p2 - 0.001_529 * p4)));
    let y = phi
        * (1.007_226
            + p2 * (0.015_085 + p4 * (-0.044_475 + 0.028_874 * p2 - 0.005_916 * p4)));
    (x, y)
}

/// Natural Earth I inverse, Newton iteration on latitude.
pub fn natural_earth_invert(x: f64, y: f64) -> Option<(f64, f64)> {
    let mut phi = y;
    for _ in 0..NEWTON_MAX_ITER {
        let p2 = phi * phi;
        let p4 = p2 * p2;
        let f = phi
            * (1.007_226 + p2 * (0.015_085 + p4 * (-0.044_475 + 0.028_874 * p2 - 0.005_916 * p4)))
            - y;
        let fp = 1.007_226
            + p2 * (0.045_255 + p4 * (-0.311_325 + 0.259_866 * p2 - 0.064_976 * p4));
        let delta = f / fp;
        phi -= delta;
        if delta.abs() < NEWTON_EPS {
            break;
        }
    }
    if phi.abs() > std::f64::consts::FRAC_PI_2 + 1e-9 {
        return None;
    }
    let p2 = phi * phi;
    let p4 = p2 * p2;
    let lambda = x
        / (0.870_7 - 0.131_979 * p2 + p4 * (-0.013_791 + p4 * (0.003_971 * p2 - 0.001_529 * p4)));
    if lambda.abs() > std::f64::consts::PI + 1e-9 {
        return None;
    }
    Some((lambda, phi))
}

/// Web-style Mercator. Latitude is clamped just short of the poles so the
/// forward map stays finite.
pub fn mercator_forward(lambda: f64, phi: f64) -> (f64, f64) {
    let max_phi = 89.999_f64.to_radians();
    let phi = phi.clamp(-max_phi, max_phi);
    let y = (std::f64::consts::FRAC_PI_4 + phi / 2.0).tan().ln();
    (lambda, y)
}

pub fn mercator_invert(x: f64, y: f64) -> Option<(f64, f64)> {
    if x.abs() > std::f64::consts::PI + 1e-9 {
        return None;
    }
    let phi = 2.0 * y.exp().atan() - std::f64::consts::FRAC_PI_2;
    Some((x, phi))
}

/// Orthographic forward. Returns `None` for points on the far hemisphere;
/// the rotation has already been applied by the caller, so visibility is
/// simply the sign of the z component.
pub fn orthographic_forward(lambda: f64, phi: f64) -> Option<(f64, f64)> {
    let z = phi.cos() * lambda.cos();
    if z < 0.0 {
        return None;
    }
    Some((phi.cos() * lambda.sin(), phi.sin()))
}

pub fn orthographic_invert(x: f64, y: f64) -> Option<(f64, f64)> {
    let r2 = x * x + y * y;
    if r2 > 1.0 {
        return None;
    }
    let z = (1.0 - r2).sqrt();
    Some((x.atan2(z), y.clamp(-1.0, 1.0).asin()))
}
