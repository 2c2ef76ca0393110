//! Quaternion ("versor") drag for the rotatable globe.

use foundation::math::Vec2;
use projection::{ProjectionHandle, Rotation};

/// Quaternion `[w, x, y, z]` built from a globe rotation's Euler angles.
pub fn versor_from_rotation(r: Rotation) -> [f64; 4] {
    let l = (r.lambda / 2.0).to_radians();
    let p = (r.phi / 2.0).to_radians();
    let g = (r.gamma / 2.0).to_radians();
    let (sl, cl) = l.sin_cos();
    let (sp, cp) = p.sin_cos();
    let (sg, cg) = g.sin_cos();
    [
        cl * cp * cg + sl * sp * sg,
        sl * cp * cg - cl * sp * sg,
        cl * sp * cg + sl * cp * sg,
        cl * cp * sg - sl * sp * cg,
    ]
}

pub fn rotation_from_versor(q: [f64; 4]) -> Rotation {
    let lambda = (2.0 * (q[0] * q[1] + q[2] * q[3]))
        .atan2(1.0 - 2.0 * (q[1] * q[1] + q[2] * q[2]))
        .to_degrees();
    let phi = (2.0 * (q[0] * q[2] - q[3] * q[1]))
        .clamp(-1.0, 1.0)
        .asin()
        .to_degrees();
    let gamma = (2.0 * (q[0] * q[3] + q[1] * q[2]))
        .atan2(1.0 - 2.0 * (q[2] * q[2] + q[3] * q[3]))
        .to_degrees();
    Rotation::new(lambda, phi, gamma)
}

/// Quaternion rotating unit vector `v0` onto `v1`.
pub fn versor_delta(v0: [f64; 3], v1: [f64; 3]) -> [f64; 4] {
    let w = [
        v0[1] * v1[2] - v0[2] * v1[1],
        v0[2] * v1[0] - v0[0] * v1[2],
        v0[0] * v1[1] - v0[1] * v1[0],
    ];
    let l = (w[0] * w[0] + w[1] * w[1] + w[2] * w[2]).sqrt();
    if l == 0.0 {
        return [1.0, 0.0, 0.0, 0.0];
    }
    let dot = (v0[0] * v1[0] + v0[1] * v1[1] + v0[2] * v1[2]).clamp(-1.0, 1.0);
    let t = dot.acos() / 2.0;
    let s = t.sin();
    [t.cos(), w[2] / l * s, -w[1] / l * s, w[0] / l * s]
}

pub fn versor_multiply(a: [f64; 4], b: [f64; 4]) -> [f64; 4] {
    [
        a[0] * b[0] - a[1] * b[1] - a[2] * b[2] - a[3] * b[3],
        a[0] * b[1] + a[1] * b[0] + a[2] * b[3] - a[3] * b[2],
        a[0] * b[2] - a[1] * b[3] + a[2] * b[0] + a[3] * b[1],
        a[0] * b[3] + a[1] * b[2] - a[2] * b[1] + a[3] * b[0],
    ]
}

/// Below this delta w-component the drag has crossed near the antipode of
/// the reference orientation and the reference must be re-seated.
const ANTIPODE_RESET_W: f64 = 0.7;

/// One in-progress globe drag.
///
/// The reference orientation `(q0, v0, r0)` is captured at pointer-down;
/// each move computes the quaternion that carries the grabbed point to the
/// pointer and composes it onto the reference. Near the antipode the
/// reference is re-seated to keep the math stable.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobeDrag {
    q0: [f64; 4],
    v0: [f64; 3],
    r0: Rotation,
}

impl GlobeDrag {
    /// Captures the reference orientation. `None` when the pointer misses
    /// the globe disc.
    pub fn begin(projection: &ProjectionHandle, pointer: Vec2) -> Option<Self> {
        let grabbed = projection.invert(pointer)?;
        Some(Self {
            q0: versor_from_rotation(projection.rotation()),
            v0: grabbed.to_cartesian(),
            r0: projection.rotation(),
        })
    }

    /// Computes the rotation that carries the grabbed point under the
    /// pointer. `None` when the pointer has left the disc; the caller
    /// keeps the previous rotation in that case.
    pub fn drag(&mut self, projection: &ProjectionHandle, pointer: Vec2) -> Option<Rotation> {
        let mut reference = *projection;
        reference.set_rotation(self.r0);
        let under_pointer = reference.invert(pointer)?;
        let v1 = under_pointer.to_cartesian();

        let delta = versor_delta(self.v0, v1);
        if delta[0] < ANTIPODE_RESET_W {
            let current = projection.rotation();
            self.r0 = current;
            self.q0 = versor_from_rotation(current);
            self.v0 = projection.invert(pointer)?.to_cartesian();
            return Some(current);
        }
        Some(rotation_from_versor(versor_multiply(self.q0, delta)))
    }
}
