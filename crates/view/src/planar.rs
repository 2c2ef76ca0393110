use foundation::math::Vec2;

use crate::state::UnifiedTransform;

/// Zoom bounds shared by the planar and globe gesture paths.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ZoomExtent {
    pub min_k: f64,
    pub max_k: f64,
}

impl Default for ZoomExtent {
    fn default() -> Self {
        Self {
            min_k: 1.0,
            max_k: 8.0,
        }
    }
}

impl ZoomExtent {
    pub fn clamp(&self, k: f64) -> f64 {
        k.clamp(self.min_k, self.max_k)
    }
}

/// Wheel zoom anchored at the pointer: the geographic point under the
/// cursor stays under the cursor.
pub fn wheel_zoom(
    transform: UnifiedTransform,
    pointer: Vec2,
    factor: f64,
    extent: ZoomExtent,
) -> UnifiedTransform {
    let k = extent.clamp(transform.k * factor);
    if k == transform.k {
        return transform;
    }
    let ratio = k / transform.k;
    UnifiedTransform {
        x: pointer.x - (pointer.x - transform.x) * ratio,
        y: pointer.y - (pointer.y - transform.y) * ratio,
        k,
    }
}

/// Drag pan: pure translation, zoom untouched.
pub fn drag_pan(transform: UnifiedTransform, delta: Vec2) -> UnifiedTransform {
    UnifiedTransform {
        x: transform.x + delta.x,
        y: transform.y + delta.y,
        k: transform.k,
    }
}

/// Globe wheel: zoom changes scale only, no translation component.
pub fn wheel_scale(k: f64, factor: f64, extent: ZoomExtent) -> f64 {
    extent.clamp(k * factor)
}
