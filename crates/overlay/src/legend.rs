/// Maps indicator values to visual extents (circle radius, stroke width)
/// with a square-root easing so area tracks value.
///
/// The `is_static` flag decides how the extent reacts to zoom: static
/// markers keep constant screen size (the planar default), non-static
/// markers scale with the view (the globe default).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LegendScale {
    pub max_value: f64,
    pub max_extent: f64,
    pub min_extent: f64,
    pub is_static: bool,
}

impl LegendScale {
    /// Circle radius scale, screen range `[0, 30]`.
    pub fn radius(max_value: f64, is_static: bool) -> Self {
        Self {
            max_value,
            max_extent: 30.0,
            min_extent: 0.0,
            is_static,
        }
    }

    /// Flow stroke-width scale, screen range `[1.5, 6]`.
    pub fn stroke(max_value: f64, is_static: bool) -> Self {
        Self {
            max_value,
            max_extent: 6.0,
            min_extent: 1.5,
            is_static,
        }
    }

    /// Extent at zoom `k = 1`.
    pub fn base_extent(&self, value: f64) -> f64 {
        if self.max_value <= 0.0 {
            return self.min_extent;
        }
        let t = (value / self.max_value).clamp(0.0, 1.0).sqrt();
        self.min_extent + (self.max_extent - self.min_extent) * t
    }

    /// Extent in screen pixels at zoom `k`.
    pub fn rendered_extent(&self, value: f64, k: f64) -> f64 {
        let base = self.base_extent(value);
        if self.is_static { base } else { base * k }
    }

    /// The three reference values the legend annotates.
    pub fn legend_values(&self) -> [f64; 3] {
        [self.max_value, self.max_value / 2.0, self.max_value / 4.0]
    }
}

/// Country outline width under zoom: thins as the user zooms in so
/// borders do not swallow small regions.
pub fn outline_width(base: f64, k: f64) -> f64 {
    base * k.max(f64::MIN_POSITIVE).powf(-0.5)
}

/// A power curve clamped to `[min, max]`, the legend panel's growth law.
pub fn clamped_pow(k: f64, exponent: f64, min: f64, max: f64) -> f64 {
    k.max(0.0).powf(exponent).clamp(min, max)
}

/// Legend panel geometry: grows with zoom, shrinks when there are fewer
/// rows than capacity.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LegendPanel {
    pub width: f64,
    pub height: f64,
    pub corner_radius: f64,
    pub rows: usize,
}

impl LegendPanel {
    pub const ROW_CAPACITY: usize = 3;
    const BASE_WIDTH: f64 = 120.0;
    const ROW_HEIGHT: f64 = 26.0;
    const BASE_CORNER: f64 = 6.0;

    pub fn layout(rows: usize, k: f64) -> Self {
        let rows = rows.min(Self::ROW_CAPACITY);
        let grow = clamped_pow(k, 0.5, 1.0, 2.0);
        Self {
            width: Self::BASE_WIDTH * grow,
            height: Self::ROW_HEIGHT * rows as f64 * grow,
            corner_radius: Self::BASE_CORNER * grow,
            rows,
        }
    }
}
