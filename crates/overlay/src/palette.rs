use std::collections::BTreeMap;

/// RGBA, linear components in `[0, 1]`.
pub type Color = [f32; 4];

const fn rgb(r: u8, g: u8, b: u8) -> Color {
    [
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        1.0,
    ]
}

/// Fill used for regions with no data at all, distinct from any value.
pub const NO_DATA_FILL: Color = rgb(0xdd, 0xdd, 0xdd);

/// Diverging three-stop palette for the balance choropleth.
///
/// `negative` is the import-dominant end, `positive` the export-dominant
/// end.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DivergingPalette {
    pub negative: Color,
    pub neutral: Color,
    pub positive: Color,
}

impl DivergingPalette {
    /// Red / white / blue.
    pub const STANDARD: DivergingPalette = DivergingPalette {
        negative: rgb(0xb2, 0x18, 0x2b),
        neutral: rgb(0xf7, 0xf7, 0xf7),
        positive: rgb(0x21, 0x66, 0xac),
    };

    /// Orange / white / purple, safe for the common color-vision
    /// deficiencies.
    pub const CVD: DivergingPalette = DivergingPalette {
        negative: rgb(0xd9, 0x5f, 0x02),
        neutral: rgb(0xf7, 0xf7, 0xf7),
        positive: rgb(0x75, 0x70, 0xb3),
    };

    pub fn for_cvd(cvd: bool) -> DivergingPalette {
        if cvd {
            DivergingPalette::CVD
        } else {
            DivergingPalette::STANDARD
        }
    }

    /// Samples the palette at `t` in `[-1, 1]`; `0` is the neutral stop.
    pub fn sample(&self, t: f64) -> Color {
        let t = t.clamp(-1.0, 1.0);
        if t < 0.0 {
            lerp(self.neutral, self.negative, -t)
        } else {
            lerp(self.neutral, self.positive, t)
        }
    }

    /// Rasterizes the palette into `steps` evenly spaced colors from the
    /// negative end to the positive end, for the legend gradient.
    pub fn ramp(&self, steps: usize) -> Vec<Color> {
        if steps < 2 {
            return vec![self.neutral];
        }
        (0..steps)
            .map(|i| {
                let t = -1.0 + 2.0 * (i as f64) / ((steps - 1) as f64);
                self.sample(t)
            })
            .collect()
    }
}

// Convex form rather than a + (b - a) * t: exact at both endpoints, which
// keeps the palette stops reproducible.
fn lerp(a: Color, b: Color, t: f64) -> Color {
    let t = t as f32;
    let s = 1.0 - t;
    [
        a[0] * s + b[0] * t,
        a[1] * s + b[1] * t,
        a[2] * s + b[2] * t,
        a[3] * s + b[3] * t,
    ]
}

/// A named marker palette: fill plus stroke.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MarkerPalette {
    pub name: &'static str,
    pub fill: Color,
    pub stroke: Color,
}

/// The rotation of marker colors the registry hands out.
pub const MARKER_PALETTES: [MarkerPalette; 4] = [
    MarkerPalette {
        name: "amber",
        fill: rgb(0xfe, 0xb2, 0x4c),
        stroke: rgb(0xb1, 0x63, 0x00),
    },
    MarkerPalette {
        name: "teal",
        fill: rgb(0x4d, 0xb6, 0xac),
        stroke: rgb(0x00, 0x69, 0x5c),
    },
    MarkerPalette {
        name: "plum",
        fill: rgb(0xba, 0x68, 0xc8),
        stroke: rgb(0x6a, 0x1b, 0x9a),
    },
    MarkerPalette {
        name: "slate",
        fill: rgb(0x90, 0xa4, 0xae),
        stroke: rgb(0x37, 0x47, 0x4f),
    },
];

/// Session-scoped color assignment.
///
/// An entity keeps its palette for the lifetime of the registry, so
/// re-renders and aggregation changes never recolor existing markers.
/// Assignment order is first-seen; repeated assignment is idempotent.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ColorRegistry {
    assigned: BTreeMap<String, usize>,
    next: usize,
}

impl ColorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, entity: &str) -> MarkerPalette {
        let idx = match self.assigned.get(entity) {
            Some(idx) => *idx,
            None => {
                let idx = self.next % MARKER_PALETTES.len();
                self.assigned.insert(entity.to_string(), idx);
                self.next += 1;
                idx
            }
        };
        MARKER_PALETTES[idx]
    }

    pub fn lookup(&self, entity: &str) -> Option<MarkerPalette> {
        self.assigned.get(entity).map(|idx| MARKER_PALETTES[*idx])
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{ColorRegistry, DivergingPalette, MARKER_PALETTES};

    #[test]
    fn diverging_endpoints_and_neutral() {
        let p = DivergingPalette::STANDARD;
        assert_eq!(p.sample(-1.0), p.negative);
        assert_eq!(p.sample(0.0), p.neutral);
        assert_eq!(p.sample(1.0), p.positive);
    }

    #[test]
    fn sample_clamps_out_of_range() {
        let p = DivergingPalette::CVD;
        assert_eq!(p.sample(-5.0), p.negative);
        assert_eq!(p.sample(5.0), p.positive);
    }

    #[test]
    fn ramp_spans_negative_to_positive() {
        let p = DivergingPalette::STANDARD;
        let ramp = p.ramp(5);
        assert_eq!(ramp.len(), 5);
        assert_eq!(ramp[0], p.negative);
        assert_eq!(ramp[2], p.neutral);
        assert_eq!(ramp[4], p.positive);
    }

    #[test]
    fn registry_assignment_is_stable() {
        let mut reg = ColorRegistry::new();
        let first = reg.assign("France");
        reg.assign("Brazil");
        reg.assign("Japan");
        // Re-assigning does not advance the rotation.
        assert_eq!(reg.assign("France").name, first.name);
        assert_eq!(reg.len(), 3);
    }

    #[test]
    fn registry_wraps_around_palette_table() {
        let mut reg = ColorRegistry::new();
        for i in 0..MARKER_PALETTES.len() {
            reg.assign(&format!("e{i}"));
        }
        let wrapped = reg.assign("extra");
        assert_eq!(wrapped.name, MARKER_PALETTES[0].name);
    }
}
