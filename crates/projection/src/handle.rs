use foundation::math::{LonLat, Vec2};

use crate::families;
use crate::rotation::Rotation;

/// Projection families the factory knows how to build.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Family {
    EqualEarth,
    NaturalEarth,
    Mercator,
    Orthographic,
}

impl Family {
    pub fn parse(name: &str) -> Result<Self, InvalidProjectionFamily> {
        match name {
            "equal-earth" => Ok(Self::EqualEarth),
            "natural-earth" => Ok(Self::NaturalEarth),
            "mercator" => Ok(Self::Mercator),
            "orthographic" => Ok(Self::Orthographic),
            other => Err(InvalidProjectionFamily {
                requested: other.to_string(),
            }),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::EqualEarth => "equal-earth",
            Self::NaturalEarth => "natural-earth",
            Self::Mercator => "mercator",
            Self::Orthographic => "orthographic",
        }
    }

    /// Whether this family renders as a rotatable globe rather than a
    /// planar map.
    pub fn is_globe(self) -> bool {
        matches!(self, Self::Orthographic)
    }

    pub const ALL: [Family; 4] = [
        Self::EqualEarth,
        Self::NaturalEarth,
        Self::Mercator,
        Self::Orthographic,
    ];
}

/// Requested family name did not match any known projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidProjectionFamily {
    pub requested: String,
}

impl std::fmt::Display for InvalidProjectionFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown projection family '{}' (expected one of: equal-earth, natural-earth, mercator, orthographic)",
            self.requested
        )
    }
}

impl std::error::Error for InvalidProjectionFamily {}

/// Sizing inputs for a fresh projection.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ProjectionOptions {
    /// Viewport size in pixels; the projection is centered in it.
    pub viewport: Vec2,
    /// Pixel scale factor applied to raw projection units.
    pub base_scale: f64,
    /// Initial rotation, only meaningful for globe families.
    pub rotation: Rotation,
}

impl ProjectionOptions {
    pub fn fit(viewport: Vec2, base_scale: f64) -> Self {
        Self {
            viewport,
            base_scale,
            rotation: Rotation::default(),
        }
    }
}

/// A configured projection: family, scale, translate, and rotation.
///
/// Screen convention is raster-style: x grows right, y grows down, so the
/// raw projection's northward y is flipped when mapping to pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ProjectionHandle {
    family: Family,
    scale: f64,
    translate: Vec2,
    rotation: Rotation,
}

impl ProjectionHandle {
    pub fn family(&self) -> Family {
        self.family
    }

    pub fn is_globe(&self) -> bool {
        self.family.is_globe()
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    pub fn translate(&self) -> Vec2 {
        self.translate
    }

    pub fn set_translate(&mut self, translate: Vec2) {
        self.translate = translate;
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    /// Shifts the translation so `center` projects to `screen`.
    ///
    /// Returns `false` (leaving the handle untouched) when `center` is not
    /// representable, which only happens for far-hemisphere globe points.
    pub fn center_on(&mut self, center: LonLat, screen: Vec2) -> bool {
        let Some(current) = self.forward(center) else {
            return false;
        };
        self.translate = Vec2::new(
            self.translate.x + screen.x - current.x,
            self.translate.y + screen.y - current.y,
        );
        true
    }

    /// Projects a geographic point to screen pixels.
    ///
    /// Returns `None` when the point is not representable, which for the
    /// orthographic family means the far hemisphere.
    pub fn forward(&self, p: LonLat) -> Option<Vec2> {
        let rotated = self.rotation.rotate(p);
        let lambda = rotated.lon.to_radians();
        let phi = rotated.lat.to_radians();
        let (x, y) = match self.family {
            Family::EqualEarth => families::equal_earth_forward(lambda, phi),
            Family::NaturalEarth => families::natural_earth_forward(lambda, phi),
            Family::Mercator => families::mercator_forward(lambda, phi),
            Family::Orthographic => families::orthographic_forward(lambda, phi)?,
        };
        Some(Vec2::new(
            self.translate.x + self.scale * x,
            self.translate.y - self.scale * y,
        ))
    }

    /// Inverse of `forward`: screen pixels back to a geographic point.
    pub fn invert(&self, screen: Vec2) -> Option<LonLat> {
        if self.scale == 0.0 {
            return None;
        }
        let x = (screen.x - self.translate.x) / self.scale;
        let y = (self.translate.y - screen.y) / self.scale;
        let (lambda, phi) = match self.family {
            Family::EqualEarth => families::equal_earth_invert(x, y)?,
            Family::NaturalEarth => families::natural_earth_invert(x, y)?,
            Family::Mercator => families::mercator_invert(x, y)?,
            Family::Orthographic => families::orthographic_invert(x, y)?,
        };
        let rotated = LonLat::new(lambda.to_degrees(), phi.to_degrees());
        Some(self.rotation.unrotate(rotated).normalized())
    }
}

/// Builds projection handles by family name, centered in the viewport.
#[derive(Debug, Default)]
pub struct ProjectionFactory;

impl ProjectionFactory {
    pub fn create(
        family_name: &str,
        options: ProjectionOptions,
    ) -> Result<ProjectionHandle, InvalidProjectionFamily> {
        let family = Family::parse(family_name)?;
        Ok(Self::create_family(family, options))
    }

    pub fn create_family(family: Family, options: ProjectionOptions) -> ProjectionHandle {
        ProjectionHandle {
            family,
            scale: options.base_scale,
            translate: Vec2::new(options.viewport.x / 2.0, options.viewport.y / 2.0),
            rotation: if family.is_globe() {
                options.rotation
            } else {
                Rotation::default()
            },
        }
    }
}
