//! Decoding of GeoJSON feature collections into the atlas feature model.

use std::collections::BTreeMap;

use foundation::math::LonLat;
use serde::Deserialize;

use crate::feature::{GeoFeature, Topology};

#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    Json(String),
    NotAFeatureCollection(String),
    UnnamedFeature(usize),
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::Json(msg) => write!(f, "invalid geojson: {msg}"),
            DecodeError::NotAFeatureCollection(ty) => {
                write!(f, "expected a FeatureCollection, got '{ty}'")
            }
            DecodeError::UnnamedFeature(idx) => {
                write!(f, "feature #{idx} carries no usable name property")
            }
        }
    }
}

impl std::error::Error for DecodeError {}

#[derive(Deserialize)]
struct RawCollection {
    #[serde(rename = "type")]
    kind: String,
    features: Vec<RawFeature>,
}

#[derive(Deserialize)]
struct RawFeature {
    #[serde(default)]
    properties: BTreeMap<String, serde_json::Value>,
    geometry: Option<RawGeometry>,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum RawGeometry {
    Polygon { coordinates: Vec<Vec<[f64; 2]>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<[f64; 2]>>> },
}

// Published world datasets disagree on the property key.
const NAME_KEYS: [&str; 3] = ["name", "NAME", "ADMIN"];

fn feature_name(properties: &BTreeMap<String, serde_json::Value>) -> Option<String> {
    NAME_KEYS
        .iter()
        .find_map(|key| properties.get(*key))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

fn ring_to_lonlat(ring: &[[f64; 2]]) -> Vec<LonLat> {
    ring.iter().map(|p| LonLat::new(p[0], p[1])).collect()
}

/// Decodes a GeoJSON feature collection.
///
/// Point and line geometries are skipped; the base map only fills
/// polygons. A polygonal feature with no recognizable name property is an
/// error rather than a silent drop, because every feature must be joinable
/// against the country table.
pub fn decode_feature_collection(raw: &str) -> Result<Topology, DecodeError> {
    let collection: RawCollection =
        serde_json::from_str(raw).map_err(|e| DecodeError::Json(e.to_string()))?;
    if collection.kind != "FeatureCollection" {
        return Err(DecodeError::NotAFeatureCollection(collection.kind));
    }

    let mut features = Vec::new();
    for (idx, feature) in collection.features.iter().enumerate() {
        let rings: Vec<Vec<LonLat>> = match &feature.geometry {
            Some(RawGeometry::Polygon { coordinates }) => {
                coordinates.iter().map(|r| ring_to_lonlat(r)).collect()
            }
            Some(RawGeometry::MultiPolygon { coordinates }) => coordinates
                .iter()
                .flat_map(|poly| poly.iter().map(|r| ring_to_lonlat(r)))
                .collect(),
            None => continue,
        };
        if rings.is_empty() {
            continue;
        }
        let name =
            feature_name(&feature.properties).ok_or(DecodeError::UnnamedFeature(idx))?;
        features.push(GeoFeature::new(name, rings));
    }
    Ok(Topology::new(features))
}
