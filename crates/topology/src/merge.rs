use std::collections::BTreeMap;

use catalog::ReferenceCatalog;
use foundation::math::LonLat;

use crate::feature::{GeoFeature, Topology};

/// Merges country features into one feature per continent.
///
/// Membership comes from the reference tables; features whose name is not
/// in the country table (disputed areas, dependencies) are left out of the
/// merge. The merged centroid is the catalog's continent centroid, not a
/// recomputed one, so entity anchors stay identical across resolutions.
pub fn merge_by_continent(countries: &Topology, catalog: &ReferenceCatalog) -> Topology {
    let mut rings_by_continent: BTreeMap<String, Vec<Vec<LonLat>>> = BTreeMap::new();

    for feature in &countries.features {
        let Ok(country) = catalog.country_by_name(&feature.name) else {
            continue;
        };
        rings_by_continent
            .entry(country.continent.clone())
            .or_default()
            .extend(feature.rings.iter().cloned());
    }

    let mut merged = Vec::with_capacity(rings_by_continent.len());
    for (name, rings) in rings_by_continent {
        let mut feature = GeoFeature::new(name.clone(), rings);
        if let Ok(continent) = catalog.continent(&name) {
            feature.centroid = continent.centroid_lonlat();
        }
        merged.push(feature);
    }
    Topology::new(merged)
}

#[cfg(test)]
mod tests {
    use super::merge_by_continent;
    use crate::feature::{GeoFeature, Topology};
    use catalog::{Continent, Country, ReferenceCatalog};
    use foundation::math::LonLat;
    use pretty_assertions::assert_eq;

    fn triangle(name: &str, lon: f64) -> GeoFeature {
        GeoFeature::new(
            name,
            vec![vec![
                LonLat::new(lon, 0.0),
                LonLat::new(lon + 1.0, 0.0),
                LonLat::new(lon, 1.0),
            ]],
        )
    }

    fn catalog() -> ReferenceCatalog {
        ReferenceCatalog::from_tables(
            vec![
                Country {
                    id: 250,
                    code: "FRA".to_string(),
                    name: "France".to_string(),
                    continent: "Europe".to_string(),
                    centroid: [2.2, 46.2],
                },
                Country {
                    id: 276,
                    code: "DEU".to_string(),
                    name: "Germany".to_string(),
                    continent: "Europe".to_string(),
                    centroid: [10.4, 51.1],
                },
            ],
            vec![Continent {
                name: "Europe".to_string(),
                centroid: [15.0, 54.0],
            }],
        )
        .unwrap()
    }

    #[test]
    fn members_collapse_into_one_feature() {
        let topo = Topology::new(vec![
            triangle("France", 0.0),
            triangle("Germany", 10.0),
            triangle("Neverland", 50.0),
        ]);
        let merged = merge_by_continent(&topo, &catalog());
        assert_eq!(merged.len(), 1);
        let europe = merged.feature("Europe").unwrap();
        assert_eq!(europe.rings.len(), 2);
    }

    #[test]
    fn merged_centroid_comes_from_catalog() {
        let topo = Topology::new(vec![triangle("France", 0.0)]);
        let merged = merge_by_continent(&topo, &catalog());
        let europe = merged.feature("Europe").unwrap();
        assert_eq!(europe.centroid, LonLat::new(15.0, 54.0));
    }
}
