use std::collections::BTreeMap;

use foundation::math::LonLat;
use serde::{Deserialize, Serialize};

/// One reporting entity in the country table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    /// Numeric id used by the indicator dataset.
    pub id: u32,
    /// ISO 3166-1 alpha-3 code.
    pub code: String,
    pub name: String,
    pub continent: String,
    /// `[lon, lat]` anchor point for circles and flow endpoints.
    pub centroid: [f64; 2],
}

impl Country {
    pub fn centroid_lonlat(&self) -> LonLat {
        LonLat::new(self.centroid[0], self.centroid[1])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Continent {
    pub name: String,
    pub centroid: [f64; 2],
}

impl Continent {
    pub fn centroid_lonlat(&self) -> LonLat {
        LonLat::new(self.centroid[0], self.centroid[1])
    }
}

/// A lookup was attempted against an id or code the tables do not carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    UnknownCountryId(u32),
    UnknownCountryCode(String),
    UnknownCountryName(String),
    UnknownContinent(String),
    Malformed(String),
}

impl std::fmt::Display for ReferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferenceError::UnknownCountryId(id) => write!(f, "unknown country id {id}"),
            ReferenceError::UnknownCountryCode(code) => write!(f, "unknown country code '{code}'"),
            ReferenceError::UnknownCountryName(name) => write!(f, "unknown country name '{name}'"),
            ReferenceError::UnknownContinent(name) => write!(f, "unknown continent '{name}'"),
            ReferenceError::Malformed(msg) => write!(f, "malformed reference table: {msg}"),
        }
    }
}

impl std::error::Error for ReferenceError {}

/// The joined reference tables, keyed for deterministic iteration.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReferenceCatalog {
    countries: BTreeMap<u32, Country>,
    by_code: BTreeMap<String, u32>,
    continents: BTreeMap<String, Continent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ReferenceTables {
    countries: Vec<Country>,
    continents: Vec<Continent>,
}

impl ReferenceCatalog {
    pub fn from_tables(
        countries: Vec<Country>,
        continents: Vec<Continent>,
    ) -> Result<Self, ReferenceError> {
        let mut catalog = ReferenceCatalog::default();
        for continent in continents {
            catalog.continents.insert(continent.name.clone(), continent);
        }
        for country in countries {
            if !catalog.continents.contains_key(&country.continent) {
                return Err(ReferenceError::Malformed(format!(
                    "country '{}' references unknown continent '{}'",
                    country.code, country.continent
                )));
            }
            catalog.by_code.insert(country.code.clone(), country.id);
            catalog.countries.insert(country.id, country);
        }
        Ok(catalog)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ReferenceError> {
        let tables: ReferenceTables =
            serde_json::from_str(raw).map_err(|e| ReferenceError::Malformed(e.to_string()))?;
        Self::from_tables(tables.countries, tables.continents)
    }

    pub fn country(&self, id: u32) -> Result<&Country, ReferenceError> {
        self.countries
            .get(&id)
            .ok_or(ReferenceError::UnknownCountryId(id))
    }

    pub fn country_by_code(&self, code: &str) -> Result<&Country, ReferenceError> {
        let id = self
            .by_code
            .get(code)
            .ok_or_else(|| ReferenceError::UnknownCountryCode(code.to_string()))?;
        self.country(*id)
    }

    /// Linear scan by display name, used when joining base-map features
    /// that carry names rather than ids.
    pub fn country_by_name(&self, name: &str) -> Result<&Country, ReferenceError> {
        self.countries
            .values()
            .find(|c| c.name == name)
            .ok_or_else(|| ReferenceError::UnknownCountryName(name.to_string()))
    }

    pub fn continent(&self, name: &str) -> Result<&Continent, ReferenceError> {
        self.continents
            .get(name)
            .ok_or_else(|| ReferenceError::UnknownContinent(name.to_string()))
    }

    /// Continent of a country, or an error if the id is unknown.
    pub fn continent_of(&self, country_id: u32) -> Result<&Continent, ReferenceError> {
        let country = self.country(country_id)?;
        self.continent(&country.continent)
    }

    /// Country codes belonging to a continent, in code order.
    pub fn members_of(&self, continent: &str) -> Vec<&Country> {
        let mut out: Vec<&Country> = self
            .countries
            .values()
            .filter(|c| c.continent == continent)
            .collect();
        out.sort_by(|a, b| a.code.cmp(&b.code));
        out
    }

    pub fn countries(&self) -> impl Iterator<Item = &Country> {
        self.countries.values()
    }

    pub fn continents(&self) -> impl Iterator<Item = &Continent> {
        self.continents.values()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{Continent, Country, ReferenceCatalog, ReferenceError};
    use pretty_assertions::assert_eq;

    fn sample() -> ReferenceCatalog {
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
                Country {
                    id: 76,
                    code: "BRA".to_string(),
                    name: "Brazil".to_string(),
                    continent: "South America".to_string(),
                    centroid: [-51.9, -14.2],
                },
            ],
            vec![
                Continent {
                    name: "Europe".to_string(),
                    centroid: [15.0, 54.0],
                },
                Continent {
                    name: "South America".to_string(),
                    centroid: [-58.0, -14.0],
                },
            ],
        )
        .unwrap()
    }

    #[test]
    fn lookups_by_id_and_code_agree() {
        let catalog = sample();
        let by_id = catalog.country(250).unwrap();
        let by_code = catalog.country_by_code("FRA").unwrap();
        assert_eq!(by_id, by_code);
    }

    #[test]
    fn unknown_ids_are_errors() {
        let catalog = sample();
        assert_eq!(
            catalog.country(999).unwrap_err(),
            ReferenceError::UnknownCountryId(999)
        );
        assert_eq!(
            catalog.country_by_code("XXX").unwrap_err(),
            ReferenceError::UnknownCountryCode("XXX".to_string())
        );
    }

    #[test]
    fn continent_membership_is_code_ordered() {
        let catalog = sample();
        let codes: Vec<&str> = catalog
            .members_of("Europe")
            .iter()
            .map(|c| c.code.as_str())
            .collect();
        assert_eq!(codes, vec!["DEU", "FRA"]);
    }

    #[test]
    fn country_with_unknown_continent_is_rejected() {
        let err = ReferenceCatalog::from_tables(
            vec![Country {
                id: 1,
                code: "AAA".to_string(),
                name: "A".to_string(),
                continent: "Atlantis".to_string(),
                centroid: [0.0, 0.0],
            }],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, ReferenceError::Malformed(_)));
    }

    #[test]
    fn json_tables_parse() {
        let raw = r#"{
            "countries": [
                {"id": 250, "code": "FRA", "name": "France", "continent": "Europe", "centroid": [2.2, 46.2]}
            ],
            "continents": [
                {"name": "Europe", "centroid": [15.0, 54.0]}
            ]
        }"#;
        let catalog = ReferenceCatalog::from_json_str(raw).unwrap();
        assert_eq!(catalog.continent_of(250).unwrap().name, "Europe");
    }
}
