//! Resort catalog
//!
//! The catalog is loaded once at startup, either from the table compiled into
//! the binary or from a user supplied file, and is read-only afterwards.

use crate::config::ResortSpec;
use crate::models::Resort;
use crate::{PowdertimeError, Result};
use config::{Config, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

const BUILTIN_RESORTS: &str = include_str!("resorts.json");

/// Layout of a user supplied catalog file
#[derive(Debug, Deserialize)]
struct CatalogFile {
    resorts: Vec<Resort>,
}

/// Immutable lookup of known resorts
#[derive(Debug, Clone)]
pub struct ResortCatalog {
    resorts: Vec<Resort>,
    /// lowercase name -> index into `resorts`
    by_name: HashMap<String, usize>,
}

impl ResortCatalog {
    /// Build a catalog, rejecting duplicate names
    pub fn new(resorts: Vec<Resort>) -> Result<Self> {
        let mut by_name = HashMap::with_capacity(resorts.len());
        for (index, resort) in resorts.iter().enumerate() {
            if by_name.insert(resort.name.to_lowercase(), index).is_some() {
                return Err(PowdertimeError::config(format!(
                    "Duplicate resort '{}' in catalog",
                    resort.name
                )));
            }
        }
        Ok(Self { resorts, by_name })
    }

    /// The catalog compiled into the binary
    pub fn builtin() -> Result<Self> {
        let resorts: Vec<Resort> = serde_json::from_str(BUILTIN_RESORTS).map_err(|e| {
            PowdertimeError::config(format!("Builtin resort catalog is invalid: {e}"))
        })?;
        Self::new(resorts)
    }

    /// Load a catalog from a YAML or JSON file with a top-level `resorts` list
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading resort catalog from {}", path.display());

        let file: CatalogFile = Config::builder()
            .add_source(File::from(path.to_path_buf()))
            .build()
            .and_then(|settings| settings.try_deserialize::<CatalogFile>())
            .map_err(|e| {
                PowdertimeError::config(format!(
                    "Failed to load resort catalog {}: {e}",
                    path.display()
                ))
            })?;

        Self::new(file.resorts)
    }

    /// Custom catalog when configured, builtin otherwise
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let catalog = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::builtin()?,
        };
        info!("Resort catalog ready with {} resorts", catalog.len());
        Ok(catalog)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.resorts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resorts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resort> {
        self.resorts.iter()
    }

    /// Case-insensitive lookup by name
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Resort> {
        self.by_name
            .get(&name.trim().to_lowercase())
            .map(|&index| &self.resorts[index])
    }

    /// Resorts within `radius_miles` of a point, closest first
    #[must_use]
    pub fn nearby(&self, latitude: f64, longitude: f64, radius_miles: f64) -> Vec<(&Resort, f64)> {
        let mut nearby: Vec<(&Resort, f64)> = self
            .resorts
            .iter()
            .map(|resort| (resort, resort.distance_miles(latitude, longitude)))
            .filter(|(_, distance)| *distance <= radius_miles)
            .collect();

        nearby.sort_by(|a, b| a.1.total_cmp(&b.1));
        nearby
    }

    /// Resolve the explicit `resorts` list of the config.
    ///
    /// A spec with only a name is looked up in the catalog; a spec with name,
    /// latitude and longitude describes a custom resort.
    pub fn resolve_specs(&self, specs: &[ResortSpec]) -> Result<Vec<Resort>> {
        specs.iter().map(|spec| self.resolve_spec(spec)).collect()
    }

    fn resolve_spec(&self, spec: &ResortSpec) -> Result<Resort> {
        match (&spec.name, spec.latitude, spec.longitude) {
            (Some(name), None, None) => self.find(name).cloned().ok_or_else(|| {
                PowdertimeError::validation(format!(
                    "Resort '{name}' not found in database. Available resorts: {}",
                    self.names().join(", ")
                ))
            }),
            (Some(name), Some(latitude), Some(longitude)) => {
                if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
                    return Err(PowdertimeError::validation(format!(
                        "Resort '{name}' has out-of-range coordinates ({latitude}, {longitude})"
                    )));
                }
                Ok(Resort {
                    name: name.clone(),
                    latitude,
                    longitude,
                    elevation_ft: spec.elevation,
                    state: spec.state.clone(),
                })
            }
            _ => Err(PowdertimeError::validation(format!(
                "Invalid resort specification: {spec:?}. Must have 'name' (for lookup) or \
                 'name' + 'latitude' + 'longitude' (for custom)"
            ))),
        }
    }

    fn names(&self) -> Vec<&str> {
        self.resorts.iter().map(|r| r.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    const DENVER: (f64, f64) = (39.7392, -104.9903);

    fn spec(name: &str) -> ResortSpec {
        ResortSpec {
            name: Some(name.to_string()),
            ..ResortSpec::default()
        }
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = ResortCatalog::builtin().unwrap();
        assert_eq!(catalog.len(), 41);
        assert!(catalog.find("Vail").is_some());
    }

    #[rstest]
    #[case("Vail", "Vail")]
    #[case("breckenridge", "Breckenridge")]
    #[case("  JACKSON HOLE ", "Jackson Hole")]
    fn test_find_is_case_insensitive(#[case] query: &str, #[case] expected: &str) {
        let catalog = ResortCatalog::builtin().unwrap();
        assert_eq!(catalog.find(query).unwrap().name, expected);
    }

    #[test]
    fn test_find_nearby_resorts() {
        let catalog = ResortCatalog::builtin().unwrap();

        let nearby = catalog.nearby(DENVER.0, DENVER.1, 60.0);

        assert!(!nearby.is_empty(), "Should find at least one resort");
        assert!(nearby.len() < 10, "Should not find too many resorts");
        let distances: Vec<f64> = nearby.iter().map(|(_, d)| *d).collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]), "sorted by distance");
        assert!(distances.iter().all(|d| *d <= 60.0));
    }

    #[test]
    fn test_nearby_outside_any_radius() {
        let catalog = ResortCatalog::builtin().unwrap();
        // Middle of the Gulf of Mexico
        assert!(catalog.nearby(25.0, -90.0, 50.0).is_empty());
    }

    #[test]
    fn test_get_resorts_by_name() {
        let catalog = ResortCatalog::builtin().unwrap();
        let resorts = catalog.resolve_specs(&[spec("Vail"), spec("breckenridge")]).unwrap();
        assert_eq!(resorts.len(), 2);
        assert_eq!(resorts[0].name, "Vail");
        assert_eq!(resorts[1].name, "Breckenridge");
    }

    #[test]
    fn test_get_custom_resorts() {
        let catalog = ResortCatalog::builtin().unwrap();
        let custom = ResortSpec {
            name: Some("My Custom Resort".to_string()),
            latitude: Some(42.0),
            longitude: Some(-74.0),
            elevation: Some(2000),
            state: Some("NY".to_string()),
        };

        let resorts = catalog.resolve_specs(&[custom]).unwrap();

        assert_eq!(resorts.len(), 1);
        assert_eq!(resorts[0].name, "My Custom Resort");
        assert_eq!(resorts[0].latitude, 42.0);
        assert_eq!(resorts[0].elevation_ft, Some(2000));
    }

    #[test]
    fn test_invalid_resort_name() {
        let catalog = ResortCatalog::builtin().unwrap();
        let err = catalog.resolve_specs(&[spec("Nonexistent Resort")]).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("not found"));
        assert!(message.contains("Available resorts"));
    }

    #[rstest]
    #[case(ResortSpec::default())]
    #[case(ResortSpec { name: Some("Half".into()), latitude: Some(40.0), ..ResortSpec::default() })]
    #[case(ResortSpec { latitude: Some(40.0), longitude: Some(-105.0), ..ResortSpec::default() })]
    fn test_incomplete_spec_is_rejected(#[case] bad: ResortSpec) {
        let catalog = ResortCatalog::builtin().unwrap();
        let err = catalog.resolve_specs(&[bad]).unwrap_err();
        assert!(err.to_string().contains("Invalid resort specification"));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let resorts = vec![
            Resort::new("Alta", 40.5885, -111.6381, Some(8530), Some("UT")),
            Resort::new("ALTA", 40.0, -111.0, None, None),
        ];
        assert!(ResortCatalog::new(resorts).is_err());
    }

    #[test]
    fn test_catalog_from_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(
            b"resorts:\n  - name: Home Hill\n    latitude: 44.0\n    longitude: -72.0\n    elevation: 1200\n    state: VT\n",
        )
        .unwrap();

        let catalog = ResortCatalog::load(Some(file.path())).unwrap();

        assert_eq!(catalog.len(), 1);
        let resort = catalog.find("home hill").unwrap();
        assert_eq!(resort.elevation_ft, Some(1200));
        assert_eq!(resort.state.as_deref(), Some("VT"));
    }
}
