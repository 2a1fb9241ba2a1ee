//! Location model for geographic coordinates and metadata

use serde::{Deserialize, Serialize};

/// A resolved point on the map, usually the user's home location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Location name (city, zip code, or formatted coordinates)
    pub name: String,
    /// State or region, when known
    pub region: Option<String>,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, name: String) -> Self {
        Self {
            latitude,
            longitude,
            name,
            region: None,
        }
    }

    /// Create location with a state/region
    #[must_use]
    pub fn with_region(latitude: f64, longitude: f64, name: String, region: String) -> Self {
        Self {
            latitude,
            longitude,
            name,
            region: Some(region),
        }
    }

    /// Location named after its own coordinates
    #[must_use]
    pub fn from_coordinates(latitude: f64, longitude: f64) -> Self {
        Self::new(latitude, longitude, format!("{latitude:.4}, {longitude:.4}"))
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }

    /// Great-circle distance to another point in miles
    #[must_use]
    pub fn distance_miles(&self, latitude: f64, longitude: f64) -> f64 {
        miles_between((self.latitude, self.longitude), (latitude, longitude))
    }
}

/// Great-circle distance in miles between two `(lat, lon)` pairs
#[must_use]
pub fn miles_between(from: (f64, f64), to: (f64, f64)) -> f64 {
    haversine::distance(
        haversine::Location {
            latitude: from.0,
            longitude: from.1,
        },
        haversine::Location {
            latitude: to.0,
            longitude: to.1,
        },
        haversine::Units::Miles,
    )
}
