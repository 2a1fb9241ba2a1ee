//! Ski resort model

use super::location::miles_between;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named monitoring target with coordinates, elevation and state
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Resort {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Base elevation in feet
    #[serde(default, alias = "elevation")]
    pub elevation_ft: Option<u32>,
    /// Two-letter US state code
    #[serde(default)]
    pub state: Option<String>,
}

impl Resort {
    #[must_use]
    pub fn new(
        name: &str,
        latitude: f64,
        longitude: f64,
        elevation_ft: Option<u32>,
        state: Option<&str>,
    ) -> Self {
        Self {
            name: name.to_string(),
            latitude,
            longitude,
            elevation_ft,
            state: state.map(str::to_string),
        }
    }

    /// Distance from the given coordinates in miles
    #[must_use]
    pub fn distance_miles(&self, latitude: f64, longitude: f64) -> f64 {
        miles_between((self.latitude, self.longitude), (latitude, longitude))
    }
}

impl fmt::Display for Resort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            Some(state) => write!(f, "{}, {}", self.name, state),
            None => write!(f, "{}", self.name),
        }
    }
}
