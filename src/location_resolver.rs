//! Location Resolution Module
//!
//! This module handles resolving the configured home location (coordinates,
//! zip code or city) into a structured Location.

use crate::config::LocationConfig;
use crate::models::Location;
use crate::weather::{WeatherClient, openmeteo::GeocodingResult};
use crate::{PowdertimeError, Result};
use tracing::debug;

/// The different ways a home location can be given
#[derive(Debug, Clone, PartialEq)]
pub enum LocationInput {
    Coordinates(f64, f64),
    PostalCode(String),
    Name {
        city: String,
        state: Option<String>,
        country: String,
    },
}

impl LocationInput {
    /// Interpret a `location` config block; coordinates win over zip code,
    /// zip code wins over city
    pub fn from_config(config: &LocationConfig) -> Result<Self> {
        if let (Some(lat), Some(lon)) = (config.latitude, config.longitude) {
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                return Err(PowdertimeError::validation(format!(
                    "Coordinates out of range: ({lat}, {lon})"
                )));
            }
            return Ok(Self::Coordinates(lat, lon));
        }

        if let Some(zip) = non_empty(&config.zipcode) {
            return Ok(Self::PostalCode(zip.to_string()));
        }

        match non_empty(&config.city) {
            Some(city) => Ok(Self::Name {
                city: city.to_string(),
                state: non_empty(&config.state).map(str::to_string),
                country: non_empty(&config.country).unwrap_or("US").to_string(),
            }),
            None => Err(PowdertimeError::config(
                "location needs latitude/longitude, a zipcode, or a city",
            )),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Service for resolving location inputs
pub struct LocationResolver;

impl LocationResolver {
    /// Resolve a location input into a structured Location
    pub fn resolve_location(api_client: &WeatherClient, input: LocationInput) -> Result<Location> {
        debug!("Resolving location input: {:?}", input);

        let location = match input {
            LocationInput::Coordinates(lat, lon) => Location::from_coordinates(lat, lon),
            LocationInput::PostalCode(zip) => Self::resolve_postal_code(api_client, &zip)?,
            LocationInput::Name {
                city,
                state,
                country,
            } => Self::resolve_name(api_client, &city, state.as_deref(), &country)?,
        };

        debug!(
            "Resolved location: {} at ({}, {})",
            location.name, location.latitude, location.longitude
        );

        Ok(location)
    }

    /// Resolve a US zip code via geocoding
    fn resolve_postal_code(api_client: &WeatherClient, zip: &str) -> Result<Location> {
        debug!("Geocoding zip code: {}", zip);

        let results = api_client.geocode(zip, Some("US"))?;
        let best = results.into_iter().next().ok_or_else(|| {
            PowdertimeError::validation(format!("Could not geocode zipcode: {zip}"))
        })?;

        Ok(into_location(best, zip.to_string()))
    }

    /// Resolve a city name, preferring results in the requested state
    fn resolve_name(
        api_client: &WeatherClient,
        city: &str,
        state: Option<&str>,
        country: &str,
    ) -> Result<Location> {
        debug!("Geocoding city: {} ({:?}, {})", city, state, country);

        let country_code = (country.len() == 2).then_some(country);
        let results = api_client.geocode(city, country_code)?;

        let best = pick_best(results, state).ok_or_else(|| {
            let query = match state {
                Some(state) => format!("{city}, {state}, {country}"),
                None => format!("{city}, {country}"),
            };
            PowdertimeError::validation(format!("Could not find coordinates for: {query}"))
        })?;

        let name = best.name.clone();
        Ok(into_location(best, name))
    }
}

fn into_location(result: GeocodingResult, name: String) -> Location {
    match result.admin1 {
        Some(region) => Location::with_region(result.latitude, result.longitude, name, region),
        None => Location::new(result.latitude, result.longitude, name),
    }
}

/// First result in the requested state, else the first result
fn pick_best(results: Vec<GeocodingResult>, state: Option<&str>) -> Option<GeocodingResult> {
    let wanted = state.map(|s| us_state_name(s).unwrap_or(s).to_lowercase());

    if let Some(wanted) = wanted {
        if let Some(index) = results.iter().position(|r| {
            r.admin1
                .as_deref()
                .is_some_and(|admin| admin.to_lowercase() == wanted)
        }) {
            return results.into_iter().nth(index);
        }
    }

    results.into_iter().next()
}

/// Full name for a two-letter US state code
fn us_state_name(code: &str) -> Option<&'static str> {
    let name = match code.to_ascii_uppercase().as_str() {
        "AK" => "Alaska",
        "AL" => "Alabama",
        "AR" => "Arkansas",
        "AZ" => "Arizona",
        "CA" => "California",
        "CO" => "Colorado",
        "CT" => "Connecticut",
        "DE" => "Delaware",
        "FL" => "Florida",
        "GA" => "Georgia",
        "HI" => "Hawaii",
        "IA" => "Iowa",
        "ID" => "Idaho",
        "IL" => "Illinois",
        "IN" => "Indiana",
        "KS" => "Kansas",
        "KY" => "Kentucky",
        "LA" => "Louisiana",
        "MA" => "Massachusetts",
        "MD" => "Maryland",
        "ME" => "Maine",
        "MI" => "Michigan",
        "MN" => "Minnesota",
        "MO" => "Missouri",
        "MS" => "Mississippi",
        "MT" => "Montana",
        "NC" => "North Carolina",
        "ND" => "North Dakota",
        "NE" => "Nebraska",
        "NH" => "New Hampshire",
        "NJ" => "New Jersey",
        "NM" => "New Mexico",
        "NV" => "Nevada",
        "NY" => "New York",
        "OH" => "Ohio",
        "OK" => "Oklahoma",
        "OR" => "Oregon",
        "PA" => "Pennsylvania",
        "RI" => "Rhode Island",
        "SC" => "South Carolina",
        "SD" => "South Dakota",
        "TN" => "Tennessee",
        "TX" => "Texas",
        "UT" => "Utah",
        "VA" => "Virginia",
        "VT" => "Vermont",
        "WA" => "Washington",
        "WI" => "Wisconsin",
        "WV" => "West Virginia",
        "WY" => "Wyoming",
        _ => return None,
    };
    Some(name)
}
