//! Weather API client for Open-Meteo
//!
//! Fetches daily snowfall and high temperature forecasts, and exposes the
//! Open-Meteo geocoding endpoint used by the location resolver.

use crate::config::{MAX_FORECAST_DAYS, WeatherConfig};
use crate::models::{ForecastDay, Resort};
use crate::{PowdertimeError, Result};
use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

const CM_PER_INCH: f64 = 2.54;

/// Anything that can produce a daily forecast window for a resort
pub trait ForecastSource {
    /// Forecast for the next `days` days, ordered by date
    fn daily_forecast(&self, resort: &Resort, days: u32) -> Result<Vec<ForecastDay>>;
}

/// Blocking Open-Meteo client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    geocoding_url: String,
    timezone: String,
}

impl WeatherClient {
    /// Create a new weather API client
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("powdertime/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PowdertimeError::api(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            geocoding_url: config.geocoding_url.trim_end_matches('/').to_string(),
            timezone: config.timezone.clone(),
        })
    }

    /// Get the daily forecast for a point; `label` names the point in errors
    #[instrument(skip(self))]
    pub fn get_forecast(
        &self,
        label: &str,
        latitude: f64,
        longitude: f64,
        days: u32,
    ) -> Result<Vec<ForecastDay>> {
        let clamped = days.clamp(1, MAX_FORECAST_DAYS);
        if clamped != days {
            warn!(
                "Requested {} forecast days, Open-Meteo allows 1-{}; using {}",
                days, MAX_FORECAST_DAYS, clamped
            );
        }

        let url = self.forecast_url(latitude, longitude, clamped);
        debug!("Open-Meteo forecast URL: {}", url);

        let start_time = Instant::now();
        let response: openmeteo::ForecastResponse = self.get_json(&url)?;
        let forecast = parse_daily(label, &response)?;

        info!(
            "Retrieved {} forecast days for {} in {:.3}s",
            forecast.len(),
            label,
            start_time.elapsed().as_secs_f64()
        );

        Ok(forecast)
    }

    /// Search the geocoding API by place name or postal code
    #[instrument(skip(self))]
    pub fn geocode(
        &self,
        query: &str,
        country_code: Option<&str>,
    ) -> Result<Vec<openmeteo::GeocodingResult>> {
        let mut url = format!(
            "{}/search?name={}&count=10&language=en&format=json",
            self.geocoding_url,
            urlencoding::encode(query)
        );
        if let Some(code) = country_code {
            url.push_str(&format!("&countryCode={}", urlencoding::encode(code)));
        }

        let response: openmeteo::GeocodingResponse = self.get_json(&url)?;
        let results = response.results.unwrap_or_default();

        if results.is_empty() {
            warn!("No geocoding results found for '{}'", query);
        } else {
            debug!("Found {} geocoding results for '{}'", results.len(), query);
        }

        Ok(results)
    }

    fn forecast_url(&self, latitude: f64, longitude: f64, days: u32) -> String {
        format!(
            "{}/forecast?latitude={}&longitude={}&daily=snowfall_sum,temperature_2m_max&temperature_unit=fahrenheit&forecast_days={}&timezone={}",
            self.base_url,
            latitude,
            longitude,
            days,
            urlencoding::encode(&self.timezone)
        )
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| PowdertimeError::api(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(PowdertimeError::api(format!(
                "Open-Meteo responded with {status}: {body}"
            )));
        }

        response
            .json()
            .map_err(|e| PowdertimeError::api(format!("Invalid response from Open-Meteo: {e}")))
    }
}

impl ForecastSource for WeatherClient {
    fn daily_forecast(&self, resort: &Resort, days: u32) -> Result<Vec<ForecastDay>> {
        self.get_forecast(&resort.name, resort.latitude, resort.longitude, days)
    }
}

/// Convert the `daily` block of a forecast response into forecast days.
///
/// Snowfall arrives in centimetres; missing values count as no snow.
fn parse_daily(label: &str, response: &openmeteo::ForecastResponse) -> Result<Vec<ForecastDay>> {
    let Some(daily) = &response.daily else {
        return Ok(Vec::new());
    };

    daily
        .time
        .iter()
        .enumerate()
        .map(|(i, date_str)| {
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                PowdertimeError::data(label, format!("invalid forecast date '{date_str}': {e}"))
            })?;

            let snowfall_cm = openmeteo::value_at(&daily.snowfall_sum, i).unwrap_or(0.0);
            let high_temp_f = openmeteo::value_at(&daily.temperature_max, i);

            Ok(ForecastDay::new(date, snowfall_cm / CM_PER_INCH, high_temp_f))
        })
        .collect()
}

/// `OpenMeteo` API response structures
pub mod openmeteo {
    use serde::Deserialize;

    /// Forecast response, only the parts Powdertime requests
    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub latitude: Option<f64>,
        pub longitude: Option<f64>,
        pub timezone: Option<String>,
        pub daily: Option<DailyData>,
    }

    /// Daily weather data from `OpenMeteo`
    #[derive(Debug, Deserialize)]
    pub struct DailyData {
        pub time: Vec<String>,
        /// Centimetres of snow per day
        pub snowfall_sum: Option<Vec<Option<f64>>>,
        #[serde(rename = "temperature_2m_max")]
        pub temperature_max: Option<Vec<Option<f64>>>,
    }

    /// Geocoding response from `OpenMeteo`
    #[derive(Debug, Deserialize)]
    pub struct GeocodingResponse {
        pub results: Option<Vec<GeocodingResult>>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct GeocodingResult {
        pub name: String,
        pub latitude: f64,
        pub longitude: f64,
        pub country_code: Option<String>,
        /// State for US results
        pub admin1: Option<String>,
        pub postcodes: Option<Vec<String>>,
    }

    pub(crate) fn value_at(values: &Option<Vec<Option<f64>>>, index: usize) -> Option<f64> {
        values.as_ref().and_then(|v| v.get(index).copied().flatten())
    }
}
