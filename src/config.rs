//! Configuration management for Powdertime
//!
//! Handles loading configuration from a YAML file plus environment variable
//! overrides, and provides validation for all configuration settings.

use crate::PowdertimeError;
use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize, Serializer};
use std::path::{Path, PathBuf};

/// Upper bound of the Open-Meteo forecast window
pub const MAX_FORECAST_DAYS: u32 = 16;

/// Root configuration structure for Powdertime
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowdertimeConfig {
    /// Home location used to search for nearby resorts
    #[serde(default)]
    pub location: LocationConfig,
    /// Search radius around the home location
    #[serde(default = "default_search_radius")]
    pub search_radius_miles: f64,
    /// What counts as significant snow
    #[serde(default)]
    pub snow_threshold: SnowThresholdConfig,
    /// Explicit resort list; takes precedence over the radius search
    #[serde(default)]
    pub resorts: Option<Vec<ResortSpec>>,
    /// Replacement for the builtin resort catalog (YAML or JSON)
    #[serde(default)]
    pub resort_catalog: Option<PathBuf>,
    /// Interval between runs in `watch` mode
    #[serde(default = "default_check_frequency")]
    pub check_frequency_hours: u32,
    /// Notification settings
    #[serde(default)]
    pub notifications: NotificationsConfig,
    /// Weather API settings
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Home location, either as coordinates or as something to geocode
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationConfig {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub zipcode: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Snow threshold settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnowThresholdConfig {
    /// Minimum event total in inches
    #[serde(default = "default_min_inches")]
    pub min_inches: f64,
    /// Days ahead to fetch
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u32,
}

/// One entry of the explicit `resorts` list
///
/// Either `name` alone (catalog lookup) or `name` + `latitude` + `longitude`
/// (custom resort).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResortSpec {
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub elevation: Option<u32>,
    pub state: Option<String>,
}

/// Notification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// console, email or webhook
    #[serde(default = "default_notification_method")]
    pub method: String,
    /// Send a confirmation even when nothing significant is forecast
    #[serde(default)]
    pub always_notify: bool,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub webhook: WebhookConfig,
}

/// SMTP settings for email notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub smtp_server: Option<String>,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    pub from_email: Option<String>,
    pub to_email: Option<String>,
    /// Printed as `***` whenever the config is serialized
    #[serde(serialize_with = "redact_secret")]
    pub password: Option<String>,
}

/// Webhook notification settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookConfig {
    pub url: Option<String>,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL of the forecast API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Base URL of the geocoding API
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
    /// Timezone used to cut daily buckets
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

const REDACTED: &str = "***";

fn redact_secret<S: Serializer>(
    secret: &Option<String>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match secret {
        Some(_) => serializer.serialize_str(REDACTED),
        None => serializer.serialize_none(),
    }
}

// Default value functions
fn default_search_radius() -> f64 {
    100.0
}

fn default_min_inches() -> f64 {
    6.0
}

fn default_forecast_days() -> u32 {
    10
}

fn default_check_frequency() -> u32 {
    6
}

fn default_notification_method() -> String {
    "console".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_weather_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1".to_string()
}

fn default_weather_timeout() -> u32 {
    10
}

fn default_timezone() -> String {
    "auto".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for SnowThresholdConfig {
    fn default() -> Self {
        Self {
            min_inches: default_min_inches(),
            forecast_days: default_forecast_days(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            method: default_notification_method(),
            always_notify: false,
            email: EmailConfig::default(),
            webhook: WebhookConfig::default(),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_server: None,
            smtp_port: default_smtp_port(),
            from_email: None,
            to_email: None,
            password: None,
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            geocoding_url: default_geocoding_url(),
            timeout_seconds: default_weather_timeout(),
            timezone: default_timezone(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for PowdertimeConfig {
    fn default() -> Self {
        Self {
            location: LocationConfig::default(),
            search_radius_miles: default_search_radius(),
            snow_threshold: SnowThresholdConfig::default(),
            resorts: None,
            resort_catalog: None,
            check_frequency_hours: default_check_frequency(),
            notifications: NotificationsConfig::default(),
            weather: WeatherConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl PowdertimeConfig {
    /// Pick the config file to load.
    ///
    /// An explicit path always wins. Otherwise `config.yaml` in the working
    /// directory, then the per-user config directory.
    #[must_use]
    pub fn resolve_path(explicit: Option<PathBuf>) -> PathBuf {
        if let Some(path) = explicit {
            return path;
        }

        let local = PathBuf::from("config.yaml");
        if local.exists() {
            return local;
        }

        match Self::get_config_path() {
            Some(user_path) if user_path.exists() => user_path,
            _ => local,
        }
    }

    /// Per-user configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("powdertime").join("config.yaml"))
    }

    /// Load configuration from the given YAML file and `POWDERTIME_*` env vars
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Err(PowdertimeError::config(format!(
                "Configuration file not found: {}",
                config_path.display()
            ))
            .into());
        }

        let settings = Config::builder()
            .add_source(File::from(config_path.to_path_buf()).format(FileFormat::Yaml))
            // POWDERTIME_NOTIFICATIONS__METHOD=webhook
            .add_source(
                Environment::with_prefix("POWDERTIME")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", config_path.display()))?;

        let mut config: PowdertimeConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Apply default values to fields that were present but left empty
    pub fn apply_defaults(&mut self) {
        if self.notifications.method.trim().is_empty() {
            self.notifications.method = default_notification_method();
        }
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.geocoding_url.is_empty() {
            self.weather.geocoding_url = default_geocoding_url();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_weather_timeout();
        }
        if self.weather.timezone.is_empty() {
            self.weather.timezone = default_timezone();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.check_frequency_hours == 0 {
            self.check_frequency_hours = default_check_frequency();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        let threshold = self.snow_threshold.min_inches;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(PowdertimeError::config(
                "snow_threshold.min_inches must be a positive number",
            )
            .into());
        }

        let days = self.snow_threshold.forecast_days;
        if days == 0 || days > MAX_FORECAST_DAYS {
            return Err(PowdertimeError::config(format!(
                "snow_threshold.forecast_days must be between 1 and {MAX_FORECAST_DAYS}"
            ))
            .into());
        }

        let radius = self.search_radius_miles;
        if !radius.is_finite() || radius <= 0.0 || radius > 3000.0 {
            return Err(PowdertimeError::config(
                "search_radius_miles must be between 0 and 3000",
            )
            .into());
        }

        if self.check_frequency_hours > 168 {
            return Err(PowdertimeError::config(
                "check_frequency_hours cannot exceed 168 hours (1 week)",
            )
            .into());
        }

        if self.weather.timeout_seconds > 300 {
            return Err(
                PowdertimeError::config("Weather API timeout cannot exceed 300 seconds").into(),
            );
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(PowdertimeError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(PowdertimeError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (key, url) in [
            ("weather.base_url", Some(&self.weather.base_url)),
            ("weather.geocoding_url", Some(&self.weather.geocoding_url)),
            ("notifications.webhook.url", self.notifications.webhook.url.as_ref()),
        ] {
            if let Some(url) = url {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(PowdertimeError::config(format!(
                        "{key} must be a valid HTTP or HTTPS URL"
                    ))
                    .into());
                }
            }
        }

        Ok(())
    }

    /// Look up a value by dotted key, e.g. `notifications.email.smtp_server`.
    ///
    /// Returns `None` for unknown keys and for unset optional values.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        let mut value = serde_json::to_value(self).ok()?;
        for part in key.split('.') {
            value = value.as_object_mut()?.remove(part)?;
        }
        if value.is_null() { None } else { Some(value) }
    }
}
