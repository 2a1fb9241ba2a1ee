//! Powdertime - ski resort snowfall monitor
//!
//! Fetches daily snowfall forecasts for ski resorts near a home location,
//! finds multi-day snow events that clear a threshold, and reports them on
//! the console, by email or to a webhook.

pub mod analyzer;
pub mod app;
pub mod config;
pub mod demo;
pub mod error;
pub mod location_resolver;
pub mod models;
pub mod notifier;
pub mod resorts;
pub mod weather;

// Re-export core types for public API
pub use analyzer::{AnalysisOutcome, SnowAnalyzer, SnowEvent};
pub use app::{Discovery, MonitoredResort, Powdertime, RunSummary};
pub use config::PowdertimeConfig;
pub use error::PowdertimeError;
pub use location_resolver::{LocationInput, LocationResolver};
pub use models::{ForecastDay, Location, Resort, ResortForecast};
pub use notifier::{AlertReport, NotificationMethod, Notifier};
pub use resorts::ResortCatalog;
pub use weather::{ForecastSource, WeatherClient};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, PowdertimeError>;
