//! Data models for the Powdertime application
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic coordinates of the user's home
//! - Resort: Ski resorts being monitored
//! - Forecast: Daily forecast records per resort

pub mod forecast;
pub mod location;
pub mod resort;

// Re-export all public types for convenient access
pub use forecast::{ForecastDay, ResortForecast};
pub use location::Location;
pub use resort::Resort;
