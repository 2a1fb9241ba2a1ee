//! Daily forecast records as produced by the weather client

use super::Resort;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of forecast for one resort
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastDay {
    /// Calendar day in the resort's local timezone
    pub date: NaiveDate,
    /// Snowfall for the day in inches
    pub snowfall_inches: f64,
    /// Daily high temperature in Fahrenheit, when the API reports one
    pub high_temp_f: Option<f64>,
}

impl ForecastDay {
    /// Create a new forecast day
    #[must_use]
    pub fn new(date: NaiveDate, snowfall_inches: f64, high_temp_f: Option<f64>) -> Self {
        Self {
            date,
            snowfall_inches,
            high_temp_f,
        }
    }

    /// Whether any snow is forecast for this day
    #[must_use]
    pub fn has_snow(&self) -> bool {
        self.snowfall_inches > 0.0
    }
}

/// The fetched forecast window of a single resort
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ResortForecast {
    pub resort: Resort,
    /// Days ordered by date
    pub days: Vec<ForecastDay>,
}

impl ResortForecast {
    #[must_use]
    pub fn new(resort: Resort, days: Vec<ForecastDay>) -> Self {
        Self { resort, days }
    }

    /// Total snowfall over the whole window in inches
    #[must_use]
    pub fn total_snowfall(&self) -> f64 {
        self.days.iter().map(|d| d.snowfall_inches).sum()
    }

    /// Largest single-day snowfall in inches, zero for an empty window
    #[must_use]
    pub fn max_daily_snowfall(&self) -> f64 {
        self.days
            .iter()
            .map(|d| d.snowfall_inches)
            .fold(0.0, f64::max)
    }
}
