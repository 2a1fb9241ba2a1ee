//! Canned forecasts for trying Powdertime without calling Open-Meteo

use crate::models::{ForecastDay, Resort};
use crate::weather::ForecastSource;
use crate::{PowdertimeError, Result};
use chrono::{Days, NaiveDate};
use std::collections::HashMap;

/// Number of resorts that get a demo pattern
pub const DEMO_RESORT_LIMIT: usize = 5;

/// Daily snowfall in inches, cycled over the demo resorts
const PATTERNS: [[f64; 10]; 5] = [
    // storm cycle mid-window
    [0.0, 0.0, 4.5, 6.2, 3.8, 0.0, 0.0, 1.2, 0.0, 0.0],
    // early long storm
    [0.0, 1.0, 2.0, 5.0, 4.0, 1.5, 0.0, 0.0, 0.0, 0.0],
    // late storm
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 2.5, 3.5, 2.0, 1.0],
    // dusting
    [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    // steady light snow
    [1.0, 1.5, 2.0, 1.5, 1.0, 0.5, 0.5, 0.0, 0.0, 0.0],
];

/// Serves fixed snowfall patterns to the resorts it was built for
#[derive(Debug, Clone)]
pub struct DemoForecasts {
    start: NaiveDate,
    assignments: HashMap<String, usize>,
}

impl DemoForecasts {
    /// Assign patterns to `resorts` in order, starting on `start`
    #[must_use]
    pub fn new(start: NaiveDate, resorts: &[Resort]) -> Self {
        let assignments = resorts
            .iter()
            .enumerate()
            .map(|(i, resort)| (resort.name.clone(), i % PATTERNS.len()))
            .collect();

        Self { start, assignments }
    }

    /// Demo data starting today
    #[must_use]
    pub fn starting_today(resorts: &[Resort]) -> Self {
        Self::new(chrono::Local::now().date_naive(), resorts)
    }
}

impl ForecastSource for DemoForecasts {
    fn daily_forecast(&self, resort: &Resort, days: u32) -> Result<Vec<ForecastDay>> {
        let pattern = self
            .assignments
            .get(&resort.name)
            .map(|&index| &PATTERNS[index])
            .ok_or_else(|| {
                PowdertimeError::data(&resort.name, "no demo forecast for this resort")
            })?;

        pattern
            .iter()
            .take(days as usize)
            .enumerate()
            .map(|(offset, &snow)| {
                let date = self
                    .start
                    .checked_add_days(Days::new(offset as u64))
                    .ok_or_else(|| PowdertimeError::data(&resort.name, "demo date overflow"))?;
                Ok(ForecastDay::new(date, snow, Some(28.0 - snow * 2.0)))
            })
            .collect()
    }
}
