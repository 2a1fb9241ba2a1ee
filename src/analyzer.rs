//! Snow accumulation analyzer
//!
//! Adds up each resort's snowfall over the forecast window and reports the
//! resorts whose total meets the alert threshold.

use crate::models::{ForecastDay, Resort, ResortForecast};
use crate::{PowdertimeError, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use tracing::{debug, info, warn};

/// A significant snowfall event at one resort
#[derive(Debug, Clone, Serialize)]
pub struct SnowEvent {
    pub resort: Resort,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_snowfall_inches: f64,
    pub max_daily_snowfall_inches: f64,
    /// The snowy days making up the event, ordered by date
    pub days: Vec<ForecastDay>,
}

impl SnowEvent {
    /// Build an event from a whole forecast window.
    ///
    /// Totals cover every day; only the days with snow are kept. `None` when
    /// the window has no snow at all.
    fn from_window(resort: &Resort, window: &[ForecastDay]) -> Option<Self> {
        let total_snowfall_inches = window.iter().map(|d| d.snowfall_inches).sum();
        let max_daily_snowfall_inches = window
            .iter()
            .map(|d| d.snowfall_inches)
            .fold(0.0, f64::max);
        let days: Vec<ForecastDay> = window
            .iter()
            .filter(|d| d.has_snow())
            .cloned()
            .collect();

        Some(Self {
            resort: resort.clone(),
            start_date: days.first()?.date,
            end_date: days.last()?.date,
            total_snowfall_inches,
            max_daily_snowfall_inches,
            days,
        })
    }

    #[must_use]
    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// Human-readable block used by console and email output
    #[must_use]
    pub fn summary(&self) -> String {
        let mut summary = format!("🎿 {}\n", self.resort);
        summary.push_str(&format!(
            "   Total: {:.1}\" over {} day(s)\n",
            self.total_snowfall_inches,
            self.day_count()
        ));
        summary.push_str(&format!(
            "   Biggest day: {:.1}\"\n",
            self.max_daily_snowfall_inches
        ));
        summary.push_str("   Snow days:\n");

        for day in &self.days {
            summary.push_str(&format!(
                "      • {}: {:.1}\"",
                day.date.format("%a %b %d"),
                day.snowfall_inches
            ));
            if let Some(high) = day.high_temp_f {
                summary.push_str(&format!(" (High: {high:.0}°F)"));
            }
            summary.push('\n');
        }

        summary
    }
}

impl fmt::Display for SnowEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}

/// Result of analyzing every fetched resort
#[derive(Debug, Default)]
pub struct AnalysisOutcome {
    /// Events sorted by total snowfall, largest first
    pub events: Vec<SnowEvent>,
    /// Resorts whose forecast was rejected as malformed
    pub rejected: Vec<(String, PowdertimeError)>,
}

/// Analyzes weather forecasts for significant snowfall
#[derive(Debug, Clone, Copy)]
pub struct SnowAnalyzer {
    threshold_inches: f64,
}

impl SnowAnalyzer {
    #[must_use]
    pub fn new(threshold_inches: f64) -> Self {
        Self { threshold_inches }
    }

    #[must_use]
    pub fn threshold_inches(&self) -> f64 {
        self.threshold_inches
    }

    /// The event for one resort, if its window total reaches the threshold.
    ///
    /// Snowfall is summed over the whole window, so separate storms add up.
    /// Fails on negative or non-finite snowfall and on dates that are not
    /// strictly increasing.
    pub fn analyze_resort(
        &self,
        resort: &Resort,
        days: &[ForecastDay],
    ) -> Result<Option<SnowEvent>> {
        validate_days(resort, days)?;

        let event = SnowEvent::from_window(resort, days)
            .filter(|event| event.total_snowfall_inches >= self.threshold_inches);

        debug!(
            "{}: {} forecast days, {} at or above {:.1}\"",
            resort.name,
            days.len(),
            if event.is_some() { "significant" } else { "nothing" },
            self.threshold_inches
        );

        Ok(event)
    }

    /// Analyze every resort; malformed forecasts are logged and skipped
    pub fn find_significant_events(&self, forecasts: &[ResortForecast]) -> AnalysisOutcome {
        let mut outcome = AnalysisOutcome::default();

        for forecast in forecasts {
            match self.analyze_resort(&forecast.resort, &forecast.days) {
                Ok(event) => outcome.events.extend(event),
                Err(e) => {
                    warn!("Skipping {}: {}", forecast.resort.name, e);
                    outcome.rejected.push((forecast.resort.name.clone(), e));
                }
            }
        }

        sort_events(&mut outcome.events);

        info!(
            "Found {} significant snow event(s) across {} resort(s)",
            outcome.events.len(),
            forecasts.len()
        );

        outcome
    }
}

/// Largest total first; ties by resort name, then start date
pub fn sort_events(events: &mut [SnowEvent]) {
    events.sort_by(compare_events);
}

fn compare_events(a: &SnowEvent, b: &SnowEvent) -> Ordering {
    b.total_snowfall_inches
        .total_cmp(&a.total_snowfall_inches)
        .then_with(|| a.resort.name.cmp(&b.resort.name))
        .then_with(|| a.start_date.cmp(&b.start_date))
}

fn validate_days(resort: &Resort, days: &[ForecastDay]) -> Result<()> {
    for day in days {
        if !day.snowfall_inches.is_finite() || day.snowfall_inches < 0.0 {
            return Err(PowdertimeError::data(
                &resort.name,
                format!("invalid snowfall {} on {}", day.snowfall_inches, day.date),
            ));
        }
    }

    if let Some(pair) = days.windows(2).find(|pair| pair[1].date <= pair[0].date) {
        return Err(PowdertimeError::data(
            &resort.name,
            format!(
                "forecast days out of order: {} follows {}",
                pair[1].date, pair[0].date
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn resort(name: &str) -> Resort {
        Resort::new(name, 39.0, -106.0, Some(9000), Some("CO"))
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, day).unwrap()
    }

    fn days(start: u32, inches: &[f64]) -> Vec<ForecastDay> {
        inches
            .iter()
            .enumerate()
            .map(|(i, &snow)| ForecastDay::new(date(start + i as u32), snow, Some(28.0)))
            .collect()
    }

    #[test]
    fn test_single_storm_event() {
        let analyzer = SnowAnalyzer::new(6.0);

        let event = analyzer
            .analyze_resort(&resort("Test Resort"), &days(13, &[3.1, 5.2, 2.8, 1.4]))
            .unwrap()
            .unwrap();

        assert!((event.total_snowfall_inches - 12.5).abs() < 1e-6);
        assert!((event.max_daily_snowfall_inches - 5.2).abs() < 1e-6);
        assert_eq!(event.start_date, date(13));
        assert_eq!(event.end_date, date(16));
        assert_eq!(event.day_count(), 4);
    }

    #[test]
    fn test_dry_days_are_not_part_of_event() {
        let analyzer = SnowAnalyzer::new(6.0);

        let event = analyzer
            .analyze_resort(&resort("Test Resort"), &days(12, &[3.0, 5.0, 2.0, 0.0]))
            .unwrap()
            .unwrap();

        assert_eq!(event.total_snowfall_inches, 10.0);
        assert_eq!(event.max_daily_snowfall_inches, 5.0);
        assert_eq!(event.day_count(), 3, "Should only include days with snow");
        assert_eq!(event.end_date, date(14));
    }

    #[test]
    fn test_below_threshold_is_none() {
        let analyzer = SnowAnalyzer::new(6.0);
        let event = analyzer
            .analyze_resort(&resort("Test Resort"), &days(12, &[1.0, 2.0, 1.5]))
            .unwrap();
        assert!(event.is_none());
    }

    #[test]
    fn test_empty_input_is_none() {
        let analyzer = SnowAnalyzer::new(6.0);
        let event = analyzer.analyze_resort(&resort("Test Resort"), &[]).unwrap();
        assert!(event.is_none());
    }

    #[test]
    fn test_separate_storms_add_up() {
        let analyzer = SnowAnalyzer::new(6.0);

        let event = analyzer
            .analyze_resort(&resort("Test Resort"), &days(1, &[3.0, 0.0, 4.0]))
            .unwrap()
            .unwrap();

        assert_eq!(event.total_snowfall_inches, 7.0);
        assert_eq!(event.max_daily_snowfall_inches, 4.0);
        assert_eq!(event.day_count(), 2);
        assert_eq!(event.start_date, date(1));
        assert_eq!(event.end_date, date(3));
    }

    #[test]
    fn test_one_event_per_resort() {
        let analyzer = SnowAnalyzer::new(6.0);

        let event = analyzer
            .analyze_resort(&resort("Test Resort"), &days(1, &[4.0, 3.0, 0.0, 6.5, 0.0, 2.0]))
            .unwrap()
            .unwrap();

        assert!((event.total_snowfall_inches - 15.5).abs() < 1e-6);
        assert_eq!(event.max_daily_snowfall_inches, 6.5);
        let snow_dates: Vec<NaiveDate> = event.days.iter().map(|d| d.date).collect();
        assert_eq!(snow_dates, vec![date(1), date(2), date(4), date(6)]);
    }

    #[test]
    fn test_date_gap_still_counts() {
        let analyzer = SnowAnalyzer::new(6.0);
        let mut forecast = days(1, &[5.0]);
        forecast.push(ForecastDay::new(date(3), 5.0, None));

        let event = analyzer.analyze_resort(&resort("Gap"), &forecast).unwrap().unwrap();

        assert_eq!(event.total_snowfall_inches, 10.0);
        assert_eq!(event.end_date, date(3));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let analyzer = SnowAnalyzer::new(6.0);
        let event = analyzer
            .analyze_resort(&resort("Edge"), &days(1, &[2.0, 4.0]))
            .unwrap();
        assert!(event.is_some());
    }

    #[rstest]
    #[case(-0.5)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn test_invalid_snowfall_is_data_error(#[case] bad: f64) {
        let analyzer = SnowAnalyzer::new(6.0);
        let err = analyzer
            .analyze_resort(&resort("Broken"), &days(1, &[2.0, bad, 3.0]))
            .unwrap_err();
        assert!(err.is_data_error());
        assert!(err.to_string().contains("Broken"));
    }

    #[test]
    fn test_unordered_dates_are_data_error() {
        let analyzer = SnowAnalyzer::new(6.0);
        let mut forecast = days(5, &[2.0, 3.0]);
        forecast.reverse();

        let err = analyzer.analyze_resort(&resort("Backwards"), &forecast).unwrap_err();

        assert!(err.is_data_error());
    }

    #[rstest]
    #[case(1.0, &[0.5, 0.7, 0.0, 1.2, 3.3, 0.0, 0.1], true)]
    #[case(6.0, &[3.1, 5.2, 2.8, 1.4, 0.0, 8.0, 0.0, 0.0, 4.4, 4.4], true)]
    #[case(0.1, &[0.0, 0.05, 0.0, 0.04], false)]
    #[case(12.0, &[6.0, 0.0, 5.99], false)]
    #[case(12.0, &[6.0, 0.0, 6.0], true)]
    fn test_event_invariants(
        #[case] threshold: f64,
        #[case] inches: &[f64],
        #[case] significant: bool,
    ) {
        let analyzer = SnowAnalyzer::new(threshold);
        let forecast = days(1, inches);

        let event = analyzer.analyze_resort(&resort("Props"), &forecast).unwrap();

        assert_eq!(event.is_some(), significant);
        let Some(event) = event else { return };

        assert!(event.total_snowfall_inches >= threshold);

        let window_sum: f64 = inches.iter().sum();
        let kept_sum: f64 = event.days.iter().map(|d| d.snowfall_inches).sum();
        assert!((window_sum - event.total_snowfall_inches).abs() < 1e-6);
        assert!((kept_sum - event.total_snowfall_inches).abs() < 1e-6);
        assert!(event.days.iter().all(ForecastDay::has_snow));

        let max = inches.iter().copied().fold(0.0, f64::max);
        assert!((max - event.max_daily_snowfall_inches).abs() < 1e-6);

        assert_eq!(event.start_date, event.days[0].date);
        assert_eq!(event.end_date, event.days[event.days.len() - 1].date);
    }

    #[test]
    fn test_find_significant_events() {
        let analyzer = SnowAnalyzer::new(6.0);
        let forecasts = vec![
            ResortForecast::new(resort("Resort A"), days(12, &[8.0])),
            ResortForecast::new(resort("Resort B"), days(12, &[2.0])),
        ];

        let outcome = analyzer.find_significant_events(&forecasts);

        assert_eq!(outcome.events.len(), 1, "Should find only one significant event");
        assert_eq!(outcome.events[0].resort.name, "Resort A");
        assert!(outcome.rejected.is_empty());
    }

    #[test]
    fn test_events_sorted_by_total_then_name() {
        let analyzer = SnowAnalyzer::new(6.0);
        let forecasts = vec![
            ResortForecast::new(resort("Copper"), days(1, &[7.0])),
            ResortForecast::new(resort("Alta"), days(1, &[10.0, 2.0])),
            ResortForecast::new(resort("Brighton"), days(1, &[7.0])),
            ResortForecast::new(resort("Aspen"), days(1, &[7.0])),
        ];

        let outcome = analyzer.find_significant_events(&forecasts);
        let order: Vec<&str> = outcome
            .events
            .iter()
            .map(|e| e.resort.name.as_str())
            .collect();

        assert_eq!(order, vec!["Alta", "Aspen", "Brighton", "Copper"]);
    }

    #[test]
    fn test_equal_totals_same_resort_sorted_by_start() {
        let vail = resort("Vail");
        let later = SnowEvent::from_window(&vail, &days(20, &[4.0, 4.0])).unwrap();
        let earlier = SnowEvent::from_window(&vail, &days(5, &[8.0])).unwrap();
        let mut events = vec![later, earlier];

        sort_events(&mut events);

        assert_eq!(events[0].start_date, date(5));
        assert_eq!(events[1].start_date, date(20));
    }

    #[test]
    fn test_bad_resort_does_not_stop_others() {
        let analyzer = SnowAnalyzer::new(6.0);
        let forecasts = vec![
            ResortForecast::new(resort("Broken"), days(1, &[-1.0])),
            ResortForecast::new(resort("Good"), days(1, &[9.0])),
        ];

        let outcome = analyzer.find_significant_events(&forecasts);

        assert_eq!(outcome.events.len(), 1);
        assert_eq!(outcome.events[0].resort.name, "Good");
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected[0].0, "Broken");
    }

    #[test]
    fn test_summary_rendering() {
        let analyzer = SnowAnalyzer::new(6.0);
        let event = analyzer
            .analyze_resort(&resort("Vail"), &days(13, &[3.1, 0.0, 5.2]))
            .unwrap()
            .unwrap();

        let summary = event.summary();

        assert!(summary.starts_with("🎿 Vail, CO\n"));
        assert!(summary.contains("Total: 8.3\" over 2 day(s)"));
        assert!(summary.contains("Biggest day: 5.2\""));
        assert!(summary.contains("• Tue Jan 13: 3.1\" (High: 28°F)"));
        assert!(!summary.contains("Wed Jan 14"));
    }
}
