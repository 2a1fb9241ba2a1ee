//! Console notification, printed to stdout

use super::{AlertReport, Notifier};
use crate::Result;
use std::fmt::Write;

const RULE_WIDTH: usize = 70;

#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// The text `deliver` prints
    #[must_use]
    pub fn render(&self, report: &AlertReport<'_>) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let mut out = String::new();

        if !report.forecasts.is_empty() {
            let _ = writeln!(out, "\n📊 Forecast Summary:");
            for forecast in report.forecasts {
                let _ = writeln!(
                    out,
                    "   • {}: {:.1}\" total",
                    forecast.resort.name,
                    forecast.total_snowfall()
                );
            }
        }

        if !report.has_events() {
            let _ = writeln!(
                out,
                "\n✅ No significant snowfall forecasted in the next {} days.",
                report.forecast_days
            );
            return out;
        }

        let _ = writeln!(out, "\n{rule}");
        let _ = writeln!(out, "❄️  POWDER ALERT! Significant Snow Forecasted ❄️");
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(
            out,
            "\nFound {} snow event(s) with significant snowfall:\n",
            report.events.len()
        );

        for (i, event) in report.events.iter().enumerate() {
            let _ = writeln!(out, "{}. {}", i + 1, event.summary());
        }

        let _ = writeln!(out, "{rule}");
        out
    }
}

impl Notifier for ConsoleNotifier {
    fn name(&self) -> &'static str {
        "console"
    }

    fn deliver(&self, report: &AlertReport<'_>) -> Result<()> {
        print!("{}", self.render(report));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::SnowAnalyzer;
    use crate::models::{ForecastDay, Resort, ResortForecast};
    use chrono::NaiveDate;

    fn forecast(name: &str, inches: &[f64]) -> ResortForecast {
        let resort = Resort::new(name, 39.0, -106.0, Some(9000), Some("CO"));
        let days = inches
            .iter()
            .enumerate()
            .map(|(i, &snow)| {
                ForecastDay::new(
                    NaiveDate::from_ymd_opt(2026, 1, 12 + i as u32).unwrap(),
                    snow,
                    Some(28.0),
                )
            })
            .collect();
        ResortForecast::new(resort, days)
    }

    #[test]
    fn test_console_notification_with_forecasts() {
        let forecasts = vec![
            forecast("Test Resort A", &[8.0, 0.0]),
            forecast("Test Resort B", &[2.0, 1.0]),
        ];
        let events = SnowAnalyzer::new(6.0).find_significant_events(&forecasts).events;
        let report = AlertReport::new(&events, 10).with_forecasts(&forecasts);

        let output = ConsoleNotifier::new().render(&report);

        assert!(output.contains("📊 Forecast Summary:"));
        assert!(output.contains("Test Resort A: 8.0\" total"));
        assert!(output.contains("Test Resort B: 3.0\" total"));
        assert!(output.contains("POWDER ALERT"));
        assert!(output.contains("1. 🎿 Test Resort A, CO"));
    }

    #[test]
    fn test_console_notification_no_events_with_forecasts() {
        let forecasts = vec![forecast("Test Resort A", &[1.0, 0.5])];
        let report = AlertReport::new(&[], 7).with_forecasts(&forecasts);

        let output = ConsoleNotifier::new().render(&report);

        assert!(output.contains("📊 Forecast Summary:"));
        assert!(output.contains("Test Resort A: 1.5\" total"));
        assert!(output.contains("No significant snowfall forecasted in the next 7 days"));
        assert!(!output.contains("POWDER ALERT"));
    }

    #[test]
    fn test_console_notification_without_forecasts() {
        let forecasts = vec![forecast("Test Resort A", &[8.0])];
        let events = SnowAnalyzer::new(6.0).find_significant_events(&forecasts).events;
        let report = AlertReport::new(&events, 10);

        let output = ConsoleNotifier::new().render(&report);

        assert!(!output.contains("📊 Forecast Summary:"));
        assert!(output.contains("POWDER ALERT"));
    }
}
