//! Webhook notification, a JSON POST to a configured URL

use super::{AlertReport, Notifier};
use crate::config::WebhookConfig;
use crate::{PowdertimeError, Result};
use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

const WEBHOOK_TIMEOUT_SECS: u64 = 10;

/// JSON body POSTed to the webhook
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookPayload {
    /// `powder_alert` or `status_check`
    pub alert_type: &'static str,
    pub event_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub events: Vec<WebhookEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookEvent {
    pub resort_name: String,
    pub resort_state: Option<String>,
    pub total_snowfall_inches: f64,
    pub max_daily_snowfall_inches: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl WebhookPayload {
    /// Payload for a report, or `None` when there is nothing to send
    #[must_use]
    pub fn from_report(report: &AlertReport<'_>) -> Option<Self> {
        if report.has_events() {
            let events = report
                .events
                .iter()
                .map(|event| WebhookEvent {
                    resort_name: event.resort.name.clone(),
                    resort_state: event.resort.state.clone(),
                    total_snowfall_inches: event.total_snowfall_inches,
                    max_daily_snowfall_inches: event.max_daily_snowfall_inches,
                    start_date: event.start_date,
                    end_date: event.end_date,
                })
                .collect::<Vec<_>>();

            return Some(Self {
                alert_type: "powder_alert",
                event_count: events.len(),
                message: None,
                events,
            });
        }

        report.always_notify.then(|| Self {
            alert_type: "status_check",
            event_count: 0,
            message: Some(format!(
                "No significant snowfall forecasted in the next {} days",
                report.forecast_days
            )),
            events: Vec::new(),
        })
    }
}

/// POSTs reports as JSON to a configured URL
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn from_config(config: &WebhookConfig) -> Result<Self> {
        let url = config
            .url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| PowdertimeError::config("Webhook URL not configured"))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(WEBHOOK_TIMEOUT_SECS))
            .build()
            .map_err(|e| PowdertimeError::api(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

impl Notifier for WebhookNotifier {
    fn name(&self) -> &'static str {
        "webhook"
    }

    fn deliver(&self, report: &AlertReport<'_>) -> Result<()> {
        let Some(payload) = WebhookPayload::from_report(report) else {
            debug!("No events and always_notify is off, skipping webhook");
            return Ok(());
        };

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .map_err(|e| PowdertimeError::api(format!("Webhook request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PowdertimeError::api(format!(
                "Webhook responded with {status}"
            )));
        }

        info!("Delivered {} webhook to {}", payload.alert_type, self.url);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::SnowAnalyzer;
    use crate::models::{ForecastDay, Resort, ResortForecast};

    fn events() -> Vec<crate::analyzer::SnowEvent> {
        let resort = Resort::new("Mt. Bachelor", 43.9793, -121.6886, Some(9065), Some("OR"));
        let start = NaiveDate::from_ymd_opt(2026, 2, 3).unwrap();
        let days = [0.0, 3.0, 4.5]
            .iter()
            .enumerate()
            .map(|(i, &snow)| ForecastDay::new(start + chrono::Days::new(i as u64), snow, None))
            .collect();
        let forecasts = vec![ResortForecast::new(resort, days)];
        SnowAnalyzer::new(6.0).find_significant_events(&forecasts).events
    }

    #[test]
    fn test_powder_alert_payload() {
        let events = events();
        let payload = WebhookPayload::from_report(&AlertReport::new(&events, 10)).unwrap();

        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["alert_type"], "powder_alert");
        assert_eq!(json["event_count"], 1);
        assert!(json.get("message").is_none());
        let event = &json["events"][0];
        assert_eq!(event["resort_name"], "Mt. Bachelor");
        assert_eq!(event["resort_state"], "OR");
        assert_eq!(event["total_snowfall_inches"], 7.5);
        assert_eq!(event["max_daily_snowfall_inches"], 4.5);
        assert_eq!(event["start_date"], "2026-02-04");
        assert_eq!(event["end_date"], "2026-02-05");
    }

    #[test]
    fn test_status_check_payload() {
        let report = AlertReport::new(&[], 7).always_notify(true);
        let payload = WebhookPayload::from_report(&report).unwrap();

        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["alert_type"], "status_check");
        assert_eq!(json["event_count"], 0);
        assert_eq!(
            json["message"],
            "No significant snowfall forecasted in the next 7 days"
        );
        assert_eq!(json["events"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_no_payload_without_events() {
        assert!(WebhookPayload::from_report(&AlertReport::new(&[], 7)).is_none());
    }

    #[test]
    fn test_missing_url_is_config_error() {
        let err = WebhookNotifier::from_config(&WebhookConfig { url: None }).unwrap_err();
        assert!(matches!(err, PowdertimeError::Config { .. }));
    }
}
