//! Notification back ends
//!
//! Every back end implements [`Notifier`]; which one runs is chosen by
//! `notifications.method` in the config.

use crate::analyzer::SnowEvent;
use crate::config::NotificationsConfig;
use crate::models::ResortForecast;
use crate::Result;
use std::str::FromStr;
use tracing::warn;

pub mod console;
pub mod email;
pub mod webhook;

pub use console::ConsoleNotifier;
pub use email::EmailNotifier;
pub use webhook::WebhookNotifier;

/// Everything a notifier needs to know about one run
#[derive(Debug, Clone, Copy)]
pub struct AlertReport<'a> {
    /// Significant events, largest first
    pub events: &'a [SnowEvent],
    /// Fetched forecasts; may be empty when the caller has none to show
    pub forecasts: &'a [ResortForecast],
    pub forecast_days: u32,
    /// Confirm the run even when there is nothing to report
    pub always_notify: bool,
}

impl<'a> AlertReport<'a> {
    #[must_use]
    pub fn new(events: &'a [SnowEvent], forecast_days: u32) -> Self {
        Self {
            events,
            forecasts: &[],
            forecast_days,
            always_notify: false,
        }
    }

    #[must_use]
    pub fn with_forecasts(mut self, forecasts: &'a [ResortForecast]) -> Self {
        self.forecasts = forecasts;
        self
    }

    #[must_use]
    pub fn always_notify(mut self, always_notify: bool) -> Self {
        self.always_notify = always_notify;
        self
    }

    #[must_use]
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }
}

/// A way of telling the user about snow
pub trait Notifier {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Deliver the report; back ends decide whether an empty report is sent
    fn deliver(&self, report: &AlertReport<'_>) -> Result<()>;
}

/// Configured notification channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationMethod {
    Console,
    Email,
    Webhook,
}

impl FromStr for NotificationMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "console" => Ok(Self::Console),
            "email" => Ok(Self::Email),
            "webhook" => Ok(Self::Webhook),
            other => Err(format!("Unknown notification method '{other}'")),
        }
    }
}

impl NotificationMethod {
    /// Parse the configured method, falling back to console for unknown values
    #[must_use]
    pub fn from_config(method: &str) -> Self {
        method.parse().unwrap_or_else(|e| {
            warn!("{}, using console", e);
            Self::Console
        })
    }
}

/// Build the notifier selected by the config
pub fn build_notifier(config: &NotificationsConfig) -> Result<Box<dyn Notifier>> {
    let notifier: Box<dyn Notifier> = match NotificationMethod::from_config(&config.method) {
        NotificationMethod::Console => Box::new(ConsoleNotifier::new()),
        NotificationMethod::Email => Box::new(EmailNotifier::from_config(&config.email)?),
        NotificationMethod::Webhook => Box::new(WebhookNotifier::from_config(&config.webhook)?),
    };
    Ok(notifier)
}
