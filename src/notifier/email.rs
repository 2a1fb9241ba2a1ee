//! Email notification over SMTP

use super::{AlertReport, Notifier};
use crate::config::EmailConfig;
use crate::{PowdertimeError, Result};
use lettre::{
    Message, Transport, message::Mailbox, transport::smtp::SmtpTransport,
    transport::smtp::authentication::Credentials,
};
use std::collections::HashSet;
use std::fmt::Write;

/// Subject and plain-text body of one email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailContent {
    pub subject: String,
    pub body: String,
}

/// Sends reports over SMTP with STARTTLS
#[derive(Debug, Clone)]
pub struct EmailNotifier {
    smtp_server: String,
    smtp_port: u16,
    from: Mailbox,
    to: Mailbox,
    username: String,
    password: String,
}

impl EmailNotifier {
    /// All of `smtp_server`, `from_email`, `to_email` and `password` are required
    pub fn from_config(config: &EmailConfig) -> Result<Self> {
        let (Some(smtp_server), Some(from_email), Some(to_email), Some(password)) = (
            config.smtp_server.as_deref(),
            config.from_email.as_deref(),
            config.to_email.as_deref(),
            config.password.as_deref(),
        ) else {
            return Err(PowdertimeError::config(
                "Email configuration incomplete: smtp_server, from_email, to_email and password are required",
            ));
        };

        let from = format!("Powdertime <{from_email}>")
            .parse()
            .map_err(|e| PowdertimeError::config(format!("Failed to parse from address: {e}")))?;
        let to = to_email
            .parse()
            .map_err(|e| PowdertimeError::config(format!("Failed to parse to address: {e}")))?;

        Ok(Self {
            smtp_server: smtp_server.to_string(),
            smtp_port: config.smtp_port,
            from,
            to,
            username: from_email.to_string(),
            password: password.to_string(),
        })
    }

    fn create_mailer(&self) -> Result<SmtpTransport> {
        let credentials = Credentials::new(self.username.clone(), self.password.clone());

        let mailer = SmtpTransport::starttls_relay(&self.smtp_server)
            .map_err(|e| {
                PowdertimeError::notification(format!(
                    "Failed to set up SMTP relay {}: {e}",
                    self.smtp_server
                ))
            })?
            .port(self.smtp_port)
            .credentials(credentials)
            .build();

        Ok(mailer)
    }
}

/// Build the email for a report, or `None` when there is nothing to send
#[must_use]
pub fn compose(report: &AlertReport<'_>) -> Option<EmailContent> {
    if report.has_events() {
        let count = report
            .events
            .iter()
            .map(|event| event.resort.name.as_str())
            .collect::<HashSet<_>>()
            .len();
        let mut body =
            String::from("Significant snowfall forecasted at the following resort(s):\n\n");
        for (i, event) in report.events.iter().enumerate() {
            let _ = writeln!(body, "{}. {}", i + 1, event.summary());
        }
        body.push_str("\nHappy shredding! 🏂\n");

        return Some(EmailContent {
            subject: format!("❄️ Powder Alert! {count} Resort(s) with Significant Snow"),
            body,
        });
    }

    if !report.always_notify {
        return None;
    }

    Some(EmailContent {
        subject: "✅ Powdertime Check Complete - No Significant Snow".to_string(),
        body: format!(
            "Powdertime checked the forecast and found no significant snowfall \
             in the next {} days.\n\nWe'll keep watching for you.\n",
            report.forecast_days
        ),
    })
}

impl Notifier for EmailNotifier {
    fn name(&self) -> &'static str {
        "email"
    }

    fn deliver(&self, report: &AlertReport<'_>) -> Result<()> {
        let Some(content) = compose(report) else {
            tracing::debug!("No events and always_notify is off, skipping email");
            return Ok(());
        };

        let email = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(content.subject)
            .body(content.body)
            .map_err(|e| PowdertimeError::notification(format!("Failed to build email: {e}")))?;

        let mailer = self.create_mailer()?;

        mailer
            .send(&email)
            .map_err(|e| PowdertimeError::notification(format!("Failed to send email: {e}")))?;

        tracing::info!("Sent snow report email to {}", self.to);

        Ok(())
    }
}
