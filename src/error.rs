//! Error types and handling for the Powdertime application

use thiserror::Error;

/// Main error type for the Powdertime application
#[derive(Error, Debug)]
pub enum PowdertimeError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Weather or geocoding API communication errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Malformed or out-of-range forecast data from upstream
    #[error("Data error for {resort}: {message}")]
    Data { resort: String, message: String },

    /// Notification delivery errors
    #[error("Notification error: {message}")]
    Notification { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl PowdertimeError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new data error attributed to a resort
    pub fn data<R: Into<String>, S: Into<String>>(resort: R, message: S) -> Self {
        Self::Data {
            resort: resort.into(),
            message: message.into(),
        }
    }

    /// Create a new notification error
    pub fn notification<S: Into<String>>(message: S) -> Self {
        Self::Notification {
            message: message.into(),
        }
    }

    /// Whether this error came from bad forecast data
    #[must_use]
    pub fn is_data_error(&self) -> bool {
        matches!(self, Self::Data { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            PowdertimeError::Config { message } => {
                format!("Configuration error: {message}. Please check your config.yaml.")
            }
            PowdertimeError::Api { .. } => {
                "Unable to reach the weather service. Please check your internet connection."
                    .to_string()
            }
            PowdertimeError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            PowdertimeError::Data { resort, .. } => {
                format!("Received malformed forecast data for {resort}; skipping it.")
            }
            PowdertimeError::Notification { message } => {
                format!("Could not send notification: {message}")
            }
            PowdertimeError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = PowdertimeError::config("missing smtp_server");
        assert!(matches!(config_err, PowdertimeError::Config { .. }));

        let api_err = PowdertimeError::api("connection failed");
        assert!(matches!(api_err, PowdertimeError::Api { .. }));

        let data_err = PowdertimeError::data("Vail", "negative snowfall");
        assert!(data_err.is_data_error());
        assert_eq!(
            data_err.to_string(),
            "Data error for Vail: negative snowfall"
        );
    }

    #[test]
    fn test_user_messages() {
        let config_err = PowdertimeError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let api_err = PowdertimeError::api("test");
        assert!(api_err.user_message().contains("Unable to reach"));

        let validation_err = PowdertimeError::validation("test input");
        assert!(validation_err.user_message().contains("test input"));

        let data_err = PowdertimeError::data("Alta", "bad date");
        assert!(data_err.user_message().contains("Alta"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PowdertimeError = io_err.into();
        assert!(matches!(err, PowdertimeError::Io { .. }));
    }
}
