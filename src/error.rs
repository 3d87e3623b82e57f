//! Error types and handling for the trip planner

use serde_json::Value;
use thiserror::Error;

/// Main error type for the trip planner
#[derive(Error, Debug)]
pub enum TripPlannerError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Token acquisition against the travel provider failed
    #[error("Authentication error: {message}")]
    Auth { message: String },

    /// The provider answered with an error payload or a non-success status
    #[error("Upstream error: {message}")]
    Upstream {
        message: String,
        status: Option<u16>,
        details: Option<Value>,
    },

    /// Transport failure talking to an external service
    #[error("Network error: {message}")]
    Network { message: String },

    /// Every resolution tier came up empty for this place name
    #[error("Could not resolve destination '{query}'")]
    UnresolvableLocation { query: String },

    /// Malformed "start to end" date input
    #[error("Invalid date range '{input}': {reason}")]
    InvalidDateRange { input: String, reason: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl TripPlannerError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new authentication error
    pub fn auth<S: Into<String>>(message: S) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create an upstream error carrying the provider's status and payload
    pub fn upstream<S: Into<String>>(message: S, status: Option<u16>, details: Option<Value>) -> Self {
        Self::Upstream {
            message: message.into(),
            status,
            details,
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn unresolvable<S: Into<String>>(query: S) -> Self {
        Self::UnresolvableLocation {
            query: query.into(),
        }
    }

    pub fn invalid_date_range<I: Into<String>, R: Into<String>>(input: I, reason: R) -> Self {
        Self::InvalidDateRange {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TripPlannerError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            TripPlannerError::Auth { .. } => {
                "Could not authenticate with the travel provider. Please check your credentials."
                    .to_string()
            }
            TripPlannerError::Upstream { .. } => {
                "The travel provider rejected the request.".to_string()
            }
            TripPlannerError::Network { .. } => {
                "Unable to connect to external services. Please check your internet connection."
                    .to_string()
            }
            TripPlannerError::UnresolvableLocation { query } => {
                format!("We could not find an airport or city matching '{query}'.")
            }
            TripPlannerError::InvalidDateRange { .. } => {
                "Dates must look like 'YYYY-MM-DD to YYYY-MM-DD'.".to_string()
            }
            TripPlannerError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            TripPlannerError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            TripPlannerError::General { message } => message.clone(),
        }
    }
}

impl From<reqwest::Error> for TripPlannerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            TripPlannerError::upstream(format!("Failed to parse provider response: {err}"), None, None)
        } else {
            TripPlannerError::network(err.to_string())
        }
    }
}
