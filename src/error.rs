//! Error types and handling for the farescan application

use thiserror::Error;

/// Main error type for the farescan application
#[derive(Error, Debug)]
pub enum FarescanError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A flight or hotel provider could not be reached or answered with an error
    #[error("{service} unavailable: {message}")]
    Upstream { service: String, message: String },

    /// The provider answered but had nothing to offer
    #[error("No results: {message}")]
    NoResults { message: String },

    /// Access key missing or wrong while the gate is enabled
    #[error("Unauthorized: access key missing or invalid")]
    Unauthorized,

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },
}

impl FarescanError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new upstream error for the named provider
    pub fn upstream<S: Into<String>, M: Into<String>>(service: S, message: M) -> Self {
        Self::Upstream {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Create a new no-results error
    pub fn no_results<S: Into<String>>(message: S) -> Self {
        Self::NoResults {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Short machine-readable name of the error kind
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            FarescanError::Config { .. } => "configuration",
            FarescanError::Upstream { .. } => "upstream_unavailable",
            FarescanError::NoResults { .. } => "no_results",
            FarescanError::Unauthorized => "unauthorized",
            FarescanError::Validation { .. } => "validation",
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            FarescanError::Config { .. } => {
                "Server configuration error. Please check the API keys.".to_string()
            }
            FarescanError::Upstream { service, .. } => {
                format!("{service} is currently unavailable. Please try again later.")
            }
            FarescanError::NoResults { message } => message.clone(),
            FarescanError::Unauthorized => {
                "Access denied. Append the correct ?key= to the address.".to_string()
            }
            FarescanError::Validation { message } => format!("Invalid input: {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = FarescanError::config("missing API key");
        assert!(matches!(config_err, FarescanError::Config { .. }));

        let upstream_err = FarescanError::upstream("LiteAPI", "connection refused");
        assert!(matches!(upstream_err, FarescanError::Upstream { .. }));
        assert_eq!(upstream_err.kind(), "upstream_unavailable");

        let empty = FarescanError::no_results("no hotel offers found");
        assert_eq!(empty.kind(), "no_results");
    }

    #[test]
    fn test_user_messages() {
        let upstream_err = FarescanError::upstream("Flight search", "timeout");
        assert!(upstream_err.user_message().contains("Flight search"));
        assert!(!upstream_err.user_message().contains("timeout"));

        let validation_err = FarescanError::validation("month must be 1-12");
        assert!(validation_err.user_message().contains("month must be 1-12"));

        assert!(FarescanError::Unauthorized.user_message().contains("?key="));
    }
}
