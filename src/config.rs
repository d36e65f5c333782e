//! Configuration management for the farescan application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::FarescanError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Root configuration structure for the farescan application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FarescanConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Shared-secret access gate
    #[serde(default)]
    pub access: AccessConfig,
    /// Hotel search API (LiteAPI) settings
    #[serde(default)]
    pub hotels: HotelsConfig,
    /// Flight data provider settings
    #[serde(default)]
    pub flights: FlightsConfig,
    /// Currency conversion table
    #[serde(default)]
    pub exchange: ExchangeConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Trace export
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound for a whole request, month scans included
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u32,
    /// PEM certificate chain, only used with the `tls` feature
    pub tls_cert_path: Option<PathBuf>,
    /// PEM private key, only used with the `tls` feature
    pub tls_key_path: Option<PathBuf>,
}

/// Access gate settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessConfig {
    /// When set, every request must carry `?key=<value>`
    pub key: Option<String>,
}

/// Hotel search API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotelsConfig {
    /// LiteAPI key (required)
    pub api_key: Option<String>,
    #[serde(default = "default_hotels_base_url")]
    pub base_url: String,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
    #[serde(default = "default_hotels_timeout")]
    pub timeout_seconds: u32,
    /// Transport-level retries for transient failures
    #[serde(default)]
    pub max_retries: u32,
}

/// Flight data provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightsConfig {
    #[serde(default = "default_flights_base_url")]
    pub base_url: String,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
    #[serde(default = "default_flights_timeout")]
    pub timeout_seconds: u32,
    #[serde(default)]
    pub max_retries: u32,
    /// Currency assumed for prices shown without a symbol
    #[serde(default = "default_flight_currency")]
    pub default_currency: String,
}

/// Exchange rates keyed `"FROM/TO"`, e.g. `"USD/KRW" = 1350.0`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    #[serde(default = "default_rates")]
    pub rates: HashMap<String, f64>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// OpenTelemetry export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// OTLP/HTTP endpoint; export is disabled when unset
    pub otlp_endpoint: Option<String>,
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_request_timeout() -> u32 {
    2400
}

fn default_hotels_base_url() -> String {
    "https://api.liteapi.travel/v3.0".to_string()
}

fn default_flights_base_url() -> String {
    "http://127.0.0.1:8081".to_string()
}

fn default_connect_timeout() -> u32 {
    10
}

fn default_hotels_timeout() -> u32 {
    60
}

fn default_flights_timeout() -> u32 {
    30
}

fn default_flight_currency() -> String {
    "USD".to_string()
}

fn default_rates() -> HashMap<String, f64> {
    HashMap::from([("USD/KRW".to_string(), 1350.0)])
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_service_name() -> String {
    "farescan".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
            tls_cert_path: None,
            tls_key_path: None,
        }
    }
}

impl Default for HotelsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_hotels_base_url(),
            connect_timeout_seconds: default_connect_timeout(),
            timeout_seconds: default_hotels_timeout(),
            max_retries: 0,
        }
    }
}

impl Default for FlightsConfig {
    fn default() -> Self {
        Self {
            base_url: default_flights_base_url(),
            connect_timeout_seconds: default_connect_timeout(),
            timeout_seconds: default_flights_timeout(),
            max_retries: 0,
            default_currency: default_flight_currency(),
        }
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            rates: default_rates(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            otlp_endpoint: None,
            service_name: default_service_name(),
        }
    }
}

impl Default for FarescanConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            access: AccessConfig::default(),
            hotels: HotelsConfig::default(),
            flights: FlightsConfig::default(),
            exchange: ExchangeConfig::default(),
            logging: LoggingConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl FarescanConfig {
    /// Load configuration from specified path
    ///
    /// Precedence, lowest first: file, `FARESCAN__SECTION__KEY` variables,
    /// then the plain `LITEAPI_KEY`, `ACCESS_KEY` and `PORT` variables.
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix("FARESCAN")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        builder = builder
            .set_override_option("hotels.api_key", non_empty_var("LITEAPI_KEY"))
            .with_context(|| "Failed to apply LITEAPI_KEY")?
            .set_override_option("access.key", non_empty_var("ACCESS_KEY"))
            .with_context(|| "Failed to apply ACCESS_KEY")?;

        if let Some(port) = non_empty_var("PORT") {
            let port: u16 = port
                .parse()
                .with_context(|| format!("PORT is not a valid port number: {port}"))?;
            builder = builder
                .set_override("server.port", i64::from(port))
                .with_context(|| "Failed to apply PORT")?;
        }

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: FarescanConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("farescan").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.server.request_timeout_seconds == 0 {
            self.server.request_timeout_seconds = default_request_timeout();
        }
        if self.hotels.base_url.is_empty() {
            self.hotels.base_url = default_hotels_base_url();
        }
        if self.hotels.timeout_seconds == 0 {
            self.hotels.timeout_seconds = default_hotels_timeout();
        }
        if self.hotels.connect_timeout_seconds == 0 {
            self.hotels.connect_timeout_seconds = default_connect_timeout();
        }
        if self.flights.base_url.is_empty() {
            self.flights.base_url = default_flights_base_url();
        }
        if self.flights.timeout_seconds == 0 {
            self.flights.timeout_seconds = default_flights_timeout();
        }
        if self.flights.connect_timeout_seconds == 0 {
            self.flights.connect_timeout_seconds = default_connect_timeout();
        }
        if self.flights.default_currency.is_empty() {
            self.flights.default_currency = default_flight_currency();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.telemetry.service_name.is_empty() {
            self.telemetry.service_name = default_service_name();
        }
        if self.access.key.as_deref().is_some_and(str::is_empty) {
            self.access.key = None;
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        match self.hotels.api_key.as_deref() {
            None | Some("") => {
                return Err(FarescanError::config(
                    "Hotel API key is required. Set LITEAPI_KEY or hotels.api_key.",
                )
                .into());
            }
            Some(key) if key.len() < 8 => {
                return Err(FarescanError::config(
                    "Hotel API key appears to be invalid (too short). Please check your API key.",
                )
                .into());
            }
            Some(_) => {}
        }
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.hotels.timeout_seconds > 300 || self.flights.timeout_seconds > 300 {
            return Err(FarescanError::config("Provider timeout cannot exceed 300 seconds").into());
        }

        if self.hotels.max_retries > 5 || self.flights.max_retries > 5 {
            return Err(FarescanError::config("Provider max retries cannot exceed 5").into());
        }

        if self.server.request_timeout_seconds > 3600 {
            return Err(FarescanError::config("Request timeout cannot exceed 3600 seconds").into());
        }

        for (pair, rate) in &self.exchange.rates {
            if !rate.is_finite() || *rate <= 0.0 {
                return Err(FarescanError::config(format!(
                    "Exchange rate for {pair} must be a positive number"
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(FarescanError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(FarescanError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Hotel API", &self.hotels.base_url),
            ("Flight provider", &self.flights.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(FarescanError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        for pair in self.exchange.rates.keys() {
            if pair.split('/').count() != 2 {
                return Err(FarescanError::config(format!(
                    "Exchange rate key '{pair}' must look like FROM/TO"
                ))
                .into());
            }
        }

        if self.server.tls_cert_path.is_some() != self.server.tls_key_path.is_some() {
            return Err(FarescanError::config(
                "TLS needs both server.tls_cert_path and server.tls_key_path",
            )
            .into());
        }

        Ok(())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}
