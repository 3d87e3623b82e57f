//! Configuration management for the trip planner
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `TRIPPLANNER_` environment variables (`__` separates sections, e.g.
//! `TRIPPLANNER_PROVIDER__HOSTNAME=production`). Provider and LLM secrets
//! also fall back to the conventional `AMADEUS_CLIENT_ID`,
//! `AMADEUS_CLIENT_SECRET` and `OPENAI_API_KEY` variables.

use crate::TripPlannerError;
use crate::models::IataCode;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const TEST_BASE_URL: &str = "https://test.api.amadeus.com";
const PRODUCTION_BASE_URL: &str = "https://api.amadeus.com";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TripPlannerConfig {
    /// Travel provider API
    pub provider: ProviderConfig,
    /// Place name resolution
    pub resolver: ResolverConfig,
    pub flights: FlightsConfig,
    pub hotels: HotelsConfig,
    pub activities: ActivitiesConfig,
    /// Itinerary text generation
    pub llm: LlmConfig,
    /// HTTP server
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// Travel provider API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// `test` or `production`
    pub hostname: String,
    /// Overrides the URL derived from `hostname`
    pub base_url: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// Default per-request timeout in seconds
    pub timeout_seconds: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// OpenFlights `airports.dat` file
    pub airports_path: String,
    /// Minimum similarity for a fuzzy city match, inclusive
    pub similarity_cutoff: f64,
    /// Result limit for the remote keyword search
    pub remote_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightsConfig {
    /// Origin used when a request names none
    pub default_origin: String,
    pub currency: String,
    pub max_results: u32,
    /// Where the latest flight search is written
    pub results_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HotelsConfig {
    /// Share of the total trip budget allowed for the stay
    pub budget_reserve_fraction: f64,
    pub max_results: usize,
    /// Only this many hotel ids are sent to the offers search
    pub max_hotel_ids: usize,
    pub radius_km: u32,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivitiesConfig {
    /// Half width of the search square around the city, in degrees
    pub box_degrees: f64,
    pub limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Day-by-day plans are generated only when a key is present
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_seconds: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory served for every non-API path
    pub static_dir: String,
    pub max_body_bytes: usize,
    pub request_timeout_seconds: u32,
    /// PEM certificate, requires the `tls` feature
    pub tls_cert: Option<String>,
    pub tls_key: Option<String>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty, compact, json)
    pub format: String,
    /// Log output destination (console, file, both)
    pub output: String,
    /// Log file path; rotated daily
    pub file_path: String,
    /// Maximum number of rotated log files to keep
    pub max_files: usize,
}

// Default value functions
fn default_hostname() -> String {
    "test".to_string()
}

fn default_provider_timeout() -> u32 {
    20
}

fn default_airports_path() -> String {
    "airports.dat".to_string()
}

fn default_similarity_cutoff() -> f64 {
    0.8
}

fn default_remote_limit() -> usize {
    10
}

fn default_origin() -> String {
    "JFK".to_string()
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_flight_max_results() -> u32 {
    5
}

fn default_results_path() -> String {
    "flight_results.json".to_string()
}

fn default_reserve_fraction() -> f64 {
    0.4
}

fn default_hotel_max_results() -> usize {
    8
}

fn default_max_hotel_ids() -> usize {
    25
}

fn default_radius_km() -> u32 {
    20
}

fn default_box_degrees() -> f64 {
    0.25
}

fn default_activity_limit() -> usize {
    20
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_llm_timeout() -> u32 {
    60
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}

fn default_request_timeout() -> u32 {
    90
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_log_output() -> String {
    "console".to_string()
}

fn default_log_file_path() -> String {
    "logs/trip-planner.log".to_string()
}

fn default_log_max_files() -> usize {
    7
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            hostname: default_hostname(),
            base_url: None,
            client_id: None,
            client_secret: None,
            timeout_seconds: default_provider_timeout(),
        }
    }
}

impl ProviderConfig {
    /// API root, from the explicit override or the hostname
    #[must_use]
    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
            _ if self.hostname == "production" => PRODUCTION_BASE_URL.to_string(),
            _ => TEST_BASE_URL.to_string(),
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            airports_path: default_airports_path(),
            similarity_cutoff: default_similarity_cutoff(),
            remote_limit: default_remote_limit(),
        }
    }
}

impl Default for FlightsConfig {
    fn default() -> Self {
        Self {
            default_origin: default_origin(),
            currency: default_currency(),
            max_results: default_flight_max_results(),
            results_path: default_results_path(),
        }
    }
}

impl Default for HotelsConfig {
    fn default() -> Self {
        Self {
            budget_reserve_fraction: default_reserve_fraction(),
            max_results: default_hotel_max_results(),
            max_hotel_ids: default_max_hotel_ids(),
            radius_km: default_radius_km(),
            currency: default_currency(),
        }
    }
}

impl Default for ActivitiesConfig {
    fn default() -> Self {
        Self {
            box_degrees: default_box_degrees(),
            limit: default_activity_limit(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            timeout_seconds: default_llm_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            max_body_bytes: default_max_body_bytes(),
            request_timeout_seconds: default_request_timeout(),
            tls_cert: None,
            tls_key: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            output: default_log_output(),
            file_path: default_log_file_path(),
            max_files: default_log_max_files(),
        }
    }
}

impl TripPlannerConfig {
    /// Load configuration from specified path
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
            Environment::with_prefix("TRIPPLANNER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: TripPlannerConfig = settings
            .try_deserialize()
            .with_context(|| format!("Failed to deserialize configuration from {}", config_file.display()))?;

        config.apply_env_fallbacks();
        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("trip-planner").join("config.toml"))
    }

    /// Fill missing secrets from the conventional provider variables
    pub fn apply_env_fallbacks(&mut self) {
        fn env_value(name: &str) -> Option<String> {
            std::env::var(name).ok().filter(|value| !value.trim().is_empty())
        }

        if self.provider.client_id.is_none() {
            self.provider.client_id = env_value("AMADEUS_CLIENT_ID");
        }
        if self.provider.client_secret.is_none() {
            self.provider.client_secret = env_value("AMADEUS_CLIENT_SECRET");
        }
        if self.llm.api_key.is_none() {
            self.llm.api_key = env_value("OPENAI_API_KEY");
        }
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.provider.hostname.is_empty() {
            self.provider.hostname = default_hostname();
        }
        if self.provider.timeout_seconds == 0 {
            self.provider.timeout_seconds = default_provider_timeout();
        }
        if self.resolver.airports_path.is_empty() {
            self.resolver.airports_path = default_airports_path();
        }
        if self.resolver.remote_limit == 0 {
            self.resolver.remote_limit = default_remote_limit();
        }
        if self.flights.default_origin.is_empty() {
            self.flights.default_origin = default_origin();
        }
        if self.flights.currency.is_empty() {
            self.flights.currency = default_currency();
        }
        if self.flights.max_results == 0 {
            self.flights.max_results = default_flight_max_results();
        }
        if self.hotels.max_results == 0 {
            self.hotels.max_results = default_hotel_max_results();
        }
        if self.hotels.max_hotel_ids == 0 {
            self.hotels.max_hotel_ids = default_max_hotel_ids();
        }
        if self.hotels.currency.is_empty() {
            self.hotels.currency = default_currency();
        }
        if self.activities.limit == 0 {
            self.activities.limit = default_activity_limit();
        }
        if self.llm.model.is_empty() {
            self.llm.model = default_llm_model();
        }
        if self.llm.timeout_seconds == 0 {
            self.llm.timeout_seconds = default_llm_timeout();
        }
        if self.server.request_timeout_seconds == 0 {
            self.server.request_timeout_seconds = default_request_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.logging.output.is_empty() {
            self.logging.output = default_log_output();
        }
        // Blank secrets count as absent
        for secret in [
            &mut self.provider.client_id,
            &mut self.provider.client_secret,
            &mut self.llm.api_key,
        ] {
            if secret.as_deref().is_some_and(|value| value.trim().is_empty()) {
                *secret = None;
            }
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.validate_tls()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.provider.timeout_seconds > 300 {
            return Err(TripPlannerError::config("Provider timeout cannot exceed 300 seconds").into());
        }

        if !(0.0..=1.0).contains(&self.resolver.similarity_cutoff) {
            return Err(TripPlannerError::config(
                "Similarity cutoff must be between 0.0 and 1.0",
            )
            .into());
        }

        if self.hotels.budget_reserve_fraction <= 0.0 || self.hotels.budget_reserve_fraction > 1.0 {
            return Err(TripPlannerError::config(
                "Hotel budget reserve fraction must be greater than 0.0 and at most 1.0",
            )
            .into());
        }

        if self.hotels.max_hotel_ids > 100 {
            return Err(TripPlannerError::config("Hotel id limit cannot exceed 100").into());
        }

        if self.flights.max_results > 250 {
            return Err(TripPlannerError::config("Flight max results cannot exceed 250").into());
        }

        if self.activities.box_degrees <= 0.0 || self.activities.box_degrees > 5.0 {
            return Err(TripPlannerError::config(
                "Activity search box must be between 0 and 5 degrees",
            )
            .into());
        }

        if self.llm.timeout_seconds > 600 {
            return Err(TripPlannerError::config("LLM timeout cannot exceed 600 seconds").into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_hostnames = ["test", "production"];
        if !valid_hostnames.contains(&self.provider.hostname.as_str()) {
            return Err(TripPlannerError::config(format!(
                "Invalid provider hostname '{}'. Must be one of: {}",
                self.provider.hostname,
                valid_hostnames.join(", ")
            ))
            .into());
        }

        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TripPlannerError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "compact", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TripPlannerError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let valid_log_outputs = ["console", "file", "both"];
        if !valid_log_outputs.contains(&self.logging.output.as_str()) {
            return Err(TripPlannerError::config(format!(
                "Invalid log output '{}'. Must be one of: {}",
                self.logging.output,
                valid_log_outputs.join(", ")
            ))
            .into());
        }

        let provider_url = self.provider.base_url();
        if !is_http_url(&provider_url) {
            return Err(TripPlannerError::config(
                "Provider base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        if !is_http_url(&self.llm.base_url) {
            return Err(
                TripPlannerError::config("LLM base URL must be a valid HTTP or HTTPS URL").into(),
            );
        }

        if IataCode::parse(&self.flights.default_origin).is_none() {
            return Err(TripPlannerError::config(format!(
                "Default origin '{}' is not a 3-letter airport or city code",
                self.flights.default_origin
            ))
            .into());
        }

        Ok(())
    }

    fn validate_tls(&self) -> Result<()> {
        match (&self.server.tls_cert, &self.server.tls_key) {
            (Some(_), None) | (None, Some(_)) => Err(TripPlannerError::config(
                "TLS needs both server.tls_cert and server.tls_key",
            )
            .into()),
            _ => Ok(()),
        }
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
