use chrono::{FixedOffset, Offset};
use config::{Config, ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::env;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;
use tracing::info;
use validator::{Validate, ValidationError};

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_PORT: u16 = 8080;
const CONFIG_DIR: &str = "config";

/// Reporting timezone default: UTC+06:00 (Dhaka).
const DEFAULT_REPORTING_UTC_OFFSET_MINUTES: i32 = 6 * 60;

/// Application configuration with validation.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Database connection URL.
    pub database_url: String,

    /// Server host address.
    pub host: String,

    /// Server port.
    pub port: u16,

    /// Runtime environment: "development", "staging" or "production".
    pub environment: String,

    /// Default tracing filter level.
    pub log_level: String,

    /// Emit JSON-formatted logs.
    pub log_json: bool,

    /// Run embedded migrations on startup.
    pub auto_migrate: bool,

    /// Capacity of the in-process event channel.
    #[validate(custom = "validate_event_channel_capacity")]
    pub event_channel_capacity: usize,

    /// Comma-separated list of allowed CORS origins; permissive in
    /// development when unset.
    pub cors_allowed_origins: Option<String>,

    /// Fixed UTC offset, in minutes, used to anchor the `Today` window at the
    /// seller's local midnight.
    #[validate(custom = "validate_utc_offset_minutes")]
    pub reporting_utc_offset_minutes: i32,

    /// Smallest withdrawal a seller may request.
    #[validate(custom = "validate_non_negative")]
    pub minimum_withdraw_amount: Decimal,

    /// Bonus credited to the inviter when an invited seller signs up.
    #[validate(custom = "validate_non_negative")]
    pub referral_bonus_amount: Decimal,

    /// Discount applied to the invited seller's membership price. Consumed by
    /// the membership-purchase flow, never by the balance aggregator.
    #[validate(custom = "validate_non_negative")]
    pub referral_discount_amount: Decimal,

    /// Delivery charge fixed at order creation for in-city orders.
    #[validate(custom = "validate_non_negative")]
    pub in_city_delivery_charge: Decimal,

    /// Delivery charge fixed at order creation for out-of-city orders.
    #[validate(custom = "validate_non_negative")]
    pub out_of_city_delivery_charge: Decimal,
}

impl AppConfig {
    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    pub fn server_addr(&self) -> Result<SocketAddr, AppConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| {
                AppConfigError::Invalid(format!(
                    "invalid host/port {}:{}: {}",
                    self.host, self.port, e
                ))
            })
    }

    /// The reporting timezone as a chrono offset. Falls back to UTC for
    /// offsets that slipped past validation.
    pub fn reporting_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.reporting_utc_offset_minutes * 60)
            .unwrap_or_else(|| chrono::Utc.fix())
    }
}

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

fn validate_event_channel_capacity(capacity: usize) -> Result<(), ValidationError> {
    if capacity == 0 {
        let mut err = ValidationError::new("event_channel_capacity");
        err.message = Some("event_channel_capacity must be greater than 0".into());
        return Err(err);
    }
    Ok(())
}

fn validate_utc_offset_minutes(minutes: i32) -> Result<(), ValidationError> {
    // chrono accepts offsets strictly inside +/- 24h; real offsets are +/- 14h.
    if !(-14 * 60..=14 * 60).contains(&minutes) {
        let mut err = ValidationError::new("reporting_utc_offset_minutes");
        err.message = Some("reporting_utc_offset_minutes must be within +/- 840".into());
        return Err(err);
    }
    Ok(())
}

fn validate_non_negative(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_negative() {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("amount must not be negative".into());
        return Err(err);
    }
    Ok(())
}

/// Loads application configuration.
///
/// Layers configuration sources in this order:
/// 1. Built-in defaults
/// 2. Default config (config/default.toml)
/// 3. Environment-specific config (config/{env}.toml)
/// 4. Environment variables (APP__*)
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    let config = Config::builder()
        .set_default("database_url", "sqlite://settlement.db?mode=rwc")?
        .set_default("host", "0.0.0.0")?
        .set_default("port", DEFAULT_PORT as i64)?
        .set_default("environment", DEFAULT_ENV)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .set_default("auto_migrate", true)?
        .set_default("event_channel_capacity", 1024)?
        .set_default(
            "reporting_utc_offset_minutes",
            DEFAULT_REPORTING_UTC_OFFSET_MINUTES as i64,
        )?
        .set_default("minimum_withdraw_amount", 500)?
        .set_default("referral_bonus_amount", 100)?
        .set_default("referral_discount_amount", 100)?
        .set_default("in_city_delivery_charge", 80)?
        .set_default("out_of_city_delivery_charge", 150)?
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, run_env)).required(false))
        // Only APP__-prefixed variables are configuration; a single
        // underscore (APP_ENV, used for profile selection) must not be
        // collected as an unknown key.
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;
    app_config.validate()?;
    Ok(app_config)
}

/// Initializes tracing using the provided log level as the default filter.
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = format!("settlement_api={},tower_http=debug", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    if json {
        let _ = fmt()
            .with_env_filter(EnvFilter::new(filter_directive))
            .json()
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(EnvFilter::new(filter_directive))
            .try_init();
    }
}
