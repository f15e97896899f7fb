use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info};
use validator::Validate;

const DEFAULT_ENV: &str = "development";
const DEFAULT_LOG_LEVEL: &str = "info";
const CONFIG_DIR: &str = "config";

/// Tuning for the demand forecasting pipeline.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ForecastConfig {
    /// Season length in months for Holt-Winters.
    #[serde(default = "default_period")]
    #[validate(range(min = 1, max = 24))]
    pub period: usize,

    /// Months forecast past the current one.
    #[serde(default = "default_horizon")]
    #[validate(range(min = 1, max = 24))]
    pub horizon: usize,

    /// Trailing months of actuals fed to the models (current month is
    /// appended on top of these).
    #[serde(default = "default_month_window")]
    #[validate(range(min = 2, max = 60))]
    pub month_window: usize,

    /// Trailing days used for the hour-of-day profile.
    #[serde(default = "default_history_days")]
    #[validate(range(min = 1, max = 90))]
    pub default_history_days: u32,

    /// Folds for walk-forward model evaluation.
    #[serde(default = "default_cv_folds")]
    #[validate(range(min = 2, max = 10))]
    pub cv_folds: usize,

    /// Hours between scheduled forecast refreshes.
    #[serde(default = "default_refresh_hours")]
    #[validate(range(min = 1))]
    pub refresh_interval_hours: u64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            period: default_period(),
            horizon: default_horizon(),
            month_window: default_month_window(),
            default_history_days: default_history_days(),
            cv_folds: default_cv_folds(),
            refresh_interval_hours: default_refresh_hours(),
        }
    }
}

/// Hyperparameters for the recommendation engine.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RecommendationConfig {
    /// Latent factors in the matrix factorization.
    #[serde(default = "default_factors")]
    #[validate(range(min = 1, max = 64))]
    pub factors: usize,

    /// SGD passes over the interaction set.
    #[serde(default = "default_epochs")]
    #[validate(range(min = 1, max = 500))]
    pub epochs: usize,

    /// SGD learning rate.
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,

    /// L2 regularization strength.
    #[serde(default = "default_regularization")]
    pub regularization: f64,

    /// Shrinkage constant damping similarities built on few shared dishes.
    #[serde(default = "default_shrinkage")]
    pub shrinkage: f64,

    /// RNG seed for reproducible factor initialization.
    #[serde(default)]
    pub seed: u64,

    /// Default number of dishes returned per user.
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 50))]
    pub default_limit: usize,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            factors: default_factors(),
            epochs: default_epochs(),
            learning_rate: default_learning_rate(),
            regularization: default_regularization(),
            shrinkage: default_shrinkage(),
            seed: 0,
            default_limit: default_limit(),
        }
    }
}

/// Application configuration with validation.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Application environment
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    #[serde(default)]
    #[validate]
    pub forecast: ForecastConfig,

    #[serde(default)]
    #[validate]
    pub recommendation: RecommendationConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
            log_level: default_log_level(),
            log_json: false,
            forecast: ForecastConfig::default(),
            recommendation: RecommendationConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ConfigError),
    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Layered configuration load: built-in defaults, then `config/default`
/// and `config/<env>` files when present, then `TAVOLA__*` environment
/// variables.
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
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, run_env)).required(false))
        .add_source(Environment::with_prefix("TAVOLA").separator("__"))
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;

    app_config.validate().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    info!("Configuration loaded successfully");
    Ok(app_config)
}

/// Installs the global tracing subscriber. `RUST_LOG` overrides the
/// configured level when set.
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let default_directive = format!("tavola_api={},tower_http=debug", level);
    let filter = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    let registry = tracing_subscriber::registry().with(EnvFilter::new(filter));
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_period() -> usize {
    12
}

fn default_horizon() -> usize {
    12
}

fn default_month_window() -> usize {
    24
}

fn default_history_days() -> u32 {
    7
}

fn default_cv_folds() -> usize {
    3
}

fn default_refresh_hours() -> u64 {
    24
}

fn default_factors() -> usize {
    3
}

fn default_epochs() -> usize {
    20
}

fn default_learning_rate() -> f64 {
    0.01
}

fn default_regularization() -> f64 {
    0.1
}

fn default_shrinkage() -> f64 {
    5.0
}

fn default_limit() -> usize {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.forecast.period, 12);
        assert_eq!(config.forecast.month_window, 24);
        assert_eq!(config.recommendation.factors, 3);
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
    }
}
