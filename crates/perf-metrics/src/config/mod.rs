use std::env;
use std::fmt;
use std::str::FromStr;

use crate::metrics::outliers::DEFAULT_STD_MULTIPLIER;
use crate::metrics::scoring::KindWeights;
use crate::metrics::summary::DEFAULT_TOP_PERFORMERS;
use crate::metrics::trend::DEFAULT_CANDIDATE_CAP;

/// Distinguishes runtime behavior for different stages of deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the metrics engine and its command-line front end.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub scoring: ScoringConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );
        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let defaults = ScoringConfig::default();
        let weights = KindWeights {
            manager: non_negative("PERF_WEIGHT_MANAGER", defaults.weights.manager)?,
            self_assessment: non_negative("PERF_WEIGHT_SELF", defaults.weights.self_assessment)?,
            peer: non_negative("PERF_WEIGHT_PEER", defaults.weights.peer)?,
        };

        let scoring = ScoringConfig {
            weights,
            default_trend_periods: at_least_one(
                "PERF_TREND_PERIODS",
                defaults.default_trend_periods,
            )?,
            trend_candidate_cap: at_least_one(
                "PERF_TREND_CANDIDATE_CAP",
                defaults.trend_candidate_cap,
            )?,
            outlier_std_multiplier: non_negative(
                "PERF_OUTLIER_STD_MULTIPLIER",
                defaults.outlier_std_multiplier,
            )?,
            top_performer_limit: at_least_one(
                "PERF_TOP_PERFORMERS",
                defaults.top_performer_limit,
            )?,
        };

        Ok(Self {
            environment,
            scoring,
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Immutable scoring policy bound into the metrics service at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    pub weights: KindWeights,
    /// Number of periods a trend covers when the caller does not ask for a specific count.
    pub default_trend_periods: usize,
    pub trend_candidate_cap: usize,
    pub outlier_std_multiplier: f64,
    pub top_performer_limit: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: KindWeights::default(),
            default_trend_periods: 3,
            trend_candidate_cap: DEFAULT_CANDIDATE_CAP,
            outlier_std_multiplier: DEFAULT_STD_MULTIPLIER,
            top_performer_limit: DEFAULT_TOP_PERFORMERS,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

fn read_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::InvalidNumber {
            key,
            value: raw.clone(),
        }),
        Err(_) => Ok(default),
    }
}

fn non_negative(key: &'static str, default: f64) -> Result<f64, ConfigError> {
    let value = read_var(key, default)?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::OutOfRange {
            key,
            expected: "a finite, non-negative number",
        })
    }
}

fn at_least_one(key: &'static str, default: usize) -> Result<usize, ConfigError> {
    let value = read_var(key, default)?;
    if value >= 1 {
        Ok(value)
    } else {
        Err(ConfigError::OutOfRange {
            key,
            expected: "a positive integer",
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidNumber { key: &'static str, value: String },
    OutOfRange {
        key: &'static str,
        expected: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be numeric, got '{value}'")
            }
            ConfigError::OutOfRange { key, expected } => write!(f, "{key} must be {expected}"),
        }
    }
}

impl std::error::Error for ConfigError {}
