use std::env;
use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::evaluation::EngineOptions;

/// Distinguishes runtime behavior for different stages of the tool.
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

/// Top-level configuration for the scoring tool.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringConfig,
    pub data: DataSources,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let scoring = ScoringConfig {
            use_matrix: bool_var("KITSUSA_USE_MATRIX", true)?,
            compound_work_time: bool_var("KITSUSA_COMPOUND_WORK_TIME", false)?,
            standards_as_of: date_var("KITSUSA_STANDARDS_AS_OF")?,
        };

        let data = DataSources {
            standards_path: path_var("KITSUSA_STANDARDS_PATH"),
            matrices_path: path_var("KITSUSA_MATRICES_PATH"),
        };

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            scoring,
            data,
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Defaults applied to every evaluation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringConfig {
    pub use_matrix: bool,
    pub compound_work_time: bool,
    /// Selects the standards version in force on this date; latest when unset.
    pub standards_as_of: Option<NaiveDate>,
}

impl ScoringConfig {
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            use_matrix: self.use_matrix,
            compound_work_time: self.compound_work_time,
        }
    }
}

/// External reference data; the embedded copies are used when unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataSources {
    pub standards_path: Option<PathBuf>,
    pub matrices_path: Option<PathBuf>,
}

fn bool_var(key: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Ok(raw) = env::var(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool { key, value: raw }),
    }
}

fn date_var(key: &'static str) -> Result<Option<NaiveDate>, ConfigError> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|source| ConfigError::InvalidDate {
                key,
                value: raw,
                source,
            }),
        _ => Ok(None),
    }
}

fn path_var(key: &str) -> Option<PathBuf> {
    env::var_os(key)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidBool {
        key: &'static str,
        value: String,
    },
    InvalidDate {
        key: &'static str,
        value: String,
        source: chrono::ParseError,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBool { key, value } => {
                write!(f, "{key} must be true/false, yes/no, on/off or 1/0 (got '{value}')")
            }
            ConfigError::InvalidDate { key, value, .. } => {
                write!(f, "{key} must be a YYYY-MM-DD date (got '{value}')")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidBool { .. } => None,
            ConfigError::InvalidDate { source, .. } => Some(source),
        }
    }
}
