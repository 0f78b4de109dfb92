use crate::calendar::WorkCalendarConfig;
use crate::coverage::CoverageRules;
use crate::month::YearMonth;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;
use tracing::info;

pub const CONFIG_ENV: &str = "SHIFT_COVERAGE_CONFIG";
pub const HTTP_ADDR_ENV: &str = "SHIFT_COVERAGE_HTTP_ADDR";
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("config json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub rules: CoverageRules,
    pub calendar: WorkCalendarConfig,
    /// Months offered in the month picker.
    pub months: Vec<YearMonth>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        let months = [(2025, 7), (2025, 8)]
            .into_iter()
            .filter_map(|(year, month)| YearMonth::new(year, month))
            .collect();
        Self {
            rules: CoverageRules::default(),
            calendar: WorkCalendarConfig::default(),
            months,
        }
    }
}

impl SchedulerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = File::open(path.as_ref())?;
        let config: SchedulerConfig = serde_json::from_reader(file)?;
        config.validate()?;
        info!(path = %path.as_ref().display(), "config loaded");
        Ok(config)
    }

    /// Load from `$SHIFT_COVERAGE_CONFIG` when set, defaults otherwise.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::load(path.trim()),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.months.is_empty() {
            return Err(ConfigError::Invalid("months must not be empty".into()));
        }
        if self.calendar.working_days().is_empty() {
            return Err(ConfigError::Invalid(
                "calendar requires at least one working day".into(),
            ));
        }
        Ok(())
    }
}

pub fn http_addr_from_env() -> Result<SocketAddr, ConfigError> {
    let raw = std::env::var(HTTP_ADDR_ENV).unwrap_or_else(|_| DEFAULT_HTTP_ADDR.to_string());
    raw.parse()
        .map_err(|err| ConfigError::Invalid(format!("{HTTP_ADDR_ENV}='{raw}': {err}")))
}
