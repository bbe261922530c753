//! Long-run configuration, read from the `[long_run]` table of `mp.toml`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::duration::{collection_count, parse_duration};
use crate::errors::{MpError, MpResult};

/// Default long run duration.
pub const DEFAULT_DURATION: &str = "6h";
/// Default time between collection starts.
pub const DEFAULT_COLLECTION_INTERVAL: &str = "5m";
/// Timeout as a multiple of the collection interval when none is given.
pub const DEFAULT_TIMEOUT_FACTOR: f64 = 1.5;

/// Settings for one long run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LongRunConfig {
    /// Total run duration, e.g. "6h". Default: 6h.
    pub duration: Option<String>,
    /// Time between collection starts, e.g. "5m". Default: 5m.
    pub collection_interval: Option<String>,
    /// Per-request timeout. Default: 1.5 x collection interval.
    pub timeout: Option<String>,
    pub highlights: HighlightConfig,
    pub logging: LoggingConfig,
}

impl LongRunConfig {
    /// Load from a TOML file. Settings may sit at the top level or under `[long_run]`.
    pub fn load(path: &Path) -> MpResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| MpError::io(path, e))?;
        let config = Self::from_toml(&text)?;
        ::tracing::debug!(path = %path.display(), "Loaded long-run config");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> MpResult<Self> {
        #[derive(Deserialize)]
        struct Wrapped {
            long_run: LongRunConfig,
        }

        let value: toml::Table = toml::from_str(text)?;
        if value.contains_key("long_run") {
            let wrapped: Wrapped = toml::from_str(text)?;
            return Ok(wrapped.long_run);
        }
        Ok(toml::from_str(text)?)
    }

    /// Run duration in seconds.
    pub fn effective_duration(&self) -> MpResult<f64> {
        parse_duration(
            "Long run duration",
            self.duration.as_deref().unwrap_or(DEFAULT_DURATION),
        )
    }

    /// Collection interval in seconds.
    pub fn effective_collection_interval(&self) -> MpResult<f64> {
        parse_duration(
            "Collection interval",
            self.collection_interval
                .as_deref()
                .unwrap_or(DEFAULT_COLLECTION_INTERVAL),
        )
    }

    /// Request timeout in seconds.
    pub fn effective_timeout(&self) -> MpResult<f64> {
        match self.timeout.as_deref() {
            Some(timeout) => parse_duration("Timeout", timeout),
            None => Ok(DEFAULT_TIMEOUT_FACTOR * self.effective_collection_interval()?),
        }
    }

    /// How many collections the run will perform.
    pub fn effective_collection_count(&self) -> MpResult<usize> {
        Ok(collection_count(
            self.effective_duration()?,
            self.effective_collection_interval()?,
        ))
    }
}

/// Tunables for the growth highlight rules.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HighlightConfig {
    /// Distinct string-property values a type may settle at before value
    /// growth counts as excessive. Default: 32.
    pub property_value_cap: Option<usize>,
    /// Events per hour used as the event growth baseline. Default: 10000.
    pub event_baseline_per_hour: Option<f64>,
}

impl HighlightConfig {
    pub fn effective_property_value_cap(&self) -> usize {
        self.property_value_cap.unwrap_or(32)
    }

    pub fn effective_event_baseline_per_hour(&self) -> f64 {
        self.event_baseline_per_hour.unwrap_or(10_000.0)
    }
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, overridden by `RUST_LOG`. Default: "info".
    pub level: Option<String>,
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn effective_level(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }
}
