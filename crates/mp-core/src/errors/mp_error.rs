//! Engine error enum.

use std::path::PathBuf;

use super::error_code::{self, MpErrorCode};

/// Errors raised at the edges of the engine: decoding payloads, reading
/// configuration, parsing durations. Statistics code itself handles bad
/// input by omission and never produces these.
#[derive(Debug, thiserror::Error)]
pub enum MpError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid time. {label} {reason} (got '{value}')")]
    InvalidDuration {
        label: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl MpError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl MpErrorCode for MpError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Serialization(_) => error_code::SERIALIZATION_ERROR,
            Self::InvalidDuration { .. } => error_code::INVALID_DURATION,
            Self::Config(_) | Self::ConfigParse(_) => error_code::CONFIG_ERROR,
            Self::Io { .. } => error_code::IO_ERROR,
        }
    }
}

pub type MpResult<T> = Result<T, MpError>;
