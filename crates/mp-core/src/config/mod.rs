//! Configuration for long runs and the highlight rules.

pub mod duration;
pub mod long_run_config;

pub use duration::{collection_count, parse_duration};
pub use long_run_config::{HighlightConfig, LogFormat, LoggingConfig, LongRunConfig};
