//! Statistics primitives: descriptive stats, growth rate, running-union trackers.

pub mod descriptive;
pub mod growth;
pub mod unique;

pub use descriptive::{convert_bytes, LongRunStats, Stats};
pub use growth::growth_rate;
pub use unique::UniqueObjectTypeStatistics;
