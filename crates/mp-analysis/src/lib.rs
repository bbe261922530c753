//! # mp-analysis
//!
//! Long-run collection analysis for Management Pack adapters.
//! Contains the statistics primitives, per-cycle and run-wide collection
//! statistics, recorded bundles, growth highlights, relationship cycle
//! detection, and the text report tables.

pub mod bundle;
pub mod collection;
pub mod report;
pub mod stats;
pub mod validation;

pub use bundle::{CollectionBundle, ContainerStats, LongCollectionBundle, ResponseStatus};
pub use collection::{
    CollectionStatistics, LongCollectionStatistics, LongObjectTypeStatistics, ObjectStatistics,
    ObjectTypeStatistics,
};
pub use stats::{growth_rate, LongRunStats, Stats, UniqueObjectTypeStatistics};
pub use validation::{
    validate_relationships, Cycle, Graph, GrowthHighlighter, ResultLevel, ValidationResult,
};
