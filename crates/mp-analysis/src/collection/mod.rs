//! Per-cycle and run-wide collection statistics.

pub mod collection_statistics;
pub mod long_run;
pub mod object;
pub mod object_type;

pub use collection_statistics::CollectionStatistics;
pub use long_run::{CollectionRecord, LongCollectionStatistics, LongObjectTypeStatistics};
pub use object::ObjectStatistics;
pub use object_type::{ObjectTypeStatistics, ObjectTypeSummary};
