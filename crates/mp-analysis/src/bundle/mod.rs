//! Recorded requests and runs, as the test harness captures them.

pub mod collection_bundle;
pub mod container;
pub mod long_run_bundle;

pub use collection_bundle::{CollectionBundle, ResponseStatus};
pub use container::{ContainerStats, DockerStatsSample};
pub use long_run_bundle::LongCollectionBundle;
