//! # mp-core
//!
//! Foundation crate for the Management Pack statistics engine.
//! Defines object identity, the collect payload model, errors, config, and tracing.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod errors;
pub mod model;
pub mod tracing;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::{HighlightConfig, LongRunConfig};
pub use errors::{MpError, MpErrorCode, MpResult};
pub use model::{CollectResult, ObjectId, ObjectKey, ObjectType};
pub use types::collections::{FxHashMap, FxHashSet};
