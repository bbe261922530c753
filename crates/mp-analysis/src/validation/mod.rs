//! Validation results, growth highlights, and relationship checks.

pub mod highlights;
pub mod relationships;
pub mod result;

pub use highlights::{
    highlight_event_growth, highlight_metric_growth, highlight_object_growth,
    highlight_property_growth, highlight_property_value_growth, highlight_relationship_growth,
    GrowthHighlighter,
};
pub use relationships::{relationship_graph, validate_relationships, Cycle, Graph};
pub use result::{ResultLevel, ValidationResult};
