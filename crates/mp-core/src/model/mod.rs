//! Object identity and the collect payload model.

pub mod identity;
pub mod payload;

pub use identity::{Identifier, Identifiers, ObjectId, ObjectType};
pub use payload::{
    CollectResult, EventData, IdentifierData, Lenient, MetricData, ObjectData, ObjectKey,
    PropertyData, RelationshipData,
};
