//! Identity of monitored objects across collection cycles.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::payload::{IdentifierData, ObjectKey};

/// The (adapterKind, objectKind) pair identifying a class of monitored entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectType {
    pub adapter_kind: String,
    pub object_kind: String,
}

impl ObjectType {
    pub fn new(adapter_kind: impl Into<String>, object_kind: impl Into<String>) -> Self {
        Self {
            adapter_kind: adapter_kind.into(),
            object_kind: object_kind.into(),
        }
    }

    /// Derive the type from a payload key. Both kinds must be present and non-empty.
    pub fn from_key(key: &ObjectKey) -> Option<Self> {
        let adapter_kind = non_empty(key.adapter_kind.as_deref())?;
        let object_kind = non_empty(key.object_kind.as_deref())?;
        Some(Self::new(adapter_kind, object_kind))
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.adapter_kind, self.object_kind)
    }
}

/// An identifier that is part of an object's uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Identifier {
    pub key: String,
    pub value: String,
}

impl Identifier {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Only identifiers flagged `isPartOfUniqueness` with a non-empty key count.
    pub fn from_data(data: &IdentifierData) -> Option<Self> {
        if !data.is_part_of_uniqueness {
            return None;
        }
        let key = non_empty(data.key.as_deref())?;
        Some(Self::new(key, data.value.clone().unwrap_or_default()))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.value)
    }
}

/// Identifier lists are almost always zero to two entries long.
pub type Identifiers = SmallVec<[Identifier; 2]>;

/// Identity of one monitored object. Two keys that produce the same
/// `ObjectId` describe the same entity, whichever cycle they came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId {
    pub name: String,
    pub object_type: ObjectType,
    /// Sorted by key.
    pub identifiers: Identifiers,
}

impl ObjectId {
    pub fn new(
        name: impl Into<String>,
        object_type: ObjectType,
        identifiers: impl IntoIterator<Item = Identifier>,
    ) -> Self {
        let mut identifiers: Identifiers = identifiers.into_iter().collect();
        identifiers.sort_by(|a, b| a.key.cmp(&b.key));
        Self {
            name: name.into(),
            object_type,
            identifiers,
        }
    }

    /// Derive an identity from a payload key.
    ///
    /// Returns `None` when the name or either kind is missing or empty.
    pub fn from_key(key: &ObjectKey) -> Option<Self> {
        let name = non_empty(key.name.as_deref())?;
        let object_type = ObjectType::from_key(key)?;
        let identifiers = key.identifiers.iter().filter_map(Identifier::from_data);
        Some(Self::new(name, object_type, identifiers))
    }

    /// Long form including the uniqueness identifiers.
    pub fn verbose(&self) -> String {
        let ids = self
            .identifiers
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" :: ");
        format!("{} ({} - {})", self.name, self.object_type, ids)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.object_type)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
