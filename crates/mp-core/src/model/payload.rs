//! Typed view of a `collect` response body.
//!
//! Every list defaults to empty and every scalar is optional: adapters under
//! test routinely omit fields, and the engine decides per use site what a
//! missing field means. Entries of `result`, `relationships` and `children`
//! are decoded leniently, so one malformed entry does not discard the cycle.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::MpResult;

/// Top-level body of a collect response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectResult {
    #[serde(default)]
    pub result: Vec<Lenient<ObjectData>>,
    #[serde(default)]
    pub relationships: Vec<Lenient<RelationshipData>>,
    #[serde(default)]
    pub non_existing_objects: Vec<serde_json::Value>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl CollectResult {
    pub fn from_json(body: &str) -> MpResult<Self> {
        Ok(serde_json::from_str(body)?)
    }

    /// Objects that decoded successfully.
    pub fn objects(&self) -> impl Iterator<Item = &ObjectData> {
        self.result.iter().filter_map(Lenient::get)
    }

    /// Relationship entries that decoded successfully.
    pub fn relationship_entries(&self) -> impl Iterator<Item = &RelationshipData> {
        self.relationships.iter().filter_map(Lenient::get)
    }
}

/// One monitored object with its data for this cycle.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectData {
    #[serde(default)]
    pub key: Option<ObjectKey>,
    #[serde(default)]
    pub metrics: Vec<MetricData>,
    #[serde(default)]
    pub properties: Vec<PropertyData>,
    #[serde(default)]
    pub events: Vec<EventData>,
}

/// Object key as sent by the adapter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectKey {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub adapter_kind: Option<String>,
    #[serde(default)]
    pub object_kind: Option<String>,
    #[serde(default)]
    pub identifiers: Vec<IdentifierData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifierData {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub is_part_of_uniqueness: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricData {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub number_value: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyData {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub number_value: Option<f64>,
    #[serde(default)]
    pub string_value: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventData {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub criticality: Option<serde_json::Value>,
    #[serde(default, alias = "fault_key")]
    pub fault_key: Option<String>,
}

/// A parent and the children it points at.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipData {
    #[serde(default)]
    pub parent: Option<ObjectKey>,
    #[serde(default)]
    pub children: Vec<Lenient<ObjectKey>>,
}

impl RelationshipData {
    pub fn child_keys(&self) -> impl Iterator<Item = &ObjectKey> {
        self.children.iter().filter_map(Lenient::get)
    }
}

/// A list entry that may fail to decode without failing its container.
#[derive(Debug, Clone, PartialEq)]
pub struct Lenient<T>(pub Option<T>);

impl<T> Lenient<T> {
    pub fn get(&self) -> Option<&T> {
        self.0.as_ref()
    }
}

impl<T> Default for Lenient<T> {
    fn default() -> Self {
        Self(None)
    }
}

impl<T> From<T> for Lenient<T> {
    fn from(value: T) -> Self {
        Self(Some(value))
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Lenient<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Self(serde_json::from_value(value).ok()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_lists_default_to_empty() {
        let payload = CollectResult::from_json("{}").unwrap();
        assert_eq!(payload.objects().count(), 0);
        assert_eq!(payload.relationship_entries().count(), 0);
        assert!(payload.error_message.is_none());
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let body = r#"{
            "result": [
                "not an object",
                {"key": {"name": "a", "adapterKind": "A", "objectKind": "K"}},
                {"key": 42}
            ],
            "relationships": [
                17,
                {"parent": {"name": "a"}, "children": [{"name": "b"}, "junk"]}
            ]
        }"#;
        let payload = CollectResult::from_json(body).unwrap();
        assert_eq!(payload.objects().count(), 1);
        let rels: Vec<_> = payload.relationship_entries().collect();
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].child_keys().count(), 1);
    }

    #[test]
    fn test_unknown_event_fields_are_ignored() {
        let body = r#"{"result": [{"key": {"name": "a", "adapterKind": "A", "objectKind": "K"},
            "events": [{"message": "disk full", "criticality": "critical", "fault_key": "fk", "extra": 1}]}]}"#;
        let payload = CollectResult::from_json(body).unwrap();
        let obj = payload.objects().next().unwrap();
        assert_eq!(obj.events[0].message.as_deref(), Some("disk full"));
        assert_eq!(obj.events[0].fault_key.as_deref(), Some("fk"));
    }

    #[test]
    fn test_error_message_is_captured() {
        let payload = CollectResult::from_json(r#"{"errorMessage": "boom"}"#).unwrap();
        assert_eq!(payload.error_message.as_deref(), Some("boom"));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(CollectResult::from_json("not json").is_err());
    }
}
