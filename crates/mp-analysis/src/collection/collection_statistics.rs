//! Statistics for a single collection cycle, built from its payload.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use mp_core::model::{CollectResult, ObjectId, ObjectType};
use mp_core::{FxHashMap, MpResult};
use tracing::debug;

use super::object::ObjectStatistics;
use super::object_type::ObjectTypeStatistics;
use crate::report::Table;

/// One cycle, bucketed by object type.
///
/// `obj_statistics` indexes every object seen, including relationship
/// endpoints that were not returned as results. Only returned objects are
/// placed in the type buckets.
#[derive(Debug, Clone, Default)]
pub struct CollectionStatistics {
    pub obj_type_statistics: BTreeMap<ObjectType, ObjectTypeStatistics>,
    pub obj_statistics: FxHashMap<ObjectId, Arc<ObjectStatistics>>,
    /// Relationship counts keyed by `(parent type, child type)`.
    pub rel_statistics: BTreeMap<(ObjectType, ObjectType), usize>,
}

impl CollectionStatistics {
    pub fn from_json(body: &str) -> MpResult<Self> {
        Ok(Self::from_payload(&CollectResult::from_json(body)?))
    }

    pub fn from_payload(payload: &CollectResult) -> Self {
        let mut arena: Vec<ObjectStatistics> = Vec::new();
        let mut index: FxHashMap<ObjectId, usize> = FxHashMap::default();
        let mut returned: Vec<usize> = Vec::new();

        for data in payload.objects() {
            let Some(stats) = ObjectStatistics::from_object(data) else {
                debug!("Skipping result object without a usable key");
                continue;
            };
            index.insert(stats.key.clone(), arena.len());
            returned.push(arena.len());
            arena.push(stats);
        }

        let mut rel_statistics = BTreeMap::new();
        for relationship in payload.relationship_entries() {
            let Some(parent) = relationship.parent.as_ref().and_then(ObjectId::from_key) else {
                continue;
            };
            for child in relationship.child_keys().filter_map(ObjectId::from_key) {
                *rel_statistics
                    .entry((parent.object_type.clone(), child.object_type.clone()))
                    .or_insert(0) += 1;

                let p = slot(&mut arena, &mut index, &parent);
                arena[p].add_child(child.clone());
                let c = slot(&mut arena, &mut index, &child);
                arena[c].add_parent(parent.clone());
            }
        }

        let arena: Vec<Arc<ObjectStatistics>> = arena.into_iter().map(Arc::new).collect();

        let mut obj_type_statistics: BTreeMap<ObjectType, ObjectTypeStatistics> = BTreeMap::new();
        for i in returned {
            let object = &arena[i];
            obj_type_statistics
                .entry(object.key.object_type.clone())
                .or_default()
                .add_object(Arc::clone(object));
        }

        let obj_statistics = index
            .into_iter()
            .map(|(id, i)| (id, Arc::clone(&arena[i])))
            .collect();

        Self {
            obj_type_statistics,
            obj_statistics,
            rel_statistics,
        }
    }

    pub fn object(&self, id: &ObjectId) -> Option<&ObjectStatistics> {
        self.obj_statistics.get(id).map(Arc::as_ref)
    }

    pub fn object_type(&self, object_type: &ObjectType) -> Option<&ObjectTypeStatistics> {
        self.obj_type_statistics.get(object_type)
    }

    /// Count of objects returned in the cycle's results.
    pub fn object_count(&self) -> usize {
        self.obj_type_statistics
            .values()
            .map(ObjectTypeStatistics::object_count)
            .sum()
    }

    pub fn relationship_count(&self) -> usize {
        self.rel_statistics.values().sum()
    }
}

/// Index of `id` in the arena, inserting a stub when unseen.
fn slot(
    arena: &mut Vec<ObjectStatistics>,
    index: &mut FxHashMap<ObjectId, usize>,
    id: &ObjectId,
) -> usize {
    if let Some(&i) = index.get(id) {
        return i;
    }
    let i = arena.len();
    arena.push(ObjectStatistics::stub(id.clone()));
    index.insert(id.clone(), i);
    i
}

pub(crate) fn stats_cell<T: ToString>(stats: Option<&T>) -> String {
    stats.map_or_else(|| "-".to_string(), ToString::to_string)
}

impl fmt::Display for CollectionStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types = Table::new([
            "Object Type",
            "Count",
            "Metrics",
            "Properties",
            "Events",
            "Parents",
            "Children",
        ]);
        for (object_type, stats) in &self.obj_type_statistics {
            let summary = stats.summary();
            types.add_row([
                object_type.to_string(),
                summary.objects.to_string(),
                stats_cell(summary.metrics.as_ref()),
                stats_cell(summary.properties.as_ref()),
                stats_cell(summary.events.as_ref()),
                stats_cell(summary.parents.as_ref()),
                stats_cell(summary.children.as_ref()),
            ]);
        }

        let mut relationships = Table::new(["Parent Type", "Child Type", "Count"]);
        for ((parent, child), count) in &self.rel_statistics {
            relationships.add_row([parent.to_string(), child.to_string(), count.to_string()]);
        }

        write!(f, "Collection summary: \n\n{types}\n{relationships}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "result": [
            {"key": {"name": "host-1", "adapterKind": "VC", "objectKind": "Host", "identifiers": []},
             "metrics": [{"key": "cpu"}], "properties": [{"key": "model", "stringValue": "x"}]},
            {"key": {"name": "vm-1", "adapterKind": "VC", "objectKind": "VM", "identifiers": []},
             "events": [{"message": "started"}]},
            {"key": {"name": "vm-2", "adapterKind": "VC", "objectKind": "VM", "identifiers": []}},
            {"key": {"adapterKind": "VC"}}
        ],
        "relationships": [
            {"parent": {"name": "host-1", "adapterKind": "VC", "objectKind": "Host", "identifiers": []},
             "children": [
                {"name": "vm-1", "adapterKind": "VC", "objectKind": "VM", "identifiers": []},
                {"name": "vm-2", "adapterKind": "VC", "objectKind": "VM", "identifiers": []},
                {"name": "ds-1", "adapterKind": "VC", "objectKind": "Datastore", "identifiers": []}
             ]},
            {"children": [{"name": "vm-1", "adapterKind": "VC", "objectKind": "VM", "identifiers": []}]}
        ]
    }"#;

    fn id(name: &str, kind: &str) -> ObjectId {
        ObjectId::new(name, ObjectType::new("VC", kind), [])
    }

    #[test]
    fn test_buckets_by_type() {
        let stats = CollectionStatistics::from_json(BODY).unwrap();
        assert_eq!(stats.obj_type_statistics.len(), 2);
        assert_eq!(stats.object_count(), 3);
        let vms = stats.object_type(&ObjectType::new("VC", "VM")).unwrap();
        assert_eq!(vms.object_count(), 2);
        assert_eq!(vms.unique_events().len(), 1);
    }

    #[test]
    fn test_relationship_endpoints_are_stubbed() {
        let stats = CollectionStatistics::from_json(BODY).unwrap();
        let datastore = stats.object(&id("ds-1", "Datastore")).unwrap();
        assert_eq!(datastore.parents.len(), 1);
        assert!(stats
            .object_type(&ObjectType::new("VC", "Datastore"))
            .is_none());

        let host = stats.object(&id("host-1", "Host")).unwrap();
        assert_eq!(host.children_count(), 3);
        assert_eq!(host.metric_count(), 1);
        let vm = stats.object(&id("vm-1", "VM")).unwrap();
        assert_eq!(vm.parent_count(), 1);
    }

    #[test]
    fn test_bucket_shares_relationships_with_index() {
        let stats = CollectionStatistics::from_json(BODY).unwrap();
        let hosts = stats.object_type(&ObjectType::new("VC", "Host")).unwrap();
        assert_eq!(hosts.unique_relationships().len(), 3);
    }

    #[test]
    fn test_rel_statistics_by_type_pair() {
        let stats = CollectionStatistics::from_json(BODY).unwrap();
        let host = ObjectType::new("VC", "Host");
        assert_eq!(
            stats.rel_statistics[&(host.clone(), ObjectType::new("VC", "VM"))],
            2
        );
        assert_eq!(
            stats.rel_statistics[&(host, ObjectType::new("VC", "Datastore"))],
            1
        );
        assert_eq!(stats.relationship_count(), 3);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(CollectionStatistics::from_json("not json").is_err());
    }

    #[test]
    fn test_summary_text() {
        let stats = CollectionStatistics::from_json(BODY).unwrap();
        let text = stats.to_string();
        assert!(text.starts_with("Collection summary: \n\n"));
        assert!(text.contains("Object Type"));
        assert!(text.contains("VC::VM"));
        assert!(text.contains("Parent Type"));
        assert!(text.contains("VC::Datastore"));
    }
}
