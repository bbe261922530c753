//! All objects of one type in one collection cycle.

use std::sync::Arc;

use mp_core::model::{ObjectId, ObjectType};
use mp_core::FxHashSet;
use tracing::debug;

use super::object::ObjectStatistics;
use crate::stats::Stats;

/// Objects of a single `ObjectType` from one cycle.
///
/// The type is fixed by the first object added. Objects of any other type
/// are dropped.
#[derive(Debug, Clone, Default)]
pub struct ObjectTypeStatistics {
    object_type: Option<ObjectType>,
    objects: Vec<Arc<ObjectStatistics>>,
}

/// Per-type aggregate used by the cycle summary table.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectTypeSummary {
    pub objects: usize,
    pub metrics: Option<Stats>,
    pub properties: Option<Stats>,
    pub events: Option<Stats>,
    pub parents: Option<Stats>,
    pub children: Option<Stats>,
}

impl ObjectTypeStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object_type(&self) -> Option<&ObjectType> {
        self.object_type.as_ref()
    }

    pub fn objects(&self) -> &[Arc<ObjectStatistics>] {
        &self.objects
    }

    /// Add an object. Returns `false` if its type differs from the bucket's.
    pub fn add_object(&mut self, object: impl Into<Arc<ObjectStatistics>>) -> bool {
        let object = object.into();
        match &self.object_type {
            None => self.object_type = Some(object.key.object_type.clone()),
            Some(object_type) if *object_type != object.key.object_type => {
                debug!(
                    expected = %object_type,
                    found = %object.key.object_type,
                    object = %object.key,
                    "Dropping object of mismatched type"
                );
                return false;
            }
            Some(_) => {}
        }
        self.objects.push(object);
        true
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn unique_objects(&self) -> FxHashSet<&ObjectId> {
        self.objects.iter().map(|o| &o.key).collect()
    }

    pub fn unique_metrics(&self) -> FxHashSet<&str> {
        self.objects
            .iter()
            .flat_map(|o| o.metrics.iter().map(String::as_str))
            .collect()
    }

    pub fn unique_properties(&self) -> FxHashSet<&str> {
        self.objects
            .iter()
            .flat_map(|o| o.properties.iter().map(String::as_str))
            .collect()
    }

    pub fn unique_string_property_values(&self) -> FxHashSet<&str> {
        self.objects
            .iter()
            .flat_map(|o| o.string_properties.values().map(String::as_str))
            .collect()
    }

    pub fn unique_events(&self) -> FxHashSet<&str> {
        self.objects
            .iter()
            .flat_map(|o| o.events.iter().map(String::as_str))
            .collect()
    }

    /// Distinct `(parent, object)` and `(object, child)` edges touching this type.
    pub fn unique_relationships(&self) -> FxHashSet<(&ObjectId, &ObjectId)> {
        let mut edges = FxHashSet::default();
        for object in &self.objects {
            edges.extend(object.parents.iter().map(|parent| (parent, &object.key)));
            edges.extend(object.children.iter().map(|child| (&object.key, child)));
        }
        edges
    }

    pub fn metric_counts(&self) -> Vec<usize> {
        self.objects.iter().map(|o| o.metric_count()).collect()
    }

    pub fn property_counts(&self) -> Vec<usize> {
        self.objects.iter().map(|o| o.property_count()).collect()
    }

    pub fn event_counts(&self) -> Vec<usize> {
        self.objects.iter().map(|o| o.event_count()).collect()
    }

    pub fn parent_counts(&self) -> Vec<usize> {
        self.objects.iter().map(|o| o.parent_count()).collect()
    }

    pub fn children_counts(&self) -> Vec<usize> {
        self.objects.iter().map(|o| o.children_count()).collect()
    }

    pub fn summary(&self) -> ObjectTypeSummary {
        ObjectTypeSummary {
            objects: self.object_count(),
            metrics: Stats::from_counts(&self.metric_counts(), ""),
            properties: Stats::from_counts(&self.property_counts(), ""),
            events: Stats::from_counts(&self.event_counts(), ""),
            parents: Stats::from_counts(&self.parent_counts(), ""),
            children: Stats::from_counts(&self.children_counts(), ""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(name: &str, kind: &str, metrics: &[&str]) -> ObjectStatistics {
        let mut stats =
            ObjectStatistics::stub(ObjectId::new(name, ObjectType::new("Adapter", kind), []));
        stats.metrics = metrics.iter().map(|m| m.to_string()).collect();
        stats
    }

    #[test]
    fn test_first_object_fixes_type() {
        let mut bucket = ObjectTypeStatistics::new();
        assert!(bucket.object_type().is_none());
        assert!(bucket.add_object(object("a", "VM", &["cpu"])));
        assert!(!bucket.add_object(object("b", "Host", &["cpu"])));
        assert!(bucket.add_object(object("c", "VM", &["cpu", "mem"])));

        assert_eq!(bucket.object_type(), Some(&ObjectType::new("Adapter", "VM")));
        assert_eq!(bucket.object_count(), 2);
        assert_eq!(bucket.unique_metrics().len(), 2);
        assert_eq!(bucket.metric_counts(), vec![1, 2]);
    }

    #[test]
    fn test_relationship_edges_are_oriented() {
        let parent = ObjectId::new("p", ObjectType::new("Adapter", "Host"), []);
        let mut child = object("c", "VM", &[]);
        child.add_parent(parent.clone());
        let grandchild = ObjectId::new("g", ObjectType::new("Adapter", "Disk"), []);
        child.add_child(grandchild.clone());

        let mut bucket = ObjectTypeStatistics::new();
        bucket.add_object(child.clone());
        let edges = bucket.unique_relationships();
        assert_eq!(edges.len(), 2);
        assert!(edges.contains(&(&parent, &child.key)));
        assert!(edges.contains(&(&child.key, &grandchild)));
    }

    #[test]
    fn test_summary() {
        let mut bucket = ObjectTypeStatistics::new();
        bucket.add_object(object("a", "VM", &["cpu"]));
        bucket.add_object(object("b", "VM", &["cpu", "mem", "disk"]));
        let summary = bucket.summary();
        assert_eq!(summary.objects, 2);
        assert_eq!(summary.metrics.unwrap().count, 4.0);
        assert_eq!(summary.events.unwrap().count, 0.0);

        let empty = ObjectTypeStatistics::new().summary();
        assert_eq!(empty.objects, 0);
        assert!(empty.metrics.is_none());
    }
}
