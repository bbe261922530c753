//! Per-object snapshot for one collection cycle.

use mp_core::model::{ObjectData, ObjectId};
use mp_core::{FxHashMap, FxHashSet};

/// What one object reported in one cycle, plus its relationships.
///
/// `parents` and `children` are filled after construction, from the
/// cycle's relationship list.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectStatistics {
    pub key: ObjectId,
    /// Event message texts.
    pub events: FxHashSet<String>,
    /// Metric keys.
    pub metrics: FxHashSet<String>,
    /// Property keys, string and numeric.
    pub properties: FxHashSet<String>,
    /// String-valued properties only. A repeated key keeps the last value.
    pub string_properties: FxHashMap<String, String>,
    pub parents: FxHashSet<ObjectId>,
    pub children: FxHashSet<ObjectId>,
}

impl ObjectStatistics {
    /// Snapshot an object from the payload. `None` if its key has no identity.
    pub fn from_object(data: &ObjectData) -> Option<Self> {
        let key = ObjectId::from_key(data.key.as_ref()?)?;
        let mut stats = Self::stub(key);

        stats.events = data
            .events
            .iter()
            .filter_map(|event| event.message.clone())
            .collect();
        stats.metrics = data
            .metrics
            .iter()
            .filter_map(|metric| metric.key.clone())
            .collect();
        for property in &data.properties {
            let Some(key) = &property.key else {
                continue;
            };
            stats.properties.insert(key.clone());
            if let Some(value) = &property.string_value {
                stats.string_properties.insert(key.clone(), value.clone());
            }
        }

        Some(stats)
    }

    /// An object known only by its key, e.g. one referenced by a
    /// relationship but not returned in the cycle's results.
    pub fn stub(key: ObjectId) -> Self {
        Self {
            key,
            events: FxHashSet::default(),
            metrics: FxHashSet::default(),
            properties: FxHashSet::default(),
            string_properties: FxHashMap::default(),
            parents: FxHashSet::default(),
            children: FxHashSet::default(),
        }
    }

    pub fn add_parent(&mut self, parent: ObjectId) {
        self.parents.insert(parent);
    }

    pub fn add_child(&mut self, child: ObjectId) {
        self.children.insert(child);
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    pub fn metric_count(&self) -> usize {
        self.metrics.len()
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    pub fn parent_count(&self) -> usize {
        self.parents.len()
    }

    pub fn children_count(&self) -> usize {
        self.children.len()
    }
}
