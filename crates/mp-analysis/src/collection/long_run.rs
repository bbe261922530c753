//! Run-wide accumulation of per-cycle statistics.

use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::fmt;

use mp_core::model::{ObjectId, ObjectType};
use tracing::{debug, warn};

use super::collection_statistics::{stats_cell, CollectionStatistics};
use super::object_type::ObjectTypeStatistics;
use crate::bundle::{CollectionBundle, ContainerStats};
use crate::report::Table;
use crate::stats::{LongRunStats, UniqueObjectTypeStatistics};

const SECONDS_PER_HOUR: f64 = 3600.0;

#[derive(Debug, Clone, Default)]
struct GrowthRates {
    objects: OnceCell<f64>,
    metrics: OnceCell<f64>,
    properties: OnceCell<f64>,
    property_values: OnceCell<f64>,
    events: OnceCell<f64>,
    relationships: OnceCell<f64>,
}

impl GrowthRates {
    fn any_computed(&self) -> bool {
        [
            &self.objects,
            &self.metrics,
            &self.properties,
            &self.property_values,
            &self.events,
            &self.relationships,
        ]
        .iter()
        .any(|cell| cell.get().is_some())
    }
}

/// Six running trackers for one object type across a run.
///
/// Growth rates are computed on first read and cached for the lifetime of
/// the value. Read them only once every cycle has been added.
#[derive(Debug, Clone)]
pub struct LongObjectTypeStatistics {
    long_run_duration: f64,
    pub objects: UniqueObjectTypeStatistics<ObjectId>,
    pub metrics: UniqueObjectTypeStatistics<String>,
    pub properties: UniqueObjectTypeStatistics<String>,
    pub events: UniqueObjectTypeStatistics<String>,
    pub relationships: UniqueObjectTypeStatistics<(ObjectId, ObjectId)>,
    pub string_property_values: UniqueObjectTypeStatistics<String>,
    growth: GrowthRates,
}

impl LongObjectTypeStatistics {
    pub fn new(long_run_duration: f64) -> Self {
        Self {
            long_run_duration,
            objects: UniqueObjectTypeStatistics::new(),
            metrics: UniqueObjectTypeStatistics::new(),
            properties: UniqueObjectTypeStatistics::new(),
            events: UniqueObjectTypeStatistics::new(),
            relationships: UniqueObjectTypeStatistics::new(),
            string_property_values: UniqueObjectTypeStatistics::new(),
            growth: GrowthRates::default(),
        }
    }

    /// Feed one cycle's bucket for this type.
    pub fn add(&mut self, stats: &ObjectTypeStatistics) {
        if self.growth.any_computed() {
            warn!("Cycle added after growth rates were read; cached rates are stale");
        }

        self.objects.add(
            stats.unique_objects().into_iter().cloned(),
            stats.object_count(),
        );
        self.metrics.add(
            stats.unique_metrics().into_iter().map(str::to_owned),
            stats.metric_counts().iter().sum(),
        );
        self.properties.add(
            stats.unique_properties().into_iter().map(str::to_owned),
            stats.property_counts().iter().sum(),
        );
        self.events.add(
            stats.unique_events().into_iter().map(str::to_owned),
            stats.event_counts().iter().sum(),
        );

        let relationships = stats.unique_relationships();
        let relationship_count = relationships.len();
        self.relationships.add(
            relationships
                .into_iter()
                .map(|(from, to)| (from.clone(), to.clone())),
            relationship_count,
        );
        self.string_property_values.add(
            stats
                .unique_string_property_values()
                .into_iter()
                .map(str::to_owned),
            0,
        );
    }

    pub fn long_run_duration(&self) -> f64 {
        self.long_run_duration
    }

    fn hours(&self) -> f64 {
        self.long_run_duration / SECONDS_PER_HOUR
    }

    pub fn objects_growth_rate(&self) -> f64 {
        *self
            .growth
            .objects
            .get_or_init(|| self.objects.growth_rate(self.hours()))
    }

    pub fn metrics_growth_rate(&self) -> f64 {
        *self
            .growth
            .metrics
            .get_or_init(|| self.metrics.growth_rate(self.hours()))
    }

    pub fn properties_growth_rate(&self) -> f64 {
        *self
            .growth
            .properties
            .get_or_init(|| self.properties.growth_rate(self.hours()))
    }

    pub fn property_values_growth_rate(&self) -> f64 {
        *self
            .growth
            .property_values
            .get_or_init(|| self.string_property_values.growth_rate(self.hours()))
    }

    /// Same value as [`Self::property_values_growth_rate`].
    pub fn string_properties_growth_rate(&self) -> f64 {
        self.property_values_growth_rate()
    }

    pub fn events_growth_rate(&self) -> f64 {
        *self
            .growth
            .events
            .get_or_init(|| self.events.growth_rate(self.hours()))
    }

    pub fn relationships_growth_rate(&self) -> f64 {
        *self
            .growth
            .relationships
            .get_or_init(|| self.relationships.growth_rate(self.hours()))
    }
}

/// What the run summary keeps of each bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionRecord {
    pub collection_number: usize,
    pub duration: f64,
    /// `Some` for a failed collection, holding the failure message.
    pub failure: Option<String>,
    pub container_statistics: Option<ContainerStats>,
}

impl CollectionRecord {
    pub fn from_bundle(bundle: &CollectionBundle) -> Self {
        Self {
            collection_number: bundle.collection_number,
            duration: bundle.duration,
            failure: bundle.failed().then(|| bundle.failure_message()),
            container_statistics: bundle.container_statistics.clone(),
        }
    }

    pub fn failed(&self) -> bool {
        self.failure.is_some()
    }

    /// Ran past the interval, or timed out (408) after it.
    pub fn longer_than(&self, collection_interval: f64) -> bool {
        if self.duration <= collection_interval {
            return false;
        }
        match &self.failure {
            None => true,
            Some(message) => message.contains("408"),
        }
    }
}

/// Accumulates every cycle of a long run, in order.
#[derive(Debug, Clone)]
pub struct LongCollectionStatistics {
    collection_interval: f64,
    long_run_duration: f64,
    total_number_of_collections: usize,
    collection_records: Vec<CollectionRecord>,
    long_object_type_statistics: BTreeMap<ObjectType, LongObjectTypeStatistics>,
}

impl LongCollectionStatistics {
    pub fn new(collection_interval: f64, long_run_duration: f64) -> Self {
        Self {
            collection_interval,
            long_run_duration,
            total_number_of_collections: 0,
            collection_records: Vec::new(),
            long_object_type_statistics: BTreeMap::new(),
        }
    }

    pub fn from_bundles(
        bundles: &[CollectionBundle],
        collection_interval: f64,
        long_run_duration: f64,
    ) -> Self {
        let mut stats = Self::new(collection_interval, long_run_duration);
        for bundle in bundles {
            stats.add(bundle);
        }
        stats
    }

    /// Record a bundle. Failed bundles are listed in the summary but do not
    /// feed the trackers.
    pub fn add(&mut self, bundle: &CollectionBundle) {
        self.collection_records
            .push(CollectionRecord::from_bundle(bundle));
        self.total_number_of_collections += 1;

        if bundle.failed() {
            debug!(
                collection = bundle.collection_number,
                "Failed collection excluded from growth statistics"
            );
            return;
        }
        if let Some(stats) = bundle.collection_statistics() {
            self.add_statistics(stats);
        }
    }

    /// Feed one successful cycle's statistics.
    pub fn add_statistics(&mut self, stats: &CollectionStatistics) {
        for (object_type, type_stats) in &stats.obj_type_statistics {
            self.long_object_type_statistics
                .entry(object_type.clone())
                .or_insert_with(|| LongObjectTypeStatistics::new(self.long_run_duration))
                .add(type_stats);
        }
    }

    pub fn collection_interval(&self) -> f64 {
        self.collection_interval
    }

    pub fn long_run_duration(&self) -> f64 {
        self.long_run_duration
    }

    pub fn total_number_of_collections(&self) -> usize {
        self.total_number_of_collections
    }

    pub fn collection_records(&self) -> &[CollectionRecord] {
        &self.collection_records
    }

    /// Per-type accumulators, in `ObjectType` order.
    pub fn long_object_type_statistics(&self) -> &BTreeMap<ObjectType, LongObjectTypeStatistics> {
        &self.long_object_type_statistics
    }

    pub fn object_type(&self, object_type: &ObjectType) -> Option<&LongObjectTypeStatistics> {
        self.long_object_type_statistics.get(object_type)
    }

    fn has_container_statistics(&self) -> bool {
        self.collection_records
            .iter()
            .any(|r| r.container_statistics.is_some())
    }
}

fn long_run_cell(counts: &[usize]) -> String {
    stats_cell(LongRunStats::from_counts(counts, "").as_ref())
}

impl fmt::Display for LongCollectionStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types = Table::new([
            "Object Type",
            "Count",
            "Metrics",
            "Properties",
            "Events",
            "Relationships",
        ]);
        let mut growth = Table::new([
            "Object Type",
            "Object Growth",
            "Metric Growth",
            "Property Growth",
            "Property Values Growth",
            "Event Growth",
            "Relationship Growth",
        ]);
        for (object_type, stats) in &self.long_object_type_statistics {
            types.add_row([
                object_type.to_string(),
                long_run_cell(stats.objects.counts()),
                long_run_cell(stats.metrics.counts()),
                long_run_cell(stats.properties.counts()),
                long_run_cell(stats.events.counts()),
                long_run_cell(stats.relationships.counts()),
            ]);
            growth.add_row([
                object_type.to_string(),
                format!("{:.2} %", stats.objects_growth_rate()),
                format!("{:.2} %", stats.metrics_growth_rate()),
                format!("{:.2} %", stats.properties_growth_rate()),
                format!("{:.2} %", stats.property_values_growth_rate()),
                format!("{:.2} %", stats.events_growth_rate()),
                format!("{:.2} %", stats.relationships_growth_rate()),
            ]);
        }

        let with_container = self.has_container_statistics();
        let mut headers = vec!["Collection".to_string(), "Duration".to_string()];
        if with_container {
            headers.extend(ContainerStats::summary_headers().map(str::to_owned));
        }
        let mut collections = Table::new(headers);
        let mut failures = Table::new(["Collection", "Failure Reason"]);
        let mut longer = 0;

        for record in &self.collection_records {
            let mut label = record.collection_number.to_string();
            if let Some(message) = &record.failure {
                label.push_str(" (failed)");
                failures.add_row([record.collection_number.to_string(), message.clone()]);
            } else if record.longer_than(self.collection_interval) {
                label.push_str(" (longer than collection interval)");
            }
            if record.longer_than(self.collection_interval) {
                longer += 1;
            }

            let mut row = vec![label, format!("{:.2} s", record.duration)];
            if with_container {
                match &record.container_statistics {
                    Some(container) => row.extend(container.summary()),
                    None => row.extend(std::iter::repeat("-".to_string()).take(5)),
                }
            }
            collections.add_row(row);
        }

        write!(
            f,
            "Long Collection summary:\n\n{types}\n{growth}\n{collections}"
        )?;
        if !failures.is_empty() {
            write!(f, "\n{failures}\n{} failed collections\n", failures.row_count())?;
        }
        if longer > 0 {
            write!(f, "\n{longer} took longer than collection interval\n")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::ResponseStatus;

    fn body(names: &[&str]) -> String {
        let objects: Vec<serde_json::Value> = names
            .iter()
            .map(|name| {
                serde_json::json!({
                    "key": {"name": name, "adapterKind": "Test", "objectKind": "Node", "identifiers": []},
                    "metrics": [{"key": "cpu"}]
                })
            })
            .collect();
        serde_json::json!({ "result": objects, "relationships": [] }).to_string()
    }

    fn ok_bundle(n: usize, names: &[&str]) -> CollectionBundle {
        CollectionBundle::new(n, ResponseStatus::ok(), body(names), 1.0)
    }

    #[test]
    fn test_failed_bundle_recorded_but_not_fed() {
        let bundles = vec![
            ok_bundle(1, &["a"]),
            CollectionBundle::new(2, ResponseStatus::new(500, "Internal Server Error"), "boom", 1.0),
            ok_bundle(3, &["a"]),
        ];
        let stats = LongCollectionStatistics::from_bundles(&bundles, 300.0, 3600.0);
        assert_eq!(stats.total_number_of_collections(), 3);
        assert_eq!(stats.collection_records().len(), 3);

        let node = stats.object_type(&ObjectType::new("Test", "Node")).unwrap();
        assert_eq!(node.objects.data_points(), &[1, 1]);
        assert_eq!(node.objects_growth_rate(), 0.0);
    }

    #[test]
    fn test_growth_across_cycles() {
        let bundles = vec![ok_bundle(1, &["a"]), ok_bundle(2, &["b"])];
        let stats = LongCollectionStatistics::from_bundles(&bundles, 300.0, 3600.0);
        let node = stats.object_type(&ObjectType::new("Test", "Node")).unwrap();
        assert_eq!(node.objects.data_points(), &[1, 2]);
        assert!((node.objects_growth_rate() - 100.0).abs() < 1e-9);
        assert_eq!(node.metrics_growth_rate(), 0.0);
        assert_eq!(node.string_properties_growth_rate(), 0.0);
    }

    #[test]
    fn test_longer_than_interval() {
        let slow = CollectionRecord {
            collection_number: 1,
            duration: 400.0,
            failure: None,
            container_statistics: None,
        };
        assert!(slow.longer_than(300.0));
        assert!(!slow.longer_than(500.0));

        let timed_out = CollectionRecord {
            failure: Some("408 Request Timeout\n".to_string()),
            ..slow.clone()
        };
        assert!(timed_out.longer_than(300.0));

        let crashed = CollectionRecord {
            failure: Some("500 Internal Server Error\n".to_string()),
            ..slow
        };
        assert!(!crashed.longer_than(300.0));
    }

    #[test]
    fn test_summary_text() {
        let bundles = vec![
            ok_bundle(1, &["a"]),
            CollectionBundle::new(2, ResponseStatus::new(408, "Request Timeout"), "", 400.0),
            CollectionBundle::new(3, ResponseStatus::ok(), body(&["b"]), 301.0),
        ];
        let text = LongCollectionStatistics::from_bundles(&bundles, 300.0, 3600.0).to_string();
        assert!(text.starts_with("Long Collection summary:\n\n"));
        assert!(text.contains("Relationship Growth"));
        assert!(text.contains("100.00 %"));
        // Rows are labelled by the bare collection number.
        assert!(text.contains("\n1 "));
        assert!(text.contains("\n2 (failed)"));
        assert!(text.contains("\n3 (longer than collection interval)"));
        assert!(!text.contains("Collection 2"));
        assert!(text.contains("1.00 s"));
        assert!(text.contains("Failure Reason"));
        assert!(text.contains("1 failed collections\n"));
        assert!(text.contains("2 took longer than collection interval\n"));
        assert!(!text.contains("Avg CPU %"));
    }
}
