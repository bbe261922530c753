//! Growth highlight rules over a finished long run.

use mp_core::model::ObjectType;
use mp_core::HighlightConfig;

use super::result::ValidationResult;
use crate::collection::{LongCollectionStatistics, LongObjectTypeStatistics};
use crate::stats::growth_rate;

const SECONDS_PER_HOUR: f64 = 3600.0;

const OBJECT_GROWTH_INFO: &str = "Objects of this type appeared with new identities in later \
collections. This usually means an identifier marked as part of uniqueness changes between \
collections, so every collection creates new objects instead of updating existing ones.";

const METRIC_GROWTH_INFO: &str = "New metric keys kept appearing on objects of this type. \
Metric keys should come from a fixed set; a key built from changing data creates a new \
metric each collection.";

const PROPERTY_GROWTH_INFO: &str = "New property keys kept appearing on objects of this type. \
Property keys should come from a fixed set; a key built from changing data creates a new \
property each collection.";

const PROPERTY_VALUE_GROWTH_INFO: &str = "The number of distinct string property values for \
this type kept growing. String properties are expected to settle on a small set of values. \
Frequently changing data such as timestamps or counters belongs in a metric.";

const RELATIONSHIP_GROWTH_INFO: &str = "Objects of this type kept gaining relationships that \
were not reported before. Relationships should be stable between collections unless the \
monitored topology actually changes.";

const EVENT_GROWTH_INFO: &str = "Objects of this type raised more distinct events than \
expected over the run. Event messages that embed changing data are stored as separate events.";

fn growth_phrase(object_type: &ObjectType, kind: &str, rate: f64) -> String {
    format!("Objects of type '{object_type}' displayed {kind}growth of {rate:.2}% per hour")
}

fn growth_message(object_type: &ObjectType, kind: &str, rate: f64) -> String {
    format!("{}.", growth_phrase(object_type, kind, rate))
}

/// Applies the six growth rules with the configured thresholds.
#[derive(Debug, Clone, Default)]
pub struct GrowthHighlighter {
    config: HighlightConfig,
}

impl GrowthHighlighter {
    pub fn new(config: HighlightConfig) -> Self {
        Self { config }
    }

    /// WARNING for every positive growth reported by `rate`.
    fn positive_growth(
        stats: &LongCollectionStatistics,
        rate: impl Fn(&LongObjectTypeStatistics) -> f64,
        message: impl Fn(&ObjectType, f64) -> String,
        info: &str,
    ) -> ValidationResult {
        let mut result = ValidationResult::new();
        for (object_type, type_stats) in stats.long_object_type_statistics() {
            let growth = rate(type_stats);
            if growth > 0.0 {
                result.add_warning(message(object_type, growth));
                result.add_information(info);
            }
        }
        result
    }

    pub fn object_growth(&self, stats: &LongCollectionStatistics) -> ValidationResult {
        Self::positive_growth(
            stats,
            LongObjectTypeStatistics::objects_growth_rate,
            |t, r| growth_message(t, "", r),
            OBJECT_GROWTH_INFO,
        )
    }

    pub fn metric_growth(&self, stats: &LongCollectionStatistics) -> ValidationResult {
        Self::positive_growth(
            stats,
            LongObjectTypeStatistics::metrics_growth_rate,
            |t, r| growth_message(t, "metric ", r),
            METRIC_GROWTH_INFO,
        )
    }

    pub fn property_growth(&self, stats: &LongCollectionStatistics) -> ValidationResult {
        Self::positive_growth(
            stats,
            LongObjectTypeStatistics::properties_growth_rate,
            // No trailing period on this one.
            |t, r| growth_phrase(t, "property ", r),
            PROPERTY_GROWTH_INFO,
        )
    }

    pub fn relationship_growth(&self, stats: &LongCollectionStatistics) -> ValidationResult {
        Self::positive_growth(
            stats,
            LongObjectTypeStatistics::relationships_growth_rate,
            |t, r| growth_message(t, "relationship ", r),
            RELATIONSHIP_GROWTH_INFO,
        )
    }

    /// Rate a type would show if its distinct values went from 1 to the cap.
    pub fn property_value_threshold(&self, stats: &LongCollectionStatistics) -> f64 {
        let cap = self
            .config
            .effective_property_value_cap()
            .min(stats.total_number_of_collections());
        growth_rate(
            1.0,
            cap as f64,
            stats.long_run_duration() / SECONDS_PER_HOUR,
        )
    }

    /// ERROR at or above the threshold, WARNING for any smaller positive growth.
    pub fn property_value_growth(&self, stats: &LongCollectionStatistics) -> ValidationResult {
        let threshold = self.property_value_threshold(stats);
        let mut result = ValidationResult::new();
        for (object_type, type_stats) in stats.long_object_type_statistics() {
            let growth = type_stats.property_values_growth_rate();
            if growth <= 0.0 {
                continue;
            }
            if growth >= threshold {
                result.add_error(growth_message(
                    object_type,
                    "excessive property value ",
                    growth,
                ));
            } else {
                result.add_warning(growth_message(object_type, "property value ", growth));
            }
            result.add_information(PROPERTY_VALUE_GROWTH_INFO);
        }
        result
    }

    /// The baseline scaled to the run, taken over the run's seconds.
    pub fn event_threshold(&self, stats: &LongCollectionStatistics) -> f64 {
        let duration = stats.long_run_duration();
        let hours = duration / SECONDS_PER_HOUR;
        growth_rate(
            0.0,
            self.config.effective_event_baseline_per_hour() * hours,
            duration,
        )
    }

    /// WARNING only above the event threshold.
    pub fn event_growth(&self, stats: &LongCollectionStatistics) -> ValidationResult {
        let threshold = self.event_threshold(stats);
        let mut result = ValidationResult::new();
        for (object_type, type_stats) in stats.long_object_type_statistics() {
            let growth = type_stats.events_growth_rate();
            if growth > threshold {
                result.add_warning(growth_message(object_type, "event ", growth));
                result.add_information(EVENT_GROWTH_INFO);
            }
        }
        result
    }

    /// The rules a long run is validated with: object, metric, property,
    /// property value, then event growth. Relationship growth is reported
    /// only through [`Self::relationship_growth`].
    pub fn highlight_run(&self, stats: &LongCollectionStatistics) -> ValidationResult {
        let mut result = self.object_growth(stats);
        result.extend([
            self.metric_growth(stats),
            self.property_growth(stats),
            self.property_value_growth(stats),
            self.event_growth(stats),
        ]);
        result
    }
}

pub fn highlight_object_growth(stats: &LongCollectionStatistics) -> ValidationResult {
    GrowthHighlighter::default().object_growth(stats)
}

pub fn highlight_metric_growth(stats: &LongCollectionStatistics) -> ValidationResult {
    GrowthHighlighter::default().metric_growth(stats)
}

pub fn highlight_property_growth(stats: &LongCollectionStatistics) -> ValidationResult {
    GrowthHighlighter::default().property_growth(stats)
}

pub fn highlight_property_value_growth(stats: &LongCollectionStatistics) -> ValidationResult {
    GrowthHighlighter::default().property_value_growth(stats)
}

pub fn highlight_relationship_growth(stats: &LongCollectionStatistics) -> ValidationResult {
    GrowthHighlighter::default().relationship_growth(stats)
}

pub fn highlight_event_growth(stats: &LongCollectionStatistics) -> ValidationResult {
    GrowthHighlighter::default().event_growth(stats)
}
