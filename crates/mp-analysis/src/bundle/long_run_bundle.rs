//! All bundles of one long run.

use std::cell::OnceCell;
use std::fmt;

use mp_core::HighlightConfig;

use super::collection_bundle::CollectionBundle;
use crate::collection::LongCollectionStatistics;
use crate::validation::{GrowthHighlighter, ValidationResult};

/// The harness-side record of a long run.
#[derive(Debug, Clone)]
pub struct LongCollectionBundle {
    collection_interval: f64,
    long_run_duration: f64,
    highlight_config: HighlightConfig,
    collection_bundles: Vec<CollectionBundle>,
    statistics: OnceCell<LongCollectionStatistics>,
}

impl LongCollectionBundle {
    pub fn new(collection_interval: f64, long_run_duration: f64) -> Self {
        Self {
            collection_interval,
            long_run_duration,
            highlight_config: HighlightConfig::default(),
            collection_bundles: Vec::new(),
            statistics: OnceCell::new(),
        }
    }

    pub fn with_highlight_config(mut self, config: HighlightConfig) -> Self {
        self.highlight_config = config;
        self
    }

    /// Append a bundle. Drops any statistics built from the previous list.
    pub fn add(&mut self, bundle: CollectionBundle) {
        self.collection_bundles.push(bundle);
        self.statistics.take();
    }

    pub fn collection_bundles(&self) -> &[CollectionBundle] {
        &self.collection_bundles
    }

    pub fn collection_interval(&self) -> f64 {
        self.collection_interval
    }

    pub fn long_run_duration(&self) -> f64 {
        self.long_run_duration
    }

    pub fn long_collection_statistics(&self) -> &LongCollectionStatistics {
        self.statistics.get_or_init(|| {
            LongCollectionStatistics::from_bundles(
                &self.collection_bundles,
                self.collection_interval,
                self.long_run_duration,
            )
        })
    }

    /// Growth highlights over the run. Relationship growth is not part of it.
    pub fn validate(&self) -> ValidationResult {
        GrowthHighlighter::new(self.highlight_config.clone())
            .highlight_run(self.long_collection_statistics())
    }
}

impl fmt::Display for LongCollectionBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.long_collection_statistics(), f)
    }
}
