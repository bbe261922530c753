//! One recorded collect request/response.

use std::cell::OnceCell;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::container::ContainerStats;
use crate::collection::CollectionStatistics;

/// HTTP status line of a collect response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseStatus {
    pub status_code: u16,
    pub reason_phrase: String,
}

impl ResponseStatus {
    pub fn new(status_code: u16, reason_phrase: impl Into<String>) -> Self {
        Self {
            status_code,
            reason_phrase: reason_phrase.into(),
        }
    }

    pub fn ok() -> Self {
        Self::new(200, "OK")
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

impl Default for ResponseStatus {
    fn default() -> Self {
        Self::ok()
    }
}

/// A single collection as recorded by the harness.
#[derive(Debug, Clone)]
pub struct CollectionBundle {
    pub collection_number: usize,
    pub status: ResponseStatus,
    pub body: String,
    /// Wall-clock seconds the request took.
    pub duration: f64,
    pub container_statistics: Option<ContainerStats>,
    statistics: OnceCell<Option<CollectionStatistics>>,
}

impl CollectionBundle {
    pub fn new(
        collection_number: usize,
        status: ResponseStatus,
        body: impl Into<String>,
        duration: f64,
    ) -> Self {
        Self {
            collection_number,
            status,
            body: body.into(),
            duration,
            container_statistics: None,
            statistics: OnceCell::new(),
        }
    }

    pub fn with_container_statistics(mut self, stats: ContainerStats) -> Self {
        self.container_statistics = Some(stats);
        self
    }

    /// Non-2xx status, or a body carrying an `errorMessage`.
    pub fn failed(&self) -> bool {
        !self.status.is_success() || self.body.contains("errorMessage")
    }

    pub fn failure_message(&self) -> String {
        if !self.status.is_success() {
            return format!(
                "{} {}\n{}",
                self.status.status_code,
                self.status.reason_phrase,
                self.body.trim_matches('"')
            );
        }
        if self.body.contains("errorMessage") {
            return serde_json::from_str::<serde_json::Value>(&self.body)
                .ok()
                .and_then(|value| {
                    value
                        .get("errorMessage")
                        .and_then(serde_json::Value::as_str)
                        .map(str::to_owned)
                })
                .unwrap_or_default();
        }
        String::new()
    }

    /// Parsed statistics, computed on first access.
    ///
    /// `None` for a failed collection or a body that does not decode.
    pub fn collection_statistics(&self) -> Option<&CollectionStatistics> {
        self.statistics
            .get_or_init(|| {
                if self.failed() {
                    return None;
                }
                CollectionStatistics::from_json(&self.body)
                    .map_err(|e| {
                        warn!(
                            collection = self.collection_number,
                            error = %e,
                            "Collect response body could not be decoded"
                        );
                    })
                    .ok()
            })
            .as_ref()
    }
}
