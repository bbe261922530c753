//! Running set-union tracker, one per object type and tracked dimension.

use std::hash::Hash;

use mp_core::FxHashSet;

use super::growth::growth_rate;

/// Cumulative distinct items seen across cycles.
///
/// `add` must be called once per cycle, in the order cycles happened:
/// growth is read from the first and last data points.
#[derive(Debug, Clone)]
pub struct UniqueObjectTypeStatistics<T> {
    running_collection: FxHashSet<T>,
    data_points: Vec<usize>,
    counts: Vec<usize>,
}

impl<T> Default for UniqueObjectTypeStatistics<T> {
    fn default() -> Self {
        Self {
            running_collection: FxHashSet::default(),
            data_points: Vec::new(),
            counts: Vec::new(),
        }
    }
}

impl<T: Eq + Hash> UniqueObjectTypeStatistics<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union this cycle's distinct items into the running set and record
    /// the cumulative distinct count plus the cycle's raw total.
    pub fn add<I>(&mut self, unique_items: I, total_items: usize)
    where
        I: IntoIterator<Item = T>,
    {
        self.running_collection.extend(unique_items);
        self.data_points.push(self.running_collection.len());
        self.counts.push(total_items);
    }

    /// Cumulative distinct count after each cycle. Non-decreasing.
    pub fn data_points(&self) -> &[usize] {
        &self.data_points
    }

    /// Raw per-cycle totals.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn running_collection(&self) -> &FxHashSet<T> {
        &self.running_collection
    }

    pub fn distinct_count(&self) -> usize {
        self.running_collection.len()
    }

    /// Compound growth per hour between the first and last cycle. 0 with no data.
    pub fn growth_rate(&self, duration_hours: f64) -> f64 {
        match (self.data_points.first(), self.data_points.last()) {
            (Some(&first), Some(&last)) => growth_rate(first as f64, last as f64, duration_hours),
            _ => 0.0,
        }
    }
}
