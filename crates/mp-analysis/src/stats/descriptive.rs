//! Descriptive statistics over per-object and per-cycle counts.

use std::fmt;

use statrs::statistics::{Data, Median, Statistics};

/// count (sum) / median / min / max / stddev of a sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Stats {
    pub data_points: usize,
    pub count: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation; NaN below three samples.
    pub stddev: f64,
    pub unit: String,
}

impl Stats {
    /// Returns `None` for an empty sample.
    pub fn new(values: &[f64], unit: &str) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let median = Data::new(values.to_vec()).median();
        let stddev = if values.len() > 2 {
            Statistics::std_dev(values.iter())
        } else {
            f64::NAN
        };

        Some(Self {
            data_points: values.len(),
            count: values.iter().sum(),
            median,
            min,
            max,
            stddev,
            unit: unit.to_string(),
        })
    }

    /// Convenience for integer counts.
    pub fn from_counts(counts: &[usize], unit: &str) -> Option<Self> {
        let values: Vec<f64> = counts.iter().map(|&c| c as f64).collect();
        Self::new(&values, unit)
    }

    fn is_trivial(&self) -> bool {
        self.data_points <= 1 || self.count == 0.0
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = &self.unit;
        if self.is_trivial() {
            write!(f, "{} {unit}", self.count)
        } else {
            write!(
                f,
                "{} {unit}({} {unit}/{} {unit}/{} {unit})",
                self.count, self.min, self.median, self.max
            )
        }
    }
}

/// `Stats` plus the average, for values sampled once per collection.
#[derive(Debug, Clone, PartialEq)]
pub struct LongRunStats {
    pub stats: Stats,
    pub average: f64,
}

impl LongRunStats {
    pub fn new(values: &[f64], unit: &str) -> Option<Self> {
        let stats = Stats::new(values, unit)?;
        let average = stats.count / stats.data_points as f64;
        Some(Self { stats, average })
    }

    pub fn from_counts(counts: &[usize], unit: &str) -> Option<Self> {
        let values: Vec<f64> = counts.iter().map(|&c| c as f64).collect();
        Self::new(&values, unit)
    }
}

impl fmt::Display for LongRunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.stats;
        let unit = &s.unit;
        if s.is_trivial() {
            write!(f, "{:.1} {unit}", self.average)
        } else {
            write!(
                f,
                "{:.1} {unit} ({:.1}{unit} / {:.1}{unit} / {:.1}{unit})",
                self.average, s.min, s.median, s.max
            )
        }
    }
}

const BYTE_UNITS: [&str; 9] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB", "ZiB", "YiB"];

/// Human readable byte count, e.g. `1.5 KiB`.
pub fn convert_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while unit < BYTE_UNITS.len() - 1 && value >= 1024.0 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.1} {}", BYTE_UNITS[unit])
    } else {
        format!("{rounded} {}", BYTE_UNITS[unit])
    }
}
