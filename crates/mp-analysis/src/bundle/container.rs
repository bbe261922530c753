//! Adapter container resource usage, sampled from the Docker stats API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::stats::{convert_bytes, LongRunStats};

/// One `GET /containers/{id}/stats?stream=false` document. Only the fields
/// used for the summary are decoded.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DockerStatsSample {
    pub cpu_stats: CpuStats,
    pub memory_stats: MemoryStats,
    pub networks: BTreeMap<String, NetworkStats>,
    pub blkio_stats: BlkioStats,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CpuStats {
    pub cpu_usage: CpuUsage,
    pub system_cpu_usage: u64,
    pub online_cpus: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CpuUsage {
    pub total_usage: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MemoryStats {
    pub usage: u64,
    pub limit: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NetworkStats {
    pub rx_bytes: u64,
    pub tx_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BlkioStats {
    pub io_service_bytes_recursive: Option<Vec<BlkioEntry>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BlkioEntry {
    pub op: String,
    pub value: u64,
}

impl DockerStatsSample {
    /// CPU usage since `previous`, scaled by online CPUs. Same formula as `docker stats`.
    pub fn cpu_percent_since(&self, previous: &DockerStatsSample) -> f64 {
        let cpu_delta = self.cpu_stats.cpu_usage.total_usage as f64
            - previous.cpu_stats.cpu_usage.total_usage as f64;
        let system_delta =
            self.cpu_stats.system_cpu_usage as f64 - previous.cpu_stats.system_cpu_usage as f64;
        if system_delta > 0.0 && cpu_delta > 0.0 {
            (cpu_delta / system_delta) * f64::from(self.cpu_stats.online_cpus) * 100.0
        } else {
            0.0
        }
    }

    /// `(read, write)` bytes summed over all interfaces.
    pub fn network_bytes(&self) -> (u64, u64) {
        self.networks.values().fold((0, 0), |(rx, tx), net| {
            (rx + net.rx_bytes, tx + net.tx_bytes)
        })
    }

    /// `(read, write)` bytes summed over all block devices.
    pub fn block_bytes(&self) -> (u64, u64) {
        let entries = self
            .blkio_stats
            .io_service_bytes_recursive
            .as_deref()
            .unwrap_or_default();
        entries.iter().fold((0, 0), |(read, write), entry| {
            match entry.op.to_ascii_lowercase().as_str() {
                "read" => (read + entry.value, write),
                "write" => (read, write + entry.value),
                _ => (read, write),
            }
        })
    }
}

/// Samples taken while one request was in flight.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContainerStats {
    pub cpu_percent_usage: Vec<f64>,
    pub memory_percent_usage: Vec<f64>,
    pub current_memory_usage: Vec<u64>,
    pub total_memory: u64,
    pub network_read: u64,
    pub network_write: u64,
    pub block_read: u64,
    pub block_write: u64,
    #[serde(skip)]
    previous: Option<DockerStatsSample>,
}

impl ContainerStats {
    /// Start tracking from a baseline sample taken before the request.
    pub fn new(initial: DockerStatsSample) -> Self {
        Self {
            previous: Some(initial),
            ..Self::default()
        }
    }

    pub fn add(&mut self, current: DockerStatsSample) {
        (self.block_read, self.block_write) = current.block_bytes();
        (self.network_read, self.network_write) = current.network_bytes();
        self.total_memory = current.memory_stats.limit;

        let usage = current.memory_stats.usage;
        self.current_memory_usage.push(usage);
        let memory_percent = if self.total_memory > 0 {
            usage as f64 / self.total_memory as f64 * 100.0
        } else {
            0.0
        };
        self.memory_percent_usage.push(memory_percent);

        let cpu_percent = self
            .previous
            .as_ref()
            .map_or(0.0, |previous| current.cpu_percent_since(previous));
        self.cpu_percent_usage.push(cpu_percent);

        self.previous = Some(current);
    }

    pub fn summary_headers() -> [&'static str; 5] {
        [
            "Avg CPU %",
            "Avg Memory Usage %",
            "Memory Limit",
            "Network I/O",
            "Block I/O",
        ]
    }

    /// Cells matching `summary_headers`.
    pub fn summary(&self) -> [String; 5] {
        let percent = |values: &[f64]| {
            LongRunStats::new(values, "%").map_or_else(|| "-".to_string(), |s| s.to_string())
        };
        [
            percent(&self.cpu_percent_usage),
            percent(&self.memory_percent_usage),
            convert_bytes(self.total_memory),
            format!(
                "{} / {}",
                convert_bytes(self.network_read),
                convert_bytes(self.network_write)
            ),
            format!(
                "{} / {}",
                convert_bytes(self.block_read),
                convert_bytes(self.block_write)
            ),
        ]
    }
}
