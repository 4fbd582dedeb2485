//! Core types for pgtune

use crate::error::{Result, TuneError};
use crate::size::Kilobytes;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Expected query pattern of the database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum WorkloadType {
    /// Developer workstation or small desktop application
    #[serde(rename = "desktop")]
    Desktop,
    /// Data warehouse: few, large analytical queries
    #[serde(rename = "dw")]
    DataWarehouse,
    /// Mixed analytical and transactional load
    #[serde(rename = "mixed")]
    Mixed,
    /// Online transaction processing
    #[serde(rename = "oltp")]
    Oltp,
    /// Web application backend
    #[default]
    #[serde(rename = "web")]
    Web,
}

impl WorkloadType {
    /// Every workload type, in table order
    pub const ALL: [WorkloadType; 5] = [
        WorkloadType::Desktop,
        WorkloadType::DataWarehouse,
        WorkloadType::Mixed,
        WorkloadType::Oltp,
        WorkloadType::Web,
    ];

    /// Name accepted on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkloadType::Desktop => "desktop",
            WorkloadType::DataWarehouse => "dw",
            WorkloadType::Mixed => "mixed",
            WorkloadType::Oltp => "oltp",
            WorkloadType::Web => "web",
        }
    }
}

impl fmt::Display for WorkloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkloadType {
    type Err = TuneError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "desktop" => Ok(WorkloadType::Desktop),
            "dw" | "data-warehouse" | "datawarehouse" => Ok(WorkloadType::DataWarehouse),
            "mixed" => Ok(WorkloadType::Mixed),
            "oltp" => Ok(WorkloadType::Oltp),
            "web" => Ok(WorkloadType::Web),
            _ => Err(TuneError::InvalidWorkloadType(s.to_string())),
        }
    }
}

/// Underlying data storage medium
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    /// Spinning disks
    Hdd,
    /// Storage area network
    San,
    /// Solid state drives
    #[default]
    Ssd,
}

impl StorageType {
    /// Every storage type, in table order
    pub const ALL: [StorageType; 3] = [StorageType::Hdd, StorageType::San, StorageType::Ssd];

    /// Name accepted on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageType::Hdd => "hdd",
            StorageType::San => "san",
            StorageType::Ssd => "ssd",
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageType {
    type Err = TuneError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hdd" => Ok(StorageType::Hdd),
            "san" => Ok(StorageType::San),
            "ssd" => Ok(StorageType::Ssd),
            _ => Err(TuneError::InvalidStorageType(s.to_string())),
        }
    }
}

/// Unit of the total memory amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum MemoryUnit {
    #[serde(rename = "KB")]
    Kb,
    #[serde(rename = "MB")]
    Mb,
    #[default]
    #[serde(rename = "GB")]
    Gb,
    #[serde(rename = "TB")]
    Tb,
}

impl MemoryUnit {
    /// Number of bytes in one unit
    pub const fn bytes(&self) -> u64 {
        match self {
            MemoryUnit::Kb => 1024,
            MemoryUnit::Mb => 1024 * 1024,
            MemoryUnit::Gb => 1024 * 1024 * 1024,
            MemoryUnit::Tb => 1024 * 1024 * 1024 * 1024,
        }
    }

    /// Number of kilobytes in one unit
    pub const fn kilobytes(&self) -> u64 {
        self.bytes() / 1024
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryUnit::Kb => "KB",
            MemoryUnit::Mb => "MB",
            MemoryUnit::Gb => "GB",
            MemoryUnit::Tb => "TB",
        }
    }
}

impl fmt::Display for MemoryUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemoryUnit {
    type Err = TuneError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "KB" => Ok(MemoryUnit::Kb),
            "MB" => Ok(MemoryUnit::Mb),
            "GB" => Ok(MemoryUnit::Gb),
            "TB" => Ok(MemoryUnit::Tb),
            _ => Err(TuneError::InvalidMemoryUnit(s.to_string())),
        }
    }
}

/// Deserialize through `FromStr` so serde accepts the same names as the CLI
macro_rules! deserialize_from_str {
    ($($ty:ty),*) => {$(
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(de::Error::custom)
            }
        }
    )*};
}

deserialize_from_str!(WorkloadType, StorageType, MemoryUnit);

/// huge_pages setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HugePages {
    Try,
    Off,
}

impl fmt::Display for HugePages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HugePages::Try => f.write_str("try"),
            HugePages::Off => f.write_str("off"),
        }
    }
}

/// Hardware and workload description the settings are derived from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputParameters {
    /// Explicit max_connections; 0 derives it from the workload type
    pub connections: u32,
    /// CPUs PostgreSQL can use (threads per core * cores per socket * sockets)
    pub cpus: u32,
    /// Workload (db-type)
    pub workload: WorkloadType,
    /// PostgreSQL version, informational only
    pub db_version: String,
    /// Storage medium (hd-type)
    pub storage: StorageType,
    /// Memory PostgreSQL can use, in `memory_unit`s
    pub total_memory: u64,
    /// Unit of `total_memory`
    pub memory_unit: MemoryUnit,
}

impl Default for InputParameters {
    fn default() -> Self {
        Self {
            connections: 0,
            cpus: 0,
            workload: WorkloadType::default(),
            db_version: crate::config::DEFAULT_DB_VERSION.to_string(),
            storage: StorageType::default(),
            total_memory: 0,
            memory_unit: MemoryUnit::default(),
        }
    }
}

impl InputParameters {
    pub fn with_connections(mut self, connections: u32) -> Self {
        self.connections = connections;
        self
    }

    pub fn with_cpus(mut self, cpus: u32) -> Self {
        self.cpus = cpus;
        self
    }

    pub fn with_workload(mut self, workload: WorkloadType) -> Self {
        self.workload = workload;
        self
    }

    pub fn with_db_version(mut self, version: impl Into<String>) -> Self {
        self.db_version = version.into();
        self
    }

    pub fn with_storage(mut self, storage: StorageType) -> Self {
        self.storage = storage;
        self
    }

    pub fn with_total_memory(mut self, amount: u64, unit: MemoryUnit) -> Self {
        self.total_memory = amount;
        self.memory_unit = unit;
        self
    }

    /// Total memory in kilobytes (saturates instead of overflowing)
    pub fn total_memory_kb(&self) -> u64 {
        self.total_memory.saturating_mul(self.memory_unit.kilobytes())
    }

    /// Reject input the calculator cannot meaningfully tune for.
    ///
    /// Zero memory and zero CPUs are accepted.
    pub fn validate(&self) -> Result<()> {
        if self.total_memory.checked_mul(self.memory_unit.bytes()).is_none() {
            return Err(TuneError::MemoryOverflow {
                amount: self.total_memory,
                unit: self.memory_unit.to_string(),
            });
        }
        if self.db_version.trim().is_empty() {
            return Err(TuneError::InvalidInput("DB version must not be empty".into()));
        }
        Ok(())
    }
}

/// A single rendered `name = value` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    pub name: &'static str,
    pub value: String,
}

impl Setting {
    fn new(name: &'static str, value: impl fmt::Display) -> Self {
        Self {
            name,
            value: value.to_string(),
        }
    }
}

/// Recommended PostgreSQL settings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputSettings {
    pub checkpoint_completion_target: f64,
    pub default_statistics_target: u32,
    pub effective_cache_size: Kilobytes,
    pub effective_io_concurrency: u32,
    pub huge_pages: HugePages,
    pub maintenance_work_mem: Kilobytes,
    pub max_connections: u32,
    pub max_parallel_workers: u32,
    pub max_wal_size: Kilobytes,
    pub min_wal_size: Kilobytes,
    pub random_page_cost: f64,
    pub shared_buffers: Kilobytes,
    pub wal_buffers: Kilobytes,
    pub work_mem: Kilobytes,
}

impl OutputSettings {
    /// All settings in postgresql.conf order
    pub fn entries(&self) -> Vec<Setting> {
        vec![
            Setting::new("checkpoint_completion_target", self.checkpoint_completion_target),
            Setting::new("default_statistics_target", self.default_statistics_target),
            Setting::new("effective_cache_size", self.effective_cache_size),
            Setting::new("effective_io_concurrency", self.effective_io_concurrency),
            Setting::new("huge_pages", self.huge_pages),
            Setting::new("maintenance_work_mem", self.maintenance_work_mem),
            Setting::new("max_connections", self.max_connections),
            Setting::new("max_parallel_workers", self.max_parallel_workers),
            Setting::new("max_wal_size", self.max_wal_size),
            Setting::new("min_wal_size", self.min_wal_size),
            Setting::new("random_page_cost", self.random_page_cost),
            Setting::new("shared_buffers", self.shared_buffers),
            Setting::new("wal_buffers", self.wal_buffers),
            Setting::new("work_mem", self.work_mem),
        ]
    }

    /// Rendered value of a setting by its PostgreSQL name
    pub fn get(&self, name: &str) -> Option<String> {
        self.entries()
            .into_iter()
            .find(|s| s.name == name)
            .map(|s| s.value)
    }
}
