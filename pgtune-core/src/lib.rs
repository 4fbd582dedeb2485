//! pgtune Core - PostgreSQL Configuration Calculator
//!
//! Derives recommended `postgresql.conf` settings from a small description
//! of the host and its workload:
//! - CPU count and total memory available to PostgreSQL
//! - Storage medium (HDD, SAN, SSD)
//! - Expected workload (desktop, data warehouse, mixed, OLTP, web)
//!
//! # Architecture
//!
//! The crate is a pure calculator with no I/O:
//!
//! - **Types**: validated [`InputParameters`] and the derived [`OutputSettings`]
//! - **Tuner**: table lookups and arithmetic mapping one to the other
//! - **Size**: kilobyte quantities rendered with PostgreSQL unit suffixes
//! - **Render**: `postgresql.conf`, `ALTER SYSTEM` and JSON output

pub mod render;
pub mod size;
pub mod tuner;

mod error;
mod types;

pub use error::{Result, TuneError};
pub use size::Kilobytes;
pub use tuner::compute;
pub use types::*;

/// pgtune version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration values
pub mod config {
    /// Database version echoed in the header when none is given
    pub const DEFAULT_DB_VERSION: &str = "15";

    /// Operating system reported in the rendered header
    pub const OS_TYPE: &str = "Linux";

    /// Fixed checkpoint_completion_target
    pub const CHECKPOINT_COMPLETION_TARGET: f64 = 0.9;

    /// Memory at or above which huge pages are tried (32GB, in KB)
    pub const HUGE_PAGES_THRESHOLD_KB: u64 = 32 * 1024 * 1024;

    /// Upper bound for maintenance_work_mem (2GB, in KB)
    pub const MAINTENANCE_WORK_MEM_LIMIT_KB: u64 = 2 * 1024 * 1024;

    /// Upper bound for wal_buffers (16MB, in KB)
    pub const WAL_BUFFERS_MAX_KB: u64 = 16 * 1024;

    /// wal_buffers above this snap up to the maximum (14MB, in KB)
    pub const WAL_BUFFERS_NEAR_MAX_KB: u64 = 14 * 1024;

    /// Lower bound for wal_buffers (KB)
    pub const WAL_BUFFERS_MIN_KB: u64 = 32;

    /// Lower bound for work_mem (KB)
    pub const WORK_MEM_MIN_KB: u64 = 64;
}
