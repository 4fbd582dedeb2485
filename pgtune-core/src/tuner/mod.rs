//! Settings calculator
//!
//! Maps [`InputParameters`] to [`OutputSettings`] through the fixed tables in
//! [`tables`] and a handful of memory formulas. All quantities are in KB and
//! every division truncates.
//!
//! Key functions:
//! - `compute()`: full derivation of every setting
//! - `wal_buffers()`: 3% of shared_buffers, capped and floored
//! - `work_mem()`: per-operation memory left after shared_buffers

pub mod tables;

use crate::config::{
    CHECKPOINT_COMPLETION_TARGET, HUGE_PAGES_THRESHOLD_KB, MAINTENANCE_WORK_MEM_LIMIT_KB,
    WAL_BUFFERS_MAX_KB, WAL_BUFFERS_MIN_KB, WAL_BUFFERS_NEAR_MAX_KB, WORK_MEM_MIN_KB,
};
use crate::size::Kilobytes;
use crate::types::{HugePages, InputParameters, OutputSettings, WorkloadType};
use tracing::debug;

/// Compute recommended settings for the given input.
///
/// Total over every input: zero memory, zero CPUs and zero connections all
/// produce a complete record.
pub fn compute(input: &InputParameters) -> OutputSettings {
    let memory_kb = input.total_memory_kb();
    let workload = input.workload;

    let max_connections = max_connections(input.connections, workload);
    let shared_buffers = shared_buffers(memory_kb, workload);
    let wal_buffers = wal_buffers(shared_buffers);
    let work_mem = work_mem(memory_kb, shared_buffers, max_connections, input.cpus, workload);

    let settings = OutputSettings {
        checkpoint_completion_target: CHECKPOINT_COMPLETION_TARGET,
        default_statistics_target: tables::default_statistics_target(workload),
        effective_cache_size: Kilobytes(effective_cache_size(memory_kb, workload)),
        effective_io_concurrency: tables::effective_io_concurrency(input.storage),
        huge_pages: huge_pages(memory_kb),
        maintenance_work_mem: Kilobytes(maintenance_work_mem(memory_kb, workload)),
        max_connections,
        max_parallel_workers: input.cpus,
        max_wal_size: tables::max_wal_size(workload),
        min_wal_size: tables::min_wal_size(workload),
        random_page_cost: tables::random_page_cost(input.storage),
        shared_buffers: Kilobytes(shared_buffers),
        wal_buffers: Kilobytes(wal_buffers),
        work_mem: Kilobytes(work_mem),
    };

    debug!(
        workload = %workload,
        storage = %input.storage,
        memory_kb,
        max_connections,
        shared_buffers_kb = shared_buffers,
        work_mem_kb = work_mem,
        "computed settings"
    );

    settings
}

/// `memory_kb * num / den` without overflowing the intermediate product
fn scale(memory_kb: u64, num: u64, den: u64) -> u64 {
    (memory_kb as u128 * num as u128 / den as u128) as u64
}

pub fn effective_cache_size(memory_kb: u64, workload: WorkloadType) -> u64 {
    match workload {
        WorkloadType::Desktop => memory_kb / 4,
        _ => scale(memory_kb, 3, 4),
    }
}

/// Explicit connection count, or the workload default when it is 0
pub fn max_connections(connections: u32, workload: WorkloadType) -> u32 {
    if connections > 0 {
        connections
    } else {
        tables::default_connections(workload)
    }
}

pub fn huge_pages(memory_kb: u64) -> HugePages {
    if memory_kb >= HUGE_PAGES_THRESHOLD_KB {
        HugePages::Try
    } else {
        HugePages::Off
    }
}

/// Capped at 2GB on servers with lots of memory
pub fn maintenance_work_mem(memory_kb: u64, workload: WorkloadType) -> u64 {
    let value = match workload {
        WorkloadType::DataWarehouse => memory_kb / 8,
        _ => memory_kb / 16,
    };
    value.min(MAINTENANCE_WORK_MEM_LIMIT_KB)
}

pub fn shared_buffers(memory_kb: u64, workload: WorkloadType) -> u64 {
    match workload {
        WorkloadType::Desktop => memory_kb / 16,
        _ => memory_kb / 4,
    }
}

/// wal_buffers auto-tuning: 3% of shared_buffers, at most 16MB.
///
/// Values between 14MB and 16MB are raised to 16MB and anything under 32KB
/// is raised to 32KB. The cap is applied before the near-cap check.
pub fn wal_buffers(shared_buffers_kb: u64) -> u64 {
    let mut value = scale(shared_buffers_kb, 3, 100);
    if value > WAL_BUFFERS_MAX_KB {
        value = WAL_BUFFERS_MAX_KB;
    }
    if value > WAL_BUFFERS_NEAR_MAX_KB && value < WAL_BUFFERS_MAX_KB {
        value = WAL_BUFFERS_MAX_KB;
    }
    if value < WAL_BUFFERS_MIN_KB {
        value = WAL_BUFFERS_MIN_KB;
    }
    value
}

/// Parallel workers per gather assumed when sharing work_mem
pub fn work_mem_base(cpus: u32) -> u64 {
    if cpus >= 2 {
        (cpus / 2) as u64
    } else {
        1
    }
}

/// work_mem: `((RAM - shared_buffers) / (max_connections * 3)) / workers`,
/// scaled down per workload and floored at 64KB.
///
/// Sorts and hashes can each claim work_mem several times per query, so
/// the budget assumes three allocations per connection.
///
/// `max_connections` must be non-zero; [`max_connections`] guarantees this
/// for every workload.
pub fn work_mem(
    memory_kb: u64,
    shared_buffers_kb: u64,
    max_connections: u32,
    cpus: u32,
    workload: WorkloadType,
) -> u64 {
    let available = memory_kb.saturating_sub(shared_buffers_kb);
    let per_connection = available / (max_connections as u64 * 3);
    let value = per_connection / work_mem_base(cpus);

    let result = match workload {
        WorkloadType::Desktop => value / 6,
        WorkloadType::DataWarehouse | WorkloadType::Mixed => value / 2,
        WorkloadType::Oltp | WorkloadType::Web => value,
    };
    result.max(WORK_MEM_MIN_KB)
}
