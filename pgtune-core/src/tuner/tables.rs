//! Fixed per-workload and per-storage lookup tables

use crate::size::Kilobytes;
use crate::types::{StorageType, WorkloadType};

pub fn default_statistics_target(workload: WorkloadType) -> u32 {
    match workload {
        WorkloadType::DataWarehouse => 500,
        WorkloadType::Desktop | WorkloadType::Mixed | WorkloadType::Oltp | WorkloadType::Web => {
            100
        }
    }
}

/// max_connections used when none is given explicitly
pub fn default_connections(workload: WorkloadType) -> u32 {
    match workload {
        WorkloadType::Desktop => 20,
        WorkloadType::DataWarehouse => 40,
        WorkloadType::Mixed => 100,
        WorkloadType::Oltp => 300,
        WorkloadType::Web => 200,
    }
}

pub fn min_wal_size(workload: WorkloadType) -> Kilobytes {
    match workload {
        WorkloadType::Desktop => Kilobytes::from_megabytes(100),
        WorkloadType::DataWarehouse => Kilobytes::from_megabytes(4096),
        WorkloadType::Mixed => Kilobytes::from_megabytes(1024),
        WorkloadType::Oltp => Kilobytes::from_megabytes(2048),
        WorkloadType::Web => Kilobytes::from_megabytes(1024),
    }
}

pub fn max_wal_size(workload: WorkloadType) -> Kilobytes {
    match workload {
        WorkloadType::Desktop => Kilobytes::from_megabytes(2048),
        WorkloadType::DataWarehouse => Kilobytes::from_megabytes(16384),
        WorkloadType::Mixed => Kilobytes::from_megabytes(4096),
        WorkloadType::Oltp => Kilobytes::from_megabytes(8192),
        WorkloadType::Web => Kilobytes::from_megabytes(4096),
    }
}

pub fn effective_io_concurrency(storage: StorageType) -> u32 {
    match storage {
        StorageType::Hdd => 2,
        StorageType::San => 300,
        StorageType::Ssd => 200,
    }
}

pub fn random_page_cost(storage: StorageType) -> f64 {
    match storage {
        StorageType::Hdd => 4.0,
        StorageType::San | StorageType::Ssd => 1.1,
    }
}
