//! Error types for pgtune

use thiserror::Error;

/// Result type alias for pgtune operations
pub type Result<T> = std::result::Result<T, TuneError>;

/// pgtune error types
#[derive(Error, Debug)]
pub enum TuneError {
    /// Unknown workload (db-type) name
    #[error("Invalid DB type: {0} (expected desktop, dw, mixed, oltp or web)")]
    InvalidWorkloadType(String),

    /// Unknown storage (hd-type) name
    #[error("Invalid data storage type: {0} (expected hdd, san or ssd)")]
    InvalidStorageType(String),

    /// Unknown memory unit
    #[error("Invalid memory unit: {0} (expected KB, MB, GB or TB)")]
    InvalidMemoryUnit(String),

    /// Unknown output format
    #[error("Invalid output format: {0} (expected conf, alter-system or json)")]
    InvalidOutputFormat(String),

    /// Input that parsed but cannot be tuned for
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Total memory does not fit in 64 bits once converted to bytes
    #[error("Total memory too large: {amount} {unit}")]
    MemoryOverflow { amount: u64, unit: String },

    /// JSON rendering failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TuneError {
    /// Check if error was caused by user-supplied input
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            TuneError::InvalidWorkloadType(_)
                | TuneError::InvalidStorageType(_)
                | TuneError::InvalidMemoryUnit(_)
                | TuneError::InvalidOutputFormat(_)
                | TuneError::InvalidInput(_)
                | TuneError::MemoryOverflow { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_classification() {
        assert!(TuneError::InvalidWorkloadType("batch".into()).is_input_error());
        assert!(TuneError::MemoryOverflow {
            amount: u64::MAX,
            unit: "TB".into()
        }
        .is_input_error());
        assert!(!TuneError::Config("bad addr".into()).is_input_error());
    }

    #[test]
    fn test_error_messages() {
        let err = TuneError::InvalidStorageType("nvme".into());
        assert_eq!(
            err.to_string(),
            "Invalid data storage type: nvme (expected hdd, san or ssd)"
        );
    }
}
