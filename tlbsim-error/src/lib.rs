//! Unified error handling for the TLB simulator crates
//!
//! Three kinds of failure: configuration problems detected
//! before a simulation starts, workload problems detected while building an
//! address stream, and I/O around the harness. Submitting an address to a
//! validly constructed engine never fails.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error for every simulator component
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimError {
    #[error("Configuration error: {message}")]
    Configuration {
        source: ConfigError,
        message: String,
    },

    #[error("Workload error: {message}")]
    Workload {
        source: WorkloadError,
        message: String,
    },

    #[error("I/O error: {message}")]
    Io { message: String },
}

/// Configuration errors, raised at construction time
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigError {
    #[error("TLB capacity must be at least one entry")]
    ZeroCapacity,

    #[error("Page size must be greater than zero bytes")]
    ZeroPageSize,

    #[error("Matrix dimension must be greater than zero")]
    ZeroMatrixDim,

    #[error("Element size must be greater than zero bytes")]
    ZeroElementSize,

    #[error("Stride must be greater than zero bytes")]
    ZeroStride,

    #[error("Configuration parsing error: {0}")]
    Parse(String),
}

/// Workload errors, raised while laying out an address stream
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkloadError {
    #[error("Address span of {span:#x} bytes from base {base:#x} overflows the 64-bit address space")]
    AddressOverflow { base: u64, span: u128 },
}

/// Result type alias for convenience
pub type SimResult<T> = Result<T, SimError>;

impl From<ConfigError> for SimError {
    fn from(source: ConfigError) -> Self {
        let message = source.to_string();
        SimError::Configuration { source, message }
    }
}

impl From<WorkloadError> for SimError {
    fn from(source: WorkloadError) -> Self {
        let message = source.to_string();
        SimError::Workload { source, message }
    }
}

impl From<std::io::Error> for SimError {
    fn from(err: std::io::Error) -> Self {
        SimError::Io {
            message: err.to_string(),
        }
    }
}

impl SimError {
    /// Configuration and workload errors are caller mistakes; I/O may be retried
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SimError::Configuration { .. } | SimError::Workload { .. }
        )
    }
}
