// src/error.rs
//! Unified error handling for the biosignal core
//!
//! Errors are only raised at construction and decoding boundaries. Metrics that
//! cannot be computed for a tick are not errors: the pure functions return `NaN`
//! and the session reports `None` for the affected metric.

use thiserror::Error;

/// Unified error type for the crate
#[derive(Debug, Error)]
pub enum SignalError {
    /// Invalid construction parameters (capacity, window, ranges)
    #[error("[CONFIG] Configuration error in {component}: {reason}")]
    Configuration {
        /// Component that rejected the parameter
        component: String,
        /// Human readable reason
        reason: String,
    },

    /// Structurally invalid input data (ragged matrices, unordered buckets)
    #[error("[DATA] Invalid {data_type}: {reason}")]
    InvalidData {
        /// Kind of data that was rejected
        data_type: String,
        /// Human readable reason
        reason: String,
    },

    /// Message envelope carries a schema version this crate does not speak
    #[error("[PROTOCOL] Unsupported message version {found} (supported: {supported})")]
    UnsupportedVersion {
        /// Version found in the envelope
        found: u32,
        /// Version this crate decodes
        supported: u32,
    },

    /// Message could not be decoded
    #[error("[PROTOCOL] Failed to decode message: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type alias for crate operations
pub type SignalResult<T> = Result<T, SignalError>;

/// Error builder for convenient error construction
pub struct SignalErrorBuilder {
    component: String,
}

impl SignalErrorBuilder {
    /// Start building an error attributed to `component`
    pub fn new(component: &str) -> Self {
        Self {
            component: component.to_string(),
        }
    }

    /// Configuration error for this component
    pub fn configuration(self, reason: &str) -> SignalError {
        SignalError::Configuration {
            component: self.component,
            reason: reason.to_string(),
        }
    }

    /// Invalid data error; the component name is used as the data type
    pub fn invalid_data(self, reason: &str) -> SignalError {
        SignalError::InvalidData {
            data_type: self.component,
            reason: reason.to_string(),
        }
    }
}
