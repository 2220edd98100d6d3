//! Error types for the Redfish provider
//!
//! Provides structured error types for bus access, table lookups,
//! compound-field decoding, configuration and snapshot loading.

use thiserror::Error;

/// Unified error type for the provider
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Configuration error: {0}")]
    Configuration(String),

    // =========================================================================
    // Bus Errors
    // =========================================================================
    #[error("Bus service unavailable: {service} - {reason}")]
    BusUnavailable { service: String, reason: String },

    #[error("Bus call failed: {service} {method}: {reason}")]
    BusCall {
        service: String,
        method: String,
        reason: String,
    },

    #[error("Unexpected reply from {method}: {value}")]
    UnexpectedReply { method: String, value: String },

    // =========================================================================
    // Lookup / Decode Errors
    // =========================================================================
    #[error("Unknown {table} key: {key}")]
    UnknownKey { table: &'static str, key: String },

    #[error("Malformed compound field {field}: {value:?}")]
    MalformedCompoundField { field: String, value: String },

    // =========================================================================
    // Parse Errors
    // =========================================================================
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// How far an error reaches when it occurs while building a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorScope {
    /// Abort the whole request
    Request,
    /// Confined to a single entity; siblings keep being processed
    Entity,
}

impl Error {
    /// Create an unknown-key error for a lookup table
    pub fn unknown_key(table: &'static str, key: impl Into<String>) -> Self {
        Error::UnknownKey {
            table,
            key: key.into(),
        }
    }

    /// Determine how far this error propagates
    pub fn scope(&self) -> ErrorScope {
        match self {
            Error::UnknownKey { .. }
            | Error::MalformedCompoundField { .. }
            | Error::UnexpectedReply { .. } => ErrorScope::Entity,

            _ => ErrorScope::Request,
        }
    }
}

/// Result type alias for the provider
pub type Result<T> = std::result::Result<T, Error>;
