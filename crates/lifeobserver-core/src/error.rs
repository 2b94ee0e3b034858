//! Core error types for lifeobserver-core.
//!
//! This module defines a comprehensive error hierarchy using thiserror
//! for better error handling and reporting across the library.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for lifeobserver-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// AI responder errors
    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The embedded database cannot be opened at all. Fatal to the
    /// application; nothing else can proceed without it.
    #[error("Storage unavailable at {path}: {message}")]
    Unavailable { path: PathBuf, message: String },

    /// A write (put/delete/clear/replace) was rejected or aborted.
    #[error("Write to '{collection}' failed: {source}")]
    Write {
        collection: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    /// A read failed for a reason other than absence (absence is `None`).
    #[error("Read from '{collection}' failed: {source}")]
    Read {
        collection: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    /// An explicit-keyed record is missing its key field, or the field
    /// holds a value that cannot serve as a key.
    #[error("Record for '{collection}' is missing key field '{key_field}'")]
    MissingKey {
        collection: &'static str,
        key_field: &'static str,
    },

    /// A stored record could not be decoded into its entity type.
    #[error("Record in '{collection}' is malformed: {source}")]
    Corrupt {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Schema migration failed.
    #[error("Schema migration failed: {0}")]
    MigrationFailed(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Validation errors. Rejected before any write reaches storage.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A required text field is empty
    #[error("'{field}' must not be empty")]
    EmptyField { field: &'static str },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: &'static str, message: String },
}

/// Errors from the external AI responder.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// Non-success HTTP status from the model API
    #[error("AI API error (HTTP {status}): {message}")]
    Http { status: u16, message: String },

    /// Response body did not have the expected shape
    #[error("AI response had an unexpected shape for provider '{provider}'")]
    MalformedResponse { provider: &'static str },

    /// The configured model name maps to no known provider
    #[error("Unsupported model: {0}")]
    UnsupportedModel(String),

    /// Transport failure (DNS, TLS, connection reset)
    #[error("AI request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// No API key available for the selected provider
    #[error("No API key configured for model '{0}'")]
    MissingApiKey(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
