//! Error types for Tabula operations

use thiserror::Error;

/// Rank space errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RankError {
    #[error("Malformed rank {value:?}: {reason}")]
    Malformed { value: String, reason: String },

    #[error("No rank exists strictly between identical ranks {value}")]
    Identical { value: String },

    #[error("Ranks belong to different buckets: {left} and {right}")]
    BucketMismatch { left: String, right: String },
}

/// Validation errors for loaded column data.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Unknown static property: {value}")]
    UnknownStaticProp { value: String },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for all Tabula errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TabulaError {
    #[error("Rank error: {0}")]
    Rank(#[from] RankError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for Tabula operations.
pub type TabulaResult<T> = Result<T, TabulaError>;

// =============================================================================
// TESTS
// =============================================================================
