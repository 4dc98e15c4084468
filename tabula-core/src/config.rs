//! Configuration types

use crate::{ConfigError, RankBucket, TabulaError, TabulaResult, RANK_HEADER_LEN};
use serde::{Deserialize, Serialize};

/// Table-view configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TableViewConfig {
    /// Length of the random token at the front of generated column ids.
    pub token_length: usize,
    /// Bucket used for fresh and rebalanced ranks.
    pub bucket: RankBucket,
    /// Rank length past which a rebalance is advisable.
    pub rebalance_threshold: usize,
}

impl Default for TableViewConfig {
    fn default() -> Self {
        Self {
            token_length: 12,
            bucket: RankBucket::Zero,
            rebalance_threshold: 32,
        }
    }
}

impl TableViewConfig {
    pub const MIN_TOKEN_LENGTH: usize = 4;
    pub const MAX_TOKEN_LENGTH: usize = 32;

    /// Create from environment variables with fallback to defaults.
    ///
    /// Environment variables:
    /// - `TABULA_TOKEN_LENGTH`: Random id token length (default: 12)
    /// - `TABULA_RANK_BUCKET`: Rank bucket, 0-2 (default: 0)
    /// - `TABULA_REBALANCE_THRESHOLD`: Rank length that triggers a rebalance hint (default: 32)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            token_length: env_parse("TABULA_TOKEN_LENGTH").unwrap_or(defaults.token_length),
            bucket: env_parse::<u8>("TABULA_RANK_BUCKET")
                .and_then(|b| RankBucket::try_from(b).ok())
                .unwrap_or(defaults.bucket),
            rebalance_threshold: env_parse("TABULA_REBALANCE_THRESHOLD")
                .unwrap_or(defaults.rebalance_threshold),
        }
    }

    /// Validate the configuration.
    ///
    /// Validates:
    /// - token_length in [MIN_TOKEN_LENGTH, MAX_TOKEN_LENGTH]
    /// - rebalance_threshold leaves room for at least one fraction digit
    pub fn validate(&self) -> TabulaResult<()> {
        if self.token_length < Self::MIN_TOKEN_LENGTH || self.token_length > Self::MAX_TOKEN_LENGTH
        {
            return Err(TabulaError::Config(ConfigError::InvalidValue {
                field: "token_length".to_string(),
                value: self.token_length.to_string(),
                reason: format!(
                    "token_length must be between {} and {}",
                    Self::MIN_TOKEN_LENGTH,
                    Self::MAX_TOKEN_LENGTH
                ),
            }));
        }

        if self.rebalance_threshold <= RANK_HEADER_LEN {
            return Err(TabulaError::Config(ConfigError::InvalidValue {
                field: "rebalance_threshold".to_string(),
                value: self.rebalance_threshold.to_string(),
                reason: format!("rebalance_threshold must exceed {}", RANK_HEADER_LEN),
            }));
        }

        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring unparseable environment override");
            None
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
