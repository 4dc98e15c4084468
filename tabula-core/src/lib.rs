//! Tabula Core - Shared Types
//!
//! Rank space, identity tokens, configuration and errors. Every other Tabula
//! crate depends on this one; it performs no I/O.

pub mod config;
pub mod error;
pub mod identity;
pub mod rank;

pub use config::TableViewConfig;
pub use error::{ConfigError, RankError, TabulaError, TabulaResult, ValidationError};
pub use identity::{RandomTokenGenerator, TokenGenerator};
pub use rank::{LexoRank, RankBucket, RANK_HEADER_LEN};
