//! Tabula Test Utilities
//!
//! Centralized test infrastructure for the Tabula workspace:
//! - Deterministic token generators
//! - Proptest generators for ranks and columns
//! - Test fixtures for common column sets
//! - Custom assertions for ordering invariants

// Re-export core types for convenience
pub use tabula_core::{
    ConfigError, LexoRank, RankBucket, RankError, TableViewConfig, TabulaError, TabulaResult,
    TokenGenerator, ValidationError,
};
pub use tabula_table::{
    Column, ColumnKind, ColumnMap, ColumnMove, Placement, RankedColumnStore, StaticPropType,
    ViewTableData,
};

use std::sync::atomic::{AtomicU64, Ordering};

// ============================================================================
// DETERMINISTIC TOKENS
// ============================================================================

/// Token generator yielding `<prefix>0`, `<prefix>1`, ...
#[derive(Debug)]
pub struct SequentialTokenGenerator {
    prefix: String,
    next: AtomicU64,
}

impl SequentialTokenGenerator {
    pub fn new() -> Self {
        Self::with_prefix("tok")
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(0),
        }
    }
}

impl Default for SequentialTokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenGenerator for SequentialTokenGenerator {
    fn next_token(&self) -> String {
        format!("{}{}", self.prefix, self.next.fetch_add(1, Ordering::SeqCst))
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for Tabula types.

    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    /// Generate a rank in bucket 0, below the maximum, with up to eight fraction digits.
    pub fn arb_rank() -> impl Strategy<Value = LexoRank> {
        "[0-9a-y][0-9a-z]{5}[0-9a-z]{0,8}".prop_map(|digits| {
            LexoRank::parse(&format!("0|{}:{}", &digits[..6], &digits[6..]))
                .expect("generated rank is well formed")
        })
    }

    /// Generate a StaticPropType variant.
    pub fn arb_static_prop() -> impl Strategy<Value = StaticPropType> {
        prop::sample::select(StaticPropType::ALL.to_vec())
    }

    /// Generate either column kind.
    pub fn arb_column_kind() -> impl Strategy<Value = ColumnKind> {
        prop_oneof![
            arb_static_prop().prop_map(|prop| ColumnKind::Static { prop }),
            (
                prop::sample::select(vec!["string", "number", "date", "user", "status", "json"]),
                prop::option::of("[a-z]{3,8}"),
            )
                .prop_map(|(prop_type, sub_type)| ColumnKind::Property {
                    prop_type: prop_type.to_string(),
                    sub_type,
                }),
        ]
    }

    /// Generate a display name, delimiter included now and then.
    pub fn arb_column_name() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z0-9 :]{0,15}"
    }

    /// Generate a column with the given id; roughly one in eight is unranked.
    pub fn arb_column(id: String) -> impl Strategy<Value = Column> {
        (
            arb_column_name(),
            arb_column_kind(),
            prop::option::weighted(0.875, arb_rank()),
        )
            .prop_map(move |(name, kind, order)| Column {
                id: id.clone(),
                name,
                order,
                kind,
            })
    }

    /// Generate a column map of up to `max` columns with unique ids.
    pub fn arb_column_map(max: usize) -> impl Strategy<Value = ColumnMap> {
        prop::collection::btree_set("[a-z0-9]{6}", 0..=max).prop_flat_map(|ids: BTreeSet<String>| {
            ids.into_iter()
                .map(arb_column)
                .collect::<Vec<_>>()
                .prop_map(|columns| {
                    columns
                        .into_iter()
                        .map(|column| (column.id.clone(), column))
                        .collect::<ColumnMap>()
                })
        })
    }

    /// Generate a non-empty column map whose ranks are all present and distinct.
    pub fn arb_ranked_column_map(max: usize) -> impl Strategy<Value = ColumnMap> {
        arb_column_map(max.max(1))
            .prop_filter("non-empty", |columns| !columns.is_empty())
            .prop_map(|columns| {
                let mut seen = BTreeSet::new();
                columns
                    .into_iter()
                    .map(|(id, mut column)| {
                        let mut order = column.order_or_middle();
                        while !seen.insert(order.clone()) {
                            order = LexoRank::max()
                                .between(&order)
                                .expect("rank below max leaves room");
                        }
                        column.order = Some(order);
                        (id, column)
                    })
                    .collect()
            })
    }

    /// Generate a valid TableViewConfig.
    pub fn arb_valid_config() -> impl Strategy<Value = TableViewConfig> {
        (
            TableViewConfig::MIN_TOKEN_LENGTH..=TableViewConfig::MAX_TOKEN_LENGTH,
            prop_oneof![
                Just(RankBucket::Zero),
                Just(RankBucket::One),
                Just(RankBucket::Two),
            ],
            10usize..64,
        )
            .prop_map(|(token_length, bucket, rebalance_threshold)| TableViewConfig {
                token_length,
                bucket,
                rebalance_threshold,
            })
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built column sets for common testing scenarios.

    use super::*;

    /// A typed property column with an explicit rank.
    pub fn ranked_column(id: &str, order: &str) -> Column {
        Column::new(
            id,
            id,
            ColumnKind::property("string"),
            LexoRank::parse(order).expect("fixture rank is well formed"),
        )
    }

    /// A column stored before ranks existed.
    pub fn legacy_column(id: &str) -> Column {
        Column {
            id: id.to_string(),
            name: id.to_string(),
            order: None,
            kind: ColumnKind::property("string"),
        }
    }

    pub fn column_map(columns: impl IntoIterator<Item = Column>) -> ColumnMap {
        columns
            .into_iter()
            .map(|column| (column.id.clone(), column))
            .collect()
    }

    /// `c1 < c2 < c3` with integer-only ranks.
    pub fn three_columns() -> ColumnMap {
        column_map([
            ranked_column("c1", "0|100000:"),
            ranked_column("c2", "0|200000:"),
            ranked_column("c3", "0|300000:"),
        ])
    }

    /// An empty store with deterministic ids.
    pub fn test_store() -> RankedColumnStore {
        RankedColumnStore::new(TableViewConfig::default())
            .expect("default config is valid")
            .with_token_generator(SequentialTokenGenerator::new())
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Custom assertion functions for ordering invariants.

    use super::*;

    /// Assert that a TabulaResult is Ok.
    #[track_caller]
    pub fn assert_ok<T: std::fmt::Debug>(result: &TabulaResult<T>) {
        assert!(result.is_ok(), "Expected Ok, got Err: {:?}", result);
    }

    /// Assert that a TabulaResult is a Rank error.
    #[track_caller]
    pub fn assert_rank_error<T: std::fmt::Debug>(result: &TabulaResult<T>) {
        match result {
            Err(TabulaError::Rank(_)) => {}
            other => panic!("Expected Rank error, got: {:?}", other),
        }
    }

    /// Assert that a TabulaResult is a Validation error.
    #[track_caller]
    pub fn assert_validation_error<T: std::fmt::Debug>(result: &TabulaResult<T>) {
        match result {
            Err(TabulaError::Validation(_)) => {}
            other => panic!("Expected Validation error, got: {:?}", other),
        }
    }

    /// Assert `lo < rank < hi`.
    #[track_caller]
    pub fn assert_strictly_between(rank: &LexoRank, lo: &LexoRank, hi: &LexoRank) {
        assert!(
            lo < rank && rank < hi,
            "Expected {} < {} < {}",
            lo,
            rank,
            hi
        );
    }

    /// Assert that every column is ranked and ranks strictly increase.
    #[track_caller]
    pub fn assert_strictly_ordered(columns: &[Column]) {
        for pair in columns.windows(2) {
            match (&pair[0].order, &pair[1].order) {
                (Some(a), Some(b)) => assert!(
                    a < b,
                    "Columns {} ({}) and {} ({}) are out of order",
                    pair[0].id,
                    a,
                    pair[1].id,
                    b
                ),
                _ => panic!("Unranked column in {:?}", pair),
            }
        }
    }

    /// Assert that only `moved_id` differs between two snapshots.
    #[track_caller]
    pub fn assert_only_moved(before: &ColumnMap, after: &ColumnMap, moved_id: &str) {
        assert_eq!(
            before.keys().collect::<Vec<_>>(),
            after.keys().collect::<Vec<_>>(),
            "Column set changed"
        );
        for (id, column) in before {
            if id != moved_id {
                assert_eq!(Some(column), after.get(id), "Column {} was touched", id);
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
