//! Stateful wrapper that applies the ordering functions to a column map.

use crate::{
    assign_inserted_order_in, column_order_after_move, rebalance_orders, sort_columns, Column,
    ColumnKind, ColumnMap, ColumnMove, ViewTableData,
};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tabula_core::{
    LexoRank, RandomTokenGenerator, TableViewConfig, TabulaResult, TokenGenerator, ValidationError,
};

/// Fresh tokens drawn before an append gives up on finding an unused id.
const MAX_ID_ATTEMPTS: usize = 4;

/// Columns of one table view plus the capabilities needed to edit them.
///
/// The store is single-writer: concurrent edits to the same view must be
/// serialized by whatever persists the map.
#[derive(Clone)]
pub struct RankedColumnStore {
    columns: ColumnMap,
    filter: Option<Value>,
    config: TableViewConfig,
    tokens: Arc<dyn TokenGenerator>,
}

impl RankedColumnStore {
    /// Create an empty store with random id tokens.
    pub fn new(config: TableViewConfig) -> TabulaResult<Self> {
        config.validate()?;
        let tokens = Arc::new(RandomTokenGenerator::new(config.token_length));
        Ok(Self {
            columns: ColumnMap::new(),
            filter: None,
            config,
            tokens,
        })
    }

    /// Load a store from persisted view data.
    ///
    /// Fails when a column is keyed under an id other than its own.
    pub fn from_view_data(data: ViewTableData, config: TableViewConfig) -> TabulaResult<Self> {
        data.check_keys()?;
        let mut store = Self::new(config)?;
        store.columns = data.columns;
        store.filter = data.filter;
        Ok(store)
    }

    /// Replace the id token source.
    pub fn with_token_generator(mut self, tokens: impl TokenGenerator + 'static) -> Self {
        self.tokens = Arc::new(tokens);
        self
    }

    pub fn config(&self) -> &TableViewConfig {
        &self.config
    }

    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    pub fn get(&self, column_id: &str) -> Option<&Column> {
        self.columns.get(column_id)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Columns in display order, legacy columns ranked at the middle.
    pub fn sorted(&self) -> Vec<Column> {
        sort_columns(&self.columns)
    }

    /// Append a new column after every existing one.
    ///
    /// A generated id that is already taken is redrawn; the append fails once
    /// every attempt has collided, leaving the store unchanged.
    pub fn append_column(
        &mut self,
        name: impl Into<String>,
        kind: ColumnKind,
    ) -> TabulaResult<&Column> {
        let order = assign_inserted_order_in(&self.columns, self.config.bucket)?;
        self.check_rank_length(&order);

        let name = name.into();
        let mut column =
            Column::create(self.tokens.as_ref(), name.clone(), kind.clone(), order.clone());
        let mut attempts = 1;
        while self.columns.contains_key(&column.id) {
            if attempts == MAX_ID_ATTEMPTS {
                return Err(ValidationError::InvalidValue {
                    field: "id".to_string(),
                    reason: format!(
                        "column id {} already in use after {} attempts",
                        column.id, attempts
                    ),
                }
                .into());
            }
            tracing::warn!(column_id = %column.id, "Generated column id already in use");
            column =
                Column::create(self.tokens.as_ref(), name.clone(), kind.clone(), order.clone());
            attempts += 1;
        }

        let id = column.id.clone();
        tracing::debug!(column_id = %id, "Appending column");
        Ok(&*self.columns.entry(id).or_insert(column))
    }

    /// Move a column and store its new rank.
    ///
    /// Returns the rank written, or `None` when nothing changed because the
    /// column or its target is unknown.
    pub fn move_column(
        &mut self,
        column_id: &str,
        column_move: &ColumnMove,
    ) -> TabulaResult<Option<LexoRank>> {
        let Some(order) = column_order_after_move(&self.columns, column_id, column_move)? else {
            tracing::debug!(column_id, "Move skipped: column or target not found");
            return Ok(None);
        };
        self.check_rank_length(&order);

        let Some(column) = self.columns.get_mut(column_id) else {
            tracing::warn!(column_id, "Move skipped: column is not keyed by its id");
            return Ok(None);
        };
        column.order = Some(order.clone());
        Ok(Some(order))
    }

    pub fn remove_column(&mut self, column_id: &str) -> Option<Column> {
        self.columns.remove(column_id)
    }

    /// Any stored rank has outgrown the configured threshold.
    pub fn needs_rebalance(&self) -> bool {
        self.columns.values().any(|column| {
            column
                .order
                .as_ref()
                .is_some_and(|order| order.encoded_len() > self.config.rebalance_threshold)
        })
    }

    /// Re-rank every column evenly in the configured bucket.
    pub fn rebalance(&mut self) {
        self.columns = rebalance_orders(&self.columns, self.config.bucket);
    }

    pub fn to_view_data(&self) -> ViewTableData {
        ViewTableData {
            columns: self.columns.clone(),
            filter: self.filter.clone(),
        }
    }

    fn check_rank_length(&self, order: &LexoRank) {
        if order.encoded_len() > self.config.rebalance_threshold {
            tracing::warn!(
                order = %order,
                threshold = self.config.rebalance_threshold,
                "Rank exceeds rebalance threshold"
            );
        }
    }
}

impl fmt::Debug for RankedColumnStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RankedColumnStore")
            .field("columns", &self.columns)
            .field("filter", &self.filter)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
