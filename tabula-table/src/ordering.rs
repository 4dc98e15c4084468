//! Rank assignment for inserted and moved columns.
//!
//! Every function here is pure: it reads a snapshot of the column map and
//! returns a value. A call never re-ranks any column other than the one being
//! inserted or moved, and the caller applies the write.

use crate::{Column, ColumnMap};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tabula_core::{LexoRank, RankBucket, RankError, TabulaResult};

/// Which side of a reference column to land on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Before,
    After,
}

/// A reorder request.
///
/// Persisted as `"before"`, `"after"` or `{ "targetId": .., "type": .. }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(untagged)]
pub enum ColumnMove {
    /// Step past the current neighbor on that side.
    Literal(Placement),
    /// Land immediately before or after `target_id`.
    Relative {
        #[serde(rename = "targetId")]
        target_id: String,
        #[serde(rename = "type")]
        placement: Placement,
    },
}

impl ColumnMove {
    pub fn before(target_id: impl Into<String>) -> Self {
        ColumnMove::Relative {
            target_id: target_id.into(),
            placement: Placement::Before,
        }
    }

    pub fn after(target_id: impl Into<String>) -> Self {
        ColumnMove::Relative {
            target_id: target_id.into(),
            placement: Placement::After,
        }
    }
}

/// Copy of `columns` in which every legacy column has the middle rank.
///
/// The input is left untouched; callers that want the migration persisted
/// must store the returned map.
pub fn normalize_columns(columns: &ColumnMap) -> ColumnMap {
    columns
        .iter()
        .map(|(id, column)| {
            let mut column = column.clone();
            if column.order.is_none() {
                tracing::debug!(column_id = %id, "Assigning middle rank to unranked column");
                column.order = Some(LexoRank::middle());
            }
            (id.clone(), column)
        })
        .collect()
}

/// Normalized columns in display order.
///
/// Tied ranks fall back to column id so the result is stable.
pub fn sort_columns(columns: &ColumnMap) -> Vec<Column> {
    let mut sorted: Vec<Column> = normalize_columns(columns).into_values().collect();
    sorted.sort_by(display_order);
    sorted
}

fn display_order(a: &Column, b: &Column) -> Ordering {
    a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id))
}

/// Rank for a column appended after every existing one.
pub fn assign_inserted_order(columns: &ColumnMap) -> TabulaResult<LexoRank> {
    assign_inserted_order_in(columns, RankBucket::Zero)
}

/// [`assign_inserted_order`] with the starting rank drawn from `bucket`.
///
/// Non-empty sets extend the bucket of their current last column.
pub fn assign_inserted_order_in(columns: &ColumnMap, bucket: RankBucket) -> TabulaResult<LexoRank> {
    let sorted = sort_columns(columns);
    let order = match sorted.last() {
        None => LexoRank::middle_in(bucket),
        Some(last) => {
            let last = last.order_or_middle();
            squeeze(&LexoRank::max_in(last.bucket()), &last)?
        }
    };

    tracing::debug!(order = %order, existing = sorted.len(), "Assigned order for inserted column");
    Ok(order)
}

/// New rank for `moved_id` after applying `column_move`.
///
/// Returns `Ok(None)` when the set is empty, `moved_id` is unknown, or the
/// target of a relative move is unknown; the caller must then skip the write.
/// Moving the first column before, or the last column after, returns its
/// current rank unchanged.
pub fn column_order_after_move(
    columns: &ColumnMap,
    moved_id: &str,
    column_move: &ColumnMove,
) -> TabulaResult<Option<LexoRank>> {
    let sorted = sort_columns(columns);
    let Some(moved_index) = sorted.iter().position(|col| col.id == moved_id) else {
        return Ok(None);
    };

    let order = match column_move {
        ColumnMove::Literal(placement) => literal_move_order(&sorted, moved_index, *placement)?,
        ColumnMove::Relative {
            target_id,
            placement,
        } => {
            if target_id == moved_id {
                return Ok(Some(sorted[moved_index].order_or_middle()));
            }

            let others: Vec<Column> = sorted
                .into_iter()
                .filter(|col| col.id != moved_id)
                .collect();
            let Some(target_index) = others.iter().position(|col| &col.id == target_id) else {
                return Ok(None);
            };

            match placement {
                Placement::Before => order_before(&others, target_index)?,
                Placement::After => order_after(&others, target_index)?,
            }
        }
    };

    tracing::debug!(column_id = moved_id, order = %order, "Computed order after move");
    Ok(Some(order))
}

/// Evenly spaced ranks in `bucket` for every column, keeping display order.
///
/// Map keys are carried over as they are.
pub fn rebalance_orders(columns: &ColumnMap, bucket: RankBucket) -> ColumnMap {
    let mut entries: Vec<(String, Column)> = normalize_columns(columns).into_iter().collect();
    entries.sort_by(|(_, a), (_, b)| display_order(a, b));
    let ranks = LexoRank::spread(bucket, entries.len());

    tracing::debug!(columns = entries.len(), bucket = %bucket, "Rebalancing column orders");
    entries
        .into_iter()
        .zip(ranks)
        .map(|((key, mut column), rank)| {
            column.order = Some(rank);
            (key, column)
        })
        .collect()
}

fn literal_move_order(
    sorted: &[Column],
    moved_index: usize,
    placement: Placement,
) -> TabulaResult<LexoRank> {
    match placement {
        Placement::Before if moved_index == 0 => Ok(sorted[0].order_or_middle()),
        Placement::Before => order_before(sorted, moved_index - 1),
        Placement::After if moved_index + 1 == sorted.len() => {
            Ok(sorted[moved_index].order_or_middle())
        }
        Placement::After => order_after(sorted, moved_index + 1),
    }
}

/// Rank between `sorted[index - 1]` and `sorted[index]`, or below the first.
fn order_before(sorted: &[Column], index: usize) -> TabulaResult<LexoRank> {
    let anchor = sorted[index].order_or_middle();
    match index.checked_sub(1) {
        None => squeeze(&LexoRank::min_in(anchor.bucket()), &anchor),
        Some(prev) => squeeze(&sorted[prev].order_or_middle(), &anchor),
    }
}

/// Rank between `sorted[index]` and `sorted[index + 1]`, or above the last.
fn order_after(sorted: &[Column], index: usize) -> TabulaResult<LexoRank> {
    let anchor = sorted[index].order_or_middle();
    match sorted.get(index + 1) {
        None => squeeze(&LexoRank::max_in(anchor.bucket()), &anchor),
        Some(next) => squeeze(&anchor, &next.order_or_middle()),
    }
}

/// `a.between(b)`, except that tied neighbors share their rank.
fn squeeze(a: &LexoRank, b: &LexoRank) -> TabulaResult<LexoRank> {
    match a.between(b) {
        Ok(rank) => Ok(rank),
        Err(RankError::Identical { value }) => {
            tracing::warn!(rank = %value, "Neighbor ranks tie; reusing the shared rank");
            Ok(a.clone())
        }
        Err(err) => Err(err.into()),
    }
}
