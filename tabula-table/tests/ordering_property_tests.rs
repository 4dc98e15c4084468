//! Property tests for column ordering.

use proptest::prelude::*;
use proptest::sample::Index;
use tabula_table::{
    assign_inserted_order, column_order_after_move, is_view_table_data, make_column_id,
    prop_type_from_column_id, sort_columns, Column, ColumnMap, ColumnMove, Placement,
    ViewTableData,
};
use tabula_test_utils::assertions::{assert_only_moved, assert_strictly_ordered};
use tabula_test_utils::generators::{arb_column_map, arb_column_name, arb_ranked_column_map};
use tabula_test_utils::SequentialTokenGenerator;

fn ids(columns: &[Column]) -> Vec<String> {
    columns.iter().map(|c| c.id.clone()).collect()
}

fn to_map(columns: Vec<Column>) -> ColumnMap {
    columns.into_iter().map(|c| (c.id.clone(), c)).collect()
}

// ============================================================================
// PROPERTY TESTS
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: sorting an already sorted set changes nothing
    #[test]
    fn prop_sort_is_idempotent(columns in arb_column_map(16)) {
        let once = sort_columns(&columns);
        let twice = sort_columns(&to_map(once.clone()));
        prop_assert_eq!(ids(&once), ids(&twice));
        prop_assert!(once.iter().all(|c| c.order.is_some()));
        prop_assert!(once.windows(2).all(|w| w[0].order <= w[1].order));
    }

    /// Property: an appended column ranks above every existing column
    #[test]
    fn prop_insert_ranks_above_all(columns in arb_column_map(16)) {
        let order = assign_inserted_order(&columns).unwrap();
        for column in columns.values() {
            let existing = column.order_or_middle();
            prop_assert!(order > existing, "{} !> {}", order, existing);
            prop_assert!(order.as_str() > existing.as_str());
        }
    }

    /// Property: moving the first column before is a no-op
    #[test]
    fn prop_first_before_is_noop(columns in arb_ranked_column_map(12)) {
        let first = sort_columns(&columns).remove(0);
        let before = ColumnMove::Literal(Placement::Before);
        let order = column_order_after_move(&columns, &first.id, &before)
            .unwrap()
            .unwrap();
        prop_assert_eq!(Some(order), first.order);
    }

    /// Property: moving the last column after is a no-op
    #[test]
    fn prop_last_after_is_noop(columns in arb_ranked_column_map(12)) {
        let last = sort_columns(&columns).pop().unwrap();
        let after = ColumnMove::Literal(Placement::After);
        let order = column_order_after_move(&columns, &last.id, &after)
            .unwrap()
            .unwrap();
        prop_assert_eq!(Some(order), last.order);
    }

    /// Property: between any adjacent pair lies a strictly inner rank
    #[test]
    fn prop_between_adjacent_pair(columns in arb_ranked_column_map(12)) {
        let sorted = sort_columns(&columns);
        for pair in sorted.windows(2) {
            let a = pair[0].order.clone().unwrap();
            let b = pair[1].order.clone().unwrap();
            let r = a.between(&b).unwrap();
            prop_assert!(a < r && r < b, "{} < {} < {} violated", a, r, b);
        }
    }

    /// Property: a relative move lands next to its target and touches nothing else
    #[test]
    fn prop_relative_move_lands_next_to_target(
        columns in arb_ranked_column_map(10),
        moved in any::<Index>(),
        target in any::<Index>(),
        after in any::<bool>(),
    ) {
        let sorted = sort_columns(&columns);
        prop_assume!(sorted.len() >= 2);
        let moved = sorted[moved.index(sorted.len())].id.clone();
        let target = sorted[target.index(sorted.len())].id.clone();
        prop_assume!(moved != target);

        let column_move = if after {
            ColumnMove::after(target.clone())
        } else {
            ColumnMove::before(target.clone())
        };
        let order = column_order_after_move(&columns, &moved, &column_move)
            .unwrap()
            .unwrap();

        let mut updated = columns.clone();
        if let Some(column) = updated.get_mut(&moved) {
            column.order = Some(order);
        }
        assert_only_moved(&columns, &updated, &moved);

        let resorted = sort_columns(&updated);
        assert_strictly_ordered(&resorted);
        let moved_at = resorted.iter().position(|c| c.id == moved).unwrap();
        let target_at = resorted.iter().position(|c| c.id == target).unwrap();
        if after {
            prop_assert_eq!(moved_at, target_at + 1);
        } else {
            prop_assert_eq!(moved_at + 1, target_at);
        }
    }

    /// Property: the validity predicate ignores ordering
    #[test]
    fn prop_validity_survives_sorting(columns in arb_column_map(12)) {
        let data = ViewTableData { columns: columns.clone(), filter: None };
        let value = data.to_value().unwrap();
        prop_assert!(is_view_table_data(&value));

        let sorted = ViewTableData { columns: to_map(sort_columns(&columns)), filter: None };
        let sorted_value = sorted.to_value().unwrap();
        prop_assert!(is_view_table_data(&sorted_value));

        let reloaded = ViewTableData::from_value(sorted_value).unwrap();
        prop_assert_eq!(reloaded, sorted);
    }

    /// Property: the type segment survives names containing the delimiter
    #[test]
    fn prop_type_extraction_uses_last_segment(
        name in arb_column_name(),
        prop_type in "[a-z_]{1,12}",
    ) {
        let tokens = SequentialTokenGenerator::new();
        let id = make_column_id(&tokens, &name, &prop_type);
        prop_assert_eq!(prop_type_from_column_id(&id), prop_type.as_str());
    }
}
