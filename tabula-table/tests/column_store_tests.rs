use serde_json::json;
use tabula_core::{LexoRank, RankBucket, TableViewConfig};
use tabula_table::{
    assign_inserted_order, column_order_after_move, prop_type_from_column_id, sort_columns,
    ColumnKind, ColumnMap, ColumnMove, Placement, RankedColumnStore, StaticPropType, ViewTableData,
};
use tabula_test_utils::assertions::{
    assert_ok, assert_only_moved, assert_rank_error, assert_strictly_between,
    assert_strictly_ordered, assert_validation_error,
};
use tabula_test_utils::fixtures::{
    column_map, legacy_column, ranked_column, test_store, three_columns,
};
use tabula_test_utils::SequentialTokenGenerator;

#[test]
fn empty_set_inserts_at_middle() {
    let order = assign_inserted_order(&ColumnMap::new()).unwrap();
    assert_eq!(order.as_str(), "0|hzzzzz:");
}

#[test]
fn moving_third_column_before_first() {
    let columns = three_columns();
    let order = column_order_after_move(&columns, "c3", &ColumnMove::before("c1"))
        .unwrap()
        .expect("both columns exist");

    assert!(order < columns["c1"].order_or_middle());

    let mut updated = columns.clone();
    updated.get_mut("c3").unwrap().order = Some(order);
    assert_only_moved(&columns, &updated, "c3");

    let sorted = sort_columns(&updated);
    assert_strictly_ordered(&sorted);
    let ids: Vec<&str> = sorted.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["c3", "c1", "c2"]);
}

#[test]
fn literal_moves_step_over_one_neighbor() {
    let columns = three_columns();
    let r1 = columns["c1"].order_or_middle();
    let r2 = columns["c2"].order_or_middle();

    let order = column_order_after_move(&columns, "c3", &ColumnMove::Literal(Placement::Before))
        .unwrap()
        .unwrap();
    assert_strictly_between(&order, &r1, &r2);

    let order = column_order_after_move(&columns, "c2", &ColumnMove::Literal(Placement::Before))
        .unwrap()
        .unwrap();
    assert_strictly_between(&order, &LexoRank::min(), &r1);
}

#[test]
fn legacy_columns_sort_at_middle_without_mutating_input() {
    let columns = column_map([
        ranked_column("low", "0|100000:"),
        legacy_column("old"),
        ranked_column("high", "0|y00000:"),
    ]);

    let sorted = sort_columns(&columns);
    let ids: Vec<&str> = sorted.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["low", "old", "high"]);
    assert_eq!(sorted[1].order, Some(LexoRank::middle()));
    assert!(columns["old"].order.is_none());
}

#[test]
fn type_extraction_from_delimited_name() {
    assert_eq!(prop_type_from_column_id("abc123:My Name:with:colons"), "colons");
}

#[test]
fn mixed_bucket_neighbors_surface_rank_error() {
    let columns = column_map([
        ranked_column("a", "0|100000:"),
        ranked_column("b", "1|100000:"),
        ranked_column("c", "2|100000:"),
    ]);
    assert_rank_error(&column_order_after_move(&columns, "c", &ColumnMove::after("a")));
}

#[test]
fn load_edit_and_export_view_data() {
    let stored = json!({
        "columns": {
            "k1:Title:string": {
                "id": "k1:Title:string",
                "name": "Title",
                "order": "0|hzzzzz:",
                "type": "string"
            },
            "k2:Created:creation_date": {
                "id": "k2:Created:creation_date",
                "name": "Created",
                "prop": "creation_date"
            }
        },
        "filter": [{ "type": "prop", "rule": "and" }]
    });

    let data = ViewTableData::from_value(stored).unwrap();
    let mut store = RankedColumnStore::from_view_data(data, TableViewConfig::default())
        .unwrap()
        .with_token_generator(SequentialTokenGenerator::with_prefix("n"));

    let appended = store
        .append_column("Due: soft", ColumnKind::property("date"))
        .unwrap()
        .clone();
    assert_eq!(appended.id, "n0:Due: soft:date");
    assert_eq!(prop_type_from_column_id(&appended.id), "date");

    store
        .move_column(&appended.id, &ColumnMove::before("k1:Title:string"))
        .unwrap()
        .expect("both columns exist");

    let names: Vec<String> = store.sorted().into_iter().map(|c| c.name).collect();
    assert_eq!(names[0], "Due: soft");

    let exported = store.to_view_data().to_value().unwrap();
    assert_eq!(exported["filter"], json!([{ "type": "prop", "rule": "and" }]));
    assert_eq!(
        exported["columns"]["k2:Created:creation_date"]["prop"],
        json!("creation_date")
    );
    assert!(exported["columns"]["k2:Created:creation_date"]
        .get("order")
        .is_none());
}

#[test]
fn invalid_view_data_is_rejected() {
    assert_validation_error(&ViewTableData::from_value(json!({ "columns": null })));
    assert_validation_error(&ViewTableData::from_value(json!({
        "columns": { "a": { "id": "a", "name": "A", "prop": "weather" } }
    })));
}

#[test]
fn store_in_other_bucket_starts_there() {
    let config = TableViewConfig {
        bucket: RankBucket::Two,
        ..TableViewConfig::default()
    };
    let mut store = RankedColumnStore::new(config)
        .unwrap()
        .with_token_generator(SequentialTokenGenerator::new());
    let first = store
        .append_column(
            "Path",
            ColumnKind::Static {
                prop: StaticPropType::Path,
            },
        )
        .unwrap()
        .clone();
    assert_eq!(first.order, Some(LexoRank::middle_in(RankBucket::Two)));

    let second = store.append_column("Title", ColumnKind::property("string")).unwrap().clone();
    assert_eq!(second.order.as_ref().map(LexoRank::bucket), Some(RankBucket::Two));
}

#[test]
fn many_appends_stay_ordered() {
    let mut store = test_store();
    for i in 0..100 {
        store
            .append_column(format!("Column {}", i), ColumnKind::property("number"))
            .unwrap();
    }
    let sorted = store.sorted();
    assert_strictly_ordered(&sorted);
    assert_eq!(sorted.first().map(|c| c.name.as_str()), Some("Column 0"));
    assert_eq!(sorted.last().map(|c| c.name.as_str()), Some("Column 99"));
}

#[test]
fn columns_keyed_under_foreign_ids_never_reach_the_store() {
    let mismatched = json!({
        "columns": {
            "k1": { "id": "a:A:string", "name": "A", "order": "0|100000:", "type": "string" },
            "k2": { "id": "b:B:string", "name": "B", "order": "0|200000:", "type": "string" }
        }
    });
    assert!(serde_json::from_value::<ViewTableData>(mismatched.clone()).is_err());
    assert_validation_error(&ViewTableData::from_value(mismatched));

    let keyed = json!({
        "columns": {
            "a:A:string": {
                "id": "a:A:string",
                "name": "A",
                "order": "0|100000:",
                "type": "string"
            },
            "b:B:string": {
                "id": "b:B:string",
                "name": "B",
                "order": "0|200000:",
                "type": "string"
            }
        }
    });
    let data: ViewTableData = serde_json::from_value(keyed).unwrap();
    let loaded = RankedColumnStore::from_view_data(data, TableViewConfig::default());
    assert_ok(&loaded);

    let mut store = loaded.unwrap();
    let order = store
        .move_column("b:B:string", &ColumnMove::before("a:A:string"))
        .unwrap()
        .expect("both columns exist");
    assert_eq!(store.get("b:B:string").and_then(|c| c.order.clone()), Some(order));
    let ids: Vec<String> = store.sorted().into_iter().map(|c| c.id).collect();
    assert_eq!(ids, vec!["b:B:string", "a:A:string"]);
}
