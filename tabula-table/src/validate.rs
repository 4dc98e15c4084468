//! Shape predicates for column data loaded from storage.
//!
//! These work on raw JSON so callers can decide whether to reject or drop
//! an entry before any typed conversion happens. The ranking functions never
//! look at column kind.

use crate::StaticPropType;
use serde_json::Value;
use std::str::FromStr;

/// `item` carries a `prop` naming a built-in property.
pub fn is_static_prop_col(item: &Value) -> bool {
    item.get("prop")
        .and_then(Value::as_str)
        .is_some_and(|prop| StaticPropType::from_str(prop).is_ok())
}

/// `item` carries a string `type`.
pub fn is_prop_col(item: &Value) -> bool {
    item.get("type").is_some_and(Value::is_string)
}

/// `item` is a non-null object of either column kind.
///
/// Static classification is checked first.
pub fn is_column(item: &Value) -> bool {
    item.is_object() && (is_static_prop_col(item) || is_prop_col(item))
}

/// `data` has a `columns` object whose every value is a column.
///
/// Insensitive to the order of the entries.
pub fn is_view_table_data(data: &Value) -> bool {
    data.get("columns")
        .and_then(Value::as_object)
        .is_some_and(|columns| columns.values().all(is_column))
}
