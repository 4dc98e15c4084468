//! Tabula Table - Ranked Column Store
//!
//! Column ordering for user-reorderable table views. Each column carries an
//! opaque [`LexoRank`]; inserting or moving a column computes exactly one new
//! rank from its neighbors and never renumbers anything else.
//!
//! ```
//! use tabula_table::{
//!     assign_inserted_order, column_order_after_move, Column, ColumnKind, ColumnMap, ColumnMove,
//! };
//!
//! let mut columns = ColumnMap::new();
//! for id in ["a", "b", "c"] {
//!     let order = assign_inserted_order(&columns).unwrap();
//!     columns.insert(id.to_string(), Column::new(id, id, ColumnKind::property("string"), order));
//! }
//!
//! let order = column_order_after_move(&columns, "c", &ColumnMove::before("a"))
//!     .unwrap()
//!     .expect("both columns exist");
//! assert!(Some(&order) < columns["a"].order.as_ref());
//! ```
//!
//! [`LexoRank`]: tabula_core::LexoRank

pub mod column;
pub mod ordering;
pub mod store;
pub mod validate;
pub mod view;

pub use column::{
    make_column_id, prop_type_from_column_id, Column, ColumnKind, ColumnMap, StaticPropType,
    COLUMN_ID_DELIMITER,
};
pub use ordering::{
    assign_inserted_order, assign_inserted_order_in, column_order_after_move, normalize_columns,
    rebalance_orders, sort_columns, ColumnMove, Placement,
};
pub use store::RankedColumnStore;
pub use validate::{is_column, is_prop_col, is_static_prop_col, is_view_table_data};
pub use view::ViewTableData;
