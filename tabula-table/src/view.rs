//! Persisted table-view configuration.

use crate::{is_view_table_data, ColumnMap};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tabula_core::{TabulaError, TabulaResult, ValidationError};

/// Stored configuration of one table view.
///
/// Deserialisation rejects any column keyed under an id other than its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawViewTableData")]
pub struct ViewTableData {
    pub columns: ColumnMap,
    /// Serialized smart-view query; carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
}

impl ViewTableData {
    /// Validate and convert stored view data.
    ///
    /// Every column must pass [`is_view_table_data`] and be keyed by its own id.
    pub fn from_value(value: Value) -> TabulaResult<Self> {
        if !is_view_table_data(&value) {
            return Err(TabulaError::Validation(ValidationError::InvalidValue {
                field: "columns".to_string(),
                reason: "expected an object of static or typed property columns".to_string(),
            }));
        }

        let raw: RawViewTableData = serde_json::from_value(value).map_err(|e| {
            TabulaError::Validation(ValidationError::InvalidValue {
                field: "columns".to_string(),
                reason: e.to_string(),
            })
        })?;

        Self::try_from(raw).map_err(TabulaError::from)
    }

    /// Check that every column is keyed by its own id.
    pub fn check_keys(&self) -> Result<(), ValidationError> {
        match self.columns.iter().find(|(key, column)| **key != column.id) {
            Some((key, column)) => Err(ValidationError::InvalidValue {
                field: format!("columns.{}", key),
                reason: format!("keyed under a different id than {}", column.id),
            }),
            None => Ok(()),
        }
    }

    pub fn to_value(&self) -> TabulaResult<Value> {
        serde_json::to_value(self).map_err(|e| {
            TabulaError::Validation(ValidationError::InvalidValue {
                field: "columns".to_string(),
                reason: e.to_string(),
            })
        })
    }
}

#[derive(Deserialize)]
struct RawViewTableData {
    columns: ColumnMap,
    #[serde(default)]
    filter: Option<Value>,
}

impl TryFrom<RawViewTableData> for ViewTableData {
    type Error = ValidationError;

    fn try_from(raw: RawViewTableData) -> Result<Self, Self::Error> {
        let data = ViewTableData {
            columns: raw.columns,
            filter: raw.filter,
        };
        data.check_keys()?;
        Ok(data)
    }
}
