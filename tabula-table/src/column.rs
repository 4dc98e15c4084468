//! Table-view column records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tabula_core::{LexoRank, TokenGenerator, ValidationError};

/// Separator between the segments of a column id.
pub const COLUMN_ID_DELIMITER: char = ':';

/// Columns of one table view keyed by column id.
pub type ColumnMap = BTreeMap<String, Column>;

/// Built-in document properties a static column can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum StaticPropType {
    CreationDate,
    UpdateDate,
    Creator,
    Label,
    Path,
}

impl StaticPropType {
    pub const ALL: [StaticPropType; 5] = [
        StaticPropType::CreationDate,
        StaticPropType::UpdateDate,
        StaticPropType::Creator,
        StaticPropType::Label,
        StaticPropType::Path,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StaticPropType::CreationDate => "creation_date",
            StaticPropType::UpdateDate => "update_date",
            StaticPropType::Creator => "creator",
            StaticPropType::Label => "label",
            StaticPropType::Path => "path",
        }
    }
}

impl fmt::Display for StaticPropType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StaticPropType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|prop| prop.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownStaticProp {
                value: s.to_string(),
            })
    }
}

/// What a column displays.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum ColumnKind {
    /// A built-in document property.
    Static { prop: StaticPropType },
    /// A user-defined property of the given type.
    Property {
        prop_type: String,
        sub_type: Option<String>,
    },
}

impl ColumnKind {
    pub fn property(prop_type: impl Into<String>) -> Self {
        ColumnKind::Property {
            prop_type: prop_type.into(),
            sub_type: None,
        }
    }

    pub fn is_static(&self) -> bool {
        matches!(self, ColumnKind::Static { .. })
    }

    /// The type segment embedded at the end of a column id.
    ///
    /// Property columns with a sub type embed the sub type.
    pub fn id_type_token(&self) -> &str {
        match self {
            ColumnKind::Static { prop } => prop.as_str(),
            ColumnKind::Property {
                sub_type: Some(sub_type),
                ..
            } => sub_type,
            ColumnKind::Property { prop_type, .. } => prop_type,
        }
    }
}

/// One reorderable column of a table view.
///
/// `order` is `None` only for legacy records loaded before ranks existed;
/// see [`crate::normalize_columns`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawColumn", into = "RawColumn")]
pub struct Column {
    pub id: String,
    pub name: String,
    pub order: Option<LexoRank>,
    pub kind: ColumnKind,
}

impl Column {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: ColumnKind,
        order: LexoRank,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            order: Some(order),
            kind,
        }
    }

    /// Build a column with a freshly generated id.
    pub fn create(
        tokens: &dyn TokenGenerator,
        name: impl Into<String>,
        kind: ColumnKind,
        order: LexoRank,
    ) -> Self {
        let name = name.into();
        let id = make_column_id(tokens, &name, kind.id_type_token());
        Self::new(id, name, kind, order)
    }

    /// The stored order, or the middle rank for legacy records.
    pub fn order_or_middle(&self) -> LexoRank {
        self.order.clone().unwrap_or_else(LexoRank::middle)
    }
}

/// Build `<token>:<name>:<type>`.
///
/// Only the type segment is ever parsed back out, from the last delimiter, so
/// the name may contain the delimiter. The token and name segments cannot be
/// told apart again once either contains it; a token that does is logged but
/// still used, since the id stays unique and its type stays readable.
pub fn make_column_id(tokens: &dyn TokenGenerator, name: &str, prop_type: &str) -> String {
    let token = tokens.next_token();
    if token.contains(COLUMN_ID_DELIMITER) {
        tracing::warn!(token = %token, "Column id token contains the id delimiter");
    }
    format!(
        "{}{d}{}{d}{}",
        token,
        name,
        prop_type,
        d = COLUMN_ID_DELIMITER
    )
}

/// The type segment of a column id: everything after the last delimiter.
///
/// An id without any delimiter is returned whole.
pub fn prop_type_from_column_id(column_id: &str) -> &str {
    column_id
        .rsplit_once(COLUMN_ID_DELIMITER)
        .map_or(column_id, |(_, prop_type)| prop_type)
}

/// Persisted shape of a column: the kind is encoded by which of `prop` and
/// `type` is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawColumn {
    id: String,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    order: Option<LexoRank>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prop: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    prop_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sub_type: Option<String>,
}

impl TryFrom<RawColumn> for Column {
    type Error = ValidationError;

    /// A known `prop` wins over `type` when both are present.
    fn try_from(raw: RawColumn) -> Result<Self, Self::Error> {
        let static_prop = raw.prop.as_deref().map(StaticPropType::from_str);

        let kind = match (static_prop, raw.prop_type) {
            (Some(Ok(prop)), _) => ColumnKind::Static { prop },
            (_, Some(prop_type)) => ColumnKind::Property {
                prop_type,
                sub_type: raw.sub_type,
            },
            (Some(Err(err)), None) => return Err(err),
            (None, None) => {
                return Err(ValidationError::RequiredFieldMissing {
                    field: "prop or type".to_string(),
                })
            }
        };

        Ok(Column {
            id: raw.id,
            name: raw.name,
            order: raw.order,
            kind,
        })
    }
}

impl From<Column> for RawColumn {
    fn from(column: Column) -> Self {
        let (prop, prop_type, sub_type) = match column.kind {
            ColumnKind::Static { prop } => (Some(prop.as_str().to_string()), None, None),
            ColumnKind::Property {
                prop_type,
                sub_type,
            } => (None, Some(prop_type), sub_type),
        };

        RawColumn {
            id: column.id,
            name: column.name,
            order: column.order,
            prop,
            prop_type,
            sub_type,
        }
    }
}
