//! # Row Mapping
//!
//! Tables persist entities as flat column rows: one JSON value per column,
//! snake_case column names, foreign keys as `<relation>_id` columns and binary
//! blobs as base64 text with a separate `<field>_content_type` column.
//!
//! Reading a row never fails. Each column converts on its own: a column that is
//! missing or holds a value the target type cannot parse becomes `None`, and the
//! rest of the row still maps. A bad enum label in one column must not hide the
//! other fields of the record.
//!
//! ```rust
//! use resource_framework::row::{column, Row, RowBuilder};
//!
//! let row: Row = RowBuilder::new()
//!     .column("name", &Some("Mona"))
//!     .blob("image", &Some(vec![1u8, 2, 3]))
//!     .build();
//!
//! assert_eq!(column::get::<String>(&row, "name").as_deref(), Some("Mona"));
//! assert_eq!(column::blob(&row, "image"), Some(vec![1, 2, 3]));
//! assert_eq!(column::get::<i64>(&row, "name"), None);
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// A stored row: column name to column value.
pub type Row = Map<String, Value>;

/// Builds a [`Row`] column by column.
#[derive(Debug, Default)]
pub struct RowBuilder {
    row: Row,
}

impl RowBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes any serializable value. Values that fail to serialize are stored as null.
    pub fn column<V: Serialize>(mut self, name: &str, value: &V) -> Self {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.row.insert(name.to_string(), value);
        self
    }

    /// Writes a binary column as base64 text.
    pub fn blob(mut self, name: &str, value: &Option<Vec<u8>>) -> Self {
        let value = match value {
            Some(bytes) => Value::String(STANDARD.encode(bytes)),
            None => Value::Null,
        };
        self.row.insert(name.to_string(), value);
        self
    }

    pub fn build(self) -> Row {
        self.row
    }
}

/// Lenient column readers.
pub mod column {
    use super::*;

    /// Reads a column into any deserializable type; missing, null or unparseable is `None`.
    pub fn get<V: DeserializeOwned>(row: &Row, name: &str) -> Option<V> {
        match row.get(name) {
            None | Some(Value::Null) => None,
            Some(value) => serde_json::from_value(value.clone()).ok(),
        }
    }

    /// Reads a base64 binary column; invalid base64 is `None`.
    pub fn blob(row: &Row, name: &str) -> Option<Vec<u8>> {
        row.get(name)
            .and_then(Value::as_str)
            .and_then(|text| STANDARD.decode(text).ok())
    }
}
