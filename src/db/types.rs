//! Row to JSON conversion.
//!
//! SQLite is dynamically typed: a column declared `TEXT` may hold an integer.
//! Values are therefore decoded by their runtime storage class rather than by
//! the declared column type.

use crate::models::Row;
use serde_json::Value as JsonValue;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row as _, TypeInfo, ValueRef};

/// SQLite storage classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageClass {
    Null,
    Integer,
    Real,
    Text,
    Blob,
}

impl StorageClass {
    /// Classify a runtime type name reported by the driver.
    pub fn from_type_name(type_name: &str) -> Self {
        match type_name.to_ascii_uppercase().as_str() {
            "NULL" => Self::Null,
            "INTEGER" | "INT" | "BIGINT" | "BOOLEAN" => Self::Integer,
            "REAL" | "FLOAT" | "DOUBLE" | "NUMERIC" => Self::Real,
            "BLOB" => Self::Blob,
            _ => Self::Text,
        }
    }
}

/// Encode a BLOB as a base64 string.
pub fn encode_blob(bytes: &[u8]) -> JsonValue {
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    JsonValue::String(STANDARD.encode(bytes))
}

/// Convert a row into a JSON object, preserving result-set column order.
pub fn row_to_json(row: &SqliteRow) -> Row {
    row.columns()
        .iter()
        .map(|col| (col.name().to_string(), decode_column(row, col.ordinal())))
        .collect()
}

/// Decode one column of a row.
pub fn decode_column(row: &SqliteRow, idx: usize) -> JsonValue {
    let class = match row.try_get_raw(idx) {
        Ok(raw) if raw.is_null() => StorageClass::Null,
        Ok(raw) => StorageClass::from_type_name(raw.type_info().name()),
        Err(_) => return JsonValue::Null,
    };

    match class {
        StorageClass::Null => JsonValue::Null,
        StorageClass::Integer => row
            .try_get::<i64, _>(idx)
            .map(|v| JsonValue::Number(v.into()))
            .unwrap_or(JsonValue::Null),
        StorageClass::Real => row
            .try_get::<f64, _>(idx)
            .map(|v| {
                serde_json::Number::from_f64(v)
                    .map(JsonValue::Number)
                    .unwrap_or_else(|| JsonValue::String(v.to_string()))
            })
            .unwrap_or(JsonValue::Null),
        StorageClass::Text => row
            .try_get::<String, _>(idx)
            .map(JsonValue::String)
            .unwrap_or(JsonValue::Null),
        StorageClass::Blob => row
            .try_get::<Vec<u8>, _>(idx)
            .map(|v| encode_blob(&v))
            .unwrap_or(JsonValue::Null),
    }
}
