//! Schema-related data models.

use serde::Serialize;

/// One column of a table, as reported by the store's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    /// Ordinal position, starting at 0
    pub cid: i64,
    pub name: String,
    /// Declared type exactly as written in the table definition (may be empty)
    #[serde(rename = "type")]
    pub data_type: String,
    pub notnull: bool,
    /// Default value as SQL text, if any
    pub default_value: Option<String>,
    /// 0 if not part of the primary key, else 1-based position in the key
    pub pk: u32,
}

impl ColumnDescriptor {
    pub fn is_primary_key(&self) -> bool {
        self.pk > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_column_descriptor_serialization() {
        let col = ColumnDescriptor {
            cid: 0,
            name: "id".to_string(),
            data_type: "INTEGER".to_string(),
            notnull: false,
            default_value: None,
            pk: 1,
        };
        assert!(col.is_primary_key());
        assert_eq!(
            serde_json::to_value(&col).unwrap(),
            json!({
                "cid": 0,
                "name": "id",
                "type": "INTEGER",
                "notnull": false,
                "default_value": null,
                "pk": 1
            })
        );
    }
}
