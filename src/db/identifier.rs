//! Identifier validation for statements that must interpolate a table name.
//!
//! SQL has no bound-parameter syntax for identifiers, so table names used in
//! `PRAGMA`, DDL or `FROM` clauses are spliced into the statement text. The
//! only way to obtain an [`Identifier`] is [`validate_identifier`], and every
//! statement builder in [`crate::db::schema`] takes `&Identifier`.

use crate::error::{DbError, DbResult};

/// A table name proven to match `^[A-Za-z_][A-Za-z0-9_]*$`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identifier wrapped in double quotes, ready for statement text.
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validate a caller-supplied table name.
///
/// # Examples
///
/// ```
/// use sql_tool_server::db::identifier::validate_identifier;
///
/// assert_eq!(validate_identifier("employees").unwrap().as_str(), "employees");
/// assert!(validate_identifier("employees; DROP TABLE employees").is_err());
/// ```
pub fn validate_identifier(name: &str) -> DbResult<Identifier> {
    if is_valid_identifier(name) {
        Ok(Identifier(name.to_string()))
    } else {
        Err(DbError::invalid_identifier(name))
    }
}

fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
