//! Argument schema and validated argument values.
//!
//! Requests arrive as loosely-typed JSON objects. Each command declares an
//! [`ArgumentSchema`]; the registry checks the raw object against it and hands
//! the handler a [`ValidatedArgs`] holding one [`ArgValue`] per parameter.

use serde_json::{Map, Value as JsonValue, json};
use std::collections::HashMap;

/// Declared type of a command parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    String,
    Integer,
    Boolean,
    StringList,
}

impl ArgType {
    /// JSON Schema type name.
    pub fn json_type(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::StringList => "array",
        }
    }

    /// Coerce a raw JSON value into this type.
    ///
    /// Integers accept numeric strings and booleans accept "true"/"false",
    /// since agents frequently quote scalar arguments.
    pub fn coerce(&self, value: &JsonValue) -> Option<ArgValue> {
        match (self, value) {
            (Self::String, JsonValue::String(s)) => Some(ArgValue::String(s.clone())),
            (Self::Integer, JsonValue::Number(n)) => n.as_i64().map(ArgValue::Int),
            (Self::Integer, JsonValue::String(s)) => s.trim().parse().ok().map(ArgValue::Int),
            (Self::Boolean, JsonValue::Bool(b)) => Some(ArgValue::Bool(*b)),
            (Self::Boolean, JsonValue::String(s)) => {
                if s.eq_ignore_ascii_case("true") {
                    Some(ArgValue::Bool(true))
                } else if s.eq_ignore_ascii_case("false") {
                    Some(ArgValue::Bool(false))
                } else {
                    None
                }
            }
            (Self::StringList, JsonValue::Array(items)) => items
                .iter()
                .map(|item| item.as_str().map(String::from))
                .collect::<Option<Vec<_>>>()
                .map(ArgValue::StringList),
            _ => None,
        }
    }
}

impl std::fmt::Display for ArgType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String => write!(f, "a string"),
            Self::Integer => write!(f, "an integer"),
            Self::Boolean => write!(f, "a boolean"),
            Self::StringList => write!(f, "a list of strings"),
        }
    }
}

/// A validated argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    String(String),
    Int(i64),
    Bool(bool),
    StringList(Vec<String>),
}

/// Declaration of a single command parameter.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub arg_type: ArgType,
    pub required: bool,
}

impl ParamSpec {
    /// A required string parameter.
    pub fn string(name: &'static str, title: &'static str, description: &'static str) -> Self {
        Self {
            name,
            title,
            description,
            arg_type: ArgType::String,
            required: true,
        }
    }

    pub fn with_type(mut self, arg_type: ArgType) -> Self {
        self.arg_type = arg_type;
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// Ordered parameter declarations for one command.
#[derive(Debug, Clone, Default)]
pub struct ArgumentSchema {
    params: Vec<ParamSpec>,
}

impl ArgumentSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, spec: ParamSpec) -> Self {
        self.params.push(spec);
        self
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Check raw arguments against the schema.
    ///
    /// On failure returns every problem found, not just the first one.
    /// `null` for an optional parameter counts as absent; unknown keys are ignored.
    pub fn validate(&self, raw: &Map<String, JsonValue>) -> Result<ValidatedArgs, Vec<String>> {
        let mut values = HashMap::with_capacity(self.params.len());
        let mut problems = Vec::new();

        for spec in &self.params {
            match raw.get(spec.name) {
                None | Some(JsonValue::Null) => {
                    if spec.required {
                        problems.push(format!("missing required parameter '{}'", spec.name));
                    }
                }
                Some(value) => match spec.arg_type.coerce(value) {
                    Some(coerced) => {
                        values.insert(spec.name.to_string(), coerced);
                    }
                    None => problems.push(format!(
                        "parameter '{}' must be {}",
                        spec.name, spec.arg_type
                    )),
                },
            }
        }

        if problems.is_empty() {
            Ok(ValidatedArgs { values })
        } else {
            Err(problems)
        }
    }

    /// Render the schema as a JSON Schema object for tool listings.
    pub fn to_json_schema(&self) -> Map<String, JsonValue> {
        let properties: Map<String, JsonValue> = self
            .params
            .iter()
            .map(|spec| {
                let mut prop = json!({
                    "type": spec.arg_type.json_type(),
                    "title": spec.title,
                    "description": spec.description,
                });
                if spec.arg_type == ArgType::StringList {
                    prop["items"] = json!({ "type": "string" });
                }
                (spec.name.to_string(), prop)
            })
            .collect();

        let required: Vec<JsonValue> = self
            .params
            .iter()
            .filter(|spec| spec.required)
            .map(|spec| JsonValue::String(spec.name.to_string()))
            .collect();

        let mut schema = Map::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), JsonValue::Object(properties));
        schema.insert("required".to_string(), JsonValue::Array(required));
        schema
    }
}

/// Arguments that passed schema validation.
#[derive(Debug, Clone, Default)]
pub struct ValidatedArgs {
    values: HashMap<String, ArgValue>,
}

impl ValidatedArgs {
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(ArgValue::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        match self.values.get(name) {
            Some(ArgValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        match self.values.get(name) {
            Some(ArgValue::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn string_list(&self, name: &str) -> Option<&[String]> {
        match self.values.get(name) {
            Some(ArgValue::StringList(v)) => Some(v),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> ArgumentSchema {
        ArgumentSchema::new()
            .param(ParamSpec::string("path", "Path", "File path"))
            .param(ParamSpec::string("limit", "Limit", "Row limit").with_type(ArgType::Integer))
            .param(
                ParamSpec::string("verbose", "Verbose", "Verbose output")
                    .with_type(ArgType::Boolean)
                    .optional(),
            )
            .param(
                ParamSpec::string("tags", "Tags", "Tag names")
                    .with_type(ArgType::StringList)
                    .optional(),
            )
    }

    fn raw(value: JsonValue) -> Map<String, JsonValue> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_validate_accepts_well_typed_args() {
        let args = schema()
            .validate(&raw(json!({"path": "a.db", "limit": 5, "verbose": true})))
            .unwrap();
        assert_eq!(args.str("path"), Some("a.db"));
        assert_eq!(args.int("limit"), Some(5));
        assert_eq!(args.bool("verbose"), Some(true));
        assert_eq!(args.string_list("tags"), None);
    }

    #[test]
    fn test_validate_coerces_quoted_scalars() {
        let args = schema()
            .validate(&raw(json!({"path": "a.db", "limit": " 42 ", "verbose": "FALSE"})))
            .unwrap();
        assert_eq!(args.int("limit"), Some(42));
        assert_eq!(args.bool("verbose"), Some(false));
    }

    #[test]
    fn test_validate_reports_every_problem() {
        let problems = schema()
            .validate(&raw(json!({"limit": "many", "tags": ["a", 1]})))
            .unwrap_err();
        assert_eq!(problems.len(), 3);
        assert!(problems.iter().any(|p| p.contains("'path'")));
        assert!(problems.iter().any(|p| p.contains("'limit'")));
        assert!(problems.iter().any(|p| p.contains("'tags'")));
    }

    #[test]
    fn test_validate_null_optional_is_absent() {
        let args = schema()
            .validate(&raw(json!({"path": "a.db", "limit": 1, "verbose": null})))
            .unwrap();
        assert_eq!(args.len(), 2);
        assert!(args.get("verbose").is_none());
    }

    #[test]
    fn test_validate_rejects_null_required() {
        let problems = schema()
            .validate(&raw(json!({"path": null, "limit": 1})))
            .unwrap_err();
        assert_eq!(problems, vec!["missing required parameter 'path'"]);
    }

    #[test]
    fn test_validate_ignores_unknown_keys() {
        let args = schema()
            .validate(&raw(json!({"path": "a.db", "limit": 1, "extra": "x"})))
            .unwrap();
        assert!(args.get("extra").is_none());
    }

    #[test]
    fn test_string_does_not_accept_numbers() {
        assert_eq!(ArgType::String.coerce(&json!(12)), None);
    }

    #[test]
    fn test_json_schema_shape() {
        let schema = schema().to_json_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["limit"]["type"], "integer");
        assert_eq!(schema["properties"]["tags"]["items"]["type"], "string");
        assert_eq!(schema["required"], json!(["path", "limit"]));
    }
}
