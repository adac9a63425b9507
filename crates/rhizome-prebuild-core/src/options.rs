//! Validation of tool options against tool-provided schemas.
//!
//! Each tool owns the JSON Schema for its `options` table. The validator
//! converts the table to JSON and reports every violation as a diagnostic.

use crate::diagnostic::{Diagnostic, ProjectDiagnosticCode};

/// Errors that can occur when fetching a schema.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("tool '{0}' is not registered")]
    ToolNotFound(String),
    #[error("no options schema found for tool '{0}'")]
    SchemaNotFound(String),
    #[error("options schema of tool '{0}' is not valid JSON: {1}")]
    InvalidSchema(String, serde_json::Error),
}

/// Failures that prevent validation from running at all.
///
/// These never block a build; callers downgrade them to a warning.
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("No tool options found")]
    MissingOptions,
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("options schema of tool '{tool}' cannot be compiled: {message}")]
    Compile { tool: String, message: String },
}

/// Provides options schemas for tools.
pub trait SchemaProvider {
    /// Fetch the options schema for a tool by name.
    fn options_schema(&self, tool: &str) -> Result<serde_json::Value, SchemaError>;
}

/// Checks a tool's options table against the tool's schema.
#[derive(Debug, Default, Clone, Copy)]
pub struct OptionsValidator;

impl OptionsValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate `options` for `tool_name`.
    ///
    /// Returns one `InvalidToolOptions` diagnostic per violation; an empty
    /// vector means the options are valid.
    pub fn validate(
        &self,
        options: Option<&toml::Table>,
        tool_name: &str,
        provider: &dyn SchemaProvider,
    ) -> Result<Vec<Diagnostic>, OptionsError> {
        let options = options.ok_or(OptionsError::MissingOptions)?;
        let schema = provider.options_schema(tool_name)?;

        let validator = jsonschema::validator_for(&schema).map_err(|e| OptionsError::Compile {
            tool: tool_name.to_string(),
            message: e.to_string(),
        })?;

        let instance = table_to_json(options);
        let diagnostics = validator
            .iter_errors(&instance)
            .map(|e| {
                Diagnostic::new(
                    &ProjectDiagnosticCode::InvalidToolOptions,
                    format!(
                        "invalid options for tool '{tool_name}' at 'options{}': {e}",
                        e.instance_path
                    ),
                )
            })
            .collect();

        Ok(diagnostics)
    }
}

fn table_to_json(table: &toml::Table) -> serde_json::Value {
    let map = table
        .iter()
        .map(|(k, v)| (k.clone(), toml_to_json(v)))
        .collect();
    serde_json::Value::Object(map)
}

/// Datetimes become strings; non-finite floats become `null`.
fn toml_to_json(value: &toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s.clone()),
        toml::Value::Integer(i) => serde_json::Value::Number((*i).into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        toml::Value::Boolean(b) => serde_json::Value::Bool(*b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => serde_json::Value::Array(arr.iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => table_to_json(table),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct StaticSchemas(HashMap<&'static str, serde_json::Value>);

    impl SchemaProvider for StaticSchemas {
        fn options_schema(&self, tool: &str) -> Result<serde_json::Value, SchemaError> {
            self.0
                .get(tool)
                .cloned()
                .ok_or_else(|| SchemaError::SchemaNotFound(tool.to_string()))
        }
    }

    fn provider() -> StaticSchemas {
        let mut schemas = HashMap::new();
        schemas.insert(
            "openapi",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "mode": { "enum": ["client", "service"] },
                    "tags": { "type": "array", "items": { "type": "string" } }
                },
                "required": ["mode"],
                "additionalProperties": false
            }),
        );
        schemas.insert("broken", serde_json::json!({ "type": 42 }));
        StaticSchemas(schemas)
    }

    fn table(s: &str) -> toml::Table {
        toml::from_str(s).unwrap()
    }

    #[test]
    fn valid_options_yield_no_diagnostics() {
        let options = table(r#"mode = "client""#);
        let diagnostics = OptionsValidator::new()
            .validate(Some(&options), "openapi", &provider())
            .unwrap();
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn violations_become_error_diagnostics() {
        let options = table(
            r#"
            mode = "server"
            tags = ["a", 1]
            "#,
        );
        let diagnostics = OptionsValidator::new()
            .validate(Some(&options), "openapi", &provider())
            .unwrap();

        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.iter().all(Diagnostic::is_error));
        assert!(
            diagnostics
                .iter()
                .all(|d| d.has_code(&ProjectDiagnosticCode::InvalidToolOptions))
        );
        assert!(diagnostics.iter().any(|d| d.message().contains("options/mode")));
        assert!(diagnostics.iter().any(|d| d.message().contains("options/tags/1")));
    }

    #[test]
    fn missing_options_is_an_infrastructure_failure() {
        let err = OptionsValidator::new()
            .validate(None, "openapi", &provider())
            .unwrap_err();
        assert!(matches!(err, OptionsError::MissingOptions));
        assert_eq!(err.to_string(), "No tool options found");
    }

    #[test]
    fn missing_schema_is_an_infrastructure_failure() {
        let options = table(r#"mode = "client""#);
        let err = OptionsValidator::new()
            .validate(Some(&options), "grpc", &provider())
            .unwrap_err();
        assert!(matches!(err, OptionsError::Schema(SchemaError::SchemaNotFound(_))));
    }

    #[test]
    fn uncompilable_schema_is_an_infrastructure_failure() {
        let options = table(r#"mode = "client""#);
        let err = OptionsValidator::new()
            .validate(Some(&options), "broken", &provider())
            .unwrap_err();
        assert!(matches!(err, OptionsError::Compile { .. }));
    }

    #[test]
    fn nested_tables_convert_to_objects() {
        let value: toml::Value = toml::from_str::<toml::Table>(
            r#"
            [vars]
            who = "world"
            count = 3
            ratio = 0.5
            at = 1979-05-27T07:32:00Z
            nan = nan
            "#,
        )
        .unwrap()
        .into();
        let json = toml_to_json(&value);
        assert_eq!(
            json,
            serde_json::json!({
                "vars": {
                    "who": "world",
                    "count": 3,
                    "ratio": 0.5,
                    "at": "1979-05-27T07:32:00Z",
                    "nan": null
                }
            })
        );
    }
}
