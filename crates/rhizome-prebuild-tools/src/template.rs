//! The `template` tool: renders `{{variable}}` placeholders in a file.

use crate::codes::BuiltinDiagnosticCode;
use crate::{substitute, write_file};
use rhizome_prebuild_core::{CodeGeneratorTool, Diagnostic, ToolContext};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const OPTIONS_SCHEMA: &str = r#"{
    "type": "object",
    "properties": {
        "vars": {
            "type": "object",
            "additionalProperties": { "type": ["string", "number", "boolean"] }
        }
    },
    "additionalProperties": false
}"#;

/// Renders the entry's `filePath` into the output directory.
///
/// Placeholders are filled from the package (`name`, `version`, `org`) and
/// from `options.vars`, which take precedence. A trailing `.in` is dropped
/// from the output file name.
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateTool;

#[derive(Debug, thiserror::Error)]
enum TemplateError {
    #[error("tool '{0}' requires a 'filePath'")]
    MissingFilePath(String),
    #[error("template file not found: {0}")]
    NotFound(String),
    #[error("failed to read template {0}: {1}")]
    Read(String, #[source] io::Error),
    #[error("failed to write {0}: {1}")]
    Write(String, #[source] io::Error),
}

impl TemplateError {
    fn code(&self) -> BuiltinDiagnosticCode {
        match self {
            TemplateError::MissingFilePath(_) => BuiltinDiagnosticCode::MissingFilePath,
            TemplateError::NotFound(_) => BuiltinDiagnosticCode::InputNotFound,
            TemplateError::Read(..) => BuiltinDiagnosticCode::InputUnreadable,
            TemplateError::Write(..) => BuiltinDiagnosticCode::WriteFailed,
        }
    }
}

impl CodeGeneratorTool for TemplateTool {
    fn tool_name(&self) -> &str {
        "template"
    }

    fn options_schema(&self) -> Option<&str> {
        Some(OPTIONS_SCHEMA)
    }

    fn execute(&self, ctx: &mut ToolContext<'_>) {
        match render(ctx) {
            Ok(path) => tracing::debug!(?path, "rendered template"),
            Err(e) => ctx.report_diagnostic(Diagnostic::new(&e.code(), e.to_string())),
        }
    }
}

fn render(ctx: &mut ToolContext<'_>) -> Result<PathBuf, TemplateError> {
    let file_path = ctx
        .file_path()
        .ok_or_else(|| TemplateError::MissingFilePath(ctx.tool_id().to_string()))?
        .to_string();

    let input = ctx.package().root().join(&file_path);
    let contents = fs::read_to_string(&input).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            TemplateError::NotFound(file_path.clone())
        } else {
            TemplateError::Read(file_path.clone(), e)
        }
    })?;

    let vars = template_vars(ctx);
    let rendered = substitute(&contents, &vars);
    let unresolved = unresolved_placeholders(&contents)
        .into_iter()
        .filter(|name| !vars.contains_key(*name));
    for name in unresolved {
        ctx.report_diagnostic(Diagnostic::new(
            &BuiltinDiagnosticCode::UnresolvedPlaceholder,
            format!("unresolved placeholder '{{{{{name}}}}}' in {file_path}"),
        ));
    }

    let output = ctx.output_path().join(output_name(&file_path, ctx.tool_id()));
    write_file(&output, &rendered)
        .map_err(|e| TemplateError::Write(output.display().to_string(), e))?;
    Ok(output)
}

fn template_vars(ctx: &ToolContext<'_>) -> HashMap<String, String> {
    let package = ctx.package().descriptor();
    let mut vars = HashMap::new();
    vars.insert("name".to_string(), package.name.clone());
    vars.insert("version".to_string(), package.version.clone());
    if let Some(org) = &package.org {
        vars.insert("org".to_string(), org.clone());
    }

    let declared = ctx
        .options()
        .and_then(|o| o.get("vars"))
        .and_then(|v| v.as_table());
    if let Some(declared) = declared {
        for (key, value) in declared {
            if let Some(value) = scalar_to_string(value) {
                vars.insert(key.clone(), value);
            }
        }
    }
    vars
}

fn scalar_to_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Names of `{{identifier}}` placeholders in a template, in order of first
/// appearance.
fn unresolved_placeholders(text: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            break;
        };
        let name = &after[..end];
        let is_identifier = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if is_identifier && !names.contains(&name) {
            names.push(name);
        }
        rest = &after[end + 2..];
    }
    names
}

fn output_name(file_path: &str, fallback: &str) -> String {
    let name = Path::new(file_path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| fallback.to_string());
    match name.strip_suffix(".in") {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => name,
    }
}
