//! The `version-info` tool: writes package metadata for the build to embed.

use crate::codes::BuiltinDiagnosticCode;
use crate::write_file;
use rhizome_prebuild_core::{CodeGeneratorTool, Diagnostic, ToolContext, is_nested_path};
use serde::{Deserialize, Serialize};

const OPTIONS_SCHEMA: &str = r#"{
    "type": "object",
    "properties": {
        "file": { "type": "string", "minLength": 1 },
        "format": { "enum": ["json", "toml", "yaml"] }
    },
    "additionalProperties": false
}"#;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Toml,
    Yaml,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Toml => "toml",
            OutputFormat::Yaml => "yaml",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct VersionInfoOptions {
    file: Option<String>,
    format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct VersionInfo<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    org: Option<&'a str>,
    name: &'a str,
    version: &'a str,
}

/// Writes `org`, `name` and `version` of the package to
/// `<output>/<options.file>` (default `version.<format>`).
#[derive(Debug, Default, Clone, Copy)]
pub struct VersionInfoTool;

impl CodeGeneratorTool for VersionInfoTool {
    fn tool_name(&self) -> &str {
        "version-info"
    }

    fn options_schema(&self) -> Option<&str> {
        Some(OPTIONS_SCHEMA)
    }

    fn execute(&self, ctx: &mut ToolContext<'_>) {
        let options = match read_options(ctx.options()) {
            Ok(options) => options,
            Err(e) => {
                ctx.report_diagnostic(Diagnostic::new(
                    &BuiltinDiagnosticCode::InvalidOptions,
                    format!("invalid options for tool 'version-info': {e}"),
                ));
                return;
            }
        };

        let file = options
            .file
            .unwrap_or_else(|| format!("version.{}", options.format.extension()));
        if !is_nested_path(&file) {
            ctx.report_diagnostic(Diagnostic::new(
                &BuiltinDiagnosticCode::InvalidOptions,
                format!(
                    "invalid options for tool 'version-info': 'file' must be a relative path without '..', found '{file}'"
                ),
            ));
            return;
        }

        let descriptor = ctx.package().descriptor();
        let info = VersionInfo {
            org: descriptor.org.as_deref(),
            name: &descriptor.name,
            version: &descriptor.version,
        };

        let contents = match serialize(&info, options.format) {
            Ok(contents) => contents,
            Err(message) => {
                ctx.report_diagnostic(Diagnostic::new(
                    &BuiltinDiagnosticCode::SerializeFailed,
                    format!("failed to serialize version info: {message}"),
                ));
                return;
            }
        };

        let path = ctx.output_path().join(file);
        match write_file(&path, &contents) {
            Ok(()) => tracing::debug!(?path, "wrote version info"),
            Err(e) => ctx.report_diagnostic(Diagnostic::new(
                &BuiltinDiagnosticCode::WriteFailed,
                format!("failed to write {}: {e}", path.display()),
            )),
        }
    }
}

fn read_options(options: Option<&toml::Table>) -> Result<VersionInfoOptions, toml::de::Error> {
    match options {
        Some(table) => toml::Value::Table(table.clone()).try_into(),
        None => Ok(VersionInfoOptions::default()),
    }
}

fn serialize(info: &VersionInfo<'_>, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(info)
            .map(|s| s + "\n")
            .map_err(|e| e.to_string()),
        OutputFormat::Toml => toml::to_string_pretty(info).map_err(|e| e.to_string()),
        OutputFormat::Yaml => serde_yaml::to_string(info).map_err(|e| e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rhizome_prebuild_core::{BuildLayout, Manifest, Package};
    use std::fs;
    use std::path::Path;

    fn package(root: &Path, options: &str) -> Package {
        let manifest = Manifest::from_str(&format!(
            r#"
            [package]
            name = "petstore"
            version = "1.4.2"

            [[tool.version-info]]
            id = "version"
            filePath = "prebuild.toml"
            options = {options}
            "#
        ))
        .unwrap();
        Package::new(root, manifest)
    }

    fn run(package: &Package) -> Vec<Diagnostic> {
        let layout = BuildLayout::default();
        let mut ctx = ToolContext::new(&package.tools()[0], package, &layout);
        VersionInfoTool.execute(&mut ctx);
        ctx.into_diagnostics().into_iter().collect()
    }

    #[test]
    fn writes_json_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let package = package(dir.path(), "{}");

        assert!(run(&package).is_empty());

        let contents = fs::read_to_string(dir.path().join("generated/version.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "name": "petstore", "version": "1.4.2" })
        );
    }

    #[test]
    fn writes_yaml_to_custom_file() {
        let dir = tempfile::tempdir().unwrap();
        let package = package(dir.path(), r#"{ format = "yaml", file = "meta/info.yml" }"#);

        assert!(run(&package).is_empty());

        let contents = fs::read_to_string(dir.path().join("generated/meta/info.yml")).unwrap();
        assert!(contents.contains("name: petstore"));
        assert!(contents.contains("version: 1.4.2"));
    }

    #[test]
    fn unknown_format_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let package = package(dir.path(), r#"{ format = "xml" }"#);

        let diagnostics = run(&package);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].has_code(&BuiltinDiagnosticCode::InvalidOptions));
        assert!(!dir.path().join("generated").exists());
    }

    #[test]
    fn file_outside_output_directory_is_rejected() {
        for file in ["../escape.json", "/tmp/escape.json", "meta/../../escape.json"] {
            let dir = tempfile::tempdir().unwrap();
            let package = package(dir.path(), &format!(r#"{{ file = "{file}" }}"#));

            let diagnostics = run(&package);
            assert_eq!(diagnostics.len(), 1);
            assert!(diagnostics[0].has_code(&BuiltinDiagnosticCode::InvalidOptions));
            assert!(diagnostics[0].message().contains(file));
            assert!(!dir.path().join("generated").exists());
            assert!(!dir.path().join("escape.json").exists());
        }
    }
}
