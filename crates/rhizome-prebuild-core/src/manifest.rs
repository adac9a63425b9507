//! Manifest parsing for `prebuild.toml`.

use crate::diagnostic::{Diagnostic, Diagnostics, ProjectDiagnosticCode};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Component, Path};

/// File name of the package manifest.
pub const MANIFEST_FILE: &str = "prebuild.toml";

/// A parsed manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    /// Package metadata.
    pub package: PackageDescriptor,
    /// Declared tools, in declaration order.
    pub tools: Vec<ToolDeclaration>,
    /// Problems found while reading tool entries.
    pub diagnostics: Diagnostics,
}

/// Package metadata from the `[package]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageDescriptor {
    /// Organization name.
    #[serde(default)]
    pub org: Option<String>,
    /// Package name.
    pub name: String,
    /// Package version.
    pub version: String,
}

/// One `[[tool.<type>]]` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDeclaration {
    /// Tool type, used to look up the implementation.
    pub type_name: String,
    /// Unique id of this entry within the manifest.
    pub id: String,
    /// Input file the tool works on, relative to the package root.
    pub file_path: Option<String>,
    /// Module the generated sources belong to.
    pub target_module: Option<String>,
    /// Tool-specific options; `None` when the entry has no options table.
    pub options: Option<toml::Table>,
}

/// Errors that can occur when loading a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to read manifest: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse manifest: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("missing required [package] section")]
    MissingPackage,
}

impl Manifest {
    /// Load a manifest from a file path.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_str(&contents)
    }

    /// Parse a manifest from a TOML string.
    ///
    /// Malformed tool entries do not fail the parse; they are recorded in
    /// [`Manifest::diagnostics`].
    pub fn from_str(s: &str) -> Result<Self, ManifestError> {
        let mut table: toml::Table = toml::from_str(s)?;

        let package_value = table
            .remove("package")
            .ok_or(ManifestError::MissingPackage)?;
        let package: PackageDescriptor = package_value.try_into()?;

        let mut diagnostics = Diagnostics::new();
        let tools = match table.remove("tool") {
            Some(toml::Value::Table(types)) => read_tools(types, &mut diagnostics),
            Some(other) => {
                diagnostics.push(Diagnostic::new(
                    &ProjectDiagnosticCode::IncompatibleTypeForToolProperty,
                    format!("'tool' must be a table, found {}", other.type_str()),
                ));
                Vec::new()
            }
            None => Vec::new(),
        };

        Ok(Self {
            package,
            tools,
            diagnostics,
        })
    }

    /// Find a declaration by id.
    pub fn tool(&self, id: &str) -> Option<&ToolDeclaration> {
        self.tools.iter().find(|t| t.id == id)
    }
}

fn read_tools(types: toml::Table, diagnostics: &mut Diagnostics) -> Vec<ToolDeclaration> {
    let mut tools = Vec::new();
    let mut seen_ids = HashSet::new();

    for (type_name, entries) in types {
        let toml::Value::Array(entries) = entries else {
            diagnostics.push(Diagnostic::new(
                &ProjectDiagnosticCode::IncompatibleTypeForToolProperty,
                format!(
                    "tool '{type_name}' must be declared as an array of tables ([[tool.{type_name}]])"
                ),
            ));
            continue;
        };

        for (index, entry) in entries.into_iter().enumerate() {
            let toml::Value::Table(entry) = entry else {
                diagnostics.push(Diagnostic::new(
                    &ProjectDiagnosticCode::IncompatibleTypeForToolProperty,
                    format!("entry {index} of tool '{type_name}' must be a table"),
                ));
                continue;
            };

            let Some(tool) = read_tool(&type_name, entry, diagnostics) else {
                continue;
            };

            if !seen_ids.insert(tool.id.clone()) {
                diagnostics.push(Diagnostic::new(
                    &ProjectDiagnosticCode::RecurringToolProperties,
                    format!(
                        "recurring tool id '{}' found in {MANIFEST_FILE}; tool ids must be unique",
                        tool.id
                    ),
                ));
            }
            tools.push(tool);
        }
    }

    tools
}

fn read_tool(
    type_name: &str,
    mut entry: toml::Table,
    diagnostics: &mut Diagnostics,
) -> Option<ToolDeclaration> {
    let id = required_string(type_name, "id", entry.remove("id"), diagnostics);
    let file_path = required_string(type_name, "filePath", entry.remove("filePath"), diagnostics);
    let target_module = entry
        .remove("targetModule")
        .and_then(|v| string_value(type_name, "targetModule", v, diagnostics))
        .filter(|module| {
            let nested = is_nested_path(module);
            if !nested {
                diagnostics.push(Diagnostic::new(
                    &ProjectDiagnosticCode::IncompatibleTypeForToolProperty,
                    format!(
                        "tool property 'targetModule' of tool '{type_name}' must be a relative path without '..', found '{module}'"
                    ),
                ));
            }
            nested
        });

    let options = match entry.remove("options") {
        Some(toml::Value::Table(options)) => Some(options),
        Some(other) => {
            diagnostics.push(incompatible(type_name, "options", "a table", &other));
            None
        }
        None => None,
    };

    Some(ToolDeclaration {
        type_name: type_name.to_string(),
        id: id?,
        file_path,
        target_module,
        options,
    })
}

fn required_string(
    type_name: &str,
    key: &str,
    value: Option<toml::Value>,
    diagnostics: &mut Diagnostics,
) -> Option<String> {
    match value {
        Some(value) => string_value(type_name, key, value, diagnostics),
        None => {
            diagnostics.push(Diagnostic::new(
                &ProjectDiagnosticCode::MissingToolProperties,
                format!("missing tool property '{key}' for tool '{type_name}'"),
            ));
            None
        }
    }
}

fn string_value(
    type_name: &str,
    key: &str,
    value: toml::Value,
    diagnostics: &mut Diagnostics,
) -> Option<String> {
    match value {
        toml::Value::String(s) if s.trim().is_empty() => {
            diagnostics.push(Diagnostic::new(
                &ProjectDiagnosticCode::EmptyToolProperty,
                format!("tool property '{key}' of tool '{type_name}' is empty"),
            ));
            None
        }
        toml::Value::String(s) => Some(s),
        other => {
            diagnostics.push(incompatible(type_name, key, "a string", &other));
            None
        }
    }
}

/// Whether `path` is relative and stays below the directory it is joined to.
pub fn is_nested_path(path: &str) -> bool {
    let mut components = Path::new(path).components().peekable();
    components.peek().is_some()
        && components.all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

fn incompatible(type_name: &str, key: &str, expected: &str, found: &toml::Value) -> Diagnostic {
    Diagnostic::new(
        &ProjectDiagnosticCode::IncompatibleTypeForToolProperty,
        format!(
            "tool property '{key}' of tool '{type_name}' must be {expected}, found {}",
            found.type_str()
        ),
    )
}
