//! Prebuild core: runs the code generation tools a package declares before
//! it is compiled.
//!
//! A package lists its tools as `[[tool.<type>]]` entries in
//! `prebuild.toml`. Each entry is resolved against a [`ToolRegistry`], its
//! options are checked against the tool's schema, and the tool runs with a
//! [`ToolContext`] it reports [`Diagnostic`]s to.

mod config;
mod context;
mod diagnostic;
mod manifest;
mod options;
mod orchestrator;
mod package;
mod registry;
mod tool;

pub use config::{BuildLayout, ConfigError, LogConfig, UserConfig};
pub use context::ToolContext;
pub use diagnostic::{Diagnostic, DiagnosticCode, Diagnostics, ProjectDiagnosticCode, Severity};
pub use manifest::{
    MANIFEST_FILE, Manifest, ManifestError, PackageDescriptor, ToolDeclaration, is_nested_path,
};
pub use options::{OptionsError, OptionsValidator, SchemaError, SchemaProvider};
pub use orchestrator::{BuildError, PreBuildTask, RunOutcome};
pub use package::Package;
pub use registry::{RegistryError, ToolRegistry};
pub use tool::CodeGeneratorTool;
