//! Per-invocation handle given to a tool.

use crate::config::BuildLayout;
use crate::diagnostic::{Diagnostic, Diagnostics};
use crate::manifest::ToolDeclaration;
use crate::package::Package;
use std::path::PathBuf;

/// What a tool sees while it runs: its manifest entry, the package, and a
/// sink for diagnostics.
///
/// A context lives for exactly one tool invocation. Diagnostics can only be
/// appended.
#[derive(Debug)]
pub struct ToolContext<'a> {
    declaration: &'a ToolDeclaration,
    package: &'a Package,
    layout: &'a BuildLayout,
    diagnostics: Diagnostics,
}

impl<'a> ToolContext<'a> {
    pub fn new(
        declaration: &'a ToolDeclaration,
        package: &'a Package,
        layout: &'a BuildLayout,
    ) -> Self {
        Self {
            declaration,
            package,
            layout,
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn tool_type(&self) -> &str {
        &self.declaration.type_name
    }

    pub fn tool_id(&self) -> &str {
        &self.declaration.id
    }

    pub fn file_path(&self) -> Option<&str> {
        self.declaration.file_path.as_deref()
    }

    pub fn target_module(&self) -> Option<&str> {
        self.declaration.target_module.as_deref()
    }

    /// The entry's options table. May not have passed validation.
    pub fn options(&self) -> Option<&toml::Table> {
        self.declaration.options.as_ref()
    }

    pub fn package(&self) -> &'a Package {
        self.package
    }

    /// Directory generated sources go to: the generated root, or the target
    /// module's directory beneath it.
    pub fn output_path(&self) -> PathBuf {
        let generated = self.package.root().join(&self.layout.generated_dir);
        match self.target_module() {
            Some(module) => generated.join(module),
            None => generated,
        }
    }

    /// Cache directory reserved for this entry.
    pub fn cache_path(&self) -> PathBuf {
        self.package
            .root()
            .join(&self.layout.cache_dir)
            .join(self.tool_id())
    }

    pub fn report_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::{ProjectDiagnosticCode, Severity};
    use crate::manifest::Manifest;
    use std::path::Path;

    fn package() -> Package {
        let manifest = Manifest::from_str(
            r#"
            [package]
            name = "petstore"
            version = "0.1.0"

            [[tool.openapi]]
            id = "client"
            filePath = "api.yaml"
            targetModule = "client"

            [tool.openapi.options]
            mode = "client"

            [[tool.openapi]]
            id = "service"
            filePath = "api.yaml"
            "#,
        )
        .unwrap();
        Package::new("/work/petstore", manifest)
    }

    #[test]
    fn exposes_declaration_and_paths() {
        let package = package();
        let layout = BuildLayout::default();
        let ctx = ToolContext::new(&package.tools()[0], &package, &layout);

        assert_eq!(ctx.tool_type(), "openapi");
        assert_eq!(ctx.tool_id(), "client");
        assert_eq!(ctx.file_path(), Some("api.yaml"));
        assert_eq!(ctx.options().unwrap()["mode"].as_str(), Some("client"));
        assert_eq!(ctx.package().name(), "petstore");
        assert_eq!(
            ctx.output_path(),
            Path::new("/work/petstore/generated/client")
        );
        assert_eq!(
            ctx.cache_path(),
            Path::new("/work/petstore/target/tool-cache/client")
        );
    }

    #[test]
    fn output_path_without_target_module() {
        let package = package();
        let layout = BuildLayout::default();
        let ctx = ToolContext::new(&package.tools()[1], &package, &layout);

        assert!(ctx.options().is_none());
        assert_eq!(ctx.output_path(), Path::new("/work/petstore/generated"));
    }

    #[test]
    fn diagnostics_are_appended_in_order() {
        let package = package();
        let layout = BuildLayout::default();
        let mut ctx = ToolContext::new(&package.tools()[0], &package, &layout);

        ctx.report_diagnostic(Diagnostic::with_severity(
            &ProjectDiagnosticCode::InvalidToolOptions,
            Severity::Info,
            "one",
        ));
        ctx.report_diagnostic(Diagnostic::new(&ProjectDiagnosticCode::InvalidToolOptions, "two"));

        assert_eq!(ctx.diagnostics().len(), 2);
        let messages: Vec<_> = ctx
            .into_diagnostics()
            .into_iter()
            .map(|d| d.message().to_string())
            .collect();
        assert_eq!(messages, ["one", "two"]);
    }
}
