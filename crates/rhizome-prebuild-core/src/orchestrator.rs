//! Runs the tools declared in a package manifest before compilation.
//!
//! Tools run one at a time in declaration order. Each tool's diagnostics are
//! written out before the next tool starts, and the first ERROR diagnostic
//! ends the run.

use crate::config::BuildLayout;
use crate::context::ToolContext;
use crate::diagnostic::{Diagnostic, ProjectDiagnosticCode};
use crate::manifest::ToolDeclaration;
use crate::options::OptionsValidator;
use crate::package::Package;
use crate::registry::ToolRegistry;
use std::io::{self, Write};

/// How a run that did not fail ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every declared tool ran.
    Completed,
    /// A declared tool type is not registered; later tools were not attempted.
    ToolNotFound(String),
}

/// A run that must fail the build.
///
/// Carries no detail beyond what has already been written to the output.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("compilation contains errors")]
    ContainsErrors,
    #[error("failed to write build output: {0}")]
    Output(#[from] io::Error),
}

enum ToolStep {
    Continue,
    Stop(String),
}

/// The pre-build step of a package build.
///
/// Diagnostics and user-facing messages go to `out`, one line each.
#[derive(Debug)]
pub struct PreBuildTask<W> {
    out: W,
    layout: BuildLayout,
    validator: OptionsValidator,
}

impl<W: Write> PreBuildTask<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            layout: BuildLayout::default(),
            validator: OptionsValidator::new(),
        }
    }

    /// Use a custom output layout for tool contexts.
    pub fn with_layout(mut self, layout: BuildLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Recover the output writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Run every tool declared by `package`.
    pub fn execute(
        &mut self,
        package: &Package,
        registry: &ToolRegistry,
    ) -> Result<RunOutcome, BuildError> {
        let manifest_diagnostics = &package.manifest().diagnostics;
        if manifest_diagnostics.has_errors() {
            tracing::debug!(
                count = manifest_diagnostics.len(),
                "manifest has errors, no tools will run"
            );
            self.print_all(manifest_diagnostics)?;
            return Err(BuildError::ContainsErrors);
        }

        for declaration in package.tools() {
            match self.run_tool(declaration, package, registry)? {
                ToolStep::Continue => {}
                ToolStep::Stop(type_name) => return Ok(RunOutcome::ToolNotFound(type_name)),
            }
        }

        tracing::debug!(tools = package.tools().len(), "pre-build tools completed");
        Ok(RunOutcome::Completed)
    }

    fn run_tool(
        &mut self,
        declaration: &ToolDeclaration,
        package: &Package,
        registry: &ToolRegistry,
    ) -> Result<ToolStep, BuildError> {
        let span = tracing::info_span!("tool", tool_type = %declaration.type_name, id = %declaration.id);
        let _enter = span.enter();

        let Some(tool) = registry.lookup(&declaration.type_name) else {
            writeln!(self.out, "Command not found: {}", declaration.type_name)?;
            tracing::warn!("tool is not registered, ending pre-build run");
            return Ok(ToolStep::Stop(declaration.type_name.clone()));
        };

        match self.validator.validate(
            declaration.options.as_ref(),
            &declaration.type_name,
            registry,
        ) {
            Ok(diagnostics) => {
                self.print_all(&diagnostics)?;
                if diagnostics.iter().any(Diagnostic::is_error) {
                    return Err(BuildError::ContainsErrors);
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "options validation skipped");
                let warning = Diagnostic::new(
                    &ProjectDiagnosticCode::ToolOptionsValidationSkipped,
                    format!("Skipping the validation of tool options due to: {e}"),
                );
                writeln!(self.out, "{warning}")?;
            }
        }

        let mut ctx = ToolContext::new(declaration, package, &self.layout);
        tracing::info!("executing tool");
        tool.execute(&mut ctx);
        let diagnostics = ctx.into_diagnostics();

        self.print_all(&diagnostics)?;
        if diagnostics.has_errors() {
            return Err(BuildError::ContainsErrors);
        }
        Ok(ToolStep::Continue)
    }

    fn print_all<'d>(
        &mut self,
        diagnostics: impl IntoIterator<Item = &'d Diagnostic>,
    ) -> io::Result<()> {
        for diagnostic in diagnostics {
            writeln!(self.out, "{diagnostic}")?;
        }
        Ok(())
    }
}
