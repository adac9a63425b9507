//! The plugin interface implemented by code generation tools.

use crate::context::ToolContext;

/// A code generation tool that runs before compilation.
///
/// Tools never fail with an error value: every problem they find is
/// reported through [`ToolContext::report_diagnostic`], and an ERROR
/// diagnostic stops the build after the tool returns.
pub trait CodeGeneratorTool: Send + Sync {
    /// Type name matched against `[[tool.<type>]]` entries.
    fn tool_name(&self) -> &str;

    /// JSON Schema for the tool's `options` table.
    ///
    /// Tools without a schema get their options passed through unvalidated.
    fn options_schema(&self) -> Option<&str> {
        None
    }

    /// Run the tool for one manifest entry.
    fn execute(&self, ctx: &mut ToolContext<'_>);
}
