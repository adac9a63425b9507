//! Registry of available code generation tools.

use crate::options::{SchemaError, SchemaProvider};
use crate::tool::CodeGeneratorTool;
use std::fmt;

/// Errors raised while building the registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("tool '{0}' is already registered")]
    DuplicateTool(String),
}

/// Maps tool type names to implementations.
///
/// Built once at startup and read-only afterwards.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Box<dyn CodeGeneratorTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from an explicit list of tools.
    pub fn from_tools(
        tools: impl IntoIterator<Item = Box<dyn CodeGeneratorTool>>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for tool in tools {
            registry.register(tool)?;
        }
        Ok(registry)
    }

    /// Register a tool. Names must be unique; the existing entry is kept on collision.
    pub fn register(&mut self, tool: Box<dyn CodeGeneratorTool>) -> Result<(), RegistryError> {
        if self.lookup(tool.tool_name()).is_some() {
            return Err(RegistryError::DuplicateTool(tool.tool_name().to_string()));
        }
        tracing::debug!(tool = tool.tool_name(), "registered tool");
        self.tools.push(tool);
        Ok(())
    }

    /// Find a tool by exact type name.
    pub fn lookup(&self, name: &str) -> Option<&dyn CodeGeneratorTool> {
        self.tools
            .iter()
            .find(|t| t.tool_name() == name)
            .map(|t| t.as_ref())
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|t| t.tool_name())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl SchemaProvider for ToolRegistry {
    fn options_schema(&self, tool: &str) -> Result<serde_json::Value, SchemaError> {
        let plugin = self
            .lookup(tool)
            .ok_or_else(|| SchemaError::ToolNotFound(tool.to_string()))?;
        let schema = plugin
            .options_schema()
            .ok_or_else(|| SchemaError::SchemaNotFound(tool.to_string()))?;
        serde_json::from_str(schema).map_err(|e| SchemaError::InvalidSchema(tool.to_string(), e))
    }
}
