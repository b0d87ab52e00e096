//! Tool registry: name to handler mapping behind `tools/list` and
//! `tools/call`.
//!
//! Handlers are boxed async closures taking the shared `ToolContext` plus
//! the raw JSON arguments. The configured name prefix is applied once, at
//! registration; lookups always use the prefixed name.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;

use super::context::ToolContext;
use super::protocol::{McpError, ToolDefinition, ToolsCallResult};

pub type ToolResult = Result<ToolsCallResult, McpError>;

pub type ToolFuture = Pin<Box<dyn Future<Output = ToolResult> + Send>>;

pub type ToolHandler = Arc<dyn Fn(ToolContext, Value) -> ToolFuture + Send + Sync>;

pub struct RegisteredTool {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    pub handler: ToolHandler,
}

pub struct McpRegistry {
    prefix: String,
    tools: HashMap<String, RegisteredTool>,
}

impl McpRegistry {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            tools: HashMap::new(),
        }
    }

    pub fn register_tool(&mut self, mut tool: RegisteredTool) {
        tool.name = format!("{}{}", self.prefix, tool.name);
        self.tools.insert(tool.name.clone(), tool);
    }

    /// Definitions of every registered tool, sorted by name so repeated
    /// `tools/list` calls produce identical output.
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        let mut tools: Vec<ToolDefinition> = self
            .tools
            .values()
            .map(|tool| ToolDefinition {
                name: tool.name.clone(),
                description: tool.description.clone(),
                input_schema: tool.input_schema.clone(),
            })
            .collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    /// Look up a tool by its prefixed name.
    pub fn get_tool(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.get(name)
    }

    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }
}

impl Default for McpRegistry {
    fn default() -> Self {
        Self::new("")
    }
}

/// Fluent construction of a `RegisteredTool`; the handler comes last so
/// registration sites read top-down: name, description, schema, body.
pub struct ToolBuilder {
    name: String,
    description: String,
    input_schema: Value,
}

impl ToolBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {}
            }),
        }
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn input_schema(mut self, schema: Value) -> Self {
        self.input_schema = schema;
        self
    }

    pub fn build<F, Fut>(self, handler: F) -> RegisteredTool
    where
        F: Fn(ToolContext, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ToolResult> + Send + 'static,
    {
        RegisteredTool {
            name: self.name,
            description: self.description,
            input_schema: self.input_schema,
            handler: Arc::new(move |ctx, params| Box::pin(handler(ctx, params))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_tool(name: &str) -> RegisteredTool {
        ToolBuilder::new(name)
            .description("a test tool")
            .build(|_ctx, _params| async { Ok(ToolsCallResult::text("ok")) })
    }

    #[test]
    fn test_empty_registry() {
        let registry = McpRegistry::default();
        assert_eq!(registry.tool_count(), 0);
        assert!(registry.list_tools().is_empty());
    }

    #[test]
    fn test_prefix_applied_at_registration() {
        let mut registry = McpRegistry::new("steam-");
        registry.register_tool(dummy_tool("search-apps"));

        assert!(registry.get_tool("steam-search-apps").is_some());
        assert!(registry.get_tool("search-apps").is_none());
    }

    #[test]
    fn test_list_tools_sorted_by_name() {
        let mut registry = McpRegistry::default();
        registry.register_tool(dummy_tool("get-news"));
        registry.register_tool(dummy_tool("get-games"));
        registry.register_tool(dummy_tool("search-apps"));

        let names: Vec<String> = registry.list_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["get-games", "get-news", "search-apps"]);
    }

    #[test]
    fn test_builder_keeps_schema() {
        let schema = serde_json::json!({
            "type": "object",
            "properties": {"query": {"type": "string"}},
            "required": ["query"]
        });
        let tool = ToolBuilder::new("search-apps")
            .input_schema(schema.clone())
            .build(|_ctx, _params| async { Ok(ToolsCallResult::text("ok")) });
        assert_eq!(tool.input_schema, schema);
    }
}
