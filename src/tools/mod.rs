use serde_json::Value;
use tracing::{debug, warn};

use crate::mcp::types::{CallToolResult, Tool};

pub mod spectrum_tokens;

/// Something that exposes one or more MCP tools.
pub trait ToolProvider: Send + Sync {
    /// Unique identifier (e.g. "spectrum_tokens").
    fn id(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// The MCP Tool definitions this provider exposes.
    fn tools(&self) -> Vec<Tool>;

    /// Execute a tool call. Returns None if this provider doesn't handle the tool.
    fn call(&self, tool_name: &str, arguments: &Value) -> Option<CallToolResult>;
}

#[derive(Default)]
pub struct ToolRegistry {
    providers: Vec<Box<dyn ToolProvider>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, provider: Box<dyn ToolProvider>) {
        debug!(provider = %provider.id(), name = %provider.name(), "registered");
        self.providers.push(provider);
    }

    pub fn list_tools(&self) -> Vec<Tool> {
        self.providers.iter().flat_map(|p| p.tools()).collect()
    }

    /// Route a call to the first provider that handles `tool_name`.
    pub fn call_tool(&self, tool_name: &str, arguments: &Value) -> CallToolResult {
        for provider in &self.providers {
            if let Some(result) = provider.call(tool_name, arguments) {
                return result;
            }
        }

        warn!(tool = %tool_name, "tool not found");
        CallToolResult::error(format!("Tool '{tool_name}' not found"))
    }

    pub fn tool_count(&self) -> usize {
        self.list_tools().len()
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Echo;

    impl ToolProvider for Echo {
        fn id(&self) -> &str {
            "echo"
        }

        fn name(&self) -> &str {
            "Echo"
        }

        fn tools(&self) -> Vec<Tool> {
            vec![Tool {
                name: "echo".into(),
                description: "Echo the text argument.".into(),
                input_schema: json!({ "type": "object" }),
            }]
        }

        fn call(&self, tool_name: &str, arguments: &Value) -> Option<CallToolResult> {
            (tool_name == "echo")
                .then(|| CallToolResult::text(arguments["text"].as_str().unwrap_or("")))
        }
    }

    #[test]
    fn test_routes_to_provider() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(Echo));
        let result = registry.call_tool("echo", &json!({ "text": "hi" }));
        assert_eq!(result.text_content(), "hi");
        assert!(result.is_error.is_none());
        assert_eq!(registry.tool_count(), 1);
        assert_eq!(registry.provider_count(), 1);
    }

    #[test]
    fn test_unknown_tool_is_tool_error() {
        let registry = ToolRegistry::new();
        let result = registry.call_tool("nope", &json!({}));
        assert_eq!(result.is_error, Some(true));
        assert_eq!(result.text_content(), "Tool 'nope' not found");
    }
}
