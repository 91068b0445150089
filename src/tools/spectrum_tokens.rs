use serde_json::{Value, json};
use std::sync::Arc;

use super::ToolProvider;
use crate::error::ServerError;
use crate::mcp::types::{CallToolResult, Tool};
use crate::tokens::query::DEFAULT_LIMIT;
use crate::tokens::{Query, QueryKind, TokenSet};

pub const TOOL_NAME: &str = "spectrum-tokens";

/// Serves hue, name and nearest-color lookups over a shared token snapshot.
pub struct SpectrumTokensProvider {
    tokens: Arc<TokenSet>,
}

impl SpectrumTokensProvider {
    pub fn new(tokens: Arc<TokenSet>) -> Self {
        Self { tokens }
    }
}

impl ToolProvider for SpectrumTokensProvider {
    fn id(&self) -> &str {
        "spectrum_tokens"
    }

    fn name(&self) -> &str {
        "Spectrum Tokens"
    }

    fn tools(&self) -> Vec<Tool> {
        vec![Tool {
            name: TOOL_NAME.into(),
            description: "Look up Spectrum design tokens by hue, by name, or by nearest color.".into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Query type (e.g., 'hue', 'name', 'color')"
                    },
                    "value": {
                        "type": "string",
                        "description": "Search value (e.g., 'blue', '240', '#FF5500')"
                    },
                    "limit": {
                        "type": "number",
                        "description": "Maximum number of results to return (default: 10)"
                    }
                },
                "required": ["query", "value"],
            }),
        }]
    }

    fn call(&self, tool_name: &str, arguments: &Value) -> Option<CallToolResult> {
        match tool_name {
            TOOL_NAME => Some(self.query(arguments)),
            _ => None,
        }
    }
}

impl SpectrumTokensProvider {
    fn query(&self, arguments: &Value) -> CallToolResult {
        let query = match parse_arguments(arguments) {
            Ok(q) => q,
            Err(e) => return CallToolResult::error(e.to_string()),
        };

        match query.run(&self.tokens) {
            Ok(matches) => CallToolResult::text(query.render(&matches)),
            Err(e) => CallToolResult::error(format!("Error processing {} query: {e}", query.kind)),
        }
    }
}

fn parse_arguments(arguments: &Value) -> Result<Query<'_>, ServerError> {
    let required = |key: &str| {
        arguments[key]
            .as_str()
            .ok_or_else(|| ServerError::InvalidArgument(format!("Missing required argument '{key}'")))
    };
    let kind = required("query")?;
    let value = required("value")?;

    let limit = match arguments.get("limit") {
        None | Some(Value::Null) => DEFAULT_LIMIT,
        Some(limit) => whole_number(limit)
            .ok_or_else(|| {
                ServerError::InvalidArgument(
                    "Invalid limit: expected a non-negative integer".into(),
                )
            })?,
    };

    Ok(Query {
        kind: QueryKind::from(kind),
        value,
        limit,
    })
}

/// Non-negative integers, including floats with no fractional part (`5.0`,
/// `1e1`). Values past `usize::MAX` saturate.
fn whole_number(limit: &Value) -> Option<usize> {
    if let Some(n) = limit.as_u64() {
        return Some(usize::try_from(n).unwrap_or(usize::MAX));
    }
    let n = limit.as_f64().filter(|n| *n >= 0.0 && n.fract() == 0.0)?;
    Some(n as usize)
}
