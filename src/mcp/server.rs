use std::io::{self, BufRead, Write};

use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::protocol::{JsonRpcRequest, JsonRpcResponse};
use super::types::*;
use crate::config::SpectrumConfig;
use crate::error::ServerError;
use crate::tools::ToolRegistry;

const PROTOCOL_VERSION: &str = "2024-11-05";

/// Run the MCP server: read JSON-RPC from stdin, write responses to stdout.
/// All logging goes to stderr.
pub fn run(registry: &ToolRegistry, config: &SpectrumConfig) {
    let stdin = io::stdin();
    let stdout = io::stdout();

    info!(
        tools = registry.tool_count(),
        providers = registry.provider_count(),
        "MCP server started"
    );

    if let Err(e) = serve(registry, config, stdin.lock(), stdout.lock()) {
        error!("stopped serving: {e}");
        return;
    }

    info!("stdin closed, shutting down");
}

/// Answer each request line on `input` with one response line on `output`
/// until `input` is exhausted.
pub fn serve(
    registry: &ToolRegistry,
    config: &SpectrumConfig,
    input: impl BufRead,
    mut output: impl Write,
) -> Result<(), ServerError> {
    for line in input.split(b'\n') {
        let line = match String::from_utf8(line?) {
            Ok(l) => l,
            Err(e) => {
                warn!("skipping line that is not UTF-8: {e}");
                continue;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let Some(response) = handle_line(registry, config, trimmed) else {
            continue;
        };

        let json = serde_json::to_string(&response)?;
        writeln!(output, "{json}")?;
        output.flush()?;
    }
    Ok(())
}

fn handle_line(registry: &ToolRegistry, config: &SpectrumConfig, line: &str) -> Option<JsonRpcResponse> {
    match serde_json::from_str::<JsonRpcRequest>(line) {
        Ok(req) => Some(handle_request(registry, config, req)),
        Err(_) => {
            // Might be a notification (no id)
            if let Ok(val) = serde_json::from_str::<Value>(line) {
                if let Some(method) = val.get("method").filter(|_| val.get("id").is_none()) {
                    debug!("notification: {}", method.as_str().unwrap_or("unknown"));
                    return None;
                }
            }
            warn!("unparseable message: {line}");
            None
        }
    }
}

fn handle_request(registry: &ToolRegistry, config: &SpectrumConfig, req: JsonRpcRequest) -> JsonRpcResponse {
    debug!(method = %req.method, "request");

    match req.method.as_str() {
        "initialize" => {
            let result = InitializeResult {
                protocol_version: PROTOCOL_VERSION.into(),
                capabilities: ServerCapabilities {
                    tools: ToolsCapability { list_changed: false },
                },
                server_info: ServerInfo {
                    name: config.identity.name.clone(),
                    version: env!("CARGO_PKG_VERSION").into(),
                },
            };
            to_response(req.id, &result)
        }

        "ping" => JsonRpcResponse::success(req.id, Value::Object(Default::default())),

        "tools/list" => {
            let result = serde_json::json!({ "tools": registry.list_tools() });
            JsonRpcResponse::success(req.id, result)
        }

        "tools/call" => {
            let params: CallToolParams = match serde_json::from_value(req.params) {
                Ok(p) => p,
                Err(e) => {
                    return JsonRpcResponse::error(req.id, -32602, format!("Invalid params: {e}"));
                }
            };
            let result = registry.call_tool(&params.name, &params.arguments);
            to_response(req.id, &result)
        }

        _ => {
            warn!(method = %req.method, "unknown method");
            JsonRpcResponse::error(req.id, -32601, format!("Method not found: {}", req.method))
        }
    }
}

fn to_response(id: Value, result: &impl serde::Serialize) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, -32603, format!("Internal error: {e}")),
    }
}
