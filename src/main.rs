mod config;
mod error;
mod mcp;
mod tokens;
mod tools;

use std::process::ExitCode;
use std::sync::Arc;

use tools::ToolRegistry;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // All logging goes to stderr (stdout is the MCP JSON-RPC channel)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cfg = config::load();

    // The dataset is loaded once; without it there is nothing to serve.
    let loaded = config::resolve_token_path(&config::token_path_candidates(&cfg))
        .and_then(|path| tokens::dataset::load(&path));
    let token_set = match loaded {
        Ok(set) => set,
        Err(e) => {
            error!("failed to initialize MCP server: {e}");
            return ExitCode::FAILURE;
        }
    };
    if token_set.is_empty() {
        warn!("token dataset is empty, every query will come back empty");
    }

    let mut registry = ToolRegistry::new();
    registry.register(Box::new(tools::spectrum_tokens::SpectrumTokensProvider::new(
        Arc::new(token_set),
    )));

    // Run the MCP server (blocks on stdin)
    mcp::server::run(&registry, &cfg);
    ExitCode::SUCCESS
}
