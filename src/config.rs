use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::error::ServerError;

#[derive(Debug, Default, Deserialize)]
pub struct SpectrumConfig {
    #[serde(default)]
    pub identity: Identity,
    #[serde(default)]
    pub tokens: TokensConfig,
}

#[derive(Debug, Deserialize)]
pub struct Identity {
    #[serde(default = "default_name")]
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct TokensConfig {
    /// A token JSON file, or a directory of them.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_name() -> String {
    "Spectrum".into()
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            name: default_name(),
        }
    }
}

/// Load the server config file.
/// Search order:
///   1. SPECTRUM_MCP_CONFIG env var
///   2. ~/.spectrum-mcp/config.toml
///   3. Default (name = "Spectrum", no token path)
pub fn load() -> SpectrumConfig {
    let candidates = [
        std::env::var("SPECTRUM_MCP_CONFIG").ok().map(PathBuf::from),
        dirs::home_dir().map(|h| h.join(".spectrum-mcp/config.toml")),
    ];

    for candidate in candidates.into_iter().flatten() {
        if candidate.exists() {
            match fs::read_to_string(&candidate) {
                Ok(content) => match toml::from_str::<SpectrumConfig>(&content) {
                    Ok(config) => {
                        info!(
                            path = %candidate.display(),
                            name = %config.identity.name,
                            "loaded config"
                        );
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %candidate.display(), error = %e, "failed to parse config");
                    }
                },
                Err(e) => {
                    warn!(path = %candidate.display(), error = %e, "failed to read config");
                }
            }
        }
    }

    info!("no config file found, using defaults");
    SpectrumConfig::default()
}

/// Where to look for the token dataset, most specific first:
///   1. SPECTRUM_TOKENS_PATH env var
///   2. `tokens.path` from the config file
///   3. ./tokens.json
///   4. the npm package's bundled variables.json
pub fn token_path_candidates(config: &SpectrumConfig) -> Vec<PathBuf> {
    let env_override = std::env::var("SPECTRUM_TOKENS_PATH").ok().map(PathBuf::from);
    candidates_with(env_override, config)
}

fn candidates_with(env_override: Option<PathBuf>, config: &SpectrumConfig) -> Vec<PathBuf> {
    [
        env_override,
        config.tokens.path.clone(),
        Some(PathBuf::from("tokens.json")),
        Some(PathBuf::from(
            "node_modules/@adobe/spectrum-tokens/dist/json/variables.json",
        )),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Pick the first candidate that exists on disk.
pub fn resolve_token_path(candidates: &[PathBuf]) -> Result<PathBuf, ServerError> {
    candidates
        .iter()
        .find(|c| c.exists())
        .cloned()
        .ok_or_else(|| {
            let tried = candidates
                .iter()
                .map(|c| c.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            ServerError::Dataset(format!("no token dataset found (tried: {tried})"))
        })
}
