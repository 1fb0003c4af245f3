//! Configuration for the tasksmith server.
//!
//! Provides a TOML-based config file at `~/.config/tasksmith/config.toml`
//! and a resolution chain: CLI flag > env var > config file > default.
//!
//! A missing API key is not an error here: the server starts without one
//! and every plan request fails with a configuration error until a key is
//! provided.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Port used when nothing else is configured.
pub const DEFAULT_PORT: u16 = 5000;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub gemini: GeminiSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ServerSection {
    pub port: Option<u16>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GeminiSection {
    pub api_key: Option<String>,
    pub model: Option<String>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the tasksmith config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/tasksmith` or
/// `~/.config/tasksmith`, regardless of platform.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("tasksmith");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("tasksmith")
}

/// Return the path to the tasksmith config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct ResolvedConfig {
    pub port: u16,
    /// Absent when no key is configured anywhere; the server then runs
    /// unconfigured.
    pub api_key: Option<String>,
    pub model: String,
}

impl ResolvedConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - Port: `cli_port` > `PORT` env > `config_file.server.port` > 5000
    /// - API key: `GOOGLE_API_KEY` env > `GEMINI_API_KEY` env >
    ///   `config_file.gemini.api_key` > absent. Empty env values count as
    ///   absent.
    /// - Model: `cli_model` > `config_file.gemini.model` > the client default
    pub fn resolve(cli_port: Option<u16>, cli_model: Option<&str>) -> Result<Self> {
        let file_config = load_config().ok();

        let port = if let Some(port) = cli_port {
            port
        } else if let Ok(raw) = std::env::var("PORT") {
            raw.parse()
                .with_context(|| format!("PORT env var is not a valid port: {raw:?}"))?
        } else if let Some(port) = file_config.as_ref().and_then(|c| c.server.port) {
            port
        } else {
            DEFAULT_PORT
        };

        let api_key = std::env::var("GOOGLE_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()))
            .or_else(|| {
                file_config
                    .as_ref()
                    .and_then(|c| c.gemini.api_key.clone())
                    .filter(|k| !k.is_empty())
            });

        let model = cli_model
            .map(str::to_string)
            .or_else(|| file_config.as_ref().and_then(|c| c.gemini.model.clone()))
            .unwrap_or_else(|| tasksmith_gemini::DEFAULT_MODEL.to_string());

        Ok(Self {
            port,
            api_key,
            model,
        })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
