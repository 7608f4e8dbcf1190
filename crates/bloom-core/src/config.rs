//! Gateway configuration loaded from TOML and environment.
//!
//! | Source | Example |
//! |--------|---------|
//! | defaults | `port = 5000`, `llm_mode = "mock"` |
//! | `BLOOM_CONFIG` path (default `config/bloom.toml`), read only if present | `llm_mode = "live"` |
//! | `BLOOM__*` env | `BLOOM__PORT=8000`, `BLOOM__LLM_API_URL=http://127.0.0.1:8080` |

use serde::{Deserialize, Serialize};
use std::net::{AddrParseError, SocketAddr};
use std::path::Path;

const DEFAULT_CONFIG_PATH: &str = "config/bloom.toml";

/// How the gateway answers completion requests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LlmMode {
    /// Canned completions; no model server needed.
    #[default]
    Mock,
    /// OpenAI-compatible `/v1/completions` endpoint at `llm_api_url`.
    Live,
}

impl LlmMode {
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("live") {
            LlmMode::Live
        } else {
            LlmMode::Mock
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    /// "mock" | "live".
    pub llm_mode: String,
    /// Base URL of the completion server (llama.cpp, vLLM, ...).
    pub llm_api_url: String,
    pub llm_model: String,
    /// Bearer token for the completion server, if it wants one.
    #[serde(default)]
    pub llm_api_key: Option<String>,
    pub llm_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            llm_mode: "mock".to_string(),
            llm_api_url: "http://127.0.0.1:8080".to_string(),
            llm_model: "tinyllama".to_string(),
            llm_api_key: None,
            llm_timeout_secs: 60,
        }
    }
}

impl GatewayConfig {
    /// Load config. Precedence: `BLOOM__*` env > `BLOOM_CONFIG` file (or `config/bloom.toml`) > defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("BLOOM_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
        let defaults = GatewayConfig::default();
        let builder = config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("llm_mode", defaults.llm_mode)?
            .set_default("llm_api_url", defaults.llm_api_url)?
            .set_default("llm_model", defaults.llm_model)?
            .set_default("llm_timeout_secs", defaults.llm_timeout_secs as i64)?;

        let path = config_path.as_ref();
        let builder = if path.exists() {
            tracing::debug!("loading config file {}", path.display());
            builder.add_source(config::File::from(path))
        } else {
            builder
        };

        let built = builder
            .add_source(config::Environment::with_prefix("BLOOM").separator("__"))
            .build()?;

        built.try_deserialize()
    }

    pub fn llm_mode(&self) -> LlmMode {
        LlmMode::parse(&self.llm_mode)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    /// Non-empty API key, if configured.
    pub fn api_key(&self) -> Option<&str> {
        self.llm_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}
