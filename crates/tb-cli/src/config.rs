//! `tb` configuration: TOML file, then environment overrides, then CLI flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

pub const CONFIG_ENV: &str = "TB_CONFIG";
pub const DATA_DIR_ENV: &str = "TB_DATA_DIR";
pub const ENDPOINT_ENV: &str = "TB_ENDPOINT";
pub const MODEL_ENV: &str = "TB_MODEL";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub backend: BackendConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackendConfig {
    /// Base URL of an OpenAI-compatible server (without `/v1/...`).
    pub endpoint: String,
    pub model: String,
    /// Name of the environment variable holding the API key, if one is needed.
    pub api_key_env: Option<String>,
    pub timeout_secs: u64,
    pub temperature: Option<f32>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".to_string(),
            model: "llama3.2:3b".to_string(),
            api_key_env: None,
            timeout_secs: 120,
            temperature: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("thought_templates"),
        }
    }
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid config")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Resolve the full configuration. `explicit` is the `--config` flag;
    /// `env` looks up environment variables.
    pub fn resolve(explicit: Option<&Path>, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| env(CONFIG_ENV).filter(|p| !p.is_empty()).map(PathBuf::from));

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(env);
        Ok(config)
    }

    pub fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) {
        let set = |key: &str| env(key).filter(|v| !v.is_empty());
        if let Some(dir) = set(DATA_DIR_ENV) {
            self.store.dir = PathBuf::from(dir);
        }
        if let Some(endpoint) = set(ENDPOINT_ENV) {
            self.backend.endpoint = endpoint;
        }
        if let Some(model) = set(MODEL_ENV) {
            self.backend.model = model;
        }
    }
}

impl BackendConfig {
    /// API key from the configured environment variable, if any is configured.
    pub fn api_key(&self, env: impl Fn(&str) -> Option<String>) -> Result<Option<String>> {
        let Some(var) = &self.api_key_env else {
            return Ok(None);
        };
        match env(var) {
            Some(key) if !key.is_empty() => Ok(Some(key)),
            _ => bail!("API key variable {var} is not set"),
        }
    }
}
