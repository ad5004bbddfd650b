//! Application configuration: discovery, env interpolation, and loading.
//!
//! Lookup order:
//! 1. `--config <path>`
//! 2. `$LOCALCHAT_CONFIG`
//! 3. `localchat.yaml` in the working directory or any parent
//! 4. Built-in defaults (Mistral NeMo on a local Ollama)
//!
//! String values may reference `${VAR}` or `${VAR:-default}`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::agent_core::DEFAULT_SYSTEM_PROMPT;
use crate::inference::config::{resolve_active_model, validate_temperature, DEFAULT_MODEL_KEY};
use crate::inference::{ModelConfig, ModelsConfig};
use crate::search::SearchConfig;

/// Config file name searched for upward from the working directory.
pub const CONFIG_FILE_NAME: &str = "localchat.yaml";

/// Env var naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "LOCALCHAT_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound {
        path: String,
    },

    #[error("failed to read {path}: {reason}")]
    Read {
        path: String,
        reason: String,
    },

    #[error("failed to parse config: {reason}")]
    Parse {
        reason: String,
    },

    #[error("invalid config: {reason}")]
    Invalid {
        reason: String,
    },
}

/// Raw file shape. Every section is optional.
#[derive(Debug, Default, Deserialize)]
struct RawAppConfig {
    #[serde(default)]
    active_model: Option<String>,
    #[serde(default)]
    models: HashMap<String, ModelConfig>,
    #[serde(default)]
    system_prompt: Option<String>,
    #[serde(default)]
    search: SearchConfig,
}

/// Fully resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub models: ModelsConfig,
    pub system_prompt: String,
    pub search: SearchConfig,
    /// File this config was loaded from, `None` for built-in defaults.
    pub source: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            models: ModelsConfig::default(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            search: SearchConfig::default(),
            source: None,
        }
    }
}

impl AppConfig {
    /// Switch the active model key. Fails if the key is not configured.
    pub fn with_active_model(mut self, key: &str) -> Result<Self, ConfigError> {
        if !self.models.models.contains_key(key) {
            let mut available: Vec<&String> = self.models.models.keys().collect();
            available.sort();
            return Err(ConfigError::Invalid {
                reason: format!("unknown model '{key}' (available: {available:?})"),
            });
        }
        self.models.active_model = key.to_string();
        Ok(self)
    }

    /// The active model's configuration, ready to bind.
    pub fn active_model(&self) -> Result<ModelConfig, ConfigError> {
        resolve_active_model(&self.models)
            .map(|(_, model)| model)
            .map_err(|e| ConfigError::Invalid {
                reason: e.to_string(),
            })
    }
}

// ─── Discovery ───────────────────────────────────────────────────────────────

/// Find the config file to load.
///
/// An explicit path (flag or env var) that does not exist is an error.
/// Returns `Ok(None)` when nothing is configured and no file is found upward
/// from `start`.
pub fn find_config_path(
    explicit: Option<&Path>,
    env_override: Option<&Path>,
    start: &Path,
) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(candidate) = explicit.or(env_override) {
        if candidate.is_file() {
            return Ok(Some(candidate.to_path_buf()));
        }
        return Err(ConfigError::NotFound {
            path: candidate.display().to_string(),
        });
    }

    let mut dir = start.to_path_buf();
    loop {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Ok(Some(candidate));
        }
        if !dir.pop() {
            return Ok(None);
        }
    }
}

/// Discover and load the config, falling back to defaults.
pub fn load_or_default(explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let env_override = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    match find_config_path(explicit, env_override.as_deref(), &cwd)? {
        Some(path) => {
            let config = load_config(&path)?;
            tracing::info!(path = %path.display(), "loaded config");
            Ok(config)
        }
        None => {
            tracing::info!("no {CONFIG_FILE_NAME} found, using built-in defaults");
            Ok(AppConfig::default())
        }
    }
}

// ─── Loading ─────────────────────────────────────────────────────────────────

/// Read, interpolate, and parse a config file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut config = parse_config(&raw)?;
    config.source = Some(path.to_path_buf());
    Ok(config)
}

/// Parse config YAML (after env interpolation) and fill in defaults.
pub fn parse_config(yaml: &str) -> Result<AppConfig, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);

    // An empty file parses as null.
    let raw: RawAppConfig = if interpolated.trim().is_empty() {
        RawAppConfig::default()
    } else {
        serde_yaml::from_str(&interpolated).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?
    };

    let models = if raw.models.is_empty() {
        let mut defaults = ModelsConfig::default();
        if let Some(active) = raw.active_model {
            defaults.active_model = active;
        }
        defaults
    } else {
        let active_model = match raw.active_model {
            Some(key) => key,
            None if raw.models.len() == 1 => raw
                .models
                .keys()
                .next()
                .cloned()
                .unwrap_or_else(|| DEFAULT_MODEL_KEY.to_string()),
            None => DEFAULT_MODEL_KEY.to_string(),
        };
        ModelsConfig {
            active_model,
            models: raw.models,
        }
    };

    for (key, model) in &models.models {
        validate_temperature(model.temperature).map_err(|e| ConfigError::Invalid {
            reason: format!("model '{key}': {e}"),
        })?;
    }

    let system_prompt = raw
        .system_prompt
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());

    let config = AppConfig {
        models,
        system_prompt,
        search: raw.search,
        source: None,
    };

    // Surface a bad `active_model` at load rather than at first bind.
    config.active_model()?;
    Ok(config)
}

// ─── Env-var interpolation ───────────────────────────────────────────────────

/// Replace `${VAR}` and `${VAR:-default}` in a string.
fn interpolate_env_vars(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next();
            let mut var_expr = String::new();
            for c in chars.by_ref() {
                if c == '}' {
                    break;
                }
                var_expr.push(c);
            }
            result.push_str(&resolve_var_expr(&var_expr));
        } else {
            result.push(ch);
        }
    }

    result
}

/// Resolve `VAR` or `VAR:-default`. Unset without a default becomes empty.
fn resolve_var_expr(expr: &str) -> String {
    match expr.split_once(":-") {
        Some((name, default)) => std::env::var(name).unwrap_or_else(|_| expand_tilde(default)),
        None => std::env::var(expr).unwrap_or_default(),
    }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return format!("{}{rest}", home.display());
        }
    }
    path.to_string()
}

// ─── Tests ───────────────────────────────────────────────────────────────────
