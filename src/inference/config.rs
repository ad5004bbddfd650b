//! Model configuration types and validation.
//!
//! The `models` section of `localchat.yaml` deserializes into
//! [`ModelsConfig`]; file discovery and env interpolation live in
//! [`crate::config`].

use std::collections::HashMap;

use serde::Deserialize;

use super::errors::InferenceError;

/// Default model key when no config file is present.
pub const DEFAULT_MODEL_KEY: &str = "mistral-nemo";

/// Default OpenAI-compatible endpoint (Ollama).
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434/v1";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Valid temperature range (inclusive).
pub const TEMPERATURE_RANGE: std::ops::RangeInclusive<f32> = 0.0..=1.0;

// ─── Public Types ────────────────────────────────────────────────────────────

/// Which tool-call format the model emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCallFormat {
    /// Standard OpenAI JSON tool calls.
    #[default]
    NativeJson,
    /// Text-based `Tool: … Arguments: …` format.
    Pythonic,
}

/// A single model's runtime configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelConfig {
    pub display_name: String,
    /// Identifier sent as `model` in requests. Defaults to the config key.
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub tool_call_format: ToolCallFormat,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}
fn default_max_tokens() -> u32 {
    2048
}

impl ModelConfig {
    /// The model identifier sent to the endpoint.
    pub fn model_id(&self) -> &str {
        self.model_name.as_deref().unwrap_or(&self.display_name)
    }

    /// Copy of this config bound to a different temperature.
    pub fn with_temperature(&self, temperature: f32) -> Self {
        Self {
            temperature,
            ..self.clone()
        }
    }
}

/// The `models` registry section of the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelsConfig {
    pub active_model: String,
    pub models: HashMap<String, ModelConfig>,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        let mut models = HashMap::new();
        models.insert(
            DEFAULT_MODEL_KEY.to_string(),
            ModelConfig {
                display_name: "Mistral NeMo".to_string(),
                model_name: Some("mistral-nemo:latest".to_string()),
                base_url: default_base_url(),
                temperature: DEFAULT_TEMPERATURE,
                max_tokens: default_max_tokens(),
                tool_call_format: ToolCallFormat::NativeJson,
            },
        );
        Self {
            active_model: DEFAULT_MODEL_KEY.to_string(),
            models,
        }
    }
}

// ─── Resolution & Validation ─────────────────────────────────────────────────

/// Check that a temperature is finite and within [`TEMPERATURE_RANGE`].
pub fn validate_temperature(temperature: f32) -> Result<f32, InferenceError> {
    if temperature.is_finite() && TEMPERATURE_RANGE.contains(&temperature) {
        Ok(temperature)
    } else {
        Err(InferenceError::ConfigError {
            reason: format!(
                "temperature must be between {} and {}, got {temperature}",
                TEMPERATURE_RANGE.start(),
                TEMPERATURE_RANGE.end()
            ),
        })
    }
}

/// Resolve the active model configuration.
///
/// Returns `(model_key, ModelConfig)`. A missing `model_name` is filled in
/// from the key so the returned config is ready to bind.
pub fn resolve_active_model(config: &ModelsConfig) -> Result<(String, ModelConfig), InferenceError> {
    let model = config
        .models
        .get(&config.active_model)
        .ok_or_else(|| InferenceError::ConfigError {
            reason: format!(
                "active model '{}' not found in config (available: {})",
                config.active_model,
                sorted_keys(config).join(", ")
            ),
        })?;

    validate_temperature(model.temperature)?;

    let mut model = model.clone();
    if model.model_name.is_none() {
        model.model_name = Some(config.active_model.clone());
    }
    Ok((config.active_model.clone(), model))
}

fn sorted_keys(config: &ModelsConfig) -> Vec<String> {
    let mut keys: Vec<String> = config.models.keys().cloned().collect();
    keys.sort();
    keys
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_resolves() {
        let (key, model) = resolve_active_model(&ModelsConfig::default()).unwrap();
        assert_eq!(key, DEFAULT_MODEL_KEY);
        assert_eq!(model.model_id(), "mistral-nemo:latest");
        assert_eq!(model.base_url, DEFAULT_BASE_URL);
        assert!((model.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_resolve_active_model_not_found() {
        let config = ModelsConfig {
            active_model: "nonexistent".into(),
            models: HashMap::new(),
        };
        let err = resolve_active_model(&config).unwrap_err();
        assert!(err.to_string().contains("nonexistent"));
    }

    #[test]
    fn test_resolve_fills_model_name_from_key() {
        let yaml = r#"
            active_model: "llama3.1:8b"
            models:
              "llama3.1:8b":
                display_name: "Llama 3.1"
        "#;
        let config: ModelsConfig = serde_yaml::from_str(yaml).unwrap();
        let (_, model) = resolve_active_model(&config).unwrap();
        assert_eq!(model.model_id(), "llama3.1:8b");
        assert_eq!(model.tool_call_format, ToolCallFormat::NativeJson);
        assert_eq!(model.max_tokens, 2048);
    }

    #[test]
    fn test_resolve_rejects_out_of_range_temperature() {
        let yaml = r#"
            active_model: hot
            models:
              hot:
                display_name: "Hot"
                temperature: 1.5
        "#;
        let config: ModelsConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(resolve_active_model(&config).is_err());
    }

    #[test]
    fn test_validate_temperature_bounds() {
        assert!(validate_temperature(0.0).is_ok());
        assert!(validate_temperature(1.0).is_ok());
        assert!(validate_temperature(0.5).is_ok());
        assert!(validate_temperature(-0.1).is_err());
        assert!(validate_temperature(1.01).is_err());
        assert!(validate_temperature(f32::NAN).is_err());
        assert!(validate_temperature(f32::INFINITY).is_err());
    }

    #[test]
    fn test_with_temperature_keeps_other_fields() {
        let (_, model) = resolve_active_model(&ModelsConfig::default()).unwrap();
        let rebound = model.with_temperature(0.2);
        assert!((rebound.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(rebound.model_id(), model.model_id());
        assert_eq!(rebound.base_url, model.base_url);
    }

    #[test]
    fn test_pythonic_format_deserializes() {
        let yaml = r#"
            display_name: "Small"
            tool_call_format: pythonic
        "#;
        let model: ModelConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(model.tool_call_format, ToolCallFormat::Pythonic);
    }
}
