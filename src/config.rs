//! Application configuration management.
//!
//! The configuration is a single TOML file in the user's config directory
//! (typically ~/.config/tunetag/config.toml). Every field has a default, so a
//! missing file or a partial one both load. The loaded `Config` is treated as
//! immutable for the duration of a run; `run` flags are applied to a copy
//! before processing starts.

use crate::llm::ProviderKind;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_input_dir")]
    pub input_dir: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default)]
    pub provider: ProviderKind,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_rate_limit_delay_ms")]
    pub rate_limit_delay_ms: u64,
    #[serde(default = "default_true")]
    pub overwrite: bool,
    #[serde(default = "default_true")]
    pub mirror_subdirectories: bool,
    #[serde(default = "default_log_file")]
    pub log_file: String,
    // Tables last, so they serialize after the plain keys
    #[serde(default)]
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OllamaConfig {
    #[serde(default = "default_ollama_url")]
    pub base_url: String,
    #[serde(default = "default_ollama_model")]
    pub model: String,
    #[serde(default = "default_ollama_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default = "default_openai_url")]
    pub base_url: String,
    #[serde(default = "default_openai_model")]
    pub model: String,
    /// Falls back to `OPENAI_API_KEY` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(default = "default_gemini_url")]
    pub base_url: String,
    #[serde(default = "default_gemini_model")]
    pub model: String,
    /// Falls back to `GEMINI_API_KEY` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

fn default_input_dir() -> String {
    "input".to_string()
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_batch_size() -> usize {
    10
}

fn default_rate_limit_delay_ms() -> u64 {
    1000
}

fn default_true() -> bool {
    true
}

fn default_log_file() -> String {
    "tunetag.log".to_string()
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3".to_string()
}

fn default_ollama_timeout_secs() -> u64 {
    120
}

fn default_openai_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_gemini_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_url(),
            model: default_ollama_model(),
            timeout_secs: default_ollama_timeout_secs(),
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: default_openai_url(),
            model: default_openai_model(),
            api_key: None,
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: default_gemini_url(),
            model: default_gemini_model(),
            api_key: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Keys accepted by `tunetag config set`.
pub const SETTABLE_KEYS: &[&str] = &[
    "input_dir",
    "output_dir",
    "provider",
    "batch_size",
    "rate_limit_delay_ms",
    "overwrite",
    "mirror_subdirectories",
    "log_file",
    "ollama.base_url",
    "ollama.model",
    "ollama.timeout_secs",
    "openai.base_url",
    "openai.model",
    "openai.api_key",
    "gemini.base_url",
    "gemini.model",
    "gemini.api_key",
];

fn parse_bool(value: &str) -> Result<bool, Box<dyn Error>> {
    value
        .parse::<bool>()
        .map_err(|_| "Value must be 'true' or 'false'".into())
}

fn parse_number<T: std::str::FromStr>(value: &str) -> Result<T, Box<dyn Error>> {
    value
        .parse::<T>()
        .map_err(|_| format!("Value must be a non-negative integer, got '{value}'").into())
}

impl Config {
    pub fn new() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            provider: ProviderKind::default(),
            ollama: OllamaConfig::default(),
            openai: OpenAiConfig::default(),
            gemini: GeminiConfig::default(),
            batch_size: default_batch_size(),
            rate_limit_delay_ms: default_rate_limit_delay_ms(),
            overwrite: default_true(),
            mirror_subdirectories: default_true(),
            log_file: default_log_file(),
        }
    }

    pub fn config_dir() -> Result<PathBuf, Box<dyn Error>> {
        // XDG_CONFIG_HOME wins so tests can point at a scratch directory
        let config_dir = if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(xdg_config).join("tunetag")
        } else {
            dirs::config_dir()
                .ok_or("Unable to find config directory")?
                .join("tunetag")
        };
        Ok(config_dir)
    }

    pub fn config_path() -> Result<PathBuf, Box<dyn Error>> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn load() -> Result<Self, Box<dyn Error>> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Default::default());
        }

        let contents = fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<(), Box<dyn Error>> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let config_path = Self::config_path()?;
        let toml_string = toml::to_string_pretty(self)?;
        fs::write(&config_path, toml_string)?;

        Ok(())
    }

    pub fn exists() -> Result<bool, Box<dyn Error>> {
        Ok(Self::config_path()?.exists())
    }

    /// Input directory with `~` expanded.
    pub fn input_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.input_dir).as_ref())
    }

    /// Output directory with `~` expanded.
    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.output_dir).as_ref())
    }

    /// Log file path with `~` expanded.
    pub fn log_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.log_file).as_ref())
    }

    /// Model name of the selected provider.
    pub fn active_model(&self) -> &str {
        match self.provider {
            ProviderKind::Ollama => &self.ollama.model,
            ProviderKind::Openai => &self.openai.model,
            ProviderKind::Gemini => &self.gemini.model,
        }
    }

    /// Override the model of the selected provider.
    pub fn set_active_model(&mut self, model: &str) {
        let slot = match self.provider {
            ProviderKind::Ollama => &mut self.ollama.model,
            ProviderKind::Openai => &mut self.openai.model,
            ProviderKind::Gemini => &mut self.gemini.model,
        };
        *slot = model.to_string();
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        match key {
            "input_dir" => self.input_dir = value.to_string(),
            "output_dir" => self.output_dir = value.to_string(),
            "provider" => {
                self.provider = value.parse::<ProviderKind>()?;
            }
            "batch_size" => {
                let size: usize = parse_number(value)?;
                if size == 0 {
                    return Err("batch_size must be at least 1".into());
                }
                self.batch_size = size;
            }
            "rate_limit_delay_ms" => self.rate_limit_delay_ms = parse_number(value)?,
            "overwrite" => self.overwrite = parse_bool(value)?,
            "mirror_subdirectories" => self.mirror_subdirectories = parse_bool(value)?,
            "log_file" => self.log_file = value.to_string(),
            "ollama.base_url" => self.ollama.base_url = value.to_string(),
            "ollama.model" => self.ollama.model = value.to_string(),
            "ollama.timeout_secs" => self.ollama.timeout_secs = parse_number(value)?,
            "openai.base_url" => self.openai.base_url = value.to_string(),
            "openai.model" => self.openai.model = value.to_string(),
            "openai.api_key" => self.openai.api_key = Some(value.to_string()),
            "gemini.base_url" => self.gemini.base_url = value.to_string(),
            "gemini.model" => self.gemini.model = value.to_string(),
            "gemini.api_key" => self.gemini.api_key = Some(value.to_string()),
            _ => return Err(format!("Unknown configuration key: {key}").into()),
        }
        Ok(())
    }
}
