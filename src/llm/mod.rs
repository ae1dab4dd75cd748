//! Language model adapters.
//!
//! Every backend implements [`LlmProvider`]: given a prompt, return the raw
//! completion text. The backend is chosen once per run from
//! [`Config::provider`](crate::config::Config) and never changes mid-run.
//! [`fetch_metadata`] is the only entry point the batch driver uses; it turns
//! every provider failure into a degraded record so a bad response never
//! stops the batch.

mod gemini;
mod ollama;
mod openai;
pub mod prompt;

pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

use crate::config::Config;
use crate::metadata::{self, CanonicalMetadata};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server at {url} is unreachable: {reason}")]
    Unreachable { url: String, reason: String },
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected response payload: {0}")]
    Payload(String),
    #[error("configuration error: {0}")]
    Config(String),
}

/// A backend that turns a prompt into raw completion text.
pub trait LlmProvider {
    /// Short backend name for logs and the run banner.
    fn name(&self) -> &'static str;

    fn model(&self) -> &str;

    /// Send `prompt` and return the model's raw text, unparsed.
    fn query(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Backend selector, stored in the config file and accepted on the CLI.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Ollama,
    Openai,
    Gemini,
}

impl ProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::Ollama => "ollama",
            ProviderKind::Openai => "openai",
            ProviderKind::Gemini => "gemini",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(ProviderKind::Ollama),
            "openai" => Ok(ProviderKind::Openai),
            "gemini" => Ok(ProviderKind::Gemini),
            other => Err(format!(
                "Unknown provider '{other}' (expected ollama, openai or gemini)"
            )),
        }
    }
}

/// Build the configured backend.
///
/// For Ollama this probes the server, so an unreachable server fails here,
/// before any file is touched.
pub fn build_provider(config: &Config) -> Result<Box<dyn LlmProvider>, LlmError> {
    let provider: Box<dyn LlmProvider> = match config.provider {
        ProviderKind::Ollama => Box::new(OllamaProvider::connect(&config.ollama)?),
        ProviderKind::Openai => Box::new(OpenAiProvider::new(&config.openai)?),
        ProviderKind::Gemini => Box::new(GeminiProvider::new(&config.gemini)?),
    };
    log::info!(
        "Initialized {} provider with model: {}",
        provider.name(),
        provider.model()
    );
    Ok(provider)
}

/// Ask `provider` about `song_name` and normalize the answer.
///
/// Never fails: provider errors are logged and reported as a degraded record
/// carrying `song_name` as its title.
pub fn fetch_metadata(provider: &dyn LlmProvider, song_name: &str) -> CanonicalMetadata {
    let prompt = prompt::build_prompt(song_name);
    match provider.query(&prompt) {
        Ok(raw) => {
            let metadata = metadata::normalize(&raw, song_name);
            log::debug!("Got metadata for '{song_name}': {metadata:?}");
            metadata
        }
        Err(e) => {
            log::error!("Error getting metadata for '{song_name}': {e}");
            CanonicalMetadata::degraded(song_name, e.to_string())
        }
    }
}

/// Resolve an API key from config, then from the environment.
fn resolve_api_key(configured: Option<&str>, env_var: &str) -> Result<String, LlmError> {
    configured
        .map(str::to_string)
        .or_else(|| std::env::var(env_var).ok())
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .ok_or_else(|| LlmError::Config(format!("no API key configured; set {env_var}")))
}

/// Read a response body for an error message, without failing on bad bytes.
fn error_body(response: reqwest::blocking::Response) -> String {
    response
        .text()
        .unwrap_or_else(|e| format!("<unreadable body: {e}>"))
}

/// Join a base URL and a path with exactly one slash between them.
fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::PARSE_FAILURE;

    struct Canned(Result<&'static str, fn() -> LlmError>);

    impl LlmProvider for Canned {
        fn name(&self) -> &'static str {
            "canned"
        }

        fn model(&self) -> &str {
            "test"
        }

        fn query(&self, prompt: &str) -> Result<String, LlmError> {
            assert!(prompt.contains("Tum Hi Ho"));
            match &self.0 {
                Ok(text) => Ok(text.to_string()),
                Err(make) => Err(make()),
            }
        }
    }

    #[test]
    fn test_fetch_metadata_success() {
        let provider = Canned(Ok(r#"{"title": "Tum Hi Ho", "year": 2013}"#));
        let metadata = fetch_metadata(&provider, "Tum Hi Ho");
        assert_eq!(metadata.year.as_deref(), Some("2013"));
        assert!(!metadata.is_degraded());
    }

    #[test]
    fn test_fetch_metadata_provider_error_is_degraded() {
        let provider = Canned(Err(|| LlmError::Status {
            status: 503,
            body: "overloaded".to_string(),
        }));
        let metadata = fetch_metadata(&provider, "Tum Hi Ho");
        assert_eq!(metadata.title.as_deref(), Some("Tum Hi Ho"));
        assert!(metadata.error.unwrap().contains("503"));
    }

    #[test]
    fn test_fetch_metadata_unparsable_is_degraded() {
        let provider = Canned(Ok("Sorry, I cannot help."));
        let metadata = fetch_metadata(&provider, "Tum Hi Ho");
        assert_eq!(metadata.error.as_deref(), Some(PARSE_FAILURE));
    }

    #[test]
    fn test_provider_kind_from_str() {
        assert_eq!("ollama".parse::<ProviderKind>(), Ok(ProviderKind::Ollama));
        assert_eq!("OpenAI".parse::<ProviderKind>(), Ok(ProviderKind::Openai));
        assert_eq!(" gemini ".parse::<ProviderKind>(), Ok(ProviderKind::Gemini));
        assert!("claude".parse::<ProviderKind>().is_err());
        assert_eq!(ProviderKind::Openai.to_string(), "openai");
    }

    #[test]
    fn test_resolve_api_key_prefers_config() {
        let key = resolve_api_key(Some(" sk-123 "), "TUNETAG_TEST_UNSET_KEY").unwrap();
        assert_eq!(key, "sk-123");
    }

    #[test]
    fn test_resolve_api_key_missing() {
        let err = resolve_api_key(Some("   "), "TUNETAG_TEST_UNSET_KEY").unwrap_err();
        assert!(matches!(err, LlmError::Config(_)));
    }

    #[test]
    fn test_endpoint_joins_once() {
        assert_eq!(
            endpoint("http://localhost:11434/", "/api/tags"),
            "http://localhost:11434/api/tags"
        );
        assert_eq!(
            endpoint("https://api.openai.com/v1", "chat/completions"),
            "https://api.openai.com/v1/chat/completions"
        );
    }
}
