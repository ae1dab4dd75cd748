use super::{LlmError, LlmProvider, endpoint, error_body};
use crate::config::OllamaConfig;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Local Ollama server.
pub struct OllamaProvider {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    format: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[derive(Deserialize)]
struct ModelEntry {
    name: String,
}

/// Ollama reports models as `name:tag`; a bare name means `:latest`.
fn model_matches(installed: &str, wanted: &str) -> bool {
    installed == wanted
        || installed.strip_suffix(":latest") == Some(wanted)
        || wanted.strip_suffix(":latest") == Some(installed)
}

impl OllamaProvider {
    /// Build the client and check that the server answers `GET /api/tags`.
    pub fn connect(config: &OllamaConfig) -> Result<Self, LlmError> {
        // 0 disables the timeout
        let timeout = (config.timeout_secs > 0).then(|| Duration::from_secs(config.timeout_secs));
        let client = Client::builder().timeout(timeout).build()?;
        let provider = Self {
            client,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
        };
        provider.probe()?;
        Ok(provider)
    }

    fn probe(&self) -> Result<(), LlmError> {
        let url = endpoint(&self.base_url, "api/tags");
        log::debug!("Probing Ollama at {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| LlmError::Unreachable {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(LlmError::Unreachable {
                url,
                reason: format!("status {status}"),
            });
        }

        // The model list only feeds a warning, so a body we cannot read is fine
        match response.json::<TagsResponse>() {
            Ok(tags) if !tags.models.is_empty() => {
                if !tags.models.iter().any(|m| model_matches(&m.name, &self.model)) {
                    log::warn!(
                        "Model '{}' is not installed on the Ollama server; try `ollama pull {}`",
                        self.model,
                        self.model
                    );
                }
            }
            Ok(_) => {}
            Err(e) => log::debug!("Could not read Ollama model list: {e}"),
        }
        Ok(())
    }
}

impl LlmProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn query(&self, prompt: &str) -> Result<String, LlmError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            format: "json",
        };

        let response = self
            .client
            .post(endpoint(&self.base_url, "api/generate"))
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::Status {
                status: status.as_u16(),
                body: error_body(response),
            });
        }

        let body: GenerateResponse = response
            .json()
            .map_err(|e| LlmError::Payload(format!("missing 'response' field: {e}")))?;
        Ok(body.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_matches_latest_tag() {
        assert!(model_matches("llama3:latest", "llama3"));
        assert!(model_matches("llama3", "llama3:latest"));
        assert!(model_matches("mistral:7b", "mistral:7b"));
        assert!(!model_matches("mistral:7b", "mistral"));
        assert!(!model_matches("llama3:latest", "llama2"));
    }

    #[test]
    fn test_connect_refused_is_unreachable() {
        // Port 9 (discard) is not expected to run an HTTP server
        let config = OllamaConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            model: "llama3".to_string(),
            timeout_secs: 2,
        };
        let err = OllamaProvider::connect(&config).err().unwrap();
        assert!(matches!(err, LlmError::Unreachable { .. }));
    }
}
