use super::prompt::SYSTEM_PROMPT;
use super::{LlmError, LlmProvider, endpoint, error_body, resolve_api_key};
use crate::config::GeminiConfig;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Google Gemini `generateContent` endpoint.
pub struct GeminiProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiProvider {
    pub fn new(config: &GeminiConfig) -> Result<Self, LlmError> {
        let api_key = resolve_api_key(config.api_key.as_deref(), API_KEY_ENV)?;
        let client = Client::builder().timeout(None::<Duration>).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            api_key,
        })
    }
}

impl LlmProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn query(&self, prompt: &str) -> Result<String, LlmError> {
        let request = json!({
            "systemInstruction": { "parts": [{ "text": SYSTEM_PROMPT }] },
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": { "responseMimeType": "application/json" },
        });
        let path = format!("v1beta/models/{}:generateContent", self.model);

        let response = self
            .client
            .post(endpoint(&self.base_url, &path))
            .header("x-goog-api-key", &self.api_key)
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
            .map_err(|e| LlmError::Payload(e.to_string()))?;
        let parts = body
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts)
            .ok_or_else(|| LlmError::Payload("response has no candidates".to_string()))?;

        let text: String = parts.into_iter().filter_map(|part| part.text).collect();
        if text.is_empty() {
            return Err(LlmError::Payload("candidate has no text parts".to_string()));
        }
        Ok(text)
    }
}
