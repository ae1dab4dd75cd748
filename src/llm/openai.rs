use super::prompt::SYSTEM_PROMPT;
use super::{LlmError, LlmProvider, endpoint, error_body, resolve_api_key};
use crate::config::OpenAiConfig;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// OpenAI-compatible chat completion endpoint.
pub struct OpenAiProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiProvider {
    pub fn new(config: &OpenAiConfig) -> Result<Self, LlmError> {
        let api_key = resolve_api_key(config.api_key.as_deref(), API_KEY_ENV)?;
        // Cloud calls are not bounded by a request timeout
        let client = Client::builder().timeout(None::<Duration>).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            api_key,
        })
    }
}

impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn query(&self, prompt: &str) -> Result<String, LlmError> {
        let request = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt },
            ],
            "response_format": { "type": "json_object" },
        });

        let response = self
            .client
            .post(endpoint(&self.base_url, "chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::Status {
                status: status.as_u16(),
                body: error_body(response),
            });
        }

        let body: ChatResponse = response
            .json()
            .map_err(|e| LlmError::Payload(e.to_string()))?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::Payload("no message content in first choice".to_string()))
    }
}
