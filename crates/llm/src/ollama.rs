//! Ollama generate client
//!
//! `POST {base_url}/api/generate` answers with newline-delimited JSON chunks
//! when streaming and a single JSON object otherwise. Either way the reply
//! text is the concatenation of every chunk's `response` field.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use call_eval_config::LlmConfig;

use crate::LlmError;

const SERVICE: &str = "ollama";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateChunk {
    #[serde(default)]
    response: String,
    #[serde(default)]
    error: Option<String>,
}

/// Concatenate the `response` fields of an NDJSON (or single JSON) body
pub fn collect_response(body: &str) -> Result<String, LlmError> {
    let mut output = String::new();
    for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let chunk: GenerateChunk = serde_json::from_str(line).map_err(|e| LlmError::Malformed {
            service: SERVICE,
            message: format!("bad stream chunk: {}", e),
        })?;
        if let Some(message) = chunk.error {
            return Err(LlmError::Request {
                service: SERVICE,
                message,
            });
        }
        output.push_str(&chunk.response);
    }
    Ok(output)
}

/// Thin client for one Ollama model
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f32,
}

impl OllamaClient {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run a prompt to completion and return the generated text
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: true,
            options: GenerateOptions {
                temperature: self.temperature,
            },
        };

        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "Calling Ollama");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::request(SERVICE, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::request(SERVICE, e))?;

        if !status.is_success() {
            return Err(LlmError::Status {
                service: SERVICE,
                status: status.as_u16(),
                body,
            });
        }

        collect_response(&body)
    }
}
