use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::LookupError;

/// Generative text collaborator used as the resolver's last resort.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LookupError>;
}

/// Client for a llama-server style `/completion` endpoint.
#[derive(Clone)]
pub struct LLMService {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct CompletionRequest {
    prompt: String,
    stream: bool,
    n_predict: usize,
    temperature: f32,
    top_k: u32,
    top_p: f32,
    stop: Vec<String>,
}

#[derive(Deserialize)]
struct CompletionResponse {
    content: String,
}

impl LLMService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: crate::services::http_client(timeout, None),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Generator for LLMService {
    async fn generate(&self, prompt: &str) -> Result<String, LookupError> {
        let system_prompt = "You are Jarvis, a helpful voice assistant. Answer in one or two short spoken sentences.";
        let full_prompt = format!("System: {}\nUser: {}\nAssistant:", system_prompt, prompt);

        let request_body = CompletionRequest {
            prompt: full_prompt,
            stream: false,
            n_predict: 128,
            temperature: 0.8,
            top_k: 100,
            top_p: 0.7,
            stop: vec!["User:".to_string(), "System:".to_string()],
        };

        let response = self
            .client
            .post(format!("{}/completion", self.base_url.trim_end_matches('/')))
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LookupError::Status(response.status().as_u16()));
        }

        let resp_json: CompletionResponse = response
            .json()
            .await
            .map_err(|e| LookupError::Parse(e.to_string()))?;

        let text = resp_json.content.trim();
        if text.is_empty() {
            return Err(LookupError::Empty);
        }
        Ok(text.to_string())
    }
}
