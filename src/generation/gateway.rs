//! Gateway to an OpenAI-compatible chat-completions service

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::LlmConfig;
use crate::error::{Error, Result};

use super::prompt;

/// Generation gateway: one outbound call per `answer` invocation, no retry,
/// no streaming, bounded by the configured request timeout.
#[derive(Debug)]
pub struct GenerationGateway {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl GenerationGateway {
    /// Read the API credential from the configured environment variable.
    ///
    /// Called at startup so a missing credential fails the whole process
    /// before any query is accepted, not on the first generation call.
    pub fn from_env(config: &LlmConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                Error::Config(format!(
                    "{} not found in environment variables. Set it before starting.",
                    config.api_key_env
                ))
            })?;
        Self::new(config, api_key)
    }

    /// Create a gateway with an explicit credential
    pub fn new(config: &LlmConfig, api_key: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::Config("generation API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base: config.api_base.clone(),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// The model this gateway generates with
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Fill the template with (context, query) and request one completion.
    /// Returns the service's raw text response unmodified.
    pub async fn answer(&self, context: &str, query: &str) -> Result<String> {
        let filled = prompt::build_prompt(context, query);
        let url = format!("{}/chat/completions", self.api_base);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &filled,
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        tracing::info!(model = %self.model, prompt_chars = filled.len(), "requesting completion");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Generation(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Generation(format!("HTTP {}: {}", status, body)));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Generation(format!("failed to parse response: {}", e)))?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Error::generation("response contained no choices"))
    }
}
