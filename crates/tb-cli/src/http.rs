//! OpenAI-compatible chat-completions backend (Ollama, llama.cpp server, vLLM, ...).

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tb_core::{BackendError, ReasoningBackend};

use crate::config::BackendConfig;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

pub struct HttpBackend {
    config: BackendConfig,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
}

impl HttpBackend {
    pub fn new(config: BackendConfig, api_key: Option<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to create HTTP client")?;
        Ok(Self {
            config,
            api_key,
            client,
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.endpoint.trim_end_matches('/')
        )
    }
}

impl ReasoningBackend for HttpBackend {
    fn complete(&self, user_prompt: &str, system_prompt: &str) -> Result<String, BackendError> {
        let body = build_request(&self.config, user_prompt, system_prompt);
        let url = self.url();
        tracing::debug!(%url, model = %self.config.model, prompt_chars = user_prompt.len(), "backend request");

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().map_err(|e| {
            if e.is_timeout() {
                BackendError::Timeout(self.config.timeout_secs)
            } else {
                BackendError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| BackendError::Http(format!("failed to read response body: {e}")))?;
        if !status.is_success() {
            return Err(BackendError::Status {
                code: status.as_u16(),
                body: text,
            });
        }

        let completion = parse_completion(&text)?;
        tracing::debug!(reply_chars = completion.len(), "backend reply");
        Ok(completion)
    }
}

fn build_request<'a>(
    config: &'a BackendConfig,
    user_prompt: &'a str,
    system_prompt: &'a str,
) -> ChatRequest<'a> {
    let mut messages = Vec::with_capacity(2);
    if !system_prompt.is_empty() {
        messages.push(ChatMessage {
            role: "system",
            content: system_prompt,
        });
    }
    messages.push(ChatMessage {
        role: "user",
        content: user_prompt,
    });
    ChatRequest {
        model: &config.model,
        messages,
        stream: false,
        temperature: config.temperature,
    }
}

fn parse_completion(body: &str) -> Result<String, BackendError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| BackendError::InvalidResponse(e.to_string()))?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or(BackendError::EmptyResponse)
}
