//! Anthropic Messages API client used as the analysis text completer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::analysis::TextCompleter;
use super::with_timeout;
use crate::config::{AnalysisConfig, TimeoutConfig};
use crate::error::{AdapterError, ConfigError};

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

impl MessagesResponse {
    fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|b| match b {
                ContentBlock::Text { text } => Some(text.as_str()),
                ContentBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

pub struct ClaudeClient {
    api_key: String,
    api_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    timeout: Duration,
    http: reqwest::Client,
}

impl ClaudeClient {
    pub fn new(config: &AnalysisConfig, timeouts: &TimeoutConfig) -> Result<Self, ConfigError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::Missing("analysis.api_key"))?;

        Ok(Self {
            api_key,
            api_url: config.api_url.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout: timeouts.analysis(),
            http: reqwest::Client::new(),
        })
    }

    async fn send(&self, prompt: &str) -> Result<String, AdapterError> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let resp = self
            .http
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(AdapterError::Transport(format!("Claude API error {}: {}", status, detail)));
        }

        let parsed: MessagesResponse = resp
            .json()
            .await
            .map_err(|e| {
                AdapterError::MalformedOutput(format!("unreadable Claude response: {}", e))
            })?;
        Ok(parsed.text())
    }
}

#[async_trait]
impl TextCompleter for ClaudeClient {
    fn producer_id(&self) -> &'static str {
        "claude"
    }

    async fn complete(&self, prompt: &str) -> Result<String, AdapterError> {
        with_timeout(self.timeout, self.send(prompt)).await
    }
}
