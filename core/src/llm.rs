use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::config_types::LlmConfig;

const SYSTEM_PROMPT: &str = "You are a task planner for a multi-agent system.";
const MAX_TOKENS: u32 = 100;

/// Optional text-completion side channel. Implementations never fail: any
/// problem is reported as `None`.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Option<String>;
}

/// Chat-completions client for Groq's OpenAI-compatible endpoint.
pub struct GroqChatClient {
    base_url: String,
    api_key: String,
    model: String,
    http: Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl GroqChatClient {
    /// Build a client from `cfg`. Returns `None` without an API key.
    pub fn from_config(cfg: &LlmConfig) -> Option<Self> {
        let api_key = cfg.api_key.clone()?;
        let http = match Client::builder().timeout(Duration::from_secs(cfg.timeout_secs)).build() {
            Ok(c) => c,
            Err(e) => {
                debug!("failed to build chat client: {e}");
                return None;
            }
        };
        let mut base_url = cfg.base_url.clone();
        if base_url.ends_with('/') {
            base_url.pop();
        }
        Some(Self { base_url, api_key, model: cfg.model.clone(), http })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    async fn request(&self, prompt: &str) -> Result<Option<String>, reqwest::Error> {
        let payload = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage { role: "system", content: SYSTEM_PROMPT },
                ChatMessage { role: "user", content: prompt },
            ],
            max_tokens: MAX_TOKENS,
        };
        let resp = self
            .http
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;
        let parsed: ChatResponse = resp.json().await?;
        Ok(parsed.choices.into_iter().next().and_then(|c| c.message.content))
    }
}

#[async_trait]
impl ChatModel for GroqChatClient {
    async fn complete(&self, prompt: &str) -> Option<String> {
        match self.request(prompt).await {
            Ok(Some(text)) if !text.trim().is_empty() => Some(text),
            Ok(_) => {
                debug!("chat completion was empty");
                None
            }
            Err(e) => {
                debug!("chat completion failed: {e}");
                None
            }
        }
    }
}

/// Chat model for `config`, or `None` when no API key is configured.
pub fn select_chat_model(config: &Config) -> Option<Arc<dyn ChatModel>> {
    if !config.use_llm() {
        return None;
    }
    GroqChatClient::from_config(&config.llm).map(|c| Arc::new(c) as Arc<dyn ChatModel>)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_key_means_no_model() {
        let cfg = Config::default();
        assert!(select_chat_model(&cfg).is_none());
        assert!(GroqChatClient::from_config(&cfg.llm).is_none());
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let cfg = LlmConfig {
            api_key: Some("k".into()),
            base_url: "http://localhost:1/v1/".into(),
            ..LlmConfig::default()
        };
        let client = GroqChatClient::from_config(&cfg).unwrap();
        assert_eq!(client.completions_url(), "http://localhost:1/v1/chat/completions");
    }

    #[tokio::test]
    async fn unreachable_endpoint_yields_none() {
        let cfg = LlmConfig {
            api_key: Some("k".into()),
            base_url: "http://127.0.0.1:9".into(),
            timeout_secs: 2,
            ..LlmConfig::default()
        };
        let client = GroqChatClient::from_config(&cfg).unwrap();
        assert_eq!(client.complete("hi").await, None);
    }
}
