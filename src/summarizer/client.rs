use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, instrument};

use crate::config::{Config, ENV_OPENAI_API_KEY, require_credential};
use crate::entities::SourceDraft;
use crate::summarizer::{
    Summarize,
    citations::linkify_citations,
    errors::LlmError,
    prompt::{SYSTEM_PROMPT, build_user_message},
};

const LLM_TIMEOUT: Duration = Duration::from_secs(120);
const TEMPERATURE: f64 = 0.2;

#[derive(Debug, Serialize)]
struct ChatCompletionsRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionsResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Summarizer backed by an OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiSummarizer {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiSummarizer {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
    ) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(LLM_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key,
            model: model.into(),
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::new(
            config.openai_base_url(),
            config.openai_api_key().map(str::to_string),
            config.openai_model(),
        )
    }

    fn endpoint_chat_completions(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.base_url.trim_end_matches('/')
        )
    }

    async fn chat(&self, api_key: &str, system: &str, user: &str) -> Result<String, LlmError> {
        let request = ChatCompletionsRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: system,
                },
                Message {
                    role: "user",
                    content: user,
                },
            ],
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(self.endpoint_chat_completions())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionsResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(LlmError::EmptyCompletion)
    }
}

#[async_trait]
impl Summarize for OpenAiSummarizer {
    #[instrument(skip(self, sources), fields(model = %self.model, sources = sources.len()))]
    async fn summarize(&self, query: &str, sources: &[SourceDraft]) -> Result<String, LlmError> {
        let api_key = require_credential(self.api_key.as_deref(), ENV_OPENAI_API_KEY)?;

        let user = build_user_message(query, sources, Utc::now().date_naive());
        let markdown = self.chat(api_key, SYSTEM_PROMPT, &user).await?;
        info!(chars = markdown.len(), "received report");

        Ok(linkify_citations(
            &markdown,
            sources.iter().map(|s| s.label.as_str()),
        ))
    }
}
