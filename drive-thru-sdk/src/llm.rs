use crate::error::Error;
use async_trait::async_trait;
use clap::Args;
use genai::Client;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest};
use serde::Deserialize;
use std::env;

pub const DEFAULT_MODEL: &str = "gpt-5-mini";

/// Anything that can answer a chat request, optionally with tool calls.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn completion(
        &self,
        messages: Vec<ChatMessage>,
        tools: Option<Vec<genai::chat::Tool>>,
    ) -> Result<LLMResponse, Error>;
}

#[derive(Clone)]
pub struct LLM {
    pub model: String,
    pub client: Client,
    pub api_key: Option<String>,
    pub temperature: Option<f64>,
}

#[derive(Args, Deserialize, Clone, Debug)]
pub struct LLMConfig {
    /// Chat model that drives the conversation.
    #[arg(long, global = true, env = "DRIVE_THRU_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Provider API key. Left unset, genai reads the provider's own variable.
    #[arg(long, global = true, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Sampling temperature; the provider default when unset.
    #[arg(long, global = true, env = "DRIVE_THRU_TEMPERATURE")]
    pub temperature: Option<f64>,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            temperature: None,
        }
    }
}

impl LLM {
    pub fn new(config: LLMConfig) -> Self {
        if let Some(key) = &config.api_key {
            // genai resolves credentials from the provider's environment variable.
            let var = if config.model.starts_with("claude") {
                "ANTHROPIC_API_KEY"
            } else {
                "OPENAI_API_KEY"
            };
            if env::var(var).is_err() {
                unsafe {
                    env::set_var(var, key);
                }
            }
        }

        Self {
            model: config.model,
            client: Client::default(),
            api_key: config.api_key,
            temperature: config.temperature,
        }
    }
}

#[async_trait]
impl ChatModel for LLM {
    async fn completion(
        &self,
        messages: Vec<ChatMessage>,
        tools: Option<Vec<genai::chat::Tool>>,
    ) -> Result<LLMResponse, Error> {
        let mut chat_req = ChatRequest::new(messages);

        if let Some(t) = tools {
            chat_req = chat_req.with_tools(t);
        }

        let options = self
            .temperature
            .map(|t| ChatOptions::default().with_temperature(t));

        tracing::debug!("Sending chat request to {}", self.model);
        let output = self
            .client
            .exec_chat(&self.model, chat_req, options.as_ref())
            .await?;

        let text: String = output.content.texts().join("");
        let tool_calls: Vec<genai::chat::ToolCall> =
            output.tool_calls().iter().map(|t| (*t).clone()).collect();

        Ok(LLMResponse {
            content: text,
            tool_calls,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct LLMResponse {
    pub content: String,
    pub tool_calls: Vec<genai::chat::ToolCall>,
}
