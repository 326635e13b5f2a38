use async_trait::async_trait;
use drive_thru_sdk::llm::{ChatModel, LLMResponse};
use drive_thru_sdk::Error;
use genai::chat::{ChatMessage, ChatRole};

/// Repeats the last customer utterance back without touching any tool.
pub struct EchoModel;

#[async_trait]
impl ChatModel for EchoModel {
    async fn completion(
        &self,
        messages: Vec<ChatMessage>,
        _tools: Option<Vec<genai::chat::Tool>>,
    ) -> Result<LLMResponse, Error> {
        let last_user = messages
            .iter()
            .rev()
            .find(|m| matches!(m.role, ChatRole::User))
            .map(|m| m.content.texts().join(""))
            .unwrap_or_default();

        Ok(LLMResponse {
            content: format!("You said: {}", last_user),
            tool_calls: vec![],
        })
    }
}
