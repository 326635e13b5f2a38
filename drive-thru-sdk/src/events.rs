use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SOURCE_USER: &str = "user";
pub const SOURCE_AGENT: &str = "agent";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    Message(MessageEvent),
    Action(ActionEvent),
    Observation(ObservationEvent),
}

impl Event {
    pub fn user(content: impl Into<String>) -> Self {
        Event::Message(MessageEvent::new(SOURCE_USER, content))
    }

    pub fn agent(content: impl Into<String>) -> Self {
        Event::Message(MessageEvent::new(SOURCE_AGENT, content))
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Event::Message(m) => m.timestamp,
            Event::Action(a) => a.timestamp,
            Event::Observation(o) => o.timestamp,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageEvent {
    pub source: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl MessageEvent {
    pub fn new(source: &str, content: impl Into<String>) -> Self {
        Self {
            source: source.to_string(),
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A tool call requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionEvent {
    pub source: String,
    pub tool_name: String,
    pub tool_call_id: String,
    pub arguments: serde_json::Value,
    pub thought: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// The result of a tool call, as fed back to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationEvent {
    pub source: String,
    pub tool_name: String,
    pub tool_call_id: String,
    pub content: String,
    pub is_error: bool,
    pub timestamp: DateTime<Utc>,
}
