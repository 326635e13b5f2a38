use crate::events::Event;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("LLM error: {0}")]
    Llm(#[from] genai::Error),

    #[error("agent exceeded {0} tool steps without answering")]
    MaxToolSteps(usize),

    /// A turn failed after some tools had already run. `events` records them.
    #[error("{source}")]
    IncompleteTurn {
        events: Vec<Event>,
        source: Box<Error>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),
}

/// Failure reported back to the model as the output of a tool call.
///
/// The message is phrased for the model so it can relay it to the customer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ToolError(pub String);

impl ToolError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<&str> for ToolError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}
