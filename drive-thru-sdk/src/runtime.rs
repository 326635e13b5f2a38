use crate::agent::tools::Tool;
use crate::error::ToolError;
use async_trait::async_trait;
use serde_json::Value;

pub mod local;
pub use local::LocalRuntime;

#[async_trait]
/// Where the agent's tool calls are carried out.
///
/// The agent only decides which tool to call; the runtime owns the tool set and
/// runs the calls, so the same agent can act on an in-process order desk or
/// on one reached through another transport.
pub trait Runtime: Send + Sync {
    /// Tools the model may call in this runtime.
    fn tools(&self) -> &[Box<dyn Tool>];

    /// Runs the named tool with the model-provided JSON arguments.
    ///
    /// `Err` carries a message meant for the model, not a transport failure.
    async fn execute(&self, action: &str, args: Value) -> Result<String, ToolError>;
}
