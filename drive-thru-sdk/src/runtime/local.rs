use crate::agent::tools::Tool;
use crate::error::ToolError;
use crate::runtime::Runtime;
use async_trait::async_trait;
use serde_json::Value;

/// Runs tools in-process, directly against the session's order desk.
pub struct LocalRuntime {
    tools: Vec<Box<dyn Tool>>,
}

impl LocalRuntime {
    pub fn new(tools: Vec<Box<dyn Tool>>) -> Self {
        Self { tools }
    }
}

#[async_trait]
impl Runtime for LocalRuntime {
    fn tools(&self) -> &[Box<dyn Tool>] {
        &self.tools
    }

    async fn execute(&self, action: &str, args: Value) -> Result<String, ToolError> {
        match self.tools.iter().find(|t| t.name() == action) {
            Some(tool) => tool.call(args).await,
            None => Err(ToolError::new(format!("error: tool {} not found", action))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::tools::ordering_tools;
    use crate::desk::OrderDesk;
    use crate::menu::{MenuSource, SpiceRouteMenu};
    use crate::receipt::ReceiptWriter;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_dispatch_by_name() {
        let dir = TempDir::new().unwrap();
        let desk = Arc::new(OrderDesk::new(
            SpiceRouteMenu.load_menu().await,
            ReceiptWriter::new(dir.path().join("receipt.json")),
        ));
        let runtime = LocalRuntime::new(ordering_tools(desk));

        let out = runtime
            .execute("list_order_items", serde_json::json!({}))
            .await
            .unwrap();
        assert_eq!(out, "The order is empty");

        let err = runtime
            .execute("order_pizza", serde_json::json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "error: tool order_pizza not found");
    }
}
