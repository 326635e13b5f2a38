use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use super::{parse_args, Tool};
use crate::desk::{listing_message, removed_message, OrderDesk};
use crate::error::ToolError;

#[derive(Deserialize)]
struct RemoveArgs {
    order_id: Vec<String>,
}

pub struct RemoveOrderItemTool {
    desk: Arc<OrderDesk>,
}

impl RemoveOrderItemTool {
    pub fn new(desk: Arc<OrderDesk>) -> Self {
        Self { desk }
    }
}

#[async_trait]
impl Tool for RemoveOrderItemTool {
    fn name(&self) -> String {
        "remove_order_item".to_string()
    }

    fn description(&self) -> String {
        "Removes one or more items from the user's order using their `order_id`s.\n\n\
        Useful when the user asks to cancel or delete existing items (e.g., \"Remove the samosas\").\n\n\
        If the `order_id`s are unknown, call `list_order_items` first to retrieve them."
            .to_string()
    }

    fn parameters(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "order_id": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "A list of internal `order_id`s of the items to remove. Use `list_order_items` to look it up if needed."
                }
            },
            "required": ["order_id"]
        })
    }

    async fn call(&self, args: Value) -> Result<String, ToolError> {
        let args: RemoveArgs = parse_args(args)?;
        let removed = self.desk.remove_order_items(&args.order_id).await?;
        Ok(removed_message(&removed))
    }
}

pub struct ListOrderItemsTool {
    desk: Arc<OrderDesk>,
}

impl ListOrderItemsTool {
    pub fn new(desk: Arc<OrderDesk>) -> Self {
        Self { desk }
    }
}

#[async_trait]
impl Tool for ListOrderItemsTool {
    fn name(&self) -> String {
        "list_order_items".to_string()
    }

    fn description(&self) -> String {
        "Retrieves the current list of items in the user's order, including each item's internal `order_id`.\n\n\
        Helpful when:\n\
        - An `order_id` is required before modifying or removing an existing item.\n\
        - Confirming details or contents of the current order.\n\n\
        Examples:\n\
        - User wants to change an item but its `order_id` is unknown (e.g., \"Change the Lassi from small to large\").\n\
        - User wants to remove an item but its `order_id` is unknown (e.g., \"Remove the Naan\").\n\
        - User asks about the current order (e.g., \"What's in my order so far?\")."
            .to_string()
    }

    fn parameters(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn call(&self, _args: Value) -> Result<String, ToolError> {
        let items = self.desk.list_order_items().await;
        Ok(listing_message(&items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::tools::tests::test_desk;

    #[tokio::test]
    async fn test_list_then_remove() {
        let (desk, _dir) = test_desk().await;
        let list = ListOrderItemsTool::new(desk.clone());
        let remove = RemoveOrderItemTool::new(desk.clone());

        assert_eq!(list.call(Value::Null).await.unwrap(), "The order is empty");

        let item = desk.order_regular_item("butter_naan", None).await.unwrap();
        let listed = list.call(serde_json::json!({})).await.unwrap();
        assert!(listed.contains(item.order_id()));

        let out = remove
            .call(serde_json::json!({ "order_id": [item.order_id()] }))
            .await
            .unwrap();
        assert!(out.starts_with("Removed items:\n"));
        assert!(out.contains("butter_naan"));
        assert_eq!(list.call(Value::Null).await.unwrap(), "The order is empty");
    }

    #[tokio::test]
    async fn test_remove_unknown_id() {
        let (desk, _dir) = test_desk().await;
        let err = RemoveOrderItemTool::new(desk)
            .call(serde_json::json!({ "order_id": ["O_NOPE00", "O_NOPE01"] }))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "error: no item(s) found with order_id(s): O_NOPE00, O_NOPE01"
        );
    }
}
