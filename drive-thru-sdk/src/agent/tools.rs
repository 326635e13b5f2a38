mod order_items;
mod order_meal;
mod order_regular;

pub use order_items::{ListOrderItemsTool, RemoveOrderItemTool};
pub use order_meal::{OrderComboMealTool, OrderHappyMealTool};
pub use order_regular::OrderRegularItemTool;

use crate::desk::OrderDesk;
use crate::error::ToolError;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> String;
    fn description(&self) -> String;
    fn parameters(&self) -> Value; // JSON Schema
    async fn call(&self, args: Value) -> Result<String, ToolError>;
}

/// The full drive-thru tool set, all acting on the same desk.
pub fn ordering_tools(desk: Arc<OrderDesk>) -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(OrderRegularItemTool::new(desk.clone())),
        Box::new(OrderComboMealTool::new(desk.clone())),
        Box::new(OrderHappyMealTool::new(desk.clone())),
        Box::new(RemoveOrderItemTool::new(desk.clone())),
        Box::new(ListOrderItemsTool::new(desk)),
    ]
}

/// Parses tool arguments, tolerating a missing or `null` argument object.
pub(crate) fn parse_args<T: serde::de::DeserializeOwned>(args: Value) -> Result<T, ToolError> {
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };
    serde_json::from_value(args).map_err(|e| ToolError::new(format!("error: invalid arguments: {}", e)))
}

/// A string enum schema; `nullable` adds the literal "null" the model sends for absent values.
pub(crate) fn enum_schema(description: &str, mut values: Vec<String>, nullable: bool) -> Value {
    if nullable {
        values.push("null".to_string());
    }
    let mut schema = serde_json::json!({
        "type": "string",
        "description": description,
        "enum": values,
    });
    if nullable {
        schema["type"] = serde_json::json!(["string", "null"]);
    }
    schema
}

pub(crate) fn size_schema(description: &str) -> Value {
    enum_schema(
        description,
        vec!["S".to_string(), "M".to_string(), "L".to_string()],
        true,
    )
}
