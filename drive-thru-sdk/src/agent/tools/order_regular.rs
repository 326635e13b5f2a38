use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use super::{enum_schema, parse_args, size_schema, Tool};
use crate::desk::{added_message, OrderDesk};
use crate::error::ToolError;
use crate::menu::item_ids;

#[derive(Deserialize)]
struct RegularArgs {
    item_id: String,
    #[serde(default)]
    size: Option<String>,
}

pub struct OrderRegularItemTool {
    desk: Arc<OrderDesk>,
}

impl OrderRegularItemTool {
    pub fn new(desk: Arc<OrderDesk>) -> Self {
        Self { desk }
    }
}

#[async_trait]
impl Tool for OrderRegularItemTool {
    fn name(&self) -> String {
        "order_regular_item".to_string()
    }

    fn description(&self) -> String {
        "Call this when the user orders **a single item on its own**, not as part of a Combo Meal or Kid's Meal.\n\n\
        The customer must provide clear and specific input. Item variants must **always** be explicitly stated.\n\n\
        The user might say, for example:\n\
        - \"Just the Vada Pav, no meal\"\n\
        - \"A medium Mango Lassi\"\n\
        - \"Can I get some Mint Chutney?\"\n\
        - \"Can I get a Gulab Jamun?\""
            .to_string()
    }

    fn parameters(&self) -> Value {
        let ids = item_ids(&self.desk.menu().a_la_carte());
        serde_json::json!({
            "type": "object",
            "properties": {
                "item_id": enum_schema("The ID of the item the user requested.", ids, false),
                "size": size_schema("Size of the item, if applicable (e.g., 'S', 'M', 'L'), otherwise 'null'."),
            },
            "required": ["item_id"]
        })
    }

    async fn call(&self, args: Value) -> Result<String, ToolError> {
        let args: RegularArgs = parse_args(args)?;
        let item = self
            .desk
            .order_regular_item(&args.item_id, args.size.as_deref())
            .await?;
        Ok(added_message(&item))
    }
}
