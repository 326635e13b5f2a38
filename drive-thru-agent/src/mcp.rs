use drive_thru_sdk::desk::{
    added_message, listing_message, removed_message, MealKind, MealRequest, OrderDesk,
};
use drive_thru_sdk::menu::Menu;
use drive_thru_sdk::receipt::ReceiptWriter;
use drive_thru_sdk::session::session_receipt_path;
use drive_thru_sdk::ToolError;
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// Exposes the ordering tools over MCP so an external voice worker can drive
/// an order. Every MCP session gets its own desk and receipt file.
#[derive(Clone)]
pub struct DriveThruMcp {
    desk: Arc<OrderDesk>,
    tool_router: ToolRouter<DriveThruMcp>,
}

#[derive(Deserialize, schemars::JsonSchema)]
pub struct OrderMealArgs {
    /// The ID of the combo meal, thali or kid's meal.
    pub meal_id: String,
    /// The ID of the drink that comes with the meal.
    pub drink_id: String,
    /// S, M or L; "null" when the drink is not size-selectable.
    pub drink_size: Option<String>,
    /// The ID of the chutney or extra, or "null".
    pub sauce_id: Option<String>,
}

#[derive(Deserialize, schemars::JsonSchema)]
pub struct OrderRegularArgs {
    /// The ID of the item the user requested.
    pub item_id: String,
    /// S, M or L when the item has sizes, otherwise "null".
    pub size: Option<String>,
}

#[derive(Deserialize, schemars::JsonSchema)]
pub struct RemoveItemsArgs {
    /// Internal `order_id`s of the items to remove.
    pub order_id: Vec<String>,
}

fn reply(result: Result<String, ToolError>) -> Result<CallToolResult, McpError> {
    match result {
        Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
        Err(e) => Ok(CallToolResult::error(vec![Content::text(e.to_string())])),
    }
}

impl From<OrderMealArgs> for MealRequest {
    fn from(args: OrderMealArgs) -> Self {
        MealRequest {
            meal_id: args.meal_id,
            drink_id: args.drink_id,
            drink_size: args.drink_size,
            sauce_id: args.sauce_id,
        }
    }
}

#[tool_router]
impl DriveThruMcp {
    pub fn new(menu: Menu, receipt_base: &Path) -> Self {
        let receipt = session_receipt_path(receipt_base, &format!("mcp-{}", Uuid::new_v4()));
        Self {
            desk: Arc::new(OrderDesk::new(menu, ReceiptWriter::new(receipt))),
            tool_router: Self::tool_router(),
        }
    }

    async fn order_meal(&self, kind: MealKind, args: OrderMealArgs) -> Result<CallToolResult, McpError> {
        let req = MealRequest::from(args);
        reply(self.desk.order_meal(kind, &req).await.map(|item| added_message(&item)))
    }

    #[tool(
        name = "order_combo_meal",
        description = "Add a Combo Meal or Thali with its drink and optional chutney. Ask for the drink first if it is missing."
    )]
    async fn order_combo_meal(
        &self,
        Parameters(args): Parameters<OrderMealArgs>,
    ) -> Result<CallToolResult, McpError> {
        self.order_meal(MealKind::Combo, args).await
    }

    #[tool(
        name = "order_happy_meal",
        description = "Add a Kid's Meal with its drink and optional side."
    )]
    async fn order_happy_meal(
        &self,
        Parameters(args): Parameters<OrderMealArgs>,
    ) -> Result<CallToolResult, McpError> {
        self.order_meal(MealKind::Happy, args).await
    }

    #[tool(
        name = "order_regular_item",
        description = "Add a single item on its own (a la carte item, drink or chutney), not part of a meal."
    )]
    async fn order_regular_item(
        &self,
        Parameters(args): Parameters<OrderRegularArgs>,
    ) -> Result<CallToolResult, McpError> {
        let result = self
            .desk
            .order_regular_item(&args.item_id, args.size.as_deref())
            .await
            .map(|item| added_message(&item));
        reply(result)
    }

    #[tool(
        name = "remove_order_item",
        description = "Remove one or more items from the order by `order_id`. Call list_order_items first if the ids are unknown."
    )]
    async fn remove_order_item(
        &self,
        Parameters(args): Parameters<RemoveItemsArgs>,
    ) -> Result<CallToolResult, McpError> {
        let result = self
            .desk
            .remove_order_items(&args.order_id)
            .await
            .map(|items| removed_message(&items));
        reply(result)
    }

    #[tool(
        name = "list_order_items",
        description = "List the items in the current order with their `order_id`s."
    )]
    async fn list_order_items(&self) -> Result<CallToolResult, McpError> {
        let items = self.desk.list_order_items().await;
        reply(Ok(listing_message(&items)))
    }
}

#[tool_handler]
impl ServerHandler for DriveThruMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Spice Route drive-thru ordering tools. Every order change must go through a tool."
                    .to_string(),
            ),
        }
    }
}
