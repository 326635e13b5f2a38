use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use super::{enum_schema, parse_args, size_schema, Tool};
use crate::desk::{added_message, MealKind, MealRequest, OrderDesk};
use crate::error::ToolError;
use crate::menu::item_ids;

fn meal_parameters(desk: &OrderDesk, kind: MealKind) -> Value {
    let menu = desk.menu();
    let (meals, meal_description) = match kind {
        MealKind::Combo => (&menu.combo_meals, "The ID of the combo meal or thali the user requested."),
        MealKind::Happy => (&menu.happy_meals, "The ID of the kid's meal the user requested."),
    };

    serde_json::json!({
        "type": "object",
        "properties": {
            "meal_id": enum_schema(meal_description, item_ids(meals), false),
            "drink_id": enum_schema("The ID of the drink the user requested.", item_ids(&menu.drinks), false),
            "drink_size": size_schema("Size of the drink, or 'null' when the drink is not size-selectable."),
            "sauce_id": enum_schema(
                "The ID of the chutney or extra the user requested, or 'null'.",
                item_ids(&menu.sauces),
                true,
            ),
        },
        "required": ["meal_id", "drink_id", "drink_size", "sauce_id"]
    })
}

async fn order_meal(desk: &OrderDesk, kind: MealKind, args: Value) -> Result<String, ToolError> {
    let req: MealRequest = parse_args(args)?;
    let item = desk.order_meal(kind, &req).await?;
    Ok(added_message(&item))
}

pub struct OrderComboMealTool {
    desk: Arc<OrderDesk>,
}

impl OrderComboMealTool {
    pub fn new(desk: Arc<OrderDesk>) -> Self {
        Self { desk }
    }
}

#[async_trait]
impl Tool for OrderComboMealTool {
    fn name(&self) -> String {
        "order_combo_meal".to_string()
    }

    fn description(&self) -> String {
        "Call this when the user orders a **Combo Meal or Thali**, like: \"Number 1 with a large Thums Up\" \
        or \"I'll do the Butter Chicken Thali.\"\n\n\
        Do not call this tool unless the user clearly refers to a known combo meal by name or number. \
        Regular items like a single Vada Pav cannot be made into a meal unless such a combo explicitly exists.\n\n\
        Only call this function once the user has clearly specified a drink; always ask for it if it's missing.\n\n\
        A drink for a combo can be Small, Medium, or Large. \
        If the user says just \"a large meal\", assume the drink is that size."
            .to_string()
    }

    fn parameters(&self) -> Value {
        meal_parameters(&self.desk, MealKind::Combo)
    }

    async fn call(&self, args: Value) -> Result<String, ToolError> {
        order_meal(&self.desk, MealKind::Combo, args).await
    }
}

pub struct OrderHappyMealTool {
    desk: Arc<OrderDesk>,
}

impl OrderHappyMealTool {
    pub fn new(desk: Arc<OrderDesk>) -> Self {
        Self { desk }
    }
}

#[async_trait]
impl Tool for OrderHappyMealTool {
    fn name(&self) -> String {
        "order_happy_meal".to_string()
    }

    fn description(&self) -> String {
        "Call this when the user orders a **Kid's Meal**. These meals come with a main item, a drink, \
        and an optional side.\n\n\
        The user must clearly specify a valid Kid's Meal option (e.g., \"Can I get a Mini Dosa Meal?\").\n\n\
        Before calling this tool, make sure the user has provided a valid meal, a drink and a drink size. \
        If any of these are missing, ask for the missing part first.\n\n\
        Assume Small only if the user says \"Kid's Meal\" and gives no size preference, \
        but always ask for clarification if unsure."
            .to_string()
    }

    fn parameters(&self) -> Value {
        meal_parameters(&self.desk, MealKind::Happy)
    }

    async fn call(&self, args: Value) -> Result<String, ToolError> {
        order_meal(&self.desk, MealKind::Happy, args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::tools::tests::test_desk;

    #[tokio::test]
    async fn test_combo_parameters_enumerate_menu() {
        let (desk, _dir) = test_desk().await;
        let tool = OrderComboMealTool::new(desk);
        let params = tool.parameters();

        let meals = params["properties"]["meal_id"]["enum"].as_array().unwrap();
        assert_eq!(meals.len(), 8);
        assert!(meals.contains(&serde_json::json!("combo_butter_chicken")));

        let drinks = params["properties"]["drink_id"]["enum"].as_array().unwrap();
        assert_eq!(drinks.len(), 9);

        let sauces = params["properties"]["sauce_id"]["enum"].as_array().unwrap();
        assert_eq!(sauces.last().unwrap(), "null");
    }

    #[tokio::test]
    async fn test_combo_call_adds_item() {
        let (desk, _dir) = test_desk().await;
        let tool = OrderComboMealTool::new(desk.clone());

        let out = tool
            .call(serde_json::json!({
                "meal_id": "combo_chicken_biryani",
                "drink_id": "sweet_lassi",
                "drink_size": "L",
                "sauce_id": "boondi_raita"
            }))
            .await
            .unwrap();
        assert!(out.starts_with("The item was added: "));
        assert!(out.contains("\"type\":\"combo_meal\""));
        assert_eq!(desk.list_order_items().await.len(), 1);
    }

    #[tokio::test]
    async fn test_happy_call_reports_errors() {
        let (desk, _dir) = test_desk().await;
        let tool = OrderHappyMealTool::new(desk.clone());

        let err = tool
            .call(serde_json::json!({
                "meal_id": "kids_sweet_pulao",
                "drink_id": "mango_lassi",
                "drink_size": null,
                "sauce_id": null
            }))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("comes with multiple sizes"));
        assert!(desk.list_order_items().await.is_empty());
    }
}
