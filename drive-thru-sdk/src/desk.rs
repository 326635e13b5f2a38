use crate::error::{Error, ToolError};
use crate::menu::{available_sizes, find_items_by_id, ItemSize, Menu, MenuItem};
use crate::order::{OrderState, OrderedItem};
use crate::receipt::{Receipt, ReceiptWriter};
use tokio::sync::Mutex;

/// Which kind of meal a meal order refers to. Kid's meals are lenient about
/// sizes on unsized drinks, combos are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealKind {
    Combo,
    Happy,
}

/// Arguments shared by the combo and kid's meal tools.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct MealRequest {
    pub meal_id: String,
    pub drink_id: String,
    #[serde(default)]
    pub drink_size: Option<String>,
    #[serde(default)]
    pub sauce_id: Option<String>,
}

/// One customer's menu, order and receipt. All ordering tools act on a desk.
pub struct OrderDesk {
    menu: Menu,
    order: Mutex<OrderState>,
    receipt: ReceiptWriter,
}

/// The model is told to send the literal string "null" for absent values.
fn normalize(value: Option<&str>) -> Option<&str> {
    match value.map(str::trim) {
        None | Some("") | Some("null") => None,
        Some(v) => Some(v),
    }
}

pub fn parse_size(raw: Option<&str>) -> Result<Option<ItemSize>, ToolError> {
    match normalize(raw) {
        None => Ok(None),
        Some(s) => s
            .to_ascii_uppercase()
            .parse::<ItemSize>()
            .map(Some)
            .map_err(|_| ToolError::new(format!("error: unknown size {}", s))),
    }
}

fn join_sizes(sizes: &[ItemSize]) -> String {
    sizes.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
}

fn multiple_sizes_error(id: &str, sizes: &[ItemSize]) -> ToolError {
    ToolError::new(format!(
        "error: {} comes with multiple sizes: {}. Please clarify which size should be selected.",
        id,
        join_sizes(sizes)
    ))
}

fn ensure_available(id: &str, variants: &[&MenuItem], size: Option<ItemSize>) -> Result<(), ToolError> {
    let available = variants
        .iter()
        .filter(|item| size.is_none() || item.size == size)
        .any(|item| item.available);
    if available {
        Ok(())
    } else {
        Err(ToolError::new(format!("error: {} is currently unavailable", id)))
    }
}

impl OrderDesk {
    pub fn new(menu: Menu, receipt: ReceiptWriter) -> Self {
        Self {
            menu,
            order: Mutex::new(OrderState::new()),
            receipt,
        }
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn receipt_writer(&self) -> &ReceiptWriter {
        &self.receipt
    }

    pub async fn order(&self) -> OrderState {
        self.order.lock().await.clone()
    }

    pub async fn receipt(&self) -> Receipt {
        let order = self.order.lock().await;
        Receipt::from_order(&order, &self.menu)
    }

    /// Clears the order and the receipt file. Called when a session starts.
    pub async fn reset(&self) -> Result<(), Error> {
        let mut order = self.order.lock().await;
        order.clear();
        self.receipt.reset().await
    }

    async fn store(&self, item: OrderedItem) -> OrderedItem {
        let mut order = self.order.lock().await;
        let stored = order.add(item);
        tracing::info!("Order item added: {}", stored.to_json());
        self.persist(&order).await;
        stored
    }

    async fn persist(&self, order: &OrderState) {
        let receipt = Receipt::from_order(order, &self.menu);
        if let Err(e) = self.receipt.write(&receipt).await {
            tracing::error!("Failed to write receipt {}: {}", self.receipt.path().display(), e);
        }
    }

    pub async fn order_meal(&self, kind: MealKind, req: &MealRequest) -> Result<OrderedItem, ToolError> {
        let meals = match kind {
            MealKind::Combo => &self.menu.combo_meals,
            MealKind::Happy => &self.menu.happy_meals,
        };

        let meal = find_items_by_id(meals, &req.meal_id, None);
        if meal.is_empty() {
            return Err(ToolError::new(format!("error: the meal {} was not found", req.meal_id)));
        }

        let drink = find_items_by_id(&self.menu.drinks, &req.drink_id, None);
        if drink.is_empty() {
            return Err(ToolError::new(format!("error: the drink {} was not found", req.drink_id)));
        }

        let mut drink_size = parse_size(req.drink_size.as_deref())?;
        let sauce_id = normalize(req.sauce_id.as_deref());

        let sizes = available_sizes(&drink);
        if drink_size.is_none() && sizes.len() > 1 {
            return Err(multiple_sizes_error(&req.drink_id, &sizes));
        }

        if drink_size.is_some() && sizes.is_empty() {
            match kind {
                MealKind::Combo => {
                    return Err(ToolError::new(format!(
                        "error: size should not be specified for item {} as it does not support sizing options.",
                        req.drink_id
                    )));
                }
                MealKind::Happy => drink_size = None,
            }
        }

        if let Some(size) = drink_size {
            if !sizes.contains(&size) {
                drink_size = None;
            }
        }

        if let Some(sauce_id) = sauce_id {
            let sauce = find_items_by_id(&self.menu.sauces, sauce_id, None);
            if sauce.is_empty() {
                return Err(ToolError::new(format!("error: the sauce {} was not found", sauce_id)));
            }
            ensure_available(sauce_id, &sauce, None)?;
        }

        ensure_available(&req.meal_id, &meal, None)?;
        ensure_available(&req.drink_id, &drink, drink_size)?;

        let item = match kind {
            MealKind::Combo => OrderedItem::combo(&req.meal_id, &req.drink_id, drink_size, sauce_id),
            MealKind::Happy => OrderedItem::happy(&req.meal_id, &req.drink_id, drink_size, sauce_id),
        };
        Ok(self.store(item).await)
    }

    pub async fn order_regular_item(&self, item_id: &str, size: Option<&str>) -> Result<OrderedItem, ToolError> {
        let items = self.menu.a_la_carte();
        let variants = find_items_by_id(&items, item_id, None);
        if variants.is_empty() {
            return Err(ToolError::new(format!("error: {} was not found.", item_id)));
        }

        let mut size = parse_size(size)?;
        let sizes = available_sizes(&variants);

        if size.is_none() && sizes.len() > 1 {
            return Err(multiple_sizes_error(item_id, &sizes));
        }

        if size.is_some() && sizes.is_empty() {
            size = None;
        }

        if let Some(s) = size {
            if !sizes.contains(&s) {
                return Err(ToolError::new(format!(
                    "error: unknown size {} for {}. Available sizes: {}.",
                    s,
                    item_id,
                    join_sizes(&sizes)
                )));
            }
        }

        ensure_available(item_id, &variants, size)?;

        Ok(self.store(OrderedItem::regular(item_id, size)).await)
    }

    /// Removes every listed item, or none of them if any id is unknown.
    pub async fn remove_order_items(&self, order_ids: &[String]) -> Result<Vec<OrderedItem>, ToolError> {
        let mut order = self.order.lock().await;

        let not_found: Vec<&str> = order_ids
            .iter()
            .filter(|id| !order.contains(id))
            .map(String::as_str)
            .collect();
        if !not_found.is_empty() {
            return Err(ToolError::new(format!(
                "error: no item(s) found with order_id(s): {}",
                not_found.join(", ")
            )));
        }

        let removed: Vec<OrderedItem> = order_ids.iter().filter_map(|id| order.remove(id)).collect();
        tracing::info!("Removed {} order item(s)", removed.len());
        self.persist(&order).await;
        Ok(removed)
    }

    pub async fn list_order_items(&self) -> Vec<OrderedItem> {
        self.order.lock().await.items().to_vec()
    }
}

pub fn added_message(item: &OrderedItem) -> String {
    format!("The item was added: {}", item.to_json())
}

pub fn removed_message(items: &[OrderedItem]) -> String {
    let lines: Vec<String> = items.iter().map(OrderedItem::to_json).collect();
    format!("Removed items:\n{}", lines.join("\n"))
}

pub fn listing_message(items: &[OrderedItem]) -> String {
    if items.is_empty() {
        return "The order is empty".to_string();
    }
    items.iter().map(OrderedItem::to_json).collect::<Vec<_>>().join("\n")
}
