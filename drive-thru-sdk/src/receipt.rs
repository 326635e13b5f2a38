use crate::error::Error;
use crate::menu::{find_items_by_id, ItemSize, Menu, MenuItem};
use crate::order::{OrderState, OrderedItem};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub items: Vec<ReceiptItem>,
    pub total_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptItem {
    pub order_id: String,
    pub name: String,
    pub sub_items: Vec<String>,
    pub price: f64,
}

/// Looks an item up by id and size, falling back to any size when the exact
/// variant is not on the menu.
fn lookup<'a>(all: &'a [MenuItem], id: &str, size: Option<ItemSize>) -> Option<&'a MenuItem> {
    find_items_by_id(all, id, size)
        .into_iter()
        .next()
        .or_else(|| find_items_by_id(all, id, None).into_iter().next())
}

fn with_size(name: &str, size: Option<ItemSize>) -> String {
    match size {
        Some(size) => format!("{} ({})", name, size),
        None => name.to_string(),
    }
}

impl Receipt {
    /// Enriches the order with menu names and prices.
    pub fn from_order(order: &OrderState, menu: &Menu) -> Self {
        let all = menu.all_items();
        let mut receipt = Receipt::default();

        for ordered in order.items() {
            let mut line = ReceiptItem {
                order_id: ordered.order_id().to_string(),
                name: String::new(),
                sub_items: Vec::new(),
                price: 0.0,
            };

            match ordered {
                OrderedItem::Regular(r) => {
                    if let Some(item) = lookup(&all, &r.item_id, r.size) {
                        line.name = with_size(&item.name, r.size);
                        line.price += item.price;
                    }
                }
                OrderedItem::ComboMeal(m) | OrderedItem::HappyMeal(m) => {
                    if let Some(meal) = lookup(&all, &m.meal_id, None) {
                        line.name = meal.name.clone();
                        line.price += meal.price;
                    }
                    if let Some(drink) = lookup(&all, &m.drink_id, m.drink_size) {
                        line.sub_items
                            .push(format!("+ {}", with_size(&drink.name, m.drink_size)));
                        line.price += drink.price;
                    }
                    if let Some(sauce) = m.sauce_id.as_deref().and_then(|id| lookup(&all, id, None)) {
                        line.sub_items.push(format!("+ {}", sauce.name));
                        line.price += sauce.price;
                    }
                }
            }

            receipt.total_price += line.price;
            receipt.items.push(line);
        }

        receipt
    }
}

/// Persists the current receipt as pretty JSON so a display or printer can pick it up.
#[derive(Debug, Clone)]
pub struct ReceiptWriter {
    path: PathBuf,
}

impl ReceiptWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn write(&self, receipt: &Receipt) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let content = serde_json::to_string_pretty(receipt)?;
        tokio::fs::write(&self.path, content).await?;
        tracing::debug!("Receipt written to {} ({} items)", self.path.display(), receipt.items.len());
        Ok(())
    }

    pub async fn reset(&self) -> Result<(), Error> {
        self.write(&Receipt::default()).await
    }
}
