use crate::error::ToolError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod spice_route;
pub use spice_route::SpiceRouteMenu;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemSize {
    S,
    M,
    L,
}

impl ItemSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemSize::S => "S",
            ItemSize::M => "M",
            ItemSize::L => "L",
        }
    }
}

impl FromStr for ItemSize {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "S" => Ok(ItemSize::S),
            "M" => Ok(ItemSize::M),
            "L" => Ok(ItemSize::L),
            _ => Err(ToolError::new(format!("error: unknown size {}", s))),
        }
    }
}

impl fmt::Display for ItemSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Drink,
    ComboMeal,
    HappyMeal,
    Regular,
    Sauce,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub calories: u32,
    pub price: f64,
    pub available: bool,
    #[serde(default)]
    pub size: Option<ItemSize>,
    #[serde(default)]
    pub voice_alias: Option<String>,
    pub category: ItemCategory,
}

/// Source of the menu the agent sells from.
///
/// The built-in [`SpiceRouteMenu`] is static, but the loaders are async so a
/// point-of-sale backed implementation can be swapped in.
#[async_trait]
pub trait MenuSource: Send + Sync {
    async fn list_drinks(&self) -> Vec<MenuItem>;
    async fn list_combo_meals(&self) -> Vec<MenuItem>;
    async fn list_happy_meals(&self) -> Vec<MenuItem>;
    async fn list_regulars(&self) -> Vec<MenuItem>;
    async fn list_sauces(&self) -> Vec<MenuItem>;

    async fn load_menu(&self) -> Menu {
        Menu {
            drinks: self.list_drinks().await,
            combo_meals: self.list_combo_meals().await,
            happy_meals: self.list_happy_meals().await,
            regulars: self.list_regulars().await,
            sauces: self.list_sauces().await,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Menu {
    pub drinks: Vec<MenuItem>,
    pub combo_meals: Vec<MenuItem>,
    pub happy_meals: Vec<MenuItem>,
    pub regulars: Vec<MenuItem>,
    pub sauces: Vec<MenuItem>,
}

impl Menu {
    pub fn by_category(&self, category: ItemCategory) -> &[MenuItem] {
        match category {
            ItemCategory::Drink => &self.drinks,
            ItemCategory::ComboMeal => &self.combo_meals,
            ItemCategory::HappyMeal => &self.happy_meals,
            ItemCategory::Regular => &self.regulars,
            ItemCategory::Sauce => &self.sauces,
        }
    }

    /// Every item, combos first. Receipt lookups rely on this order.
    pub fn all_items(&self) -> Vec<MenuItem> {
        self.combo_meals
            .iter()
            .chain(&self.happy_meals)
            .chain(&self.regulars)
            .chain(&self.drinks)
            .chain(&self.sauces)
            .cloned()
            .collect()
    }

    /// Items that can be ordered on their own: regulars, drinks and sauces.
    pub fn a_la_carte(&self) -> Vec<MenuItem> {
        self.regulars
            .iter()
            .chain(&self.drinks)
            .chain(&self.sauces)
            .cloned()
            .collect()
    }
}

pub fn find_items_by_id<'a>(
    items: &'a [MenuItem],
    item_id: &str,
    size: Option<ItemSize>,
) -> Vec<&'a MenuItem> {
    items
        .iter()
        .filter(|item| item.id == item_id && (size.is_none() || item.size == size))
        .collect()
}

/// Distinct sizes offered for the given variants, in listing order.
pub fn available_sizes(variants: &[&MenuItem]) -> Vec<ItemSize> {
    let mut sizes = Vec::new();
    for size in variants.iter().filter_map(|item| item.size) {
        if !sizes.contains(&size) {
            sizes.push(size);
        }
    }
    sizes
}

/// Groups sized items by id, keeping first-seen order, and returns the unsized
/// leftovers separately.
pub fn map_by_sizes(items: &[MenuItem]) -> (Vec<(String, Vec<&MenuItem>)>, Vec<&MenuItem>) {
    let mut groups: Vec<(String, Vec<&MenuItem>)> = Vec::new();
    let mut leftovers = Vec::new();

    for item in items {
        if item.size.is_none() {
            leftovers.push(item);
            continue;
        }
        match groups.iter_mut().find(|(id, _)| *id == item.id) {
            Some((_, variants)) => variants.push(item),
            None => groups.push((item.id.clone(), vec![item])),
        }
    }

    (groups, leftovers)
}

/// Sorted, de-duplicated ids. Used for tool parameter enums.
pub fn item_ids(items: &[MenuItem]) -> Vec<String> {
    let mut ids: Vec<String> = items.iter().map(|item| item.id.clone()).collect();
    ids.sort();
    ids.dedup();
    ids
}
