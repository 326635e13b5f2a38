use crate::menu::ItemSize;
use rand::Rng;
use serde::{Deserialize, Serialize};

const ORDER_ID_PREFIX: &str = "O_";
const ORDER_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const ORDER_ID_LEN: usize = 6;

pub fn new_order_id() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..ORDER_ID_LEN)
        .map(|_| ORDER_ID_ALPHABET[rng.random_range(0..ORDER_ID_ALPHABET.len())] as char)
        .collect();
    format!("{}{}", ORDER_ID_PREFIX, suffix)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderedMeal {
    pub order_id: String,
    pub meal_id: String,
    pub drink_id: String,
    pub drink_size: Option<ItemSize>,
    pub sauce_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderedRegular {
    pub order_id: String,
    pub item_id: String,
    pub size: Option<ItemSize>,
}

/// A line of the customer's order. Serialized with a `type` tag so the model
/// can tell meals and single items apart when listing the order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderedItem {
    ComboMeal(OrderedMeal),
    HappyMeal(OrderedMeal),
    Regular(OrderedRegular),
}

impl OrderedItem {
    pub fn combo(meal_id: &str, drink_id: &str, drink_size: Option<ItemSize>, sauce_id: Option<&str>) -> Self {
        OrderedItem::ComboMeal(OrderedMeal {
            order_id: String::new(),
            meal_id: meal_id.to_string(),
            drink_id: drink_id.to_string(),
            drink_size,
            sauce_id: sauce_id.map(str::to_string),
        })
    }

    pub fn happy(meal_id: &str, drink_id: &str, drink_size: Option<ItemSize>, sauce_id: Option<&str>) -> Self {
        OrderedItem::HappyMeal(OrderedMeal {
            order_id: String::new(),
            meal_id: meal_id.to_string(),
            drink_id: drink_id.to_string(),
            drink_size,
            sauce_id: sauce_id.map(str::to_string),
        })
    }

    pub fn regular(item_id: &str, size: Option<ItemSize>) -> Self {
        OrderedItem::Regular(OrderedRegular {
            order_id: String::new(),
            item_id: item_id.to_string(),
            size,
        })
    }

    pub fn order_id(&self) -> &str {
        match self {
            OrderedItem::ComboMeal(m) | OrderedItem::HappyMeal(m) => &m.order_id,
            OrderedItem::Regular(r) => &r.order_id,
        }
    }

    fn set_order_id(&mut self, id: String) {
        match self {
            OrderedItem::ComboMeal(m) | OrderedItem::HappyMeal(m) => m.order_id = id,
            OrderedItem::Regular(r) => r.order_id = id,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Items of one customer's order, in the order they were added.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderState {
    items: Vec<OrderedItem>,
}

impl OrderState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the item under a fresh order id and returns the stored copy.
    pub fn add(&mut self, mut item: OrderedItem) -> OrderedItem {
        let mut id = new_order_id();
        while self.contains(&id) {
            id = new_order_id();
        }
        item.set_order_id(id);
        self.items.push(item.clone());
        item
    }

    pub fn remove(&mut self, order_id: &str) -> Option<OrderedItem> {
        let index = self.items.iter().position(|i| i.order_id() == order_id)?;
        Some(self.items.remove(index))
    }

    pub fn get(&self, order_id: &str) -> Option<&OrderedItem> {
        self.items.iter().find(|i| i.order_id() == order_id)
    }

    pub fn contains(&self, order_id: &str) -> bool {
        self.get(order_id).is_some()
    }

    pub fn items(&self) -> &[OrderedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_id_format() {
        for _ in 0..50 {
            let id = new_order_id();
            assert_eq!(id.len(), 8);
            assert!(id.starts_with("O_"));
            assert!(id[2..]
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_add_get_remove_keeps_insertion_order() {
        let mut order = OrderState::new();
        let naan = order.add(OrderedItem::regular("butter_naan", None));
        let combo = order.add(OrderedItem::combo(
            "combo_butter_chicken",
            "thums_up",
            Some(ItemSize::L),
            None,
        ));
        let chai = order.add(OrderedItem::regular("masala_chai", Some(ItemSize::S)));

        assert_eq!(order.len(), 3);
        assert_ne!(naan.order_id(), combo.order_id());
        assert_eq!(order.get(combo.order_id()), Some(&combo));

        let removed = order.remove(combo.order_id()).unwrap();
        assert_eq!(removed, combo);
        assert!(!order.contains(combo.order_id()));
        assert!(order.remove(combo.order_id()).is_none());

        let ids: Vec<&str> = order.items().iter().map(|i| i.order_id()).collect();
        assert_eq!(ids, vec![naan.order_id(), chai.order_id()]);

        order.clear();
        assert!(order.is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let mut order = OrderState::new();
        let item = order.add(OrderedItem::happy("kids_mini_dosa", "mango_lassi", Some(ItemSize::S), Some("mint_chutney")));

        let value: serde_json::Value = serde_json::from_str(&item.to_json()).unwrap();
        assert_eq!(value["type"], "happy_meal");
        assert_eq!(value["meal_id"], "kids_mini_dosa");
        assert_eq!(value["drink_size"], "S");
        assert_eq!(value["sauce_id"], "mint_chutney");
        assert_eq!(value["order_id"], item.order_id());

        let regular = OrderedItem::regular("vada_pav", None);
        let value: serde_json::Value = serde_json::from_str(&regular.to_json()).unwrap();
        assert_eq!(value["type"], "regular");
        assert!(value["size"].is_null());
    }
}
