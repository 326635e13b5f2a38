use super::{ItemCategory, ItemSize, MenuItem, MenuSource};
use async_trait::async_trait;

/// (id, name, [(size, calories, price)], available)
type SizedRow = (&'static str, &'static str, &'static [(ItemSize, u32, f64)], bool);

/// (id, name, calories, price)
type PlainRow = (&'static str, &'static str, u32, f64);

const THREE_SIZES_40_50_60: &[(ItemSize, u32, f64)] = &[
    (ItemSize::S, 150, 40.0),
    (ItemSize::M, 200, 50.0),
    (ItemSize::L, 280, 60.0),
];

const SIZED_DRINKS: &[SizedRow] = &[
    ("thums_up", "Thums Up®", THREE_SIZES_40_50_60, true),
    (
        "limca",
        "Limca®",
        &[
            (ItemSize::S, 140, 40.0),
            (ItemSize::M, 190, 50.0),
            (ItemSize::L, 270, 60.0),
        ],
        true,
    ),
    (
        "mango_lassi",
        "Mango Lassi",
        &[
            (ItemSize::S, 250, 80.0),
            (ItemSize::M, 350, 110.0),
            (ItemSize::L, 480, 150.0),
        ],
        true,
    ),
    (
        "sweet_lassi",
        "Sweet Lassi",
        &[
            (ItemSize::S, 220, 70.0),
            (ItemSize::M, 310, 90.0),
            (ItemSize::L, 420, 130.0),
        ],
        true,
    ),
    (
        "salted_lassi",
        "Salted Lassi",
        &[
            (ItemSize::S, 150, 60.0),
            (ItemSize::M, 200, 80.0),
            (ItemSize::L, 280, 110.0),
        ],
        false,
    ),
    (
        "masala_chai",
        "Masala Chai",
        &[
            (ItemSize::S, 120, 30.0),
            (ItemSize::M, 180, 50.0),
            (ItemSize::L, 240, 70.0),
        ],
        true,
    ),
    (
        "filter_coffee",
        "Filter Coffee",
        &[
            (ItemSize::S, 100, 40.0),
            (ItemSize::M, 150, 60.0),
            (ItemSize::L, 200, 80.0),
        ],
        true,
    ),
    (
        "nimbu_pani",
        "Fresh Nimbu Pani",
        &[
            (ItemSize::S, 90, 40.0),
            (ItemSize::M, 140, 60.0),
            (ItemSize::L, 190, 80.0),
        ],
        true,
    ),
];

const PLAIN_DRINKS: &[PlainRow] = &[("bottled_water", "Kinley® Mineral Water", 0, 20.0)];

/// (id, name, voice alias, calories, price)
const COMBO_MEALS: &[(&str, &str, &str, u32, f64)] = &[
    ("combo_butter_chicken", "Butter Chicken Thali Combo", "1", 1250, 350.0),
    ("combo_paneer_tikka_masala", "Paneer Tikka Masala Thali Combo", "2", 1150, 320.0),
    ("combo_chole_bhature", "Chole Bhature Combo", "3", 980, 220.0),
    ("combo_masala_dosa", "Masala Dosa Combo", "4", 650, 180.0),
    ("combo_chicken_biryani", "Chicken Dum Biryani Combo", "5", 1100, 340.0),
    ("combo_veg_biryani", "Veg Biryani Combo", "6", 950, 280.0),
    ("combo_samosa_chaat", "Samosa Chaat & Chai Combo", "7", 620, 150.0),
    ("combo_pav_bhaji", "Mumbai Pav Bhaji Combo", "8", 850, 190.0),
];

const HAPPY_MEALS: &[PlainRow] = &[
    ("kids_mini_dosa", "Mini Cheese Dosa Kid's Meal", 400, 140.0),
    ("kids_butter_paneer", "Kid's Butter Paneer & Rice Meal", 550, 180.0),
    ("kids_sweet_pulao", "Kid's Sweet Pulao Meal", 450, 150.0),
];

const REGULARS: &[PlainRow] = &[
    ("samosa_2pc", "Punjabi Samosa (2 pc)", 520, 60.0),
    ("vada_pav", "Vada Pav", 300, 40.0),
    ("butter_naan", "Butter Naan", 280, 50.0),
    ("garlic_naan", "Garlic Naan", 300, 60.0),
    ("tandoori_roti", "Tandoori Roti", 180, 30.0),
    ("chicken_tikka_app", "Chicken Tikka (6 pc)", 450, 240.0),
    ("paneer_tikka_app", "Paneer Tikka (6 pc)", 550, 220.0),
    ("gulab_jamun", "Gulab Jamun (2 pc)", 350, 70.0),
    ("rasmalai", "Rasmalai (2 pc)", 400, 90.0),
    ("gajar_halwa", "Gajar Ka Halwa", 450, 110.0),
];

const SAUCES: &[PlainRow] = &[
    ("mint_chutney", "Mint Coriander Chutney", 25, 15.0),
    ("tamarind_chutney", "Sweet Tamarind Chutney", 60, 15.0),
    ("garlic_chutney", "Spicy Garlic Chutney", 40, 15.0),
    ("boondi_raita", "Boondi Raita", 120, 40.0),
    ("mixed_pickle", "Mixed Pickle (Achar)", 50, 10.0),
    ("onion_salad", "Lachha Onion Salad", 30, 20.0),
];

/// The static Spice Route catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpiceRouteMenu;

fn plain_items(rows: &[PlainRow], category: ItemCategory) -> Vec<MenuItem> {
    rows.iter()
        .map(|&(id, name, calories, price)| MenuItem {
            id: id.to_string(),
            name: name.to_string(),
            calories,
            price,
            available: true,
            size: None,
            voice_alias: None,
            category,
        })
        .collect()
}

fn sized_items(rows: &[SizedRow], category: ItemCategory) -> Vec<MenuItem> {
    let mut items = Vec::new();
    for &(id, name, sizes, available) in rows {
        for &(size, calories, price) in sizes {
            items.push(MenuItem {
                id: id.to_string(),
                name: name.to_string(),
                calories,
                price,
                available,
                size: Some(size),
                voice_alias: None,
                category,
            });
        }
    }
    items
}

#[async_trait]
impl MenuSource for SpiceRouteMenu {
    async fn list_drinks(&self) -> Vec<MenuItem> {
        let mut items = sized_items(SIZED_DRINKS, ItemCategory::Drink);
        items.extend(plain_items(PLAIN_DRINKS, ItemCategory::Drink));
        items
    }

    async fn list_combo_meals(&self) -> Vec<MenuItem> {
        COMBO_MEALS
            .iter()
            .map(|&(id, name, alias, calories, price)| MenuItem {
                id: id.to_string(),
                name: name.to_string(),
                calories,
                price,
                available: true,
                size: None,
                voice_alias: Some(alias.to_string()),
                category: ItemCategory::ComboMeal,
            })
            .collect()
    }

    async fn list_happy_meals(&self) -> Vec<MenuItem> {
        plain_items(HAPPY_MEALS, ItemCategory::HappyMeal)
    }

    async fn list_regulars(&self) -> Vec<MenuItem> {
        plain_items(REGULARS, ItemCategory::Regular)
    }

    async fn list_sauces(&self) -> Vec<MenuItem> {
        plain_items(SAUCES, ItemCategory::Sauce)
    }
}
