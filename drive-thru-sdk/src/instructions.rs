use crate::menu::{map_by_sizes, ItemCategory, Menu, MenuItem};

pub const COMMON_INSTRUCTIONS: &str = r#"You are Saanvi, a quick and friendly attendant at 'Spice Route', a popular Indian fast-casual restaurant.
Your job is to guide the customer smoothly through their order, speaking in short, natural voice responses.
This is a voice interaction. Assume the customer just pulled up and is speaking to you through a drive-thru speaker.
Respond like you're hearing them, not reading text.
Assume they want food, even if they don't start with a clear request, and help them get what they're looking for.

<SIZES>
* If an item comes in different sizes, always ask for the size unless the customer already gave one.
* If a customer orders a 'large meal' or 'large thali', assume the drink should be large as well and do not ask again.
* If the customer clearly asks for a different drink size, respect their preference.
* Do not ask for size unless the item has more than one size option on the menu. If an item is not size-selectable, never mention size at all.
</SIZES>

<STYLE>
* Be fast. Keep responses short and snappy.
* Sound human. Use light vocal pauses like 'Mmh...', 'Let me see...' or 'Alright...' at natural moments, but not too often.
* Keep everything upbeat and easy to follow. Never ask multiple questions at the same time.
* Confirm what they picked in a warm, clear way, like: 'Alright, one Butter Chicken Combo!'
* If something is unavailable, say so with empathy: 'Ah, we're out of Salted Lassi right now. Can I get you a Sweet Lassi instead?'
</STYLE>

<TOOLS>
* Whenever a customer asks for, changes, or removes something from their order, you MUST call a tool to make it happen. Never pretend an item was added.
* When a customer changes an item or meal, remove the previous version before adding the new one, otherwise the order will contain duplicates.
* Never add an item the customer did not explicitly request.
* If a tool returns an error, tell the customer and ask them to try again.
</TOOLS>

<TRANSCRIPTS>
* Transcripts often contain speech-to-text errors. Don't mention the transcript and don't repeat its mistakes.
* Treat each input as a rough draft of what was said. If you can safely guess the intent, respond naturally.
* If the input is ambiguous or makes no sense at a drive-thru, ask the customer to repeat concisely.
</TRANSCRIPTS>

<MENU_RULES>
* Strictly stick to the menu below. Do not invent or suggest new sizes or items.
* If the requested item is unclear or not exactly on the menu, ask for clarification or say you don't have it (a paratha isn't a naan).
* If the customer asks for something that doesn't exist, tell them politely and suggest something close.
</MENU_RULES>
"#;

const UNAVAILABLE: &str = " UNAVAILABLE";

fn price_line(item: &MenuItem) -> String {
    format!("{}: {} Cal, ₹{:.2} (id:{})", item.name, item.calories, item.price, item.id)
}

fn mark_unavailable(mut line: String, item: &MenuItem) -> String {
    if !item.available {
        line.push_str(UNAVAILABLE);
    }
    line
}

/// Renders sized products as nested size lists and the rest as flat lines.
fn sized_section(items: &[MenuItem]) -> Vec<String> {
    let (groups, leftovers) = map_by_sizes(items);
    let mut lines = Vec::new();

    for (_, variants) in &groups {
        let first = variants[0];
        lines.push(format!("  - {} (id:{}):", first.name, first.id));
        for item in variants {
            let size = item.size.map(|s| s.as_str()).unwrap_or_default();
            let line = format!(
                "    - Size {}: {} Cal, ₹{:.2}",
                size, item.calories, item.price
            );
            lines.push(mark_unavailable(line, item));
        }
    }

    // Stating the absence of sizes explicitly keeps the model from inventing them.
    for item in leftovers {
        let line = format!("  - {} - Not size-selectable", price_line(item));
        lines.push(mark_unavailable(line, item));
    }

    lines
}

fn flat_section(items: &[MenuItem]) -> Vec<String> {
    items
        .iter()
        .map(|item| mark_unavailable(format!("  - {}", price_line(item)), item))
        .collect()
}

pub fn menu_instructions(category: ItemCategory, items: &[MenuItem]) -> String {
    match category {
        ItemCategory::Drink => format!("# Drinks:\n{}", sized_section(items).join("\n")),
        ItemCategory::Regular => format!("# A La Carte:\n{}", sized_section(items).join("\n")),
        ItemCategory::ComboMeal => {
            let lines: Vec<String> = items
                .iter()
                .map(|item| {
                    let alias = item.voice_alias.as_deref().unwrap_or("-");
                    mark_unavailable(format!("  **{}**. {}", alias, price_line(item)), item)
                })
                .collect();
            format!(
                "# Combo Meals / Thalis:\n\
                 The user can select a combo meal by saying its voice alias (e.g., '1', '2', '4'). \
                 Use the alias to identify which combo they chose.\n\
                 But don't mention the voice alias to the user if not needed.\n{}",
                lines.join("\n")
            )
        }
        ItemCategory::HappyMeal => format!(
            "# Kid's Meals:\n{}\n\nRecommended drinks with the Kid's Meal:\n  \
             - Mango Lassi\n  \
             - Bottled Water\n  \
             - Or any other small drink.",
            flat_section(items).join("\n")
        ),
        ItemCategory::Sauce => format!("# Chutneys & Extras:\n{}", flat_section(items).join("\n")),
    }
}

/// Full system instructions for the drive-thru agent: persona plus every menu section.
pub fn agent_instructions(menu: &Menu) -> String {
    let sections = [
        ItemCategory::Drink,
        ItemCategory::ComboMeal,
        ItemCategory::HappyMeal,
        ItemCategory::Regular,
        ItemCategory::Sauce,
    ]
    .into_iter()
    .map(|category| menu_instructions(category, menu.by_category(category)));

    std::iter::once(COMMON_INSTRUCTIONS.trim_end().to_string())
        .chain(sections)
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::{MenuSource, SpiceRouteMenu};

    #[tokio::test]
    async fn test_drink_section() {
        let menu = SpiceRouteMenu.load_menu().await;
        let text = menu_instructions(ItemCategory::Drink, &menu.drinks);

        assert!(text.starts_with("# Drinks:\n  - Thums Up® (id:thums_up):\n"));
        assert!(text.contains("    - Size S: 150 Cal, ₹40.00\n"));
        assert!(text.contains("    - Size L: 280 Cal, ₹110.00 UNAVAILABLE"));
        assert!(text.ends_with(
            "  - Kinley® Mineral Water: 0 Cal, ₹20.00 (id:bottled_water) - Not size-selectable"
        ));
    }

    #[tokio::test]
    async fn test_combo_section_lists_aliases() {
        let menu = SpiceRouteMenu.load_menu().await;
        let text = menu_instructions(ItemCategory::ComboMeal, &menu.combo_meals);

        assert!(text.contains("if not needed.\n  **1**. Butter Chicken Thali Combo: 1250 Cal, ₹350.00 (id:combo_butter_chicken)"));
        assert!(text.contains("  **8**. Mumbai Pav Bhaji Combo"));
        assert!(!text.contains(UNAVAILABLE));
    }

    #[tokio::test]
    async fn test_happy_and_sauce_sections() {
        let menu = SpiceRouteMenu.load_menu().await;

        let happy = menu_instructions(ItemCategory::HappyMeal, &menu.happy_meals);
        assert!(happy.starts_with("# Kid's Meals:\n  - Mini Cheese Dosa Kid's Meal: 400 Cal, ₹140.00 (id:kids_mini_dosa)"));
        assert!(happy.ends_with("  - Or any other small drink."));

        let sauces = menu_instructions(ItemCategory::Sauce, &menu.sauces);
        assert!(sauces.contains("  - Mixed Pickle (Achar): 50 Cal, ₹10.00 (id:mixed_pickle)"));
    }

    #[tokio::test]
    async fn test_unavailable_suffix_on_flat_items() {
        let mut menu = SpiceRouteMenu.load_menu().await;
        menu.regulars[1].available = false;

        let text = menu_instructions(ItemCategory::Regular, &menu.regulars);
        assert!(text.contains(
            "  - Vada Pav: 300 Cal, ₹40.00 (id:vada_pav) - Not size-selectable UNAVAILABLE"
        ));
    }

    #[tokio::test]
    async fn test_agent_instructions_section_order() {
        let menu = SpiceRouteMenu.load_menu().await;
        let text = agent_instructions(&menu);

        assert!(text.starts_with("You are Saanvi"));
        let positions: Vec<usize> = [
            "# Drinks:",
            "# Combo Meals / Thalis:",
            "# Kid's Meals:",
            "# A La Carte:",
            "# Chutneys & Extras:",
        ]
        .iter()
        .map(|header| text.find(header).expect("missing section"))
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}
