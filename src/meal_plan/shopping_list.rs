//! Shopping list derivation for a normalized plan.

use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::{debug, warn};

use super::coerce::{as_bool, as_non_negative, as_text};
use super::model::{CanonicalDay, ShoppingListEntry};

pub const DEFAULT_CATEGORY: &str = "general";

/// Builds the shopping list from the raw `shoppingList` value when it carries
/// usable entries, otherwise from the ingredients of the retained days.
pub fn derive(raw_list: Option<&Value>, days: &[CanonicalDay]) -> Vec<ShoppingListEntry> {
    let adopted = match raw_list {
        Some(Value::Array(entries)) if !entries.is_empty() => adopt_entries(entries, DEFAULT_CATEGORY),
        Some(Value::Object(categories)) => flatten_categories(categories),
        _ => Vec::new(),
    };

    if adopted.is_empty() {
        debug!("no usable shopping list in response, deriving from ingredients");
        merge_ingredients(days)
    } else {
        adopted
    }
}

fn adopt_entries(entries: &[Value], category: &str) -> Vec<ShoppingListEntry> {
    entries
        .iter()
        .filter_map(|entry| {
            let coerced = coerce_entry(entry, category);
            if coerced.is_none() {
                warn!(?entry, "skipping shopping list entry without a name");
            }
            coerced
        })
        .collect()
}

fn coerce_entry(entry: &Value, category: &str) -> Option<ShoppingListEntry> {
    match entry {
        Value::String(name) if !name.trim().is_empty() => {
            Some(ShoppingListEntry::new(name.clone(), "", category, 0.0))
        }
        Value::Object(fields) => {
            let name = as_text(fields.get("name").or_else(|| fields.get("item")))?;
            Some(ShoppingListEntry {
                name,
                amount: as_text(fields.get("amount").or_else(|| fields.get("quantity"))).unwrap_or_default(),
                category: as_text(fields.get("category")).unwrap_or_else(|| category.to_string()),
                estimated_cost: as_non_negative(fields.get("estimatedCost").or_else(|| fields.get("cost"))),
                purchased: as_bool(fields.get("purchased")),
            })
        }
        _ => None,
    }
}

/// `{category: {item: amount}}` becomes one entry per item. A category whose
/// value is a list of entries keeps those entries under that category.
fn flatten_categories(categories: &Map<String, Value>) -> Vec<ShoppingListEntry> {
    let mut entries = Vec::new();
    for (category, items) in categories {
        match items {
            Value::Object(leaves) => {
                entries.extend(leaves.iter().map(|(item, amount)| {
                    ShoppingListEntry::new(item.clone(), as_text(Some(amount)).unwrap_or_default(), category.clone(), 0.0)
                }));
            }
            Value::Array(listed) => entries.extend(adopt_entries(listed, category)),
            _ => debug!(%category, "ignoring non-collection shopping list category"),
        }
    }
    entries
}

/// Merges ingredients across every meal, keyed case-insensitively. Repeat
/// amounts are joined as text (`"2 + 1"`); units are never reconciled.
pub fn merge_ingredients(days: &[CanonicalDay]) -> Vec<ShoppingListEntry> {
    let mut entries: Vec<ShoppingListEntry> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    let ingredients = days
        .iter()
        .flat_map(|day| day.meals.values())
        .flat_map(|meal| meal.ingredients.iter());

    for ingredient in ingredients {
        let key = ingredient.name.to_lowercase();
        match positions.get(&key) {
            Some(&idx) => {
                let entry = &mut entries[idx];
                entry.amount = format!("{} + {}", entry.amount, ingredient.amount);
            }
            None => {
                positions.insert(key, entries.len());
                entries.push(ShoppingListEntry::new(
                    ingredient.name.clone(),
                    ingredient.amount.clone(),
                    DEFAULT_CATEGORY,
                    0.0,
                ));
            }
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meal_plan::model::{CanonicalMeal, DayMeals, Ingredient, MealSlot};
    use chrono::NaiveDate;
    use serde_json::json;

    fn day_with(meals: Vec<(MealSlot, Vec<Ingredient>)>) -> CanonicalDay {
        let mut by_slot = DayMeals::default();
        for (slot, ingredients) in meals {
            let mut meal = CanonicalMeal::named(format!("{} dish", slot));
            meal.ingredients = ingredients;
            by_slot.insert(slot, meal);
        }
        CanonicalDay {
            label: "Day 1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            meals: by_slot,
        }
    }

    #[test]
    fn test_merge_concatenates_amounts_case_insensitively() {
        let days = vec![day_with(vec![
            (MealSlot::Breakfast, vec![Ingredient::new("Egg", "2")]),
            (MealSlot::Lunch, vec![Ingredient::new("egg", "1"), Ingredient::new("Bread", "2 slices")]),
        ])];

        let merged = merge_ingredients(&days);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].name, "Egg");
        assert_eq!(merged[0].amount, "2 + 1");
        assert_eq!(merged[0].category, DEFAULT_CATEGORY);
        assert_eq!(merged[1].name, "Bread");
        assert!(!merged[1].purchased);
    }

    #[test]
    fn test_merge_follows_listed_slot_order() {
        let days = vec![day_with(vec![
            (MealSlot::Dinner, vec![Ingredient::new("Egg", "2")]),
            (MealSlot::Breakfast, vec![Ingredient::new("egg", "1")]),
        ])];
        let merged = merge_ingredients(&days);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].name, "Egg");
        assert_eq!(merged[0].amount, "2 + 1");
    }

    #[test]
    fn test_merge_keeps_units_as_text() {
        let days = vec![
            day_with(vec![(MealSlot::Dinner, vec![Ingredient::new("rice", "2 cups")])]),
            day_with(vec![(MealSlot::Dinner, vec![Ingredient::new("Rice", "1 cup")])]),
        ];
        let merged = merge_ingredients(&days);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].amount, "2 cups + 1 cup");
    }

    #[test]
    fn test_adopts_array_with_defaults() {
        let raw = json!([
            {"name": "oats", "amount": "1 cup", "category": "pantry", "estimatedCost": 2.5, "purchased": true},
            {"name": "milk", "amount": "1 l"},
            "salt",
            {"amount": "no name"}
        ]);
        let list = derive(Some(&raw), &[]);
        assert_eq!(list.len(), 3);
        assert_eq!(list[0], ShoppingListEntry {
            name: "oats".to_string(),
            amount: "1 cup".to_string(),
            category: "pantry".to_string(),
            estimated_cost: 2.5,
            purchased: true,
        });
        assert_eq!(list[1].estimated_cost, 0.0);
        assert_eq!(list[1].category, DEFAULT_CATEGORY);
        assert!(!list[1].purchased);
        assert_eq!(list[2].name, "salt");
    }

    #[test]
    fn test_flattens_category_mapping() {
        let raw = json!({
            "produce": {"berries": "2 cups", "lettuce": "1 head"},
            "dairy": {"milk": "1 l"},
            "notes": "buy early"
        });
        let list = derive(Some(&raw), &[]);
        let flat: Vec<(&str, &str, &str)> = list
            .iter()
            .map(|e| (e.name.as_str(), e.amount.as_str(), e.category.as_str()))
            .collect();
        assert_eq!(
            flat,
            vec![
                ("berries", "2 cups", "produce"),
                ("lettuce", "1 head", "produce"),
                ("milk", "1 l", "dairy"),
            ]
        );
        assert!(list.iter().all(|e| e.estimated_cost == 0.0 && !e.purchased));
    }

    #[test]
    fn test_empty_or_null_list_falls_back_to_ingredients() {
        let days = vec![day_with(vec![(MealSlot::Lunch, vec![Ingredient::new("quinoa", "1/2 cup")])])];
        for raw in [json!([]), json!({}), json!(null), json!("see above")] {
            let list = derive(Some(&raw), &days);
            assert_eq!(list.len(), 1, "raw list {raw}");
            assert_eq!(list[0].name, "quinoa");
        }
        assert_eq!(derive(None, &days).len(), 1);
    }
}
