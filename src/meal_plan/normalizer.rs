//! Coerces a raw model response into a [`CanonicalMealPlan`].

use chrono::NaiveDate;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::coerce::{as_f64, as_ingredients, as_non_negative, as_string_list, as_text, as_u32, parse_date};
use super::day_list::locate_day_list;
use super::fallback::generate_fallback;
use super::model::{
    CanonicalDay, CanonicalMeal, CanonicalMealPlan, DayMeals, Difficulty, MealSlot, NutritionInfo, NutritionalSummary,
};
use super::shopping_list;

/// Plan-level failures. Callers report these to the user and do not retry
/// the same payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NormalizationFailure {
    #[error("meal plan contains no usable days")]
    EmptyPlan,

    #[error("first or last day of the meal plan has no date")]
    MissingDates,

    #[error("first or last day of the meal plan has an unparseable date")]
    InvalidDateFormat,
}

impl NormalizationFailure {
    /// Message shown to the end user for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            NormalizationFailure::EmptyPlan => "Generated meal plan is incomplete. Please try again.",
            NormalizationFailure::MissingDates => {
                "Generated meal plan is missing date information. Please try again."
            }
            NormalizationFailure::InvalidDateFormat => {
                "Generated meal plan contains invalid date format. Please try again."
            }
        }
    }
}

/// Normalizes `raw`, or generates the fallback plan when `raw` is absent or
/// JSON `null`. `seed_date` only affects the fallback.
pub fn normalize(raw: Option<&Value>, seed_date: Option<NaiveDate>) -> Result<CanonicalMealPlan, NormalizationFailure> {
    let raw = match raw {
        Some(value) if !value.is_null() => value,
        _ => {
            info!("no model response, generating fallback meal plan");
            return Ok(generate_fallback(seed_date));
        }
    };

    let raw_days = locate_day_list(raw).ok_or(NormalizationFailure::EmptyPlan)?;
    if raw_days.is_empty() {
        return Err(NormalizationFailure::EmptyPlan);
    }
    check_boundary_dates(raw_days)?;

    let days: Vec<CanonicalDay> = raw_days
        .iter()
        .enumerate()
        .filter_map(|(idx, raw_day)| normalize_day(idx, raw_day))
        .collect();
    if days.is_empty() {
        warn!(raw_days = raw_days.len(), "no day in the meal plan survived normalization");
        return Err(NormalizationFailure::EmptyPlan);
    }

    let shopping_list = shopping_list::derive(raw.get("shoppingList"), &days);

    let plan = CanonicalMealPlan {
        days,
        shopping_list,
        total_cost: as_non_negative(raw.get("totalCost")),
        total_calories: as_u32(raw.get("totalCalories")),
        nutritional_summary: coerce_summary(raw.get("nutritionalSummary")),
        tips: as_string_list(raw.get("tips")),
        prep_advice: as_text(raw.get("prepAdvice")).filter(|advice| !advice.trim().is_empty()),
    };
    debug!(
        days = plan.days.len(),
        meals = plan.meal_count(),
        shopping_items = plan.shopping_list.len(),
        "normalized meal plan"
    );
    Ok(plan)
}

/// Checks the dates of the first and last boundary days. A day whose `meals`
/// mapping is present but empty contributes nothing to the plan and is not a
/// boundary; if every day is like that, the raw first and last are used.
/// `raw_days` must not be empty.
fn check_boundary_dates(raw_days: &[Value]) -> Result<(), NormalizationFailure> {
    let carries_meals = |day: &&Value| !day.get("meals").and_then(Value::as_object).is_some_and(Map::is_empty);
    let boundaries = match raw_days.iter().position(|day| carries_meals(&day)) {
        Some(first) => {
            let last = raw_days.iter().rposition(|day| carries_meals(&day)).unwrap_or(first);
            [&raw_days[first], &raw_days[last]]
        }
        None => [&raw_days[0], &raw_days[raw_days.len() - 1]],
    };

    for boundary in boundaries {
        let date = boundary
            .get("date")
            .and_then(Value::as_str)
            .ok_or(NormalizationFailure::MissingDates)?;
        if parse_date(date).is_none() {
            warn!(date, "boundary day has an unparseable date");
            return Err(NormalizationFailure::InvalidDateFormat);
        }
    }
    Ok(())
}

fn normalize_day(idx: usize, raw_day: &Value) -> Option<CanonicalDay> {
    let date_text = raw_day.get("date").and_then(Value::as_str);
    let meals = raw_day.get("meals").and_then(Value::as_object);

    let (Some(date_text), Some(raw_meals)) = (date_text, meals) else {
        warn!(day = idx + 1, "skipping day without a date or meals mapping");
        return None;
    };
    let Some(date) = parse_date(date_text) else {
        warn!(day = idx + 1, date = date_text, "skipping day with an unparseable date");
        return None;
    };

    let meals = normalize_meals(idx, raw_meals);
    if meals.is_empty() {
        warn!(day = idx + 1, %date, "skipping day with no valid meals");
        return None;
    }

    let label = as_text(raw_day.get("day").or_else(|| raw_day.get("label")))
        .filter(|label| !label.trim().is_empty())
        .unwrap_or_else(|| format!("Day {}", idx + 1));

    Some(CanonicalDay { label, date, meals })
}

/// Meals in the order the payload lists them; a repeated slot keeps its first
/// position and takes the later body.
fn normalize_meals(day_idx: usize, raw_meals: &Map<String, Value>) -> DayMeals {
    let mut meals = DayMeals::default();
    for (slot_key, body) in raw_meals {
        let slot = match slot_key.parse::<MealSlot>() {
            Ok(slot) => slot,
            Err(reason) => {
                warn!(day = day_idx + 1, %reason, "skipping meal");
                continue;
            }
        };
        match body.as_object().and_then(coerce_meal) {
            Some(meal) => {
                meals.insert(slot, meal);
            }
            None => warn!(day = day_idx + 1, %slot, "skipping meal without an object body and name"),
        }
    }
    meals
}

fn coerce_meal(body: &Map<String, Value>) -> Option<CanonicalMeal> {
    let name = body.get("name")?.as_str()?.to_string();

    let difficulty = body
        .get("difficulty")
        .or_else(|| body.get("difficultyLevel"))
        .and_then(Value::as_str)
        .and_then(Difficulty::parse_loose)
        .unwrap_or_default();

    let defaults = CanonicalMeal::named(name);
    let cuisine_type = as_text(body.get("cuisineType").or_else(|| body.get("cuisine")))
        .filter(|cuisine| !cuisine.trim().is_empty())
        .unwrap_or_else(|| defaults.cuisine_type.clone());

    Some(CanonicalMeal {
        description: as_text(body.get("description")).unwrap_or_default(),
        ingredients: as_ingredients(body.get("ingredients")),
        instructions: as_string_list(body.get("instructions")),
        prep_time_minutes: as_u32(body.get("prepTime").or_else(|| body.get("prepTimeMinutes"))),
        cook_time_minutes: as_u32(body.get("cookTime").or_else(|| body.get("cookTimeMinutes"))),
        calories_per_serving: as_u32(body.get("calories").or_else(|| body.get("caloriesPerServing"))),
        cost_estimate: as_non_negative(body.get("cost").or_else(|| body.get("costEstimate"))),
        difficulty,
        diet_tags: as_string_list(body.get("dietTags")).into_iter().collect(),
        cuisine_type,
        nutrition: coerce_nutrition(body.get("nutrition")),
        ..defaults
    })
}

fn coerce_nutrition(value: Option<&Value>) -> NutritionInfo {
    let Some(fields) = value.and_then(Value::as_object) else {
        return NutritionInfo::default();
    };
    let grams = |key: &str| match as_f64(fields.get(key)) {
        Some(n) if n.is_finite() && n > 0.0 => n.round() as u32,
        _ => 0,
    };
    NutritionInfo {
        protein: grams("protein"),
        carbs: grams("carbs"),
        fat: grams("fat"),
        fiber: grams("fiber"),
    }
}

fn coerce_summary(value: Option<&Value>) -> Option<NutritionalSummary> {
    let fields = value?.as_object()?;
    let grams = |key: &str| match as_f64(fields.get(key)) {
        Some(n) if n.is_finite() && n > 0.0 => n.round() as u32,
        _ => 0,
    };
    Some(NutritionalSummary {
        avg_protein: grams("avgProtein"),
        avg_carbs: grams("avgCarbs"),
        avg_fat: grams("avgFat"),
        avg_fiber: grams("avgFiber"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_meal_fields_coerced_with_defaults() {
        let raw = json!({"mealPlan": [{
            "day": "Monday",
            "date": "2024-01-01",
            "meals": {"lunch": {
                "name": "Quinoa Bowl",
                "ingredients": {"quinoa": "1/2 cup"},
                "instructions": ["Cook quinoa"],
                "prepTime": "10",
                "cookTime": 20,
                "calories": 350,
                "cost": 4.5,
                "difficulty": "Hard",
                "dietTags": ["vegetarian", "vegetarian", "gluten-free"],
                "nutrition": {"protein": 12, "carbs": 60.4}
            }}
        }]});

        let plan = normalize(Some(&raw), None).unwrap();
        let day = &plan.days[0];
        assert_eq!(day.label, "Monday");
        let meal = &day.meals[&MealSlot::Lunch];
        assert_eq!(meal.prep_time_minutes, 10);
        assert_eq!(meal.cook_time_minutes, 20);
        assert_eq!(meal.calories_per_serving, 350);
        assert_eq!(meal.cost_estimate, 4.5);
        assert_eq!(meal.difficulty, Difficulty::Hard);
        assert_eq!(meal.diet_tags.len(), 2);
        assert_eq!(meal.cuisine_type, "general");
        assert_eq!(meal.nutrition, NutritionInfo { protein: 12, carbs: 60, fat: 0, fiber: 0 });
    }

    #[test]
    fn test_unknown_slots_and_nameless_meals_are_skipped() {
        let raw = json!({"mealPlan": [{
            "date": "2024-01-01",
            "meals": {
                "brunch": {"name": "Waffles"},
                "breakfast": "just a string",
                "lunch": {"description": "no name"},
                "dinner": {"name": "Curry"},
                "snacks": {"name": "Apple"}
            }
        }]});
        let plan = normalize(Some(&raw), None).unwrap();
        let slots: Vec<MealSlot> = plan.days[0].meals.keys().copied().collect();
        assert_eq!(slots, vec![MealSlot::Dinner, MealSlot::Snack]);
    }

    #[test]
    fn test_meals_keep_payload_order() {
        let raw = json!({"mealPlan": [{
            "date": "2024-01-01",
            "meals": {
                "dinner": {"name": "Curry"},
                "snacks": {"name": "Apple"},
                "breakfast": {"name": "Oats"}
            }
        }]});
        let plan = normalize(Some(&raw), None).unwrap();
        let slots: Vec<MealSlot> = plan.days[0].meals.keys().copied().collect();
        assert_eq!(slots, vec![MealSlot::Dinner, MealSlot::Snack, MealSlot::Breakfast]);
    }

    #[test]
    fn test_summary_tips_and_advice_carried() {
        let raw = json!({
            "mealPlan": [{"date": "2024-01-01", "meals": {"dinner": {"name": "Soup"}}}],
            "nutritionalSummary": {"avgProtein": 30.6, "avgCarbs": "50", "avgFat": -2},
            "tips": ["Batch cook rice", 7],
            "prepAdvice": "  "
        });
        let plan = normalize(Some(&raw), None).unwrap();
        assert_eq!(
            plan.nutritional_summary,
            Some(NutritionalSummary { avg_protein: 31, avg_carbs: 50, avg_fat: 0, avg_fiber: 0 })
        );
        assert_eq!(plan.tips[0], "Batch cook rice");
        assert_eq!(plan.prep_advice, None);

        let bare = json!({"mealPlan": [{"date": "2024-01-01", "meals": {"dinner": {"name": "Soup"}}}]});
        let plan = normalize(Some(&bare), None).unwrap();
        assert_eq!(plan.nutritional_summary, None);
        assert!(plan.tips.is_empty());
    }

    #[test]
    fn test_single_day_is_both_boundaries() {
        let raw = json!({"mealPlan": [{"date": "not a date", "meals": {"dinner": {"name": "Soup"}}}]});
        assert_eq!(normalize(Some(&raw), None), Err(NormalizationFailure::InvalidDateFormat));

        let all_empty = json!({"mealPlan": [{"date": "2024-01-01", "meals": {}}, {"meals": {}}]});
        assert_eq!(normalize(Some(&all_empty), None), Err(NormalizationFailure::MissingDates));
    }

    #[test]
    fn test_label_defaults_to_position() {
        let raw = json!({"mealPlan": [
            {"date": "2024-01-01", "meals": {"dinner": {"name": "Soup"}}},
            {"date": "2024-01-02", "meals": {"dinner": {"name": "Stew"}}}
        ]});
        let plan = normalize(Some(&raw), None).unwrap();
        assert_eq!(plan.days[1].label, "Day 2");
    }

    #[test]
    fn test_boundary_date_failures() {
        let missing = json!({"mealPlan": [{"meals": {}}, {"date": "2024-01-02", "meals": {}}]});
        assert_eq!(normalize(Some(&missing), None), Err(NormalizationFailure::MissingDates));

        let invalid = json!({"mealPlan": [{"date": "2024-01-01", "meals": {}}, {"date": "someday", "meals": {}}]});
        assert_eq!(normalize(Some(&invalid), None), Err(NormalizationFailure::InvalidDateFormat));

        let no_meals_key = json!({"mealPlan": [
            {"date": "2024-01-01", "meals": {"dinner": {"name": "Soup"}}},
            {"day": "Day 2"}
        ]});
        assert_eq!(normalize(Some(&no_meals_key), None), Err(NormalizationFailure::MissingDates));
    }

    #[test]
    fn test_trailing_empty_day_is_not_a_boundary() {
        let raw = json!({"mealPlan": [
            {"date": "2024-01-01", "meals": {"dinner": {"name": "Soup"}}},
            {"date": "bad-date", "meals": {}}
        ]});
        let plan = normalize(Some(&raw), None).unwrap();
        assert_eq!(plan.days.len(), 1);
    }

    #[test]
    fn test_all_days_skipped_is_empty_plan() {
        let raw = json!({"mealPlan": [{"date": "2024-01-01", "meals": {"dinner": {"title": "no name"}}}]});
        assert_eq!(normalize(Some(&raw), None), Err(NormalizationFailure::EmptyPlan));
    }

    #[test]
    fn test_totals_read_from_response() {
        let raw = json!({
            "mealPlan": [{"date": "2024-01-01", "meals": {"dinner": {"name": "Soup"}}}],
            "totalCost": "42.5",
            "totalCalories": 1800
        });
        let plan = normalize(Some(&raw), None).unwrap();
        assert_eq!(plan.total_cost, 42.5);
        assert_eq!(plan.total_calories, 1800);
    }

    #[test]
    fn test_user_messages() {
        assert!(NormalizationFailure::EmptyPlan.user_message().contains("try again"));
        assert!(NormalizationFailure::MissingDates.user_message().contains("date information"));
    }
}
