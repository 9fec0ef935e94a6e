use chrono::NaiveDate;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::ops::Index;
use std::str::FromStr;

/// Named position of a meal within a day. Ordering follows the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
            MealSlot::Snack => "snack",
        }
    }
}

impl FromStr for MealSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Ok(MealSlot::Breakfast),
            "lunch" => Ok(MealSlot::Lunch),
            "dinner" => Ok(MealSlot::Dinner),
            "snack" | "snacks" => Ok(MealSlot::Snack),
            other => Err(format!("unknown meal slot '{}'", other)),
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Lenient parse used for model output: anything unrecognised is `None`.
    pub fn parse_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "beginner" | "simple" => Some(Difficulty::Easy),
            "medium" | "intermediate" | "moderate" => Some(Difficulty::Medium),
            "hard" | "difficult" | "advanced" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Macro breakdown per serving, in grams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NutritionInfo {
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
    pub fiber: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub amount: String,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount: amount.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalMeal {
    pub name: String,
    pub description: String,
    /// Ingredient name to quantity text, in the order the source listed them.
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    pub prep_time_minutes: u32,
    pub cook_time_minutes: u32,
    pub calories_per_serving: u32,
    pub cost_estimate: f64,
    pub difficulty: Difficulty,
    pub diet_tags: BTreeSet<String>,
    pub cuisine_type: String,
    pub nutrition: NutritionInfo,
}

impl CanonicalMeal {
    /// A meal with only a name; every other field at its default.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            ingredients: Vec::new(),
            instructions: Vec::new(),
            prep_time_minutes: 0,
            cook_time_minutes: 0,
            calories_per_serving: 0,
            cost_estimate: 0.0,
            difficulty: Difficulty::Easy,
            diet_tags: BTreeSet::new(),
            cuisine_type: "general".to_string(),
            nutrition: NutritionInfo::default(),
        }
    }
}

/// A day's meals keyed by slot, kept in the order the source listed them.
/// Inserting an existing slot replaces its meal in place.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DayMeals(Vec<(MealSlot, CanonicalMeal)>);

impl DayMeals {
    pub fn insert(&mut self, slot: MealSlot, meal: CanonicalMeal) {
        match self.0.iter_mut().find(|(existing, _)| *existing == slot) {
            Some((_, current)) => *current = meal,
            None => self.0.push((slot, meal)),
        }
    }

    pub fn get(&self, slot: &MealSlot) -> Option<&CanonicalMeal> {
        self.0.iter().find(|(existing, _)| existing == slot).map(|(_, meal)| meal)
    }

    pub fn contains_key(&self, slot: &MealSlot) -> bool {
        self.get(slot).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &MealSlot> {
        self.0.iter().map(|(slot, _)| slot)
    }

    pub fn values(&self) -> impl Iterator<Item = &CanonicalMeal> {
        self.0.iter().map(|(_, meal)| meal)
    }
}

impl Index<&MealSlot> for DayMeals {
    type Output = CanonicalMeal;

    fn index(&self, slot: &MealSlot) -> &CanonicalMeal {
        match self.get(slot) {
            Some(meal) => meal,
            None => panic!("no {} meal on this day", slot),
        }
    }
}

impl Serialize for DayMeals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (slot, meal) in &self.0 {
            map.serialize_entry(slot, meal)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DayMeals {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DayMealsVisitor;

        impl<'de> Visitor<'de> for DayMealsVisitor {
            type Value = DayMeals;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of meal slot to meal")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<DayMeals, A::Error> {
                let mut meals = DayMeals::default();
                while let Some((slot, meal)) = access.next_entry::<MealSlot, CanonicalMeal>()? {
                    meals.insert(slot, meal);
                }
                Ok(meals)
            }
        }

        deserializer.deserialize_map(DayMealsVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalDay {
    pub label: String,
    pub date: NaiveDate,
    pub meals: DayMeals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListEntry {
    pub name: String,
    pub amount: String,
    pub category: String,
    pub estimated_cost: f64,
    pub purchased: bool,
}

impl ShoppingListEntry {
    pub fn new(
        name: impl Into<String>,
        amount: impl Into<String>,
        category: impl Into<String>,
        estimated_cost: f64,
    ) -> Self {
        Self {
            name: name.into(),
            amount: amount.into(),
            category: category.into(),
            estimated_cost,
            purchased: false,
        }
    }
}

/// Average daily macros across the plan, in grams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionalSummary {
    pub avg_protein: u32,
    pub avg_carbs: u32,
    pub avg_fat: u32,
    pub avg_fiber: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalMealPlan {
    pub days: Vec<CanonicalDay>,
    pub shopping_list: Vec<ShoppingListEntry>,
    pub total_cost: f64,
    pub total_calories: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutritional_summary: Option<NutritionalSummary>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tips: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_advice: Option<String>,
}

impl CanonicalMealPlan {
    /// First and last day's dates. `days` is never empty for a plan produced
    /// by the normalizer or the fallback generator.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.days.first(), self.days.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }

    pub fn meal_count(&self) -> usize {
        self.days.iter().map(|day| day.meals.len()).sum()
    }
}
