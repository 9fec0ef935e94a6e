//! Deterministic sample plan used when no usable model response exists.
//!
//! Each slot draws from a small fixed menu indexed by `day % menu.len()`.
//! The shopping list and totals are a static fixture and are not derived
//! from whichever dishes the rotation picks.

use chrono::{Days, Local, NaiveDate};

use super::model::{
    CanonicalDay, CanonicalMeal, CanonicalMealPlan, DayMeals, Difficulty, Ingredient, MealSlot, NutritionInfo,
    NutritionalSummary, ShoppingListEntry,
};

pub const FALLBACK_DAY_COUNT: usize = 3;
pub const FALLBACK_TOTAL_COST: f64 = 65.00;
pub const FALLBACK_TOTAL_CALORIES: u32 = 8050;

const FALLBACK_NUTRITIONAL_SUMMARY: NutritionalSummary = NutritionalSummary {
    avg_protein: 32,
    avg_carbs: 45,
    avg_fat: 20,
    avg_fiber: 8,
};

const FALLBACK_TIPS: [&str; 4] = [
    "Buy ingredients in bulk to save money",
    "Prepare meals in advance for busy days",
    "Use seasonal vegetables for better prices",
    "Cook grains in batches for the week",
];

const FALLBACK_PREP_ADVICE: &str = "Cook grains and proteins in advance, store in containers for easy meal \
    assembly. Chop vegetables ahead of time and store in airtight containers.";

struct MenuItem {
    name: &'static str,
    description: &'static str,
    ingredients: &'static [(&'static str, &'static str)],
    instructions: &'static [&'static str],
    prep_time: u32,
    cook_time: u32,
    calories: u32,
    cost: f64,
    difficulty: Difficulty,
    diet_tags: &'static [&'static str],
    nutrition: NutritionInfo,
}

const fn macros(protein: u32, carbs: u32, fat: u32, fiber: u32) -> NutritionInfo {
    NutritionInfo { protein, carbs, fat, fiber }
}

static BREAKFASTS: [MenuItem; 2] = [
    MenuItem {
        name: "Oatmeal with Berries",
        description: "Healthy breakfast with oats, berries, and honey",
        ingredients: &[("oats", "1 cup"), ("berries", "1/2 cup"), ("honey", "1 tbsp")],
        instructions: &["Cook oats", "Add berries", "Drizzle with honey"],
        prep_time: 5,
        cook_time: 10,
        calories: 300,
        cost: 2.50,
        difficulty: Difficulty::Easy,
        diet_tags: &["vegetarian", "healthy"],
        nutrition: macros(10, 55, 5, 8),
    },
    MenuItem {
        name: "Greek Yogurt Parfait",
        description: "Creamy yogurt with granola and fresh fruit",
        ingredients: &[("greek yogurt", "1 cup"), ("granola", "1/2 cup"), ("berries", "1/2 cup")],
        instructions: &["Layer yogurt", "Add granola", "Top with berries"],
        prep_time: 5,
        cook_time: 0,
        calories: 280,
        cost: 3.00,
        difficulty: Difficulty::Easy,
        diet_tags: &["vegetarian", "healthy"],
        nutrition: macros(18, 45, 8, 6),
    },
];

static LUNCHES: [MenuItem; 3] = [
    MenuItem {
        name: "Grilled Chicken Salad",
        description: "Fresh salad with grilled chicken breast",
        ingredients: &[("chicken breast", "4 oz"), ("lettuce", "2 cups"), ("tomatoes", "1/2 cup")],
        instructions: &["Grill chicken", "Chop vegetables", "Combine and serve"],
        prep_time: 10,
        cook_time: 15,
        calories: 400,
        cost: 6.00,
        difficulty: Difficulty::Easy,
        diet_tags: &["high-protein", "low-carb"],
        nutrition: macros(35, 15, 20, 5),
    },
    MenuItem {
        name: "Quinoa Bowl",
        description: "Nutritious quinoa with vegetables",
        ingredients: &[("quinoa", "1/2 cup"), ("vegetables", "1 cup"), ("olive oil", "1 tbsp")],
        instructions: &["Cook quinoa", "Steam vegetables", "Combine with olive oil"],
        prep_time: 10,
        cook_time: 20,
        calories: 350,
        cost: 4.50,
        difficulty: Difficulty::Easy,
        diet_tags: &["vegetarian", "gluten-free"],
        nutrition: macros(12, 60, 15, 8),
    },
    MenuItem {
        name: "Turkey Wrap",
        description: "Lean turkey in whole grain wrap",
        ingredients: &[("turkey", "3 oz"), ("whole grain wrap", "1"), ("vegetables", "1/2 cup")],
        instructions: &["Warm wrap", "Add turkey and vegetables", "Roll and serve"],
        prep_time: 10,
        cook_time: 5,
        calories: 380,
        cost: 5.50,
        difficulty: Difficulty::Easy,
        diet_tags: &["balanced", "portable"],
        nutrition: macros(25, 45, 12, 6),
    },
];

static DINNERS: [MenuItem; 4] = [
    MenuItem {
        name: "Salmon with Vegetables",
        description: "Baked salmon with roasted vegetables",
        ingredients: &[("salmon", "6 oz"), ("broccoli", "1 cup"), ("carrots", "1 cup")],
        instructions: &["Season salmon", "Roast vegetables", "Bake salmon"],
        prep_time: 15,
        cook_time: 20,
        calories: 450,
        cost: 8.50,
        difficulty: Difficulty::Medium,
        diet_tags: &["omega-3", "healthy"],
        nutrition: macros(40, 20, 25, 8),
    },
    MenuItem {
        name: "Pasta Primavera",
        description: "Fresh pasta with seasonal vegetables",
        ingredients: &[("pasta", "2 oz"), ("vegetables", "1.5 cups"), ("olive oil", "1 tbsp")],
        instructions: &["Cook pasta", "Sauté vegetables", "Combine with olive oil"],
        prep_time: 15,
        cook_time: 15,
        calories: 380,
        cost: 5.00,
        difficulty: Difficulty::Easy,
        diet_tags: &["vegetarian"],
        nutrition: macros(12, 65, 15, 8),
    },
    MenuItem {
        name: "Beef Stir Fry",
        description: "Lean beef with colorful vegetables",
        ingredients: &[("beef", "4 oz"), ("vegetables", "1.5 cups"), ("soy sauce", "1 tbsp")],
        instructions: &["Stir fry beef", "Add vegetables", "Season with soy sauce"],
        prep_time: 15,
        cook_time: 12,
        calories: 420,
        cost: 7.00,
        difficulty: Difficulty::Easy,
        diet_tags: &["high-protein"],
        nutrition: macros(35, 25, 18, 6),
    },
    MenuItem {
        name: "Vegetarian Curry",
        description: "Spiced vegetables with rice",
        ingredients: &[("vegetables", "2 cups"), ("rice", "1/2 cup"), ("coconut milk", "1/4 cup")],
        instructions: &["Cook rice", "Sauté vegetables", "Add coconut milk and spices"],
        prep_time: 15,
        cook_time: 25,
        calories: 320,
        cost: 4.50,
        difficulty: Difficulty::Easy,
        diet_tags: &["vegetarian", "vegan"],
        nutrition: macros(8, 55, 12, 10),
    },
];

static SHOPPING_LIST: [(&str, &str, &str, f64); 20] = [
    ("berries", "2 cups", "produce", 4.00),
    ("lettuce", "4 cups", "produce", 3.00),
    ("tomatoes", "2 cups", "produce", 3.00),
    ("broccoli", "3 cups", "produce", 4.50),
    ("carrots", "3 cups", "produce", 2.00),
    ("vegetables", "4 cups", "produce", 5.00),
    ("chicken breast", "12 oz", "proteins", 6.00),
    ("salmon", "6 oz", "proteins", 8.00),
    ("beef", "8 oz", "proteins", 7.00),
    ("turkey", "6 oz", "proteins", 5.00),
    ("oats", "3 cups", "pantry", 2.00),
    ("honey", "2 tbsp", "pantry", 1.00),
    ("quinoa", "2 cups", "pantry", 3.00),
    ("pasta", "4 oz", "pantry", 1.50),
    ("rice", "1 cup", "pantry", 1.00),
    ("olive oil", "3 tbsp", "pantry", 2.00),
    ("soy sauce", "2 tbsp", "pantry", 1.00),
    ("coconut milk", "1/2 cup", "pantry", 2.00),
    ("greek yogurt", "3 cups", "dairy", 6.00),
    ("granola", "2 cups", "dairy", 4.00),
];

impl MenuItem {
    fn to_meal(&self) -> CanonicalMeal {
        CanonicalMeal {
            description: self.description.to_string(),
            ingredients: self
                .ingredients
                .iter()
                .map(|(name, amount)| Ingredient::new(*name, *amount))
                .collect(),
            instructions: self.instructions.iter().map(|step| step.to_string()).collect(),
            prep_time_minutes: self.prep_time,
            cook_time_minutes: self.cook_time,
            calories_per_serving: self.calories,
            cost_estimate: self.cost,
            difficulty: self.difficulty,
            diet_tags: self.diet_tags.iter().map(|tag| tag.to_string()).collect(),
            nutrition: self.nutrition,
            ..CanonicalMeal::named(self.name)
        }
    }
}

fn pick(menu: &[MenuItem], day_index: usize) -> &MenuItem {
    &menu[day_index % menu.len()]
}

/// Builds the three-day sample plan starting at `seed_date`, or today when
/// no seed is given. The same seed always yields the same plan.
pub fn generate_fallback(seed_date: Option<NaiveDate>) -> CanonicalMealPlan {
    let start = seed_date.unwrap_or_else(|| Local::now().date_naive());

    let days = (0..FALLBACK_DAY_COUNT)
        .map(|day_index| {
            let mut meals = DayMeals::default();
            meals.insert(MealSlot::Breakfast, pick(&BREAKFASTS, day_index).to_meal());
            meals.insert(MealSlot::Lunch, pick(&LUNCHES, day_index).to_meal());
            meals.insert(MealSlot::Dinner, pick(&DINNERS, day_index).to_meal());
            CanonicalDay {
                label: format!("Day {}", day_index + 1),
                date: start
                    .checked_add_days(Days::new(day_index as u64))
                    .unwrap_or(start),
                meals,
            }
        })
        .collect();

    let shopping_list = SHOPPING_LIST
        .iter()
        .map(|(name, amount, category, cost)| ShoppingListEntry::new(*name, *amount, *category, *cost))
        .collect();

    CanonicalMealPlan {
        days,
        shopping_list,
        total_cost: FALLBACK_TOTAL_COST,
        total_calories: FALLBACK_TOTAL_CALORIES,
        nutritional_summary: Some(FALLBACK_NUTRITIONAL_SUMMARY),
        tips: FALLBACK_TIPS.iter().map(|tip| tip.to_string()).collect(),
        prep_advice: Some(FALLBACK_PREP_ADVICE.to_string()),
    }
}
