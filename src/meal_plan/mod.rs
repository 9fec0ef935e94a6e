pub mod coerce;
pub mod day_list;
pub mod fallback;
pub mod model;
pub mod normalizer;
pub mod shopping_list;

pub use fallback::generate_fallback;
pub use model::{
    CanonicalDay, CanonicalMeal, CanonicalMealPlan, DayMeals, Difficulty, Ingredient, MealSlot, NutritionInfo,
    NutritionalSummary, ShoppingListEntry,
};
pub use normalizer::{normalize, NormalizationFailure};
