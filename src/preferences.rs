use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Example date shown in prompts when the request does not name a start date.
const PROMPT_EXAMPLE_DATE: &str = "2024-01-01";

/// Dietary preferences that drive a meal plan request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MealPlanRequest {
    pub diet_type: Option<String>,
    pub allergies: Vec<String>,
    pub budget_weekly: Option<f64>,
    pub people_count: u32,
    pub max_cooking_time: u32,
    pub cuisine_types: Vec<String>,
    pub health_goals: Vec<String>,
    pub start_date: Option<NaiveDate>,
}

impl Default for MealPlanRequest {
    fn default() -> Self {
        Self {
            diet_type: None,
            allergies: Vec::new(),
            budget_weekly: None,
            people_count: 2,
            max_cooking_time: 30,
            cuisine_types: Vec::new(),
            health_goals: Vec::new(),
            start_date: None,
        }
    }
}

fn join_or(items: &[String], default: &str) -> String {
    if items.is_empty() {
        default.to_string()
    } else {
        items.join(", ")
    }
}

impl MealPlanRequest {
    fn diet(&self) -> &str {
        self.diet_type
            .as_deref()
            .filter(|diet| !diet.trim().is_empty())
            .unwrap_or("balanced")
    }

    fn example_date(&self) -> String {
        self.start_date
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| PROMPT_EXAMPLE_DATE.to_string())
    }

    pub fn meal_plan_prompt(&self) -> String {
        format!(
            "Generate a 3-day meal plan for {people} people.

Diet: {diet}
Allergies: {allergies}
Budget: ${budget}/week
Max cooking time: {max_time} min
Cuisines: {cuisines}
Health goals: {goals}

Include breakfast, lunch, and dinner only (no snacks to reduce complexity).
Return ONLY a JSON object with this structure:
{{
  \"mealPlan\": [
    {{
      \"day\": \"Day 1\",
      \"date\": \"{date}\",
      \"meals\": {{
        \"breakfast\": {{
          \"name\": \"Recipe Name\",
          \"description\": \"Brief description\",
          \"ingredients\": {{\"ingredient\": \"amount\"}},
          \"instructions\": [\"step 1\", \"step 2\"],
          \"prepTime\": 10,
          \"cookTime\": 15,
          \"calories\": 350,
          \"cost\": 4.50,
          \"difficulty\": \"easy\",
          \"dietTags\": [\"vegetarian\"]
        }}
      }}
    }}
  ]
}}",
            people = self.people_count,
            diet = self.diet(),
            allergies = join_or(&self.allergies, "none"),
            budget = self.budget_weekly.unwrap_or(100.0),
            max_time = self.max_cooking_time,
            cuisines = join_or(&self.cuisine_types, "any"),
            goals = join_or(&self.health_goals, "maintenance"),
            date = self.example_date(),
        )
    }

    /// Shorter prompt used when the first answer came back truncated.
    pub fn simplified_meal_plan_prompt(&self) -> String {
        format!(
            "Create a simple 3-day meal plan for {people} people.
Diet: {diet}
Allergies: {allergies}

Return ONLY this JSON structure:
{{\"mealPlan\":[{{\"day\":\"Day 1\",\"date\":\"{date}\",\"meals\":{{\"breakfast\":{{\"name\":\"Recipe\",\"description\":\"Description\",\"ingredients\":{{\"item\":\"amount\"}},\"instructions\":[\"step1\"],\"prepTime\":10,\"cookTime\":15,\"calories\":300,\"cost\":3.00,\"difficulty\":\"easy\",\"dietTags\":[\"balanced\"]}}}}}}]}}",
            people = self.people_count,
            diet = self.diet(),
            allergies = join_or(&self.allergies, "none"),
            date = self.example_date(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_fills_defaults() {
        let prompt = MealPlanRequest::default().meal_plan_prompt();
        assert!(prompt.starts_with("Generate a 3-day meal plan for 2 people."));
        assert!(prompt.contains("Diet: balanced"));
        assert!(prompt.contains("Allergies: none"));
        assert!(prompt.contains("Budget: $100/week"));
        assert!(prompt.contains("Cuisines: any"));
        assert!(prompt.contains("Health goals: maintenance"));
        assert!(prompt.contains("\"date\": \"2024-01-01\""));
    }

    #[test]
    fn test_prompt_uses_preferences() {
        let request = MealPlanRequest {
            diet_type: Some("vegan".to_string()),
            allergies: vec!["peanuts".to_string(), "soy".to_string()],
            budget_weekly: Some(80.5),
            people_count: 4,
            start_date: NaiveDate::from_ymd_opt(2025, 6, 2),
            ..MealPlanRequest::default()
        };
        let prompt = request.meal_plan_prompt();
        assert!(prompt.contains("for 4 people"));
        assert!(prompt.contains("Diet: vegan"));
        assert!(prompt.contains("Allergies: peanuts, soy"));
        assert!(prompt.contains("Budget: $80.5/week"));
        assert!(prompt.contains("\"date\": \"2025-06-02\""));

        let retry = request.simplified_meal_plan_prompt();
        assert!(retry.contains("\"date\":\"2025-06-02\""));
        assert!(retry.contains("Allergies: peanuts, soy"));
    }

    #[test]
    fn test_request_deserializes_camel_case_with_defaults() {
        let request: MealPlanRequest =
            serde_json::from_str(r#"{"dietType": "keto", "peopleCount": 3, "startDate": "2024-05-01"}"#).unwrap();
        assert_eq!(request.diet_type.as_deref(), Some("keto"));
        assert_eq!(request.people_count, 3);
        assert_eq!(request.max_cooking_time, 30);
        assert_eq!(request.start_date, NaiveDate::from_ymd_opt(2024, 5, 1));
    }
}
