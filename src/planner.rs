//! Meal plan generation flow: model when configured, sample plan otherwise.

use serde::Serialize;
use tracing::{info, warn};

use crate::api_connection::endpoints::Provider;
use crate::config::AppConfig;
use crate::meal_plan::day_list::locate_day_list;
use crate::meal_plan::{normalize, CanonicalMealPlan, NormalizationFailure};
use crate::meal_plan_generator::generate_meal_plan;
use crate::preferences::MealPlanRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanSource {
    Ai,
    Fallback,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanOutcome {
    pub source: PlanSource,
    pub plan: CanonicalMealPlan,
}

/// Generates and normalizes a plan for `preferences`.
///
/// Any failure of the model call (missing key, network, unparseable output)
/// falls back to the sample plan, as does an answer with no day list in it.
/// An answer whose day list is empty or badly dated is a
/// [`NormalizationFailure`] and is not retried.
pub async fn plan_meals(config: &AppConfig, preferences: &MealPlanRequest) -> Result<PlanOutcome, NormalizationFailure> {
    let seed = preferences.start_date;

    if !config.ai_enabled() {
        info!(env_var = %config.api_key_env_var, "OpenRouter key not configured, using fallback meal plan");
        return fallback(seed);
    }

    let provider = Provider::with_config(config);
    match generate_meal_plan(&provider, &config.model, preferences).await {
        Ok(raw) if locate_day_list(&raw).is_none() => {
            warn!(kind = json_kind(&raw), "model response has no day list, using fallback meal plan");
            fallback(seed)
        }
        Ok(raw) => {
            let plan = normalize(Some(&raw), seed)?;
            info!(days = plan.days.len(), meals = plan.meal_count(), "meal plan generated by model");
            Ok(PlanOutcome {
                source: PlanSource::Ai,
                plan,
            })
        }
        Err(e) => {
            warn!(error = %e, "model generation failed, using fallback meal plan");
            fallback(seed)
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

fn fallback(seed: Option<chrono::NaiveDate>) -> Result<PlanOutcome, NormalizationFailure> {
    Ok(PlanOutcome {
        source: PlanSource::Fallback,
        plan: normalize(None, seed)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_unconfigured_key_uses_fallback() {
        let config = AppConfig {
            api_key_env_var: "MEAL_PLANNER_PLANNER_TEST_KEY_NEVER_SET".to_string(),
            ..AppConfig::default()
        };
        let preferences = MealPlanRequest {
            start_date: NaiveDate::from_ymd_opt(2024, 4, 1),
            ..MealPlanRequest::default()
        };

        let outcome = plan_meals(&config, &preferences).await.unwrap();
        assert_eq!(outcome.source, PlanSource::Fallback);
        assert_eq!(outcome.plan.days.len(), 3);
        assert_eq!(outcome.plan.days[0].date, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
    }

    #[tokio::test]
    async fn test_unreachable_provider_uses_fallback() {
        let key_var = "MEAL_PLANNER_PLANNER_TEST_UNREACHABLE_KEY";
        unsafe {
            std::env::set_var(key_var, "test-key");
        }
        let config = AppConfig {
            api_key_env_var: key_var.to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
            ..AppConfig::default()
        };

        let outcome = plan_meals(&config, &MealPlanRequest::default()).await.unwrap();
        assert_eq!(outcome.source, PlanSource::Fallback);
        unsafe {
            std::env::remove_var(key_var);
        }
    }
}
