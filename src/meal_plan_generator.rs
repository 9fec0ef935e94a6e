use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api_connection::connection::ApiConnectionError;
use crate::api_connection::endpoints::{ChatCompletionRequest, ChatMessage, Provider};
use crate::preferences::MealPlanRequest;
use crate::response_sanitizer::{sanitize_and_parse_json, strip_markdown_fences, SanitizeError};

const MEAL_PLAN_SYSTEM_PROMPT: &str = "You are a professional nutritionist and meal planning expert with 20+ years of experience. You specialize in creating personalized, practical, and delicious meal plans that meet specific dietary and budgetary requirements. Always respond with valid, well-structured JSON only. Ensure all recipes are realistic, achievable, and nutritionally balanced.";
const RETRY_SYSTEM_PROMPT: &str = "You are a meal planning expert. Return ONLY valid JSON, no other text.";
const MAX_TOKENS: u32 = 4000;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Api(#[from] ApiConnectionError),

    #[error(transparent)]
    Parse(#[from] SanitizeError),

    #[error("No content received from OpenRouter")]
    NoContent,

    #[error("Both original and retry responses failed: {0}")]
    RetryFailed(Box<GenerationError>),
}

/// A completion whose JSON is not closed once fences are stripped was cut off
/// by the token limit.
pub fn looks_truncated(content: &str) -> bool {
    let stripped = strip_markdown_fences(content);
    !(stripped.ends_with('}') || stripped.ends_with(']'))
}

fn meal_plan_request(model: &str, system: &str, prompt: String, temperature: f32) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: model.to_string(),
        messages: vec![ChatMessage::system(system), ChatMessage::user(prompt)],
        temperature: Some(temperature),
        max_tokens: Some(MAX_TOKENS),
    }
}

async fn complete(provider: &Provider, request: ChatCompletionRequest) -> Result<String, GenerationError> {
    let response = provider.call_chat_completion(request).await?;
    response
        .first_content()
        .map(str::to_string)
        .ok_or(GenerationError::NoContent)
}

/// Asks the model for a meal plan and returns its parsed, still-raw JSON.
///
/// A truncated answer triggers one retry with a simplified prompt at a lower
/// temperature. Shape checks are left to the normalizer.
pub async fn generate_meal_plan(
    provider: &Provider,
    model: &str,
    preferences: &MealPlanRequest,
) -> Result<Value, GenerationError> {
    info!(model, people = preferences.people_count, "requesting meal plan from model");
    let request = meal_plan_request(model, MEAL_PLAN_SYSTEM_PROMPT, preferences.meal_plan_prompt(), 0.7);
    let content = complete(provider, request).await?;
    debug!(length = content.len(), "received meal plan content");

    if looks_truncated(&content) {
        warn!(length = content.len(), "meal plan response appears truncated, retrying with simplified prompt");
        let retry = meal_plan_request(model, RETRY_SYSTEM_PROMPT, preferences.simplified_meal_plan_prompt(), 0.3);
        return retry_once(provider, retry).await;
    }

    Ok(sanitize_and_parse_json(&content)?)
}

async fn retry_once(provider: &Provider, request: ChatCompletionRequest) -> Result<Value, GenerationError> {
    let content = complete(provider, request)
        .await
        .map_err(|e| GenerationError::RetryFailed(Box::new(e)))?;
    let value = sanitize_and_parse_json(&content).map_err(|e| GenerationError::RetryFailed(Box::new(e.into())))?;
    info!("parsed meal plan from retry response");
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncation_detection() {
        assert!(!looks_truncated("{\"mealPlan\": []}"));
        assert!(!looks_truncated("[1, 2]\n  "));
        assert!(looks_truncated("{\"mealPlan\": [{\"day\": \"Day 1\""));
        assert!(!looks_truncated("```json\n{}\n```"));
        assert!(looks_truncated("```json\n{\"mealPlan\": ["));
    }

    #[test]
    fn test_request_shape() {
        let request = meal_plan_request("model-x", RETRY_SYSTEM_PROMPT, "prompt".to_string(), 0.3);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[1], ChatMessage::user("prompt"));
        assert_eq!(request.max_tokens, Some(MAX_TOKENS));
        assert_eq!(request.temperature, Some(0.3));
    }

    #[tokio::test]
    async fn test_missing_key_surfaces_as_api_error() {
        let provider = Provider::openrouter("MEAL_PLANNER_GENERATOR_TEST_KEY_NEVER_SET");
        let result = generate_meal_plan(&provider, "model-x", &MealPlanRequest::default()).await;
        assert!(matches!(
            result,
            Err(GenerationError::Api(ApiConnectionError::MissingApiKey(_)))
        ));
    }
}
