use reqwest::Client;
use std::env;
use thiserror::Error;
use tracing::{debug, error};

use super::endpoints::{
    ChatCompletionRequest, ChatCompletionResponse, OpenRouterAvailableModel, Provider, OPENROUTER_MODELS,
};
use crate::config::{AppConfig, DEFAULT_BASE_URL};

#[derive(Debug, Error)]
pub enum ApiConnectionError {
    #[error("API key not found in environment: {0}")]
    MissingApiKey(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("API error {status}: {error_body}")]
    ApiError {
        status: reqwest::StatusCode,
        error_body: String,
    },
}

impl Provider {
    pub fn openrouter(api_key_env_var_name: &str) -> Self {
        let config = AppConfig {
            api_key_env_var: api_key_env_var_name.to_string(),
            ..AppConfig::default()
        };
        Self::with_config(&config)
    }

    pub fn with_config(config: &AppConfig) -> Self {
        Self::OpenRouter {
            api_key: config.api_key_env_var.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            site_url: config.site_url.clone(),
            app_name: config.app_name.clone(),
            available_models: OPENROUTER_MODELS.to_vec(),
        }
    }

    pub fn get_available_models(&self) -> Vec<OpenRouterAvailableModel> {
        match self {
            Provider::OpenRouter {
                available_models, ..
            } => available_models.clone(),
        }
    }

    pub fn completions_url(&self) -> String {
        match self {
            Provider::OpenRouter { base_url, .. } => {
                let base = if base_url.is_empty() { DEFAULT_BASE_URL } else { base_url.as_str() };
                format!("{}/chat/completions", base)
            }
        }
    }

    pub async fn call_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ApiConnectionError> {
        match self {
            Provider::OpenRouter {
                api_key: api_key_env_var_name,
                site_url,
                app_name,
                ..
            } => {
                let actual_api_key = env::var(api_key_env_var_name)
                    .ok()
                    .filter(|key| !key.trim().is_empty())
                    .ok_or_else(|| ApiConnectionError::MissingApiKey(api_key_env_var_name.clone()))?;

                let url = self.completions_url();
                debug!(%url, model = %request.model, "sending chat completion request");

                let response = Client::new()
                    .post(&url)
                    .bearer_auth(actual_api_key)
                    .header("Content-Type", "application/json")
                    .header("HTTP-Referer", site_url.as_str())
                    .header("X-Title", app_name.as_str())
                    .json(&request)
                    .send()
                    .await?;

                let status = response.status();
                debug!(%status, "chat completion response received");
                if status.is_success() {
                    let body = response.text().await?;
                    Ok(serde_json::from_str::<ChatCompletionResponse>(&body)?)
                } else {
                    let error_body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Failed to read error body".to_string());
                    error!(%status, %error_body, "OpenRouter API returned an error");
                    Err(ApiConnectionError::ApiError { status, error_body })
                }
            }
        }
    }
}
