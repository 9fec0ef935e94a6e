use dotenv::dotenv;
use std::env;

pub const API_KEY_ENV_VAR: &str = "OPENROUTER_API_KEY";
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "mistralai/mistral-small-3.2-24b-instruct:free";
const DEFAULT_SITE_URL: &str = "http://localhost:3000";
const DEFAULT_APP_NAME: &str = "MealPlanner";

/// Runtime settings, read from the environment after loading `.env`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Name of the variable holding the OpenRouter key; the key itself is
    /// read at request time.
    pub api_key_env_var: String,
    pub base_url: String,
    pub model: String,
    pub site_url: String,
    pub app_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key_env_var: API_KEY_ENV_VAR.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            site_url: DEFAULT_SITE_URL.to_string(),
            app_name: DEFAULT_APP_NAME.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenv().ok();
        let defaults = Self::default();
        Self {
            api_key_env_var: defaults.api_key_env_var,
            base_url: env_or("OPENROUTER_BASE_URL", defaults.base_url),
            model: env_or("OPENROUTER_MODEL", defaults.model),
            site_url: env_or("SITE_URL", defaults.site_url),
            app_name: env_or("APP_NAME", defaults.app_name),
        }
    }

    /// True when the API key variable is set to something non-blank.
    pub fn ai_enabled(&self) -> bool {
        env::var(&self.api_key_env_var)
            .map(|key| !key.trim().is_empty())
            .unwrap_or(false)
    }
}

fn env_or(name: &str, default: String) -> String {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or(default)
}
