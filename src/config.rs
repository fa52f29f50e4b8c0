use std::env;
use std::time::Duration;

use secrecy::SecretString;

use crate::errors::{AppError, AppResult};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-pro";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_IMAGE_MODEL: &str = "@cf/black-forest-labs/flux-1-schnell";
pub const DEFAULT_CLOUDFLARE_BASE_URL: &str = "https://api.cloudflare.com";
pub const DEFAULT_TELEGRAM_BASE_URL: &str = "https://api.telegram.org";
pub const DEFAULT_FILLER_OPTION: &str = "Nessun altro disponibile";

#[derive(Clone, Debug)]
pub struct Config {
    pub gemini_api_key: SecretString,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub generation_max_retries: u32,
    pub previous_questions_limit: usize,

    pub database_url: String,
    pub database_service_key: SecretString,
    pub questions_table: String,

    pub telegram_bot_token: SecretString,
    pub telegram_base_url: String,
    pub chat_id: String,
    pub poll_filler_option: String,

    pub cloudflare_account_id: String,
    pub cloudflare_api_token: SecretString,
    pub cloudflare_base_url: String,
    pub image_model: String,
    pub poll_with_image: bool,

    pub http_timeout: Duration,
}

impl Config {
    /// Loads `.env` (when present) and reads the process environment.
    pub fn from_env() -> AppResult<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(AppError::ConfigError(format!("Failed to read .env: {}", e)));
            }
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> AppResult<String> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| {
                    AppError::ConfigError(format!("Required variable {} is not set", key))
                })
        };
        let optional = |key: &str, default: &str| -> String {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let generation_max_retries: u32 = parse_number(&optional("GENERATION_MAX_RETRIES", "5"), "GENERATION_MAX_RETRIES")?;
        if generation_max_retries == 0 {
            return Err(AppError::ConfigError(
                "GENERATION_MAX_RETRIES must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            gemini_api_key: SecretString::from(required("GEMINI_API_KEY")?),
            gemini_model: optional("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            gemini_base_url: optional("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
            generation_max_retries,
            previous_questions_limit: parse_number(
                &optional("PREVIOUS_QUESTIONS_LIMIT", "10"),
                "PREVIOUS_QUESTIONS_LIMIT",
            )?,

            database_url: required("SUPABASE_URL")?,
            database_service_key: SecretString::from(required("SUPABASE_SERVICE_ROLE_KEY")?),
            questions_table: optional("QUESTIONS_TABLE", "questions"),

            telegram_bot_token: SecretString::from(required("TELEGRAM_BOT_TOKEN")?),
            telegram_base_url: optional("TELEGRAM_BASE_URL", DEFAULT_TELEGRAM_BASE_URL),
            chat_id: required("CHAT_ID")?,
            poll_filler_option: optional("POLL_FILLER_OPTION", DEFAULT_FILLER_OPTION),

            cloudflare_account_id: required("CLOUDFLARE_ACCOUNT_ID")?,
            cloudflare_api_token: SecretString::from(required("CLOUDFLARE_API_TOKEN")?),
            cloudflare_base_url: optional("CLOUDFLARE_BASE_URL", DEFAULT_CLOUDFLARE_BASE_URL),
            image_model: optional("IMAGE_MODEL", DEFAULT_IMAGE_MODEL),
            poll_with_image: parse_bool(&optional("POLL_WITH_IMAGE", "true"), "POLL_WITH_IMAGE")?,

            http_timeout: Duration::from_secs(parse_number(
                &optional("HTTP_TIMEOUT_SECONDS", "120"),
                "HTTP_TIMEOUT_SECONDS",
            )?),
        })
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            gemini_api_key: SecretString::from("test-gemini-key".to_string()),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: "http://127.0.0.1:9".to_string(),
            generation_max_retries: 5,
            previous_questions_limit: 10,
            database_url: "http://127.0.0.1:9".to_string(),
            database_service_key: SecretString::from("test-service-key".to_string()),
            questions_table: "questions".to_string(),
            telegram_bot_token: SecretString::from("123:test".to_string()),
            telegram_base_url: "http://127.0.0.1:9".to_string(),
            chat_id: "-1001234".to_string(),
            poll_filler_option: DEFAULT_FILLER_OPTION.to_string(),
            cloudflare_account_id: "account".to_string(),
            cloudflare_api_token: SecretString::from("cf-token".to_string()),
            cloudflare_base_url: "http://127.0.0.1:9".to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            poll_with_image: true,
            http_timeout: Duration::from_secs(5),
        }
    }
}

fn parse_number<T: std::str::FromStr>(value: &str, key: &str) -> AppResult<T> {
    value
        .parse()
        .map_err(|_| AppError::ConfigError(format!("{} must be a number, got '{}'", key, value)))
}

fn parse_bool(value: &str, key: &str) -> AppResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::ConfigError(format!(
            "{} must be a boolean, got '{}'",
            key, value
        ))),
    }
}
