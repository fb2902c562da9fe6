use std::env;
use std::path::PathBuf;

use log::{debug, error, info};

use crate::error::Result;

const DEFAULT_API_URL: &str = "https://api.deepseek.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "deepseek-chat";
const DEFAULT_SETTINGS_FILE: &str = "user_settings.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_token: String,
    pub deepseek_api_key: String,
    pub deepseek_api_url: String,
    pub deepseek_model: String,
    pub settings_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        debug!("Loading configuration from environment");
        dotenvy::dotenv().ok();

        let telegram_token = env::var("TELEGRAM_BOT_TOKEN").map_err(|e| {
            error!("Failed to load TELEGRAM_BOT_TOKEN from environment: {e}");
            e
        })?;

        let deepseek_api_key = env::var("DEEPSEEK_API_KEY").map_err(|e| {
            error!("Failed to load DEEPSEEK_API_KEY from environment: {e}");
            e
        })?;

        let deepseek_api_url =
            env::var("DEEPSEEK_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let deepseek_model =
            env::var("DEEPSEEK_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let settings_path = env::var("SETTINGS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SETTINGS_FILE));

        info!("Configuration loaded successfully");
        debug!("Telegram token length: {} characters", telegram_token.len());
        debug!(
            "DeepSeek API key length: {} characters",
            deepseek_api_key.len()
        );
        debug!("DeepSeek model: {deepseek_model}");
        debug!("Settings file: {}", settings_path.display());

        Ok(Self {
            telegram_token,
            deepseek_api_key,
            deepseek_api_url,
            deepseek_model,
            settings_path,
        })
    }
}
