use reqwest::StatusCode;
use teloxide::{ApiError, RequestError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Telegram API error: {0}")]
    Telegram(#[from] RequestError),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("DeepSeek API error ({status}): {message}")]
    CompletionApi {
        status: StatusCode,
        message: String,
    },

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

impl BotError {
    /// Fixed localized apology shown in chat when a turn fails.
    ///
    /// Internal detail never reaches the chat; it goes to the log stream.
    #[allow(clippy::unused_self)]
    pub fn user_message(&self) -> &'static str {
        "抱歉，处理您的请求时出错了。"
    }

    /// True when an edit or delete failed because the target message no
    /// longer exists on Telegram's side.
    pub fn is_message_gone(&self) -> bool {
        matches!(
            self,
            BotError::Telegram(RequestError::Api(
                ApiError::MessageIdInvalid
                    | ApiError::MessageToEditNotFound
                    | ApiError::MessageToDeleteNotFound
            ))
        )
    }
}

pub type Result<T> = std::result::Result<T, BotError>;
