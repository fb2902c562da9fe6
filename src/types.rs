//! Common types used throughout the teleseek bot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a message in the conversation.
///
/// Maps to DeepSeek API message roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from the human user
    User,
    /// Message from the AI assistant
    Assistant,
    /// System prompt or instructions
    System,
}

/// One recorded side of an exchange, as stored in a user's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatTurn {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Per-user settings, bounded conversation history, and free-form records.
///
/// Unknown fields in the persisted file are ignored and missing fields fall
/// back to defaults, so older settings files keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub language: String,
    pub temperature: f64,
    pub max_tokens: u32,
    /// Reserved for future prompt templating; not consulted by generation.
    pub response_style: String,
    pub history: Vec<ChatTurn>,
    pub records: Vec<String>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            language: "zh-CN".to_string(),
            temperature: 0.7,
            max_tokens: 2000,
            response_style: "default".to_string(),
            history: Vec::new(),
            records: Vec::new(),
        }
    }
}
