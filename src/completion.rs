//! DeepSeek chat-completion client.

use async_trait::async_trait;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{BotError, Result};
use crate::types::{MessageRole, UserProfile};

/// Fixed reply used when the API answers successfully but the expected
/// content field is missing.
const FALLBACK_REPLY: &str = "未能获取有效回复";

/// Fixed instruction sent ahead of every conversation. Telegram renders a
/// small HTML subset, so the model is told to stay inside it.
const SYSTEM_PROMPT: &str = "你是一个乐于助人的AI助手。请使用纯文本回复；\
如需强调，仅可使用 Telegram 支持的 <b>、<i>、<code> 标签，不要使用其他任何标记。";

/// Generates assistant replies from a user message plus stored context.
#[async_trait]
pub trait Completer: Send + Sync {
    async fn complete(&self, user_message: &str, profile: &UserProfile) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ApiMessage<'a> {
    role: MessageRole,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: ChoiceMessage,
}

#[derive(Debug, Default, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

pub struct DeepSeekClient {
    api_key: String,
    api_url: String,
    model: String,
    client: reqwest::Client,
}

impl DeepSeekClient {
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        Self {
            api_key,
            api_url,
            model,
            client: reqwest::Client::new(),
        }
    }
}

/// Ordered message list for one request: the fixed system instruction,
/// every stored turn in order, then the new user message.
fn build_messages<'a>(user_message: &'a str, profile: &'a UserProfile) -> Vec<ApiMessage<'a>> {
    let mut messages = Vec::with_capacity(profile.history.len() + 2);
    messages.push(ApiMessage {
        role: MessageRole::System,
        content: SYSTEM_PROMPT,
    });
    for turn in &profile.history {
        messages.push(ApiMessage {
            role: turn.role,
            content: &turn.content,
        });
    }
    messages.push(ApiMessage {
        role: MessageRole::User,
        content: user_message,
    });
    messages
}

fn extract_reply(response: CompletionResponse) -> String {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .unwrap_or_else(|| {
            warn!("Completion response is missing message content, using fallback");
            FALLBACK_REPLY.to_string()
        })
}

#[async_trait]
impl Completer for DeepSeekClient {
    async fn complete(&self, user_message: &str, profile: &UserProfile) -> Result<String> {
        let request = CompletionRequest {
            model: &self.model,
            messages: build_messages(user_message, profile),
            temperature: profile.temperature,
            max_tokens: profile.max_tokens,
        };
        debug!(
            "Sending completion request with {} messages",
            request.messages.len()
        );

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .text()
                .await
                .unwrap_or_else(|e| format!("failed to read error response: {e}"));
            return Err(BotError::CompletionApi { status, message });
        }

        let api_response: CompletionResponse = response.json().await?;

        debug!("Received completion response");
        Ok(extract_reply(api_response))
    }
}
