//! Telegram bot bootstrap and update dispatch.

use std::sync::Arc;

use log::{debug, info};
use teloxide::prelude::*;

use crate::completion::DeepSeekClient;
use crate::config::Config;
use crate::error::Result;
use crate::platform::TelegramMessenger;
use crate::store::SettingsStore;
use crate::{chat, commands};

struct AppState {
    store: SettingsStore,
    completion: DeepSeekClient,
}

/// Run the Telegram bot until shutdown.
pub async fn run() -> Result<()> {
    info!("Initializing bot");
    let config = Config::from_env()?;

    let store = SettingsStore::load(&config.settings_path);
    let completion = DeepSeekClient::new(
        config.deepseek_api_key.clone(),
        config.deepseek_api_url.clone(),
        config.deepseek_model.clone(),
    );

    debug!("Creating Telegram client");
    let bot = Bot::new(config.telegram_token.clone());
    let me = bot.get_me().await?;
    info!("Bot @{} is running", me.username());

    let state = Arc::new(AppState { store, completion });

    let handler = Update::filter_message().endpoint(handle_update);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Dispatcher stopped");
    Ok(())
}

async fn handle_update(bot: Bot, message: Message, state: Arc<AppState>) -> Result<()> {
    let Some(text) = message.text() else {
        return Ok(());
    };

    let chat_id = message.chat.id;
    // Channel posts carry no sender; fall back to a zero user id there.
    let user_id = message.from.as_ref().map_or(0, |user| user.id.0);
    let name = message
        .from
        .as_ref()
        .map_or("User", |user| user.first_name.as_str());

    info!("Received '{text}' from {name} in chat {chat_id}");

    let messenger = TelegramMessenger::new(bot);
    if text.starts_with('/') {
        commands::handle_command(&messenger, &state.store, chat_id, user_id, text).await
    } else {
        chat::handle_chat_message(
            &messenger,
            &state.completion,
            &state.store,
            chat_id,
            user_id,
            text,
        )
        .await
    }
}
