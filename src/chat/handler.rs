//! Main handler for conversational (non-command) messages.

use log::{debug, error, info, warn};
use teloxide::types::{ChatId, MessageId};
use tokio_util::sync::CancellationToken;

use crate::completion::Completer;
use crate::error::Result;
use crate::platform::Messenger;
use crate::store::SettingsStore;
use crate::types::MessageRole;

use super::animation::{AnimationOutcome, animate_placeholder, thinking_frame};

/// Runs one conversational turn: placeholder, animation, completion call,
/// final reply, history update.
///
/// A failed turn is isolated: the user gets a fixed apology and nothing is
/// recorded to history.
pub async fn handle_chat_message<M, C>(
    messenger: &M,
    completer: &C,
    store: &SettingsStore,
    chat: ChatId,
    user_id: u64,
    text: &str,
) -> Result<()>
where
    M: Messenger + Clone + 'static,
    C: Completer,
{
    // Without a placeholder there is nothing to animate or replace, so a
    // failed send aborts the whole turn.
    let placeholder = messenger.send_message(chat, &thinking_frame(0)).await?;

    if let Err(e) = run_turn(messenger, completer, store, chat, user_id, text, placeholder).await {
        error!("Chat turn for user {user_id} failed: {e}");
        messenger.send_message(chat, e.user_message()).await?;
    }

    Ok(())
}

async fn run_turn<M, C>(
    messenger: &M,
    completer: &C,
    store: &SettingsStore,
    chat: ChatId,
    user_id: u64,
    text: &str,
    placeholder: MessageId,
) -> Result<()>
where
    M: Messenger + Clone + 'static,
    C: Completer,
{
    let profile = store.get_or_create(user_id);

    let cancel = CancellationToken::new();
    let animation = tokio::spawn(animate_placeholder(
        messenger.clone(),
        chat,
        placeholder,
        cancel.clone(),
    ));

    let reply = completer.complete(text, &profile).await;

    // The animation must have observed cancellation (or stopped on its own)
    // before the placeholder is touched again, so no stray frame edit can
    // land after the final reply.
    cancel.cancel();
    match animation.await {
        Ok(AnimationOutcome::Cancelled | AnimationOutcome::EditFailed) => {}
        Ok(AnimationOutcome::MessageGone) => debug!("Placeholder vanished mid-animation"),
        Err(e) => warn!("Animation task did not shut down cleanly: {e}"),
    }

    let reply = reply?;

    // A stray placeholder is preferable to losing the reply.
    if let Err(e) = messenger.delete_message(chat, placeholder).await {
        warn!("Failed to delete placeholder {}: {e}", placeholder.0);
    }
    messenger.send_message(chat, &reply).await?;

    store.append_history(user_id, MessageRole::User, text);
    store.append_history(user_id, MessageRole::Assistant, &reply);

    info!("Replied to user {user_id} in chat {chat}");
    Ok(())
}
