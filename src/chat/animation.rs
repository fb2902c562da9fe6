//! The animated "thinking" placeholder.

use std::time::Duration;

use log::warn;
use teloxide::types::{ChatId, MessageId};
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::platform::Messenger;

const FRAME_INTERVAL: Duration = Duration::from_millis(500);
const MAX_DOTS: usize = 5;

/// Why the animation task stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AnimationOutcome {
    /// The orchestrator signalled cancellation; the normal exit.
    Cancelled,
    /// The placeholder no longer exists, so there is nothing to animate.
    MessageGone,
    /// An edit failed for some other reason; already logged.
    EditFailed,
}

/// Text of the nth frame. Frame zero is the placeholder as first sent.
pub(crate) fn thinking_frame(dots: usize) -> String {
    format!("🤔正在思考{}", ".".repeat(dots))
}

/// Cycles the placeholder text through the dot frames until cancelled.
///
/// Edit failures are terminal: no retry, the task just reports why it
/// stopped.
pub(crate) async fn animate_placeholder<M>(
    messenger: M,
    chat: ChatId,
    placeholder: MessageId,
    cancel: CancellationToken,
) -> AnimationOutcome
where
    M: Messenger,
{
    let mut interval = time::interval(FRAME_INTERVAL);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick of a tokio interval completes immediately, and the
    // placeholder already shows frame zero.
    interval.tick().await;

    let mut dots = 0;
    loop {
        tokio::select! {
            () = cancel.cancelled() => return AnimationOutcome::Cancelled,
            _ = interval.tick() => {
                dots = (dots + 1) % (MAX_DOTS + 1);
                if let Err(e) = messenger
                    .edit_message(chat, placeholder, &thinking_frame(dots))
                    .await
                {
                    if e.is_message_gone() {
                        return AnimationOutcome::MessageGone;
                    }
                    warn!("Placeholder animation edit failed: {e}");
                    return AnimationOutcome::EditFailed;
                }
            }
        }
    }
}
