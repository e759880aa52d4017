//! Long-polling loop: getUpdates → dispatch → sendMessage

use std::time::Duration;

use crate::application::errors::BotError;
use crate::application::services::MessageService;
use crate::domain::entities;

use super::TelegramAdapter;

/// Pause after a failed getUpdates before polling again
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Fetch one batch of updates, answer them in order, return the next offset.
///
/// Errors from getUpdates leave the offset untouched. A fatal command error
/// aborts the batch after acknowledging the update that caused it, so a
/// restarted bot does not receive it again.
pub async fn poll_once(
    service: &MessageService<TelegramAdapter>,
    offset: i64,
    timeout_seconds: u64,
) -> Result<i64, BotError> {
    let updates = service.bot().get_updates(offset, timeout_seconds).await?;
    if !updates.is_empty() {
        tracing::info!("Received {} updates", updates.len());
    }

    for update in &updates {
        let Some(msg) = &update.message else {
            continue;
        };
        let Some(text) = msg.text.as_deref() else {
            continue;
        };

        let chat_id = msg.chat.id.to_string();
        let sender = msg.from.as_ref().map(entities::User::from);
        if let Err(e) = service.process_text(&chat_id, text, sender).await {
            acknowledge(service, update.update_id).await;
            return Err(e);
        }
    }

    Ok(TelegramAdapter::get_next_offset(offset, &updates))
}

/// Confirm everything up to `update_id` without waiting for new updates
async fn acknowledge(service: &MessageService<TelegramAdapter>, update_id: i64) {
    if let Err(e) = service.bot().get_updates(update_id + 1, 0).await {
        tracing::warn!("Failed to acknowledge update {}: {}", update_id, e);
    }
}

/// Poll until Ctrl-C or a fatal command error
pub async fn run_telegram_bot(
    service: &MessageService<TelegramAdapter>,
    timeout_seconds: u64,
) -> Result<(), BotError> {
    let mut offset: i64 = 0;

    tracing::info!("Starting message loop...");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, shutting down");
                return Ok(());
            }
            result = poll_once(service, offset, timeout_seconds) => match result {
                Ok(next) => offset = next,
                Err(BotError::Command(e)) => return Err(BotError::Command(e)),
                Err(e) => {
                    tracing::error!("Failed to get updates: {}", e);
                    tokio::time::sleep(RETRY_DELAY).await;
                }
            },
        }
    }
}
