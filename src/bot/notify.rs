//! Admin notification sink.
//!
//! Fire-and-forget delivery to every configured admin. Per-recipient
//! failures are logged and never propagated.

use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tracing::warn;

use super::dispatcher::ThrottledBot;

/// Send `text` (HTML) to each admin id.
pub async fn notify_admins(bot: &ThrottledBot, admin_ids: &[u64], text: &str) {
    for id in admin_ids {
        let chat = ChatId(*id as i64);
        if let Err(e) = bot
            .send_message(chat, text)
            .parse_mode(ParseMode::Html)
            .await
        {
            warn!("Failed to notify admin {id}: {e}");
        }
    }
}
