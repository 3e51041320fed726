//! Status command plugin.

use chrono::Utc;
use teloxide::prelude::*;
use teloxide::types::ParseMode;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::settings::ForwardMode;
use crate::utils::{format_duration_full, html_escape};

/// Handle the /status command - relay state and statistics.
pub async fn status_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    if !super::is_authorized(&msg, &state) {
        bot.send_message(msg.chat.id, "You are not authorized to use this command.")
            .await?;
        return Ok(());
    }

    let settings = state.settings.snapshot();
    let stats = state.stats.snapshot();

    let uptime = Utc::now()
        .signed_duration_since(stats.started_at)
        .num_seconds()
        .max(0) as u64;

    let forwarding = if settings.forwarding_enabled {
        "enabled"
    } else {
        "disabled"
    };
    let mode = match settings.forward_mode {
        ForwardMode::Forward => "forward",
        ForwardMode::Copy => "copy",
    };
    let channel_or_dash = |raw: &str| {
        if raw.is_empty() {
            "—".to_string()
        } else {
            html_escape(raw)
        }
    };
    let last_forwarded = stats
        .last_forwarded
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".to_string());

    let text = format!(
        "<b>Relay status</b>\n\
         Forwarding: <b>{forwarding}</b> ({mode} mode)\n\
         Source: {source}\n\
         Target: {target}\n\
         Uptime: {uptime}\n\n\
         <b>Statistics</b>\n\
         Received: {received}\n\
         Forwarded: {forwarded}\n\
         Filtered: {filtered} (blacklist {fb}, duplicates {fd}, language {fl}, links {fk})\n\
         Errors: {errors}\n\
         Last forwarded: {last_forwarded}\n\
         Duplicate memory: {dedup} entries",
        source = channel_or_dash(&settings.source_channel),
        target = channel_or_dash(&settings.target_channel),
        uptime = format_duration_full(uptime),
        received = stats.received,
        forwarded = stats.forwarded,
        filtered = stats.filtered,
        fb = stats.filtered_blacklist,
        fd = stats.filtered_duplicate,
        fl = stats.filtered_language,
        fk = stats.filtered_links,
        errors = stats.errors,
        dedup = state.pipeline.dedup().len(),
    );

    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}
