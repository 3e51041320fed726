//! Admin command plugins: relay toggles and settings mutations.
//!
//! Malformed input is rejected at this boundary with a usage reply and
//! never reaches the pipeline.

use teloxide::prelude::*;
use tracing::error;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::settings::{ForwardMode, Settings};
use crate::utils::parse_channel;

/// Reply used whenever the settings file could not be written.
const SAVE_FAILED: &str = "Failed to save settings, check the logs.";

async fn reply(bot: &ThrottledBot, msg: &Message, text: &str) -> anyhow::Result<()> {
    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

/// Run a settings mutation and reply with `ok` or a save-failure note.
async fn apply_update<F>(
    bot: &ThrottledBot,
    msg: &Message,
    state: &AppState,
    ok: &str,
    mutate: F,
) -> anyhow::Result<()>
where
    F: FnOnce(&mut Settings),
{
    match state.settings.update(mutate) {
        Ok(()) => reply(bot, msg, ok).await,
        Err(e) => {
            error!("Settings update failed: {e}");
            reply(bot, msg, SAVE_FAILED).await
        }
    }
}

/// Authorization guard shared by every handler in this module.
async fn ensure_admin(bot: &ThrottledBot, msg: &Message, state: &AppState) -> anyhow::Result<bool> {
    if super::is_authorized(msg, state) {
        return Ok(true);
    }
    reply(bot, msg, "You are not authorized to use this command.").await?;
    Ok(false)
}

pub async fn enable_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    if !ensure_admin(&bot, &msg, &state).await? {
        return Ok(());
    }
    apply_update(&bot, &msg, &state, "Forwarding enabled.", |s| {
        s.forwarding_enabled = true;
    })
    .await
}

pub async fn disable_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    if !ensure_admin(&bot, &msg, &state).await? {
        return Ok(());
    }
    apply_update(&bot, &msg, &state, "Forwarding disabled.", |s| {
        s.forwarding_enabled = false;
    })
    .await
}

pub async fn mode_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    if !ensure_admin(&bot, &msg, &state).await? {
        return Ok(());
    }

    let mode = match args.trim().to_lowercase().as_str() {
        "forward" => ForwardMode::Forward,
        "copy" => ForwardMode::Copy,
        _ => return reply(&bot, &msg, "Usage: /mode forward|copy").await,
    };

    let ok = match mode {
        ForwardMode::Forward => "Relay mode set to forward (with attribution).",
        ForwardMode::Copy => "Relay mode set to copy (attribution stripped).",
    };
    apply_update(&bot, &msg, &state, ok, |s| s.forward_mode = mode).await
}

pub async fn setsource_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    if !ensure_admin(&bot, &msg, &state).await? {
        return Ok(());
    }

    let raw = args.trim().to_string();
    if parse_channel(&raw).is_none() {
        return reply(&bot, &msg, "Usage: /setsource @channel or /setsource -100123456789").await;
    }
    apply_update(&bot, &msg, &state, "Source channel updated.", |s| {
        s.source_channel = raw;
    })
    .await
}

pub async fn settarget_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    if !ensure_admin(&bot, &msg, &state).await? {
        return Ok(());
    }

    let raw = args.trim().to_string();
    if parse_channel(&raw).is_none() {
        return reply(&bot, &msg, "Usage: /settarget @channel or /settarget -100123456789").await;
    }
    apply_update(&bot, &msg, &state, "Target channel updated.", |s| {
        s.target_channel = raw;
    })
    .await
}

pub async fn addadmin_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    if !ensure_admin(&bot, &msg, &state).await? {
        return Ok(());
    }

    let Ok(user_id) = args.trim().parse::<u64>() else {
        return reply(&bot, &msg, "Usage: /addadmin <numeric user id>").await;
    };
    apply_update(&bot, &msg, &state, "Admin added.", |s| {
        if !s.admin_users.contains(&user_id) {
            s.admin_users.push(user_id);
        }
    })
    .await
}

pub async fn blacklistadd_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    if !ensure_admin(&bot, &msg, &state).await? {
        return Ok(());
    }

    let word = args.trim().to_string();
    if word.is_empty() {
        return reply(&bot, &msg, "Usage: /blacklistadd <word>").await;
    }
    apply_update(&bot, &msg, &state, "Word added to the blacklist.", |s| {
        if !s.blacklist.contains(&word) {
            s.blacklist.push(word);
        }
    })
    .await
}

pub async fn blacklistdel_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    if !ensure_admin(&bot, &msg, &state).await? {
        return Ok(());
    }

    let word = args.trim().to_string();
    if word.is_empty() {
        return reply(&bot, &msg, "Usage: /blacklistdel <word>").await;
    }
    apply_update(&bot, &msg, &state, "Word removed from the blacklist.", |s| {
        s.blacklist.retain(|w| w != &word);
    })
    .await
}

pub async fn clearmemory_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    if !ensure_admin(&bot, &msg, &state).await? {
        return Ok(());
    }

    state.pipeline.dedup().clear();
    reply(
        &bot,
        &msg,
        "Duplicate-message memory cleared; previously seen posts can be relayed again.",
    )
    .await
}
