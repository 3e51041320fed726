//! Channel-post relay handler.
//!
//! Receives a channel post, runs it through the filter pipeline, then
//! either relays it verbatim (forward mode) or rebuilds it through the
//! transform chain and sends it as a new message (copy mode).

use teloxide::prelude::*;
use teloxide::types::{InputFile, ParseMode, Recipient};
use tracing::{debug, info, warn};

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::bot::notify;
use crate::pipeline::{MediaKind, MessageView, Verdict};
use crate::settings::{ForwardMode, Settings};
use crate::transform;
use crate::utils::parse_channel;

/// Handle one inbound channel post.
///
/// Send failures are absorbed here: they are logged, counted and
/// reported to admins, and never abort the dispatch loop.
pub async fn channel_post_handler(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    let settings = state.settings.snapshot();

    if !source_matches(
        &settings.source_channel,
        msg.chat.id.0,
        msg.chat.username(),
    ) {
        debug!("Ignoring post from non-source chat {}", msg.chat.id);
        return Ok(());
    }

    state.stats.record_received();

    let view = MessageView::from_message(&msg);
    match state.pipeline.evaluate(&view, &settings).await {
        Verdict::Admit => {}
        Verdict::Reject(reason) => {
            info!("Skipping message {}: {}", msg.id.0, reason);
            state.stats.record_filtered(reason);
            return Ok(());
        }
    }

    let Some(target) = parse_channel(&settings.target_channel) else {
        warn!("No valid target channel configured, dropping message {}", msg.id.0);
        return Ok(());
    };

    let result = match settings.forward_mode {
        ForwardMode::Forward => bot
            .forward_message(target, msg.chat.id, msg.id)
            .await
            .map(|_| ()),
        ForwardMode::Copy => send_copy(&bot, &msg, &view, target, &settings, &state).await,
    };

    match result {
        Ok(()) => {
            info!("Relayed message {} from {}", msg.id.0, msg.chat.id);
            state.stats.record_forwarded();
        }
        Err(e) => {
            warn!("Failed to relay message {}: {e}", msg.id.0);
            state.stats.record_error();
            let note = format!("Relay error: {}", crate::utils::html_escape(&e.to_string()));
            notify::notify_admins(&bot, &settings.admin_users, &note).await;
        }
    }

    Ok(())
}

/// Rebuild the message through the transform chain and send it as new.
async fn send_copy(
    bot: &ThrottledBot,
    msg: &Message,
    view: &MessageView,
    target: Recipient,
    settings: &Settings,
    state: &AppState,
) -> Result<(), teloxide::RequestError> {
    let caption = match &view.text {
        Some(text) => Some(transform::apply(text, settings, &state.translator).await),
        None => None,
    };
    let markup = transform::reply_markup(settings);

    match view.kind {
        MediaKind::Text => {
            let text = caption.unwrap_or_default();
            let mut req = bot.send_message(target, text).parse_mode(ParseMode::Html);
            if let Some(kb) = markup {
                req = req.reply_markup(kb);
            }
            req.await?;
        }
        MediaKind::Photo => {
            // The size list is ordered small to large; relay the largest.
            let Some(photo) = msg.photo().and_then(|sizes| sizes.last()) else {
                return fallback_forward(bot, msg, target).await;
            };
            let mut req = bot.send_photo(target, InputFile::file_id(photo.file.id.clone()));
            if let Some(c) = caption {
                req = req.caption(c).parse_mode(ParseMode::Html);
            }
            if let Some(kb) = markup {
                req = req.reply_markup(kb);
            }
            req.await?;
        }
        MediaKind::Video => {
            let Some(video) = msg.video() else {
                return fallback_forward(bot, msg, target).await;
            };
            let mut req = bot.send_video(target, InputFile::file_id(video.file.id.clone()));
            if let Some(c) = caption {
                req = req.caption(c).parse_mode(ParseMode::Html);
            }
            if let Some(kb) = markup {
                req = req.reply_markup(kb);
            }
            req.await?;
        }
        MediaKind::Document => {
            let Some(doc) = msg.document() else {
                return fallback_forward(bot, msg, target).await;
            };
            let mut req = bot.send_document(target, InputFile::file_id(doc.file.id.clone()));
            if let Some(c) = caption {
                req = req.caption(c).parse_mode(ParseMode::Html);
            }
            if let Some(kb) = markup {
                req = req.reply_markup(kb);
            }
            req.await?;
        }
        MediaKind::Audio => {
            let Some(audio) = msg.audio() else {
                return fallback_forward(bot, msg, target).await;
            };
            let mut req = bot.send_audio(target, InputFile::file_id(audio.file.id.clone()));
            if let Some(c) = caption {
                req = req.caption(c).parse_mode(ParseMode::Html);
            }
            if let Some(kb) = markup {
                req = req.reply_markup(kb);
            }
            req.await?;
        }
        MediaKind::Voice => {
            let Some(voice) = msg.voice() else {
                return fallback_forward(bot, msg, target).await;
            };
            let mut req = bot.send_voice(target, InputFile::file_id(voice.file.id.clone()));
            if let Some(c) = caption {
                req = req.caption(c).parse_mode(ParseMode::Html);
            }
            req.await?;
        }
        MediaKind::Animation => {
            let Some(animation) = msg.animation() else {
                return fallback_forward(bot, msg, target).await;
            };
            let mut req =
                bot.send_animation(target, InputFile::file_id(animation.file.id.clone()));
            if let Some(c) = caption {
                req = req.caption(c).parse_mode(ParseMode::Html);
            }
            if let Some(kb) = markup {
                req = req.reply_markup(kb);
            }
            req.await?;
        }
        MediaKind::Sticker => {
            let Some(sticker) = msg.sticker() else {
                return fallback_forward(bot, msg, target).await;
            };
            bot.send_sticker(target, InputFile::file_id(sticker.file.id.clone()))
                .await?;
        }
        MediaKind::VideoNote => {
            let Some(note) = msg.video_note() else {
                return fallback_forward(bot, msg, target).await;
            };
            bot.send_video_note(target, InputFile::file_id(note.file.id.clone()))
                .await?;
        }
        MediaKind::Poll => {
            // Polls cannot be rebuilt portably; an attribution-free copy
            // preserves the copy-mode semantics.
            bot.copy_message(target, msg.chat.id, msg.id).await?;
        }
        MediaKind::Contact => {
            let Some(contact) = msg.contact() else {
                return fallback_forward(bot, msg, target).await;
            };
            let mut req = bot.send_contact(
                target,
                contact.phone_number.clone(),
                contact.first_name.clone(),
            );
            if let Some(last) = &contact.last_name {
                req = req.last_name(last.clone());
            }
            req.await?;
        }
        MediaKind::Location => {
            let Some(location) = msg.location() else {
                return fallback_forward(bot, msg, target).await;
            };
            bot.send_location(target, location.latitude, location.longitude)
                .await?;
        }
        MediaKind::Venue => {
            let Some(venue) = msg.venue() else {
                return fallback_forward(bot, msg, target).await;
            };
            let title =
                transform::replace::apply_replacements(&venue.title, &settings.text_replacements);
            let address =
                transform::replace::apply_replacements(&venue.address, &settings.text_replacements);
            bot.send_venue(
                target,
                venue.location.latitude,
                venue.location.longitude,
                title,
                address,
            )
            .await?;
        }
    }

    Ok(())
}

/// Verbatim forward for kinds the copy path cannot rebuild.
async fn fallback_forward(
    bot: &ThrottledBot,
    msg: &Message,
    target: Recipient,
) -> Result<(), teloxide::RequestError> {
    debug!("Falling back to verbatim forward for message {}", msg.id.0);
    bot.forward_message(target, msg.chat.id, msg.id).await?;
    Ok(())
}

/// Whether a chat matches the configured source channel (numeric id,
/// handle, or t.me link).
fn source_matches(source: &str, chat_id: i64, username: Option<&str>) -> bool {
    let source = source.trim();
    if source.is_empty() {
        return false;
    }

    if let Ok(id) = source.parse::<i64>() {
        return chat_id == id;
    }

    let handle = source
        .strip_prefix("https://t.me/")
        .or_else(|| source.strip_prefix("t.me/"))
        .unwrap_or(source);
    let handle = handle.strip_prefix('@').unwrap_or(handle);

    username.is_some_and(|u| u.eq_ignore_ascii_case(handle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_source_matches_chat_id() {
        assert!(source_matches("-100123", -100123, None));
        assert!(!source_matches("-100123", -100999, None));
    }

    #[test]
    fn handle_source_matches_username() {
        assert!(source_matches("@mychannel", -1, Some("mychannel")));
        assert!(source_matches("mychannel", -1, Some("MyChannel")));
        assert!(source_matches("https://t.me/mychannel", -1, Some("mychannel")));
        assert!(!source_matches("@mychannel", -1, Some("other")));
        assert!(!source_matches("@mychannel", -1, None));
    }

    #[test]
    fn empty_source_never_matches() {
        assert!(!source_matches("", -100123, Some("anything")));
    }
}
