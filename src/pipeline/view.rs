//! Message projection for the filter pipeline.
//!
//! [`MessageView`] captures the handful of message attributes the filters
//! consult, so the pipeline itself never touches the Telegram types and
//! can be exercised directly in tests.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use teloxide::types::Message;

/// Message kind, mirroring the per-kind allow map in the settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Text,
    Photo,
    Video,
    Document,
    Audio,
    Voice,
    Sticker,
    Animation,
    VideoNote,
    Poll,
    Contact,
    Location,
    Venue,
}

/// Content digest over text/caption, media unique id and poll content.
pub type ContentHash = [u8; 32];

/// Read-only projection of an inbound channel post.
#[derive(Debug, Clone)]
pub struct MessageView {
    pub kind: MediaKind,
    /// Text or caption, whichever the message carries.
    pub text: Option<String>,
    /// Unique id of the attached media, for duplicate detection.
    pub media_unique_id: Option<String>,
    /// Poll question and option texts, for duplicate detection.
    pub poll_content: Option<(String, Vec<String>)>,
    /// Whether the message was itself forwarded from another source.
    pub is_forwarded: bool,
    /// Whether the message carries an inline keyboard.
    pub has_inline_keyboard: bool,
}

impl MessageView {
    pub fn from_message(msg: &Message) -> Self {
        let kind = kind_of(msg);

        let text = msg
            .text()
            .or_else(|| msg.caption())
            .map(|t| t.to_string());

        let media_unique_id = media_unique_id(msg);

        let poll_content = msg.poll().map(|p| {
            (
                p.question.clone(),
                p.options.iter().map(|o| o.text.clone()).collect(),
            )
        });

        Self {
            kind,
            text,
            media_unique_id,
            poll_content,
            is_forwarded: msg.forward_origin().is_some(),
            has_inline_keyboard: msg.reply_markup().is_some(),
        }
    }

    /// Digest of the message content, independent of the message id.
    ///
    /// Returns `None` when the message has no hashable content (no text,
    /// no media, no poll); such messages always pass the duplicate filter.
    pub fn content_hash(&self) -> Option<ContentHash> {
        let mut content = String::new();

        if let Some(text) = &self.text {
            content.push_str(text);
        }
        if let Some(uid) = &self.media_unique_id {
            content.push_str(uid);
        }
        if let Some((question, options)) = &self.poll_content {
            content.push_str(question);
            for option in options {
                content.push_str(option);
            }
        }

        if content.is_empty() {
            return None;
        }

        Some(Sha256::digest(content.as_bytes()).into())
    }
}

fn kind_of(msg: &Message) -> MediaKind {
    if msg.photo().is_some() {
        MediaKind::Photo
    } else if msg.video().is_some() {
        MediaKind::Video
    } else if msg.audio().is_some() {
        MediaKind::Audio
    } else if msg.voice().is_some() {
        MediaKind::Voice
    } else if msg.document().is_some() {
        MediaKind::Document
    } else if msg.animation().is_some() {
        MediaKind::Animation
    } else if msg.sticker().is_some() {
        MediaKind::Sticker
    } else if msg.video_note().is_some() {
        MediaKind::VideoNote
    } else if msg.poll().is_some() {
        MediaKind::Poll
    } else if msg.contact().is_some() {
        MediaKind::Contact
    } else if msg.venue().is_some() {
        // Venue before location: a venue message also carries a location.
        MediaKind::Venue
    } else if msg.location().is_some() {
        MediaKind::Location
    } else {
        MediaKind::Text
    }
}

fn media_unique_id(msg: &Message) -> Option<String> {
    if let Some(sizes) = msg.photo() {
        return sizes.last().map(|p| p.file.unique_id.clone());
    }
    if let Some(v) = msg.video() {
        return Some(v.file.unique_id.clone());
    }
    if let Some(a) = msg.audio() {
        return Some(a.file.unique_id.clone());
    }
    if let Some(v) = msg.voice() {
        return Some(v.file.unique_id.clone());
    }
    if let Some(d) = msg.document() {
        return Some(d.file.unique_id.clone());
    }
    if let Some(a) = msg.animation() {
        return Some(a.file.unique_id.clone());
    }
    if let Some(s) = msg.sticker() {
        return Some(s.file.unique_id.clone());
    }
    if let Some(v) = msg.video_note() {
        return Some(v.file.unique_id.clone());
    }
    None
}

#[cfg(test)]
pub(crate) fn text_view(text: &str) -> MessageView {
    MessageView {
        kind: MediaKind::Text,
        text: Some(text.to_string()),
        media_unique_id: None,
        poll_content: None,
        is_forwarded: false,
        has_inline_keyboard: false,
    }
}
