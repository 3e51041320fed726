//! Runtime settings document.
//!
//! A single flat document holding every feature toggle, threshold and list
//! the relay consults. Every field carries an explicit serde default so a
//! partial or empty document always deserializes to the fail-open value —
//! filters default to "admit", transforms default to "off".

mod store;

pub use store::{SettingsStore, StoreError};

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pipeline::MediaKind;

/// How admitted messages reach the target channel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ForwardMode {
    /// Relay with the "forwarded from" attribution preserved.
    Forward,
    /// Re-send as a new message, attribution stripped, transforms applied.
    Copy,
}

impl Default for ForwardMode {
    fn default() -> Self {
        Self::Forward
    }
}

/// Interpretation of the language filter's target language.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LanguageFilterMode {
    /// Admit only messages in the target language.
    Whitelist,
    /// Reject messages in the target language.
    Blacklist,
}

impl Default for LanguageFilterMode {
    fn default() -> Self {
        Self::Whitelist
    }
}

/// A literal substring replacement pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Replacement {
    pub pattern: String,
    pub replace_with: String,
}

/// A post the autoposting scheduler sends periodically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledPost {
    pub text: String,
    pub interval_minutes: u64,
    #[serde(default)]
    pub last_sent: Option<DateTime<Utc>>,
}

impl ScheduledPost {
    /// Whether the post is due at `now` (never sent, or interval elapsed).
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self.last_sent {
            None => true,
            Some(last) => {
                let elapsed = now.signed_duration_since(last);
                elapsed.num_seconds() >= (self.interval_minutes * 60) as i64
            }
        }
    }
}

/// The relay settings document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // Identity
    #[serde(default)]
    pub source_channel: String,
    #[serde(default)]
    pub target_channel: String,
    #[serde(default)]
    pub admin_users: Vec<u64>,

    // Relay
    #[serde(default = "default_true")]
    pub forwarding_enabled: bool,
    #[serde(default)]
    pub forward_mode: ForwardMode,

    // Blacklist / whitelist
    #[serde(default = "default_true")]
    pub blacklist_enabled: bool,
    #[serde(default)]
    pub blacklist: Vec<String>,
    #[serde(default)]
    pub whitelist_enabled: bool,
    #[serde(default)]
    pub whitelist: Vec<String>,

    /// Per-kind allow map. Kinds absent from the map are allowed.
    #[serde(default)]
    pub media_filters: HashMap<MediaKind, bool>,

    // Rate limit
    #[serde(default)]
    pub rate_limit_enabled: bool,
    #[serde(default = "default_messages_per_minute")]
    pub messages_per_minute: u32,

    // Character limit
    #[serde(default)]
    pub char_limit_enabled: bool,
    #[serde(default = "default_char_limit")]
    pub char_limit_count: usize,

    // Delay gate
    #[serde(default)]
    pub delay_enabled: bool,
    #[serde(default = "default_delay_seconds")]
    pub delay_seconds: u64,

    // Forwarded-origin filter
    #[serde(default)]
    pub forwarded_filter_enabled: bool,

    // Duplicate filter
    #[serde(default)]
    pub duplicate_filter_enabled: bool,
    #[serde(default = "default_dedup_capacity")]
    pub dedup_capacity: u64,

    // Language filter
    #[serde(default)]
    pub language_filter_enabled: bool,
    #[serde(default)]
    pub language_filter_mode: LanguageFilterMode,
    /// ISO 639-3 code, e.g. "eng", "ara", "rus".
    #[serde(default = "default_language")]
    pub language_filter_lang: String,
    /// Texts shorter than this skip detection and are admitted.
    #[serde(default = "default_language_min_chars")]
    pub language_min_chars: usize,

    // Link filter / cleaner
    #[serde(default)]
    pub link_filter_enabled: bool,
    #[serde(default)]
    pub link_cleaner_enabled: bool,

    // Inline-button filter
    #[serde(default)]
    pub inline_button_filter_enabled: bool,

    // Working hours
    #[serde(default)]
    pub working_hours_enabled: bool,
    #[serde(default = "default_working_hours_start")]
    pub working_hours_start: u32,
    #[serde(default = "default_working_hours_end")]
    pub working_hours_end: u32,

    // Transforms (copy mode)
    #[serde(default)]
    pub text_replacements: Vec<Replacement>,
    #[serde(default)]
    pub auto_translate_enabled: bool,
    #[serde(default = "default_translate_source")]
    pub translate_source: String,
    #[serde(default = "default_translate_target")]
    pub translate_target: String,
    #[serde(default)]
    pub plain_text_enabled: bool,
    #[serde(default)]
    pub bold_text_enabled: bool,
    #[serde(default)]
    pub header_enabled: bool,
    #[serde(default)]
    pub header_text: String,
    #[serde(default)]
    pub footer_enabled: bool,
    #[serde(default)]
    pub footer_text: String,
    #[serde(default)]
    pub inline_button_enabled: bool,
    #[serde(default)]
    pub inline_button_text: String,
    #[serde(default)]
    pub inline_button_url: String,
    #[serde(default)]
    pub button_removal_enabled: bool,

    // Autoposting
    #[serde(default)]
    pub autopost_enabled: bool,
    #[serde(default)]
    pub scheduled_posts: Vec<ScheduledPost>,
}

fn default_true() -> bool {
    true
}

fn default_messages_per_minute() -> u32 {
    20
}

fn default_char_limit() -> usize {
    1000
}

fn default_delay_seconds() -> u64 {
    5
}

fn default_dedup_capacity() -> u64 {
    1000
}

fn default_language() -> String {
    "eng".to_string()
}

fn default_language_min_chars() -> usize {
    10
}

fn default_working_hours_start() -> u32 {
    9
}

fn default_working_hours_end() -> u32 {
    21
}

fn default_translate_source() -> String {
    "auto".to_string()
}

fn default_translate_target() -> String {
    "en".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source_channel: String::new(),
            target_channel: String::new(),
            admin_users: Vec::new(),
            forwarding_enabled: true,
            forward_mode: ForwardMode::Forward,
            blacklist_enabled: true,
            blacklist: Vec::new(),
            whitelist_enabled: false,
            whitelist: Vec::new(),
            media_filters: HashMap::new(),
            rate_limit_enabled: false,
            messages_per_minute: default_messages_per_minute(),
            char_limit_enabled: false,
            char_limit_count: default_char_limit(),
            delay_enabled: false,
            delay_seconds: default_delay_seconds(),
            forwarded_filter_enabled: false,
            duplicate_filter_enabled: false,
            dedup_capacity: default_dedup_capacity(),
            language_filter_enabled: false,
            language_filter_mode: LanguageFilterMode::Whitelist,
            language_filter_lang: default_language(),
            language_min_chars: default_language_min_chars(),
            link_filter_enabled: false,
            link_cleaner_enabled: false,
            inline_button_filter_enabled: false,
            working_hours_enabled: false,
            working_hours_start: default_working_hours_start(),
            working_hours_end: default_working_hours_end(),
            text_replacements: Vec::new(),
            auto_translate_enabled: false,
            translate_source: default_translate_source(),
            translate_target: default_translate_target(),
            plain_text_enabled: false,
            bold_text_enabled: false,
            header_enabled: false,
            header_text: String::new(),
            footer_enabled: false,
            footer_text: String::new(),
            inline_button_enabled: false,
            inline_button_text: String::new(),
            inline_button_url: String::new(),
            button_removal_enabled: false,
            autopost_enabled: false,
            scheduled_posts: Vec::new(),
        }
    }
}

impl Settings {
    /// Whether a message kind passes the media allow map.
    /// Kinds with no entry are allowed.
    pub fn is_media_kind_allowed(&self, kind: MediaKind) -> bool {
        self.media_filters.get(&kind).copied().unwrap_or(true)
    }

    /// Whether a user id is listed as an admin in the document.
    pub fn is_admin_user(&self, user_id: u64) -> bool {
        self.admin_users.contains(&user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_fail_open() {
        let s: Settings = serde_json::from_str("{}").unwrap();
        assert!(s.forwarding_enabled);
        assert!(s.blacklist_enabled);
        assert!(!s.whitelist_enabled);
        assert!(!s.duplicate_filter_enabled);
        assert!(!s.language_filter_enabled);
        assert_eq!(s.messages_per_minute, 20);
        assert_eq!(s.char_limit_count, 1000);
        assert_eq!(s.dedup_capacity, 1000);
        assert_eq!(s.language_min_chars, 10);
        assert_eq!(s.forward_mode, ForwardMode::Forward);
    }

    #[test]
    fn unknown_media_kind_is_allowed() {
        let s: Settings = serde_json::from_str(r#"{"media_filters": {"photo": false}}"#).unwrap();
        assert!(!s.is_media_kind_allowed(MediaKind::Photo));
        assert!(s.is_media_kind_allowed(MediaKind::Video));
        assert!(s.is_media_kind_allowed(MediaKind::Text));
    }

    #[test]
    fn settings_round_trip() {
        let mut s = Settings::default();
        s.source_channel = "@source".to_string();
        s.blacklist = vec!["spam".to_string()];
        s.forward_mode = ForwardMode::Copy;
        s.text_replacements = vec![Replacement {
            pattern: "USA".to_string(),
            replace_with: "America".to_string(),
        }];

        let json = serde_json::to_string(&s).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.source_channel, "@source");
        assert_eq!(back.blacklist, vec!["spam"]);
        assert_eq!(back.forward_mode, ForwardMode::Copy);
        assert_eq!(back.text_replacements, s.text_replacements);
    }

    #[test]
    fn scheduled_post_due_arithmetic() {
        let now = Utc::now();
        let never_sent = ScheduledPost {
            text: "hi".to_string(),
            interval_minutes: 60,
            last_sent: None,
        };
        assert!(never_sent.is_due(now));

        let just_sent = ScheduledPost {
            last_sent: Some(now - chrono::Duration::minutes(30)),
            ..never_sent.clone()
        };
        assert!(!just_sent.is_due(now));

        let overdue = ScheduledPost {
            last_sent: Some(now - chrono::Duration::minutes(61)),
            ..never_sent
        };
        assert!(overdue.is_due(now));
    }
}
