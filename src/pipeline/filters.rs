//! Stateless filter predicates.
//!
//! Each predicate reads the settings snapshot and the message view and
//! fails open: a disabled flag, absent text or indeterminate detector
//! always admits.

use crate::language;
use crate::settings::{LanguageFilterMode, Settings};

/// Whether `hour` falls in the `[start, end)` window, with wraparound
/// when `end < start` (overnight windows like 22..6).
pub fn hour_in_window(hour: u32, start: u32, end: u32) -> bool {
    if start <= end {
        start <= hour && hour < end
    } else {
        hour >= start || hour < end
    }
}

pub fn within_working_hours(settings: &Settings, hour: u32) -> bool {
    if !settings.working_hours_enabled {
        return true;
    }
    hour_in_window(
        hour,
        settings.working_hours_start,
        settings.working_hours_end,
    )
}

/// Character-limit check. Media without text is exempt.
pub fn exceeds_char_limit(settings: &Settings, text: Option<&str>) -> bool {
    if !settings.char_limit_enabled {
        return false;
    }
    match text {
        Some(t) => t.chars().count() > settings.char_limit_count,
        None => false,
    }
}

/// Case-insensitive substring match against any of `words`.
pub fn contains_any(text: &str, words: &[String]) -> bool {
    if words.is_empty() {
        return false;
    }
    let text = text.to_lowercase();
    words.iter().any(|w| text.contains(&w.to_lowercase()))
}

/// Whitelist check: passes when there is no text, no whitelist, or at
/// least one whitelisted word appears in the text.
pub fn whitelist_permits(text: Option<&str>, whitelist: &[String]) -> bool {
    match text {
        None => true,
        Some(_) if whitelist.is_empty() => true,
        Some(t) => contains_any(t, whitelist),
    }
}

/// Language filter. Detection is skipped (admit) for short texts and on
/// detection failure; an unknown configured code also admits.
pub fn language_permits(settings: &Settings, text: Option<&str>) -> bool {
    if !settings.language_filter_enabled {
        return true;
    }

    let Some(text) = text else {
        return true;
    };

    let Some(detected) = language::detect(text, settings.language_min_chars) else {
        return true;
    };

    let Some(target) = language::from_code(&settings.language_filter_lang) else {
        return true;
    };

    match settings.language_filter_mode {
        LanguageFilterMode::Whitelist => detected == target,
        LanguageFilterMode::Blacklist => detected != target,
    }
}
