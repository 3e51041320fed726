//! Utility functions.
//!
//! Collection of helper functions used across the bot.

use teloxide::types::{ChatId, Recipient};

/// Parse a channel identifier from the settings document.
///
/// Accepts a numeric chat id (`-1001234567890`), a handle (`@channel` or
/// `channel`) or a `https://t.me/channel` link.
pub fn parse_channel(raw: &str) -> Option<Recipient> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(id) = raw.parse::<i64>() {
        return Some(Recipient::Id(ChatId(id)));
    }

    let handle = raw
        .strip_prefix("https://t.me/")
        .or_else(|| raw.strip_prefix("t.me/"))
        .unwrap_or(raw);
    let handle = handle.strip_prefix('@').unwrap_or(handle);

    if handle.is_empty() || !handle.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }

    Some(Recipient::ChannelUsername(format!("@{handle}")))
}

/// Escape HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Format a duration in whole seconds as a readable string.
pub fn format_duration_full(secs: u64) -> String {
    if secs < 60 {
        format!("{} seconds", secs)
    } else if secs < 3600 {
        format!("{} minutes", secs / 60)
    } else if secs < 86400 {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        if mins > 0 {
            format!("{} hours {} minutes", hours, mins)
        } else {
            format!("{} hours", hours)
        }
    } else {
        let days = secs / 86400;
        let hours = (secs % 86400) / 3600;
        if hours > 0 {
            format!("{} days {} hours", days, hours)
        } else {
            format!("{} days", days)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_ids() {
        assert_eq!(
            parse_channel("-1001234567890"),
            Some(Recipient::Id(ChatId(-1001234567890)))
        );
    }

    #[test]
    fn parses_handles_and_links() {
        let expected = Some(Recipient::ChannelUsername("@mychannel".to_string()));
        assert_eq!(parse_channel("@mychannel"), expected);
        assert_eq!(parse_channel("mychannel"), expected);
        assert_eq!(parse_channel("https://t.me/mychannel"), expected);
        assert_eq!(parse_channel("t.me/mychannel"), expected);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_channel(""), None);
        assert_eq!(parse_channel("not a channel!"), None);
    }

    #[test]
    fn escapes_html() {
        assert_eq!(html_escape("<b>&</b>"), "&lt;b&gt;&amp;&lt;/b&gt;");
    }

    #[test]
    fn formats_durations() {
        assert_eq!(format_duration_full(30), "30 seconds");
        assert_eq!(format_duration_full(120), "2 minutes");
        assert_eq!(format_duration_full(3660), "1 hours 1 minutes");
        assert_eq!(format_duration_full(90000), "1 days 1 hours");
    }
}
