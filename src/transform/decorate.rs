//! Message decoration: header/footer injection and inline-button
//! injection or removal.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::settings::Settings;

/// Prepend the configured header and append the configured footer.
pub fn apply_header_footer(text: &str, settings: &Settings) -> String {
    let mut result = text.to_string();

    if settings.header_enabled && !settings.header_text.is_empty() {
        result = format!("{}\n\n{}", settings.header_text, result);
    }

    if settings.footer_enabled && !settings.footer_text.is_empty() {
        result = format!("{}\n\n{}", result, settings.footer_text);
    }

    result
}

/// Build the outbound inline keyboard, if any.
///
/// Button removal takes precedence over injection when both are
/// configured. A misconfigured button URL yields no keyboard.
pub fn reply_markup(settings: &Settings) -> Option<InlineKeyboardMarkup> {
    if settings.button_removal_enabled {
        return None;
    }

    if !settings.inline_button_enabled
        || settings.inline_button_text.is_empty()
        || settings.inline_button_url.is_empty()
    {
        return None;
    }

    let url = settings.inline_button_url.parse().ok()?;
    let button = InlineKeyboardButton::url(settings.inline_button_text.clone(), url);
    Some(InlineKeyboardMarkup::new(vec![vec![button]]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_footer_wrap_the_text() {
        let settings = Settings {
            header_enabled: true,
            header_text: "HEAD".to_string(),
            footer_enabled: true,
            footer_text: "FOOT".to_string(),
            ..Default::default()
        };
        assert_eq!(apply_header_footer("body", &settings), "HEAD\n\nbody\n\nFOOT");
    }

    #[test]
    fn disabled_or_empty_decoration_passes_through() {
        let mut settings = Settings::default();
        assert_eq!(apply_header_footer("body", &settings), "body");

        settings.header_enabled = true; // enabled but empty text
        assert_eq!(apply_header_footer("body", &settings), "body");
    }

    #[test]
    fn button_is_built_from_settings() {
        let settings = Settings {
            inline_button_enabled: true,
            inline_button_text: "Open".to_string(),
            inline_button_url: "https://example.com/".to_string(),
            ..Default::default()
        };
        assert!(reply_markup(&settings).is_some());
    }

    #[test]
    fn removal_takes_precedence_over_injection() {
        let settings = Settings {
            inline_button_enabled: true,
            inline_button_text: "Open".to_string(),
            inline_button_url: "https://example.com/".to_string(),
            button_removal_enabled: true,
            ..Default::default()
        };
        assert!(reply_markup(&settings).is_none());
    }

    #[test]
    fn invalid_url_yields_no_keyboard() {
        let settings = Settings {
            inline_button_enabled: true,
            inline_button_text: "Open".to_string(),
            inline_button_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(reply_markup(&settings).is_none());
    }
}
