//! Copy-mode transform chain.
//!
//! Applied only when the relay re-sends messages as new (copy mode), in
//! fixed order: text replacement, link cleaning, translation, text
//! formatting, header/footer injection. Inline-button handling is a
//! separate decision, see [`decorate::reply_markup`].
//!
//! Every stage passes empty input through unchanged.

pub mod decorate;
pub mod format;
pub mod links;
pub mod replace;

pub use decorate::reply_markup;

use crate::settings::Settings;
use crate::translate::Translator;

/// Run a text or caption through the transform chain.
pub async fn apply(text: &str, settings: &Settings, translator: &Translator) -> String {
    let mut out = replace::apply_replacements(text, &settings.text_replacements);

    if settings.link_cleaner_enabled {
        out = links::clean_links(&out);
    }

    if settings.auto_translate_enabled && !out.is_empty() {
        out = translator
            .translate(&out, &settings.translate_source, &settings.translate_target)
            .await;
    }

    out = format::apply_formatting(&out, settings);
    out = decorate::apply_header_footer(&out, settings);

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Replacement;

    fn translator() -> Translator {
        Translator::new()
    }

    #[tokio::test]
    async fn replacement_runs_before_decoration() {
        let settings = Settings {
            text_replacements: vec![Replacement {
                pattern: "USA".to_string(),
                replace_with: "America".to_string(),
            }],
            header_enabled: true,
            header_text: "NEWS".to_string(),
            ..Default::default()
        };
        let out = apply("Visit the USA", &settings, &translator()).await;
        assert_eq!(out, "NEWS\n\nVisit the America");
    }

    #[tokio::test]
    async fn link_cleaning_runs_after_replacement() {
        let settings = Settings {
            link_cleaner_enabled: true,
            ..Default::default()
        };
        let out = apply("check https://example.com/x please", &settings, &translator()).await;
        assert_eq!(out, "check please");
    }

    #[tokio::test]
    async fn formatting_applies_to_cleaned_text() {
        let settings = Settings {
            bold_text_enabled: true,
            ..Default::default()
        };
        let out = apply("plain words", &settings, &translator()).await;
        assert_eq!(out, "<b>plain words</b>");
    }

    #[tokio::test]
    async fn empty_text_passes_through_unchanged() {
        let settings = Settings {
            link_cleaner_enabled: true,
            bold_text_enabled: true,
            ..Default::default()
        };
        assert_eq!(apply("", &settings, &translator()).await, "");
    }
}
