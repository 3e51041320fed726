//! Text formatting conversions.
//!
//! Two mutually exclusive modes: strip everything down to plain text, or
//! wrap the whole message in HTML bold. Plain-text stripping wins when
//! both are configured.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::settings::Settings;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

static MD_BOLD2: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid regex"));
static MD_BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.*?)\*").expect("valid regex"));
static MD_ITALIC2: Lazy<Regex> = Lazy::new(|| Regex::new(r"__(.*?)__").expect("valid regex"));
static MD_ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"_(.*?)_").expect("valid regex"));
static MD_CODE_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(.*?)```").expect("valid regex"));
static MD_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`(.*?)`").expect("valid regex"));
static MD_QUOTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"> ").expect("valid regex"));
static MD_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(.*?)\]\((.*?)\)").expect("valid regex"));

/// Strip HTML tags and Markdown markers, keeping the readable text.
/// Link targets are kept in parentheses after the label.
pub fn to_plain_text(text: &str) -> String {
    if text.is_empty() {
        return text.to_string();
    }

    let text = HTML_TAG.replace_all(text, "");

    let text = MD_CODE_BLOCK.replace_all(&text, "$1");
    let text = MD_CODE.replace_all(&text, "$1");
    let text = MD_BOLD2.replace_all(&text, "$1");
    let text = MD_BOLD.replace_all(&text, "$1");
    let text = MD_ITALIC2.replace_all(&text, "$1");
    let text = MD_ITALIC.replace_all(&text, "$1");
    let text = MD_QUOTE.replace_all(&text, "");
    let text = MD_LINK.replace_all(&text, "$1 ($2)");

    text.into_owned()
}

/// Wrap the text in HTML bold, stripping any existing formatting first
/// so tags do not nest.
pub fn to_bold(text: &str) -> String {
    if text.is_empty() {
        return text.to_string();
    }
    format!("<b>{}</b>", to_plain_text(text))
}

/// Apply the configured formatting mode, if any.
pub fn apply_formatting(text: &str, settings: &Settings) -> String {
    if text.is_empty() {
        return text.to_string();
    }
    if settings.plain_text_enabled {
        return to_plain_text(text);
    }
    if settings.bold_text_enabled {
        return to_bold(text);
    }
    text.to_string()
}
