//! Link detection and stripping.
//!
//! Covers bare URLs, Telegram deep links (t.me / telegram.me /
//! telegram.dog), @-mentions, markdown- and HTML-wrapped links, and bare
//! domains. Used both by the link-presence filter and by the copy-mode
//! link cleaner.

use once_cell::sync::Lazy;
use regex::Regex;

static TELEGRAM_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://(?:t(?:elegram)?\.(?:me|dog)|telegram\.me)/\S+").expect("valid regex")
});

static BARE_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").expect("valid regex"));

static MARKDOWN_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(https?://[^)]+\)").expect("valid regex"));

static HTML_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<a\s+[^>]*href\s*=\s*(?:"[^"]*"|'[^']*')[^>]*>(.*?)</a>"#)
        .expect("valid regex")
});

static MENTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"@[A-Za-z0-9_]+").expect("valid regex"));

static TELEGRAM_HANDLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"t\.me/[A-Za-z0-9_]+").expect("valid regex"));

static BARE_DOMAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b[-a-zA-Z0-9()@:%_+.~#?&/=]*")
        .expect("valid regex")
});

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Whether the text contains any link, mention or bare domain.
pub fn contains_links(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    TELEGRAM_URL.is_match(text)
        || BARE_URL.is_match(text)
        || MARKDOWN_LINK.is_match(text)
        || HTML_LINK.is_match(text)
        || MENTION.is_match(text)
        || TELEGRAM_HANDLE.is_match(text)
        || BARE_DOMAIN.is_match(text)
}

/// Strip links, mentions and bare domains from the text, keeping the
/// label of wrapped links. Whitespace left behind by the removals is
/// collapsed.
pub fn clean_links(text: &str) -> String {
    if text.is_empty() {
        return text.to_string();
    }

    // Wrapped links first, so their labels survive before the bare-URL
    // pass eats the parenthesized target.
    let text = MARKDOWN_LINK.replace_all(text, "$1");
    let text = HTML_LINK.replace_all(&text, "$1");

    let text = TELEGRAM_URL.replace_all(&text, "");
    let text = BARE_URL.replace_all(&text, "");
    let text = MENTION.replace_all(&text, "");
    let text = TELEGRAM_HANDLE.replace_all(&text, "");
    let text = BARE_DOMAIN.replace_all(&text, "");

    let text = WHITESPACE_RUN.replace_all(&text, " ");
    text.trim().to_string()
}
