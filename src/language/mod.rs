//! Best-effort language detection.
//!
//! Thin wrapper over whatlang. Texts below the configured minimum length
//! skip detection entirely, since trigram detection on a handful of
//! characters is noise.

pub use whatlang::Lang;

/// Detect the language of `text`, or `None` when the text is too short
/// or detection fails.
pub fn detect(text: &str, min_chars: usize) -> Option<Lang> {
    if text.chars().count() < min_chars {
        return None;
    }
    whatlang::detect_lang(text)
}

/// Resolve an ISO 639-3 code ("eng", "ara", ...) to a language.
pub fn from_code(code: &str) -> Option<Lang> {
    Lang::from_code(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_english_prose() {
        let text = "The quick brown fox jumps over the lazy dog every single morning";
        assert_eq!(detect(text, 10), Some(Lang::Eng));
    }

    #[test]
    fn detects_russian_prose() {
        let text = "Это довольно длинное предложение на русском языке для теста";
        assert_eq!(detect(text, 10), Some(Lang::Rus));
    }

    #[test]
    fn short_text_skips_detection() {
        assert_eq!(detect("hi", 10), None);
    }

    #[test]
    fn code_resolution() {
        assert_eq!(from_code("eng"), Some(Lang::Eng));
        assert_eq!(from_code("not-a-code"), None);
    }
}
