//! Literal text replacement.

use crate::settings::Replacement;

/// Apply replacement pairs in list order. Every occurrence of each
/// pattern is substituted; empty patterns are skipped.
pub fn apply_replacements(text: &str, replacements: &[Replacement]) -> String {
    if text.is_empty() || replacements.is_empty() {
        return text.to_string();
    }

    let mut result = text.to_string();
    for r in replacements {
        if r.pattern.is_empty() {
            continue;
        }
        result = result.replace(&r.pattern, &r.replace_with);
    }
    result
}
