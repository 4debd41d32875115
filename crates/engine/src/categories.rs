//! Canonical category keys.
//!
//! Budgets, breakdowns and imports must agree that `"Food"`, `"food"` and
//! `"FOOD "` are the same category. The canonical key is NFKC-normalized,
//! casefolded and whitespace-collapsed; the user-facing display name keeps
//! its original casing.

use unicode_normalization::UnicodeNormalization;

use crate::{EngineError, ResultEngine};

/// Returns the canonical grouping key for a category name.
#[must_use]
pub fn canonical_key(name: &str) -> String {
    let normalized: String = name.nfkc().collect();
    normalized
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Validates a user-supplied category name and returns the trimmed display
/// form.
pub(crate) fn normalize_display(name: &str) -> ResultEngine<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(
            "category must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_ignores_case_and_whitespace() {
        assert_eq!(canonical_key("Food"), canonical_key("food"));
        assert_eq!(canonical_key("  Food  "), canonical_key("Food"));
        assert_eq!(canonical_key("Eating  Out"), canonical_key("eating out"));
    }

    #[test]
    fn key_applies_unicode_normalization() {
        // Fullwidth letters compatibility-normalize to ASCII.
        assert_eq!(canonical_key("Ｆｏｏｄ"), canonical_key("food"));
    }

    #[test]
    fn display_form_is_trimmed_but_keeps_case() {
        assert_eq!(normalize_display("  Food ").unwrap(), "Food");
        assert!(normalize_display("   ").is_err());
    }
}
