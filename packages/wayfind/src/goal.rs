//! Goal detection over fetched page text.
//!
//! A page satisfies the goal when the target phrase occurs in its visible
//! text after both sides go through the same normalization: whitespace
//! collapse and lowercasing always, plus Arabic canonical folding whenever
//! either operand contains a character from the Arabic block.

use unicode_normalization::UnicodeNormalization;

use crate::error::ConfigError;

/// Decides whether fetched page text satisfies the goal condition.
#[derive(Debug, Clone)]
pub struct GoalMatcher {
    target_plain: String,
    target_arabic: String,
    target_has_arabic: bool,
}

impl GoalMatcher {
    /// Build a matcher for a target phrase.
    ///
    /// An empty or whitespace-only phrase is a configuration error.
    pub fn new(target_phrase: &str) -> Result<Self, ConfigError> {
        if target_phrase.trim().is_empty() {
            return Err(ConfigError::EmptyTargetPhrase);
        }

        let plain = collapse_whitespace(&target_phrase.to_lowercase());
        Self::ok(plain, contains_arabic(target_phrase))
    }

    fn ok(plain: String, has_arabic: bool) -> Result<Self, ConfigError> {
        Ok(Self {
            target_arabic: normalize_arabic(&plain),
            target_plain: plain,
            target_has_arabic: has_arabic,
        })
    }

    /// True iff the page text contains the target phrase.
    ///
    /// Normalization is symmetric: whatever is applied to the page text is
    /// applied to the phrase as well.
    pub fn matches(&self, page_text: &str) -> bool {
        let page_plain = collapse_whitespace(&page_text.to_lowercase());

        if self.target_has_arabic || contains_arabic(page_text) {
            normalize_arabic(&page_plain).contains(&self.target_arabic)
        } else {
            page_plain.contains(&self.target_plain)
        }
    }
}

/// True iff any character falls in the Arabic Unicode block U+0600–U+06FF.
pub fn contains_arabic(text: &str) -> bool {
    text.chars().any(|ch| ('\u{0600}'..='\u{06FF}').contains(&ch))
}

/// Canonical Arabic form: NFKC, diacritics stripped, letter variants
/// folded (alef forms, yeh/hamza forms, teh marbuta), whitespace collapsed.
pub fn normalize_arabic(text: &str) -> String {
    let folded: String = text
        .nfkc()
        .filter(|ch| {
            !matches!(ch, '\u{0617}'..='\u{061A}' | '\u{064B}'..='\u{0652}')
        })
        .map(|ch| match ch {
            'أ' | 'إ' | 'آ' => 'ا',
            'ى' | 'ئ' => 'ي',
            'ؤ' => 'و',
            'ة' => 'ه',
            other => other,
        })
        .collect();

    collapse_whitespace(&folded)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_phrase() {
        assert!(GoalMatcher::new("   ").is_err());
    }

    #[test]
    fn test_plain_substring_case_insensitive() {
        let matcher = GoalMatcher::new("Alumni News").unwrap();
        assert!(matcher.matches("Latest ALUMNI news and events"));
        assert!(!matcher.matches("Faculty directory"));
    }

    #[test]
    fn test_whitespace_insensitive() {
        let matcher = GoalMatcher::new("foo bar").unwrap();
        assert!(matcher.matches("some foo  bar text"));
        assert!(matcher.matches("foo\n\tbar"));
    }

    #[test]
    fn test_arabic_variant_folding() {
        // Hamza-on-alef in the page, bare alef in the phrase
        let matcher = GoalMatcher::new("احمد").unwrap();
        assert!(matcher.matches("صفحة أحمد الرئيسية"));
    }

    #[test]
    fn test_arabic_diacritics_stripped() {
        let matcher = GoalMatcher::new("محمد").unwrap();
        assert!(matcher.matches("مُحَمَّد"));
    }

    #[test]
    fn test_arabic_mode_triggered_by_page() {
        // Latin phrase still matches inside an Arabic page
        let matcher = GoalMatcher::new("rust").unwrap();
        assert!(matcher.matches("لغة Rust الحديثة"));
    }

    #[test]
    fn test_teh_marbuta_folding() {
        let matcher = GoalMatcher::new("مكتبه").unwrap();
        assert!(matcher.matches("المكتبة المركزية"));
    }
}
