//! Mandatory disclaimer detection
//!
//! Three tiers: the canonical text verbatim, enough key phrases to suggest
//! an altered disclaimer, or nothing. Containment is plain substring search
//! on lower-cased text; no word-boundary constraint applies.

use shared_types::DisclaimerStatus;
use tracing::warn;

use super::MaterialText;
use crate::config::{DisclaimerConfig, DISCLAIMER_KEY_PHRASES, PARTIAL_MATCH_THRESHOLD, REQUIRED_DISCLAIMER};

/// Warning attached to a partial match
pub const ALTERED_DISCLAIMER_WARNING: &str = "Дисклеймер найден, но текст может быть изменен";

#[derive(Debug, Clone)]
pub struct DisclaimerDetector {
    canonical: String,
    key_phrases: Vec<String>,
    threshold: usize,
}

impl DisclaimerDetector {
    /// Detector for the given canonical text and partial-match heuristic.
    ///
    /// All strings are lower-cased here, once.
    pub fn new(canonical: &str, key_phrases: &[String], threshold: usize) -> Self {
        Self {
            canonical: canonical.to_lowercase(),
            key_phrases: key_phrases.iter().map(|p| p.to_lowercase()).collect(),
            threshold,
        }
    }

    pub fn from_config(config: &DisclaimerConfig) -> Self {
        Self::new(
            &config.text,
            &config.key_phrases,
            config.partial_match_threshold,
        )
    }

    /// Check raw text
    pub fn check(&self, text: &str) -> DisclaimerStatus {
        self.check_material(&MaterialText::new(text))
    }

    pub fn check_material(&self, text: &MaterialText<'_>) -> DisclaimerStatus {
        let lowered = text.lowered();

        if lowered.contains(&self.canonical) {
            return DisclaimerStatus::exact();
        }

        let found_phrases = self.count_key_phrases(lowered);
        if found_phrases >= self.threshold {
            warn!(
                "Disclaimer partially matched ({}/{} key phrases)",
                found_phrases,
                self.key_phrases.len()
            );
            return DisclaimerStatus::altered(ALTERED_DISCLAIMER_WARNING);
        }

        DisclaimerStatus::missing()
    }

    /// Number of key phrases present in lower-cased text
    pub fn count_key_phrases(&self, lowered: &str) -> usize {
        self.key_phrases
            .iter()
            .filter(|phrase| lowered.contains(phrase.as_str()))
            .count()
    }
}

impl Default for DisclaimerDetector {
    fn default() -> Self {
        let key_phrases: Vec<String> = DISCLAIMER_KEY_PHRASES.iter().map(|p| p.to_string()).collect();
        Self::new(REQUIRED_DISCLAIMER, &key_phrases, PARTIAL_MATCH_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{DisclaimerLocation, SizeCheck, Visibility};

    #[test]
    fn test_exact_disclaimer_found() {
        let detector = DisclaimerDetector::default();
        let status = detector.check(REQUIRED_DISCLAIMER);

        assert!(status.found);
        assert!(status.exact_match);
        assert!(status.warning.is_none());
        assert_eq!(status.location, DisclaimerLocation::Found);
        assert_eq!(status.size_check, SizeCheck::NeedsCalculation);
        assert_eq!(status.visible, Visibility::NeedsCheck);
    }

    #[test]
    fn test_exact_match_ignores_case() {
        let detector = DisclaimerDetector::default();
        let status = detector.check(&REQUIRED_DISCLAIMER.to_uppercase());
        assert!(status.exact_match);
    }

    #[test]
    fn test_disclaimer_embedded_in_larger_text() {
        let detector = DisclaimerDetector::default();
        let text = format!("Юридическая помощь.{}Звоните сегодня.", REQUIRED_DISCLAIMER);
        assert!(detector.check(&text).exact_match);
    }

    #[test]
    fn test_two_key_phrases_give_partial_match() {
        let detector = DisclaimerDetector::default();
        let text = "Банкротство влечет негативные последствия и ограничения на получение кредита.";
        let status = detector.check(text);

        assert!(status.found);
        assert!(!status.exact_match);
        assert_eq!(status.warning.as_deref(), Some(ALTERED_DISCLAIMER_WARNING));
        assert_eq!(status.size_check, SizeCheck::NeedsCalculation);
    }

    #[test]
    fn test_last_two_key_phrases_give_partial_match() {
        let detector = DisclaimerDetector::default();
        let text = "Есть ограничения на получение кредита и повторное банкротство в течение пяти лет.";
        let status = detector.check(text);

        assert_eq!(detector.count_key_phrases(&text.to_lowercase()), 2);
        assert!(status.found);
        assert!(!status.exact_match);
        assert!(status.warning.is_some());
    }

    #[test]
    fn test_single_key_phrase_is_not_enough() {
        let detector = DisclaimerDetector::default();
        let status = detector.check("Возможно повторное банкротство в течение пяти лет.");

        assert!(!status.found);
        assert!(!status.exact_match);
        assert_eq!(status.location, DisclaimerLocation::NotFound);
        assert_eq!(status.size_check, SizeCheck::NotApplicable);
        assert_eq!(status.visible, Visibility::NotVisible);
        assert!(!status.readable);
    }

    #[test]
    fn test_empty_text_has_no_disclaimer() {
        let detector = DisclaimerDetector::default();
        assert_eq!(detector.check(""), DisclaimerStatus::missing());
    }

    #[test]
    fn test_custom_threshold() {
        let key_phrases: Vec<String> = DISCLAIMER_KEY_PHRASES.iter().map(|p| p.to_string()).collect();
        let detector = DisclaimerDetector::new(REQUIRED_DISCLAIMER, &key_phrases, 1);
        let status = detector.check("Повторное банкротство в течение пяти лет невозможно.");
        assert!(status.found);
        assert!(!status.exact_match);
    }

    #[test]
    fn test_count_key_phrases() {
        let detector = DisclaimerDetector::default();
        assert_eq!(detector.count_key_phrases(&REQUIRED_DISCLAIMER.to_lowercase()), 3);
        assert_eq!(detector.count_key_phrases("ничего общего"), 0);
    }
}
