//! Verdict resolution
//!
//! A severity cascade, evaluated top-down, first match wins:
//! 1. Critical - disclaimer missing, or more violations than the threshold
//! 2. Non-compliant - any violation
//! 3. Partial - disclaimer altered or flagged
//! 4. Compliant

use shared_types::{CategoryMatches, DisclaimerStatus, Verdict};

use crate::config::VerdictConfig;

/// Violation count above which a verdict is always critical
pub const CRITICAL_VIOLATION_THRESHOLD: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerdictResolver {
    critical_threshold: usize,
}

impl VerdictResolver {
    pub fn new(critical_threshold: usize) -> Self {
        Self { critical_threshold }
    }

    pub fn from_config(config: &VerdictConfig) -> Self {
        Self::new(config.critical_violation_threshold)
    }

    pub fn critical_threshold(&self) -> usize {
        self.critical_threshold
    }

    pub fn resolve(&self, disclaimer: &DisclaimerStatus, violations: &CategoryMatches) -> Verdict {
        self.resolve_count(disclaimer, violations.total())
    }

    /// Same cascade for a precomputed violation count
    pub fn resolve_count(&self, disclaimer: &DisclaimerStatus, total_violations: usize) -> Verdict {
        if !disclaimer.found || total_violations > self.critical_threshold {
            return Verdict::CriticalViolation;
        }

        if total_violations > 0 {
            return Verdict::NonCompliant;
        }

        if !disclaimer.exact_match || disclaimer.warning.is_some() {
            return Verdict::PartialViolation;
        }

        Verdict::Compliant
    }
}

impl Default for VerdictResolver {
    fn default() -> Self {
        Self::new(CRITICAL_VIOLATION_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_material_is_compliant() {
        let resolver = VerdictResolver::default();
        assert_eq!(
            resolver.resolve_count(&DisclaimerStatus::exact(), 0),
            Verdict::Compliant
        );
    }

    #[test]
    fn test_missing_disclaimer_is_critical_even_without_violations() {
        let resolver = VerdictResolver::default();
        assert_eq!(
            resolver.resolve_count(&DisclaimerStatus::missing(), 0),
            Verdict::CriticalViolation
        );
    }

    #[test]
    fn test_violations_with_exact_disclaimer() {
        let resolver = VerdictResolver::default();
        let exact = DisclaimerStatus::exact();
        assert_eq!(resolver.resolve_count(&exact, 1), Verdict::NonCompliant);
        assert_eq!(resolver.resolve_count(&exact, 5), Verdict::NonCompliant);
        assert_eq!(resolver.resolve_count(&exact, 6), Verdict::CriticalViolation);
    }

    #[test]
    fn test_altered_disclaimer() {
        let resolver = VerdictResolver::default();
        let altered = DisclaimerStatus::altered("changed");
        assert_eq!(resolver.resolve_count(&altered, 0), Verdict::PartialViolation);
        assert_eq!(resolver.resolve_count(&altered, 2), Verdict::NonCompliant);
    }

    #[test]
    fn test_warning_alone_downgrades_exact_match() {
        let resolver = VerdictResolver::default();
        let mut flagged = DisclaimerStatus::exact();
        flagged.warning = Some("small print".to_string());
        assert_eq!(resolver.resolve_count(&flagged, 0), Verdict::PartialViolation);
    }

    #[test]
    fn test_custom_threshold() {
        let resolver = VerdictResolver::new(2);
        let exact = DisclaimerStatus::exact();
        assert_eq!(resolver.resolve_count(&exact, 2), Verdict::NonCompliant);
        assert_eq!(resolver.resolve_count(&exact, 3), Verdict::CriticalViolation);
    }

    #[test]
    fn test_resolve_uses_total_of_matches() {
        let resolver = VerdictResolver::default();
        let violations = CategoryMatches::new();
        assert_eq!(
            resolver.resolve(&DisclaimerStatus::exact(), &violations),
            Verdict::Compliant
        );
    }
}
