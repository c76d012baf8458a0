use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordinal compliance classification
///
/// Variants are declared in increasing severity, so `Ord` compares severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Compliant,
    PartialViolation,
    NonCompliant,
    CriticalViolation,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Compliant => "COMPLIANT",
            Verdict::PartialViolation => "PARTIAL_VIOLATION",
            Verdict::NonCompliant => "NON_COMPLIANT",
            Verdict::CriticalViolation => "CRITICAL_VIOLATION",
        }
    }

    /// Report label
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Compliant => "СООТВЕТСТВУЕТ",
            Verdict::PartialViolation => "ЧАСТИЧНОЕ НАРУШЕНИЕ",
            Verdict::NonCompliant => "НЕ СООТВЕТСТВУЕТ",
            Verdict::CriticalViolation => "КРИТИЧЕСКИЕ НАРУШЕНИЯ",
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            Verdict::Compliant => "✅",
            Verdict::PartialViolation => "⚠️",
            Verdict::NonCompliant => "❌",
            Verdict::CriticalViolation => "🚨",
        }
    }

    /// True for verdicts that block publication of the material
    pub fn is_failing(&self) -> bool {
        matches!(self, Verdict::NonCompliant | Verdict::CriticalViolation)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
