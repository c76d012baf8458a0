use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::category::{MaterialType, ViolationCategory};
use crate::verdict::Verdict;

/// One located occurrence of a prohibited phrase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEvidence {
    pub phrase: String,  // Matched text, original case
    pub context: String, // Up to 50 chars either side, trimmed
    pub position: usize, // Character offset in the analyzed text
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisclaimerLocation {
    Found,
    NotFound,
}

/// Size of the disclaimer relative to the material area.
///
/// Measuring it needs layout information this crate never sees, so the
/// only values are "someone has to measure it" and "nothing to measure".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeCheck {
    NeedsCalculation,
    NotApplicable,
}

/// Visibility of the disclaimer. Never asserted, only flagged for review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    NeedsCheck,
    NotVisible,
}

/// Presence and fidelity of the mandatory disclaimer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisclaimerStatus {
    pub found: bool,
    pub exact_match: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub location: DisclaimerLocation,
    pub size_check: SizeCheck,
    pub readable: bool,
    pub visible: Visibility,
}

impl DisclaimerStatus {
    /// Canonical text present verbatim
    pub fn exact() -> Self {
        Self {
            found: true,
            exact_match: true,
            warning: None,
            location: DisclaimerLocation::Found,
            size_check: SizeCheck::NeedsCalculation,
            readable: true,
            visible: Visibility::NeedsCheck,
        }
    }

    /// Enough key phrases present, but the wording differs
    pub fn altered(warning: impl Into<String>) -> Self {
        Self {
            exact_match: false,
            warning: Some(warning.into()),
            ..Self::exact()
        }
    }

    pub fn missing() -> Self {
        Self {
            found: false,
            exact_match: false,
            warning: None,
            location: DisclaimerLocation::NotFound,
            size_check: SizeCheck::NotApplicable,
            readable: false,
            visible: Visibility::NotVisible,
        }
    }

    /// Found verbatim with nothing to flag
    pub fn is_clean(&self) -> bool {
        self.found && self.exact_match && self.warning.is_none()
    }
}

/// Evidence grouped by category.
///
/// Every category is always present as a key, possibly with no matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<ViolationCategory, Vec<MatchEvidence>>")]
pub struct CategoryMatches(BTreeMap<ViolationCategory, Vec<MatchEvidence>>);

impl CategoryMatches {
    pub fn new() -> Self {
        Self(
            ViolationCategory::ALL
                .iter()
                .map(|category| (*category, Vec::new()))
                .collect(),
        )
    }

    pub fn push(&mut self, category: ViolationCategory, evidence: MatchEvidence) {
        self.0.entry(category).or_default().push(evidence);
    }

    pub fn get(&self, category: ViolationCategory) -> &[MatchEvidence] {
        self.0.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Categories in catalog order with their evidence
    pub fn iter(&self) -> impl Iterator<Item = (ViolationCategory, &[MatchEvidence])> {
        self.0.iter().map(|(category, list)| (*category, list.as_slice()))
    }

    /// Only the categories with at least one match
    pub fn violated(&self) -> impl Iterator<Item = (ViolationCategory, &[MatchEvidence])> {
        self.iter().filter(|(_, list)| !list.is_empty())
    }

    pub fn total(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl Default for CategoryMatches {
    fn default() -> Self {
        Self::new()
    }
}

impl From<BTreeMap<ViolationCategory, Vec<MatchEvidence>>> for CategoryMatches {
    fn from(map: BTreeMap<ViolationCategory, Vec<MatchEvidence>>) -> Self {
        let mut matches = Self::new();
        for (category, list) in map {
            matches.0.insert(category, list);
        }
        matches
    }
}

/// Outcome of one analysis call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub verdict: Verdict,
    pub material_type: MaterialType,
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
    pub disclaimer: DisclaimerStatus,
    pub violations: CategoryMatches,
    pub total_violations: usize,
    pub catalog_version: String,
}

impl AnalysisResult {
    /// Assemble a result; `total_violations` and `url` are derived here
    pub fn new(
        verdict: Verdict,
        material_type: MaterialType,
        metadata: BTreeMap<String, String>,
        disclaimer: DisclaimerStatus,
        violations: CategoryMatches,
        catalog_version: impl Into<String>,
    ) -> Self {
        let total_violations = violations.total();
        let url = metadata.get("url").cloned();
        Self {
            verdict,
            material_type,
            url,
            metadata,
            disclaimer,
            violations,
            total_violations,
            catalog_version: catalog_version.into(),
        }
    }
}
