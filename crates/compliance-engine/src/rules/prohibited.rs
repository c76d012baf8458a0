use std::sync::Arc;

use shared_types::{CategoryMatches, MatchEvidence};

use super::MaterialText;
use crate::patterns::{char_offset, extract_context, PatternCatalog, CONTEXT_RADIUS};

/// Scans material for prohibited phrasing (38-FZ art. 28.1)
///
/// Categories are visited in catalog order and rules in their listed order,
/// so evidence order is reproducible. Each rule reports its own
/// non-overlapping matches; different rules may overlap one another.
#[derive(Debug, Clone)]
pub struct ViolationScanner {
    catalog: Arc<PatternCatalog>,
}

impl ViolationScanner {
    pub fn new(catalog: Arc<PatternCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    pub fn scan(&self, text: &str) -> CategoryMatches {
        self.scan_material(&MaterialText::new(text))
    }

    pub fn scan_material(&self, text: &MaterialText<'_>) -> CategoryMatches {
        let original = text.original();
        let mut violations = CategoryMatches::new();

        for category in self.catalog.categories() {
            for rule in category.rules() {
                for m in rule.regex().find_iter(original) {
                    violations.push(
                        category.category,
                        MatchEvidence {
                            phrase: m.as_str().to_string(),
                            context: extract_context(original, m.start(), m.end(), CONTEXT_RADIUS),
                            position: char_offset(original, m.start()),
                        },
                    );
                }
            }
        }

        violations
    }
}
