//! Bankruptcy advertising compliance engine
//!
//! Checks advertising material (page text or pasted copy) against Federal
//! Law No. 38-FZ "On Advertising", art. 28.1:
//!
//! - the mandatory disclaimer must be present, ideally verbatim
//! - eight categories of prohibited phrasing must be absent
//!
//! [`AnalysisEngine::analyze`] is the single entry point. It is a pure
//! function of its input and the engine's immutable configuration: no I/O,
//! no shared mutable state, identical results for identical input. Fetching
//! pages and stripping HTML belong to the caller.
//!
//! ```
//! use compliance_engine::AnalysisEngine;
//! use shared_types::{MaterialType, Verdict};
//!
//! # fn example() -> Result<(), compliance_engine::ConfigError> {
//! let engine = AnalysisEngine::builtin()?;
//! let result = engine.analyze("Гарантируем списание долгов!", MaterialType::Text, Default::default());
//! assert_eq!(result.verdict, Verdict::CriticalViolation);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod patterns;
pub mod report;
pub mod rules;
pub mod verdict;

use std::collections::BTreeMap;
use std::sync::Arc;

use shared_types::{AnalysisResult, MaterialType};
use tracing::debug;

pub use config::{EngineConfig, REQUIRED_DISCLAIMER};
pub use error::{CatalogError, ConfigError, ReportError, SourceError};
pub use patterns::PatternCatalog;
pub use rules::{DisclaimerDetector, MaterialText, ViolationScanner};
pub use verdict::{VerdictResolver, CRITICAL_VIOLATION_THRESHOLD};

/// Orchestrates disclaimer detection, prohibited phrase scanning and verdict
/// resolution for one piece of material at a time
#[derive(Debug, Clone)]
pub struct AnalysisEngine {
    config: EngineConfig,
    disclaimer: DisclaimerDetector,
    scanner: ViolationScanner,
    resolver: VerdictResolver,
}

impl AnalysisEngine {
    /// Engine over an already loaded catalog
    pub fn new(catalog: Arc<PatternCatalog>, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            disclaimer: DisclaimerDetector::from_config(&config.disclaimer),
            scanner: ViolationScanner::new(catalog),
            resolver: VerdictResolver::from_config(&config.verdict),
            config,
        })
    }

    /// Engine for a configuration, loading `catalog_path` or the builtin catalog
    pub fn from_config(config: EngineConfig) -> Result<Self, ConfigError> {
        let catalog = match &config.catalog_path {
            Some(path) => PatternCatalog::from_file(path)?,
            None => PatternCatalog::builtin()?,
        };
        Self::new(Arc::new(catalog), config)
    }

    /// Engine with the builtin catalog and statutory defaults
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_config(EngineConfig::default())
    }

    /// Analyze one piece of material.
    ///
    /// Empty or meaningless text is valid input: it simply has no disclaimer
    /// and therefore resolves to a critical verdict.
    pub fn analyze(
        &self,
        text: &str,
        material_type: MaterialType,
        metadata: BTreeMap<String, String>,
    ) -> AnalysisResult {
        let material = MaterialText::new(text);

        let disclaimer = self.disclaimer.check_material(&material);
        let violations = self.scanner.scan_material(&material);
        let verdict = self.resolver.resolve(&disclaimer, &violations);

        debug!(
            material_type = %material_type,
            chars = text.chars().count(),
            disclaimer_found = disclaimer.found,
            exact_match = disclaimer.exact_match,
            violations = violations.total(),
            verdict = %verdict,
            "Analyzed material"
        );

        AnalysisResult::new(
            verdict,
            material_type,
            metadata,
            disclaimer,
            violations,
            self.catalog().version(),
        )
    }

    /// Analyze pasted text with no metadata
    pub fn analyze_text(&self, text: &str) -> AnalysisResult {
        self.analyze(text, MaterialType::Text, BTreeMap::new())
    }

    pub fn catalog(&self) -> &PatternCatalog {
        self.scanner.catalog()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{Verdict, ViolationCategory};

    fn engine() -> AnalysisEngine {
        AnalysisEngine::builtin().unwrap()
    }

    #[test]
    fn test_engine_accepts_compliant_material() {
        let text = format!(
            "Помогаем в процедуре банкротства. Работаем в рамках законодательства. {}",
            REQUIRED_DISCLAIMER
        );
        let result = engine().analyze_text(&text);

        assert_eq!(result.verdict, Verdict::Compliant);
        assert_eq!(result.total_violations, 0);
        assert!(result.disclaimer.exact_match);
    }

    #[test]
    fn test_engine_detects_prohibited_phrases() {
        let text = format!("{} Спишем долги за 3 месяца!", REQUIRED_DISCLAIMER);
        let result = engine().analyze_text(&text);

        assert_eq!(result.verdict, Verdict::NonCompliant);
        assert_eq!(
            result.violations.get(ViolationCategory::MentionExemption).len(),
            1
        );
    }

    #[test]
    fn test_engine_flags_missing_disclaimer() {
        let result = engine().analyze_text("Консультируем по вопросам банкротства");
        assert_eq!(result.verdict, Verdict::CriticalViolation);
        assert!(!result.disclaimer.found);
    }

    #[test]
    fn test_engine_records_metadata_and_type() {
        let mut metadata = BTreeMap::new();
        metadata.insert("url".to_string(), "https://bankrot.example".to_string());
        let result = engine().analyze(REQUIRED_DISCLAIMER, MaterialType::Site, metadata);

        assert_eq!(result.material_type, MaterialType::Site);
        assert_eq!(result.url.as_deref(), Some("https://bankrot.example"));
        assert_eq!(result.catalog_version, engine().catalog().version());
    }

    #[test]
    fn test_engine_threshold_comes_from_config() {
        let mut config = EngineConfig::default();
        config.verdict.critical_violation_threshold = 1;
        let engine = AnalysisEngine::from_config(config).unwrap();

        let text = format!("{} Гарантируем списание долгов", REQUIRED_DISCLAIMER);
        assert_eq!(engine.analyze_text(&text).verdict, Verdict::CriticalViolation);
    }

    #[test]
    fn test_engine_rejects_invalid_config() {
        let mut config = EngineConfig::default();
        config.disclaimer.partial_match_threshold = 0;
        assert!(matches!(
            AnalysisEngine::from_config(config),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_engine_reports_missing_catalog_file() {
        let config = EngineConfig {
            catalog_path: Some("/nonexistent/catalog.toml".into()),
            ..EngineConfig::default()
        };
        assert!(matches!(
            AnalysisEngine::from_config(config),
            Err(ConfigError::Catalog(CatalogError::Io { .. }))
        ));
    }
}
