//! Detectors run over a single piece of advertising material
//!
//! Both detectors read the same [`MaterialText`]; neither depends on the
//! other's output.

pub mod disclaimer;
pub mod prohibited;

pub use disclaimer::DisclaimerDetector;
pub use prohibited::ViolationScanner;

/// Input text with its case-normalized form, computed once per analysis
#[derive(Debug, Clone)]
pub struct MaterialText<'a> {
    original: &'a str,
    lowered: String,
}

impl<'a> MaterialText<'a> {
    pub fn new(original: &'a str) -> Self {
        Self {
            original,
            lowered: original.to_lowercase(),
        }
    }

    /// Text as submitted, used for evidence and offsets
    pub fn original(&self) -> &'a str {
        self.original
    }

    /// Lower-cased text, used for substring detection
    pub fn lowered(&self) -> &str {
        &self.lowered
    }
}
