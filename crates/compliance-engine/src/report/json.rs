//! JSON reporter

use shared_types::AnalysisResult;

use crate::error::ReportError;

/// JSON format reporter
pub struct JsonReporter;

impl JsonReporter {
    /// Serialize the result as-is; `pretty` selects indented output
    pub fn format(result: &AnalysisResult, pretty: bool) -> Result<String, ReportError> {
        let output = if pretty {
            serde_json::to_string_pretty(result)?
        } else {
            serde_json::to_string(result)?
        };
        Ok(output)
    }
}
