//! Compliance report rendering
//!
//! Turns an [`AnalysisResult`] into a document for the person who submitted
//! the material: verdict, disclaimer status, evidence per category and
//! remediation advice.
//!
//! # Output Formats
//!
//! - **Markdown**: chat and file delivery
//! - **Html**: standalone page, also the input for PDF rendering elsewhere
//! - **Json**: the raw result for storage and integrations
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use compliance_engine::report::{OutputFormat, Report, Reporter};
//! use compliance_engine::AnalysisEngine;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = AnalysisEngine::builtin()?;
//! let text = "Гарантируем списание долгов";
//! let result = engine.analyze_text(text);
//!
//! let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
//! let report = Report::new(&result, text, date);
//! let markdown = Reporter::for_engine(OutputFormat::Markdown, &engine).format(&report)?;
//! assert!(markdown.contains("15.01.2026"));
//! # Ok(())
//! # }
//! ```

mod html;
mod json;
mod markdown;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{AnalysisResult, ViolationCategory};

use crate::config::{MIN_DISCLAIMER_SIZE_PERCENT, REQUIRED_DISCLAIMER};
use crate::error::ReportError;
use crate::AnalysisEngine;

pub use html::HtmlReporter;
pub use json::JsonReporter;
pub use markdown::MarkdownReporter;

/// Phrases per category listed in a report
pub const MAX_LISTED_PHRASES: usize = 5;

/// Characters of submitted text shown as the material label
pub const MATERIAL_LABEL_CHARS: usize = 100;

/// Replacement wording offered for prohibited phrases
pub const ALLOWED_PHRASES: [&str; 4] = [
    "Помогаем в процедуре банкротства",
    "Сопровождаем процесс банкротства",
    "Консультируем по вопросам банкротства",
    "Работаем в рамках законодательства",
];

/// Statutes cited at the end of every report
pub const LEGAL_BASIS: [&str; 4] = [
    "ФЗ \"О рекламе\" № 38-ФЗ от 13.03.2006",
    "Федеральный закон № 332-ФЗ от 31.07.2025 (изменения с 1 января 2026)",
    "Статья 28.1 ФЗ \"О рекламе\" (запреты на рекламу банкротства)",
    "Дополнительные требования АРИБ",
];

lazy_static! {
    static ref URL_SCHEME: Regex = Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://").unwrap();
    static ref UNSAFE_FILENAME_CHARS: Regex = Regex::new(r#"[/\\:*?"<>|\s]"#).unwrap();
}

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Html,
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Html => "html",
            OutputFormat::Json | OutputFormat::JsonPretty => "json",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "text/markdown; charset=utf-8",
            OutputFormat::Html => "text/html; charset=utf-8",
            OutputFormat::Json | OutputFormat::JsonPretty => "application/json",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "html" => Ok(OutputFormat::Html),
            "json" => Ok(OutputFormat::Json),
            "json-pretty" | "json_pretty" => Ok(OutputFormat::JsonPretty),
            other => Err(format!(
                "Invalid format '{}'. Must be 'markdown', 'html', 'json' or 'json-pretty'",
                other
            )),
        }
    }
}

/// Values a report quotes that are not part of the result itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSettings {
    pub disclaimer_text: String,
    pub min_size_percent: u32,
    pub titles: BTreeMap<ViolationCategory, String>,
}

impl ReportSettings {
    pub fn from_engine(engine: &AnalysisEngine) -> Self {
        let catalog = engine.catalog();
        Self {
            disclaimer_text: engine.config().disclaimer.text.clone(),
            min_size_percent: engine.config().disclaimer.min_size_percent,
            titles: ViolationCategory::ALL
                .iter()
                .map(|c| (*c, catalog.title(*c).to_string()))
                .collect(),
        }
    }

    pub fn title(&self, category: ViolationCategory) -> &str {
        self.titles
            .get(&category)
            .map(String::as_str)
            .unwrap_or_else(|| category.title())
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            disclaimer_text: REQUIRED_DISCLAIMER.to_string(),
            min_size_percent: MIN_DISCLAIMER_SIZE_PERCENT,
            titles: ViolationCategory::ALL
                .iter()
                .map(|c| (*c, c.title().to_string()))
                .collect(),
        }
    }
}

/// One result plus the facts needed to present it
#[derive(Debug, Clone)]
pub struct Report<'a> {
    pub result: &'a AnalysisResult,
    /// URL, or the start of the submitted text
    pub material: String,
    pub checked_on: NaiveDate,
}

impl<'a> Report<'a> {
    pub fn new(result: &'a AnalysisResult, text: &str, checked_on: NaiveDate) -> Self {
        Self {
            result,
            material: material_label(result, text),
            checked_on,
        }
    }
}

/// URL when known, otherwise the first characters of the text
pub fn material_label(result: &AnalysisResult, text: &str) -> String {
    if let Some(url) = &result.url {
        return url.chars().take(MATERIAL_LABEL_CHARS).collect();
    }
    let excerpt: String = text.trim().chars().take(MATERIAL_LABEL_CHARS).collect();
    if excerpt.is_empty() {
        "Не указано".to_string()
    } else {
        excerpt
    }
}

/// `YYYY-MM-DD_<source>.<ext>`; the source is the URL without scheme, or `text`
pub fn report_file_name(checked_on: NaiveDate, url: Option<&str>, format: OutputFormat) -> String {
    let source = url.unwrap_or("text");
    let source = URL_SCHEME.replace(source, "");
    let source = UNSAFE_FILENAME_CHARS.replace_all(&source, "_");
    let source: String = source.chars().take(50).collect();
    format!(
        "{}_{}.{}",
        checked_on.format("%Y-%m-%d"),
        source,
        format.extension()
    )
}

/// Renders reports in one format
#[derive(Debug, Clone, Default)]
pub struct Reporter {
    format: OutputFormat,
    settings: ReportSettings,
}

impl Reporter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            settings: ReportSettings::default(),
        }
    }

    /// Reporter quoting the engine's disclaimer and category titles
    pub fn for_engine(format: OutputFormat, engine: &AnalysisEngine) -> Self {
        Self {
            format,
            settings: ReportSettings::from_engine(engine),
        }
    }

    pub fn format_kind(&self) -> OutputFormat {
        self.format
    }

    pub fn format(&self, report: &Report<'_>) -> Result<String, ReportError> {
        match self.format {
            OutputFormat::Markdown => MarkdownReporter::format(report, &self.settings),
            OutputFormat::Html => HtmlReporter::format(report, &self.settings),
            OutputFormat::Json => JsonReporter::format(report.result, false),
            OutputFormat::JsonPretty => JsonReporter::format(report.result, true),
        }
    }

    /// Write the report into `dir` and return the file path
    pub fn write_to_dir<P: AsRef<Path>>(
        &self,
        report: &Report<'_>,
        dir: P,
    ) -> Result<PathBuf, ReportError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(report_file_name(
            report.checked_on,
            report.result.url.as_deref(),
            self.format,
        ));
        fs::write(&path, self.format(report)?)?;
        Ok(path)
    }
}
