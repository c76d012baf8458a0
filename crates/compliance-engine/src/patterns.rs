//! Prohibited phrase catalog and text helpers
//!
//! The catalog is versioned data, not code: the builtin rule set lives in
//! `catalog/prohibited_phrases.toml` and is embedded at compile time.
//! Alternate catalogs (regional variants, drafts under legal review) load
//! through the same path and pass the same self-check.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use regex::Regex;
use serde::Deserialize;
use shared_types::ViolationCategory;
use tracing::info;

use crate::error::CatalogError;

/// Builtin catalog source
pub const BUILTIN_CATALOG: &str = include_str!("../catalog/prohibited_phrases.toml");

/// Characters of context kept on each side of a match
pub const CONTEXT_RADIUS: usize = 50;

#[derive(Debug, Deserialize)]
struct CatalogFile {
    version: String,
    categories: Vec<CategoryEntry>,
}

#[derive(Debug, Deserialize)]
struct CategoryEntry {
    id: ViolationCategory,
    title: Option<String>,
    #[serde(default)]
    phrases: Vec<String>,
    #[serde(default)]
    patterns: Vec<String>,
}

/// A single compiled match rule
#[derive(Debug, Clone)]
pub struct PatternRule {
    source: String,
    regex: Regex,
}

impl PatternRule {
    /// Compile a phrase: words are matched literally, any whitespace run
    /// (or none) is accepted between adjacent words
    pub fn phrase(category: ViolationCategory, phrase: &str) -> Result<Self, CatalogError> {
        let words: Vec<String> = phrase.split_whitespace().map(regex::escape).collect();
        if words.is_empty() {
            return Err(CatalogError::EmptyPhrase(category));
        }
        let expr = format!(r"(?i){}", words.join(r"\s*"));
        Self::compile(category, phrase, &expr)
    }

    /// Compile a raw regular expression, case-insensitive
    pub fn pattern(category: ViolationCategory, pattern: &str) -> Result<Self, CatalogError> {
        if pattern.trim().is_empty() {
            return Err(CatalogError::EmptyPhrase(category));
        }
        Self::compile(category, pattern, &format!("(?i){}", pattern))
    }

    fn compile(category: ViolationCategory, source: &str, expr: &str) -> Result<Self, CatalogError> {
        let regex = Regex::new(expr).map_err(|e| CatalogError::InvalidPattern {
            category,
            pattern: source.to_string(),
            source: Box::new(e),
        })?;

        // A rule that accepts empty text would report a match at every offset
        if regex.is_match("") {
            return Err(CatalogError::MatchesEmpty {
                category,
                pattern: source.to_string(),
            });
        }

        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// Rule as written in the catalog
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

/// Ordered rules of one category
#[derive(Debug, Clone)]
pub struct CategoryRules {
    pub category: ViolationCategory,
    pub title: String,
    rules: Vec<PatternRule>,
}

impl CategoryRules {
    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }
}

/// Immutable mapping from category to ordered match rules
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    version: String,
    categories: Vec<CategoryRules>,
}

impl PatternCatalog {
    /// The catalog shipped with the crate
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a catalog.
    ///
    /// Every category must appear exactly once with at least one rule, and
    /// every rule must compile to a regex that cannot match empty text.
    /// Categories are stored in declaration order whatever the file order.
    pub fn from_toml_str(s: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(s)?;
        if file.version.trim().is_empty() {
            return Err(CatalogError::MissingVersion);
        }

        let mut by_category: BTreeMap<ViolationCategory, CategoryRules> = BTreeMap::new();
        for entry in file.categories {
            if by_category.contains_key(&entry.id) {
                return Err(CatalogError::DuplicateCategory(entry.id));
            }

            let mut rules = Vec::with_capacity(entry.phrases.len() + entry.patterns.len());
            for phrase in &entry.phrases {
                rules.push(PatternRule::phrase(entry.id, phrase)?);
            }
            for pattern in &entry.patterns {
                rules.push(PatternRule::pattern(entry.id, pattern)?);
            }
            if rules.is_empty() {
                return Err(CatalogError::EmptyCategory(entry.id));
            }

            let title = entry
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| entry.id.title().to_string());
            by_category.insert(
                entry.id,
                CategoryRules {
                    category: entry.id,
                    title,
                    rules,
                },
            );
        }

        if let Some(missing) = ViolationCategory::ALL
            .iter()
            .find(|c| !by_category.contains_key(*c))
        {
            return Err(CatalogError::MissingCategory(*missing));
        }

        let catalog = Self {
            version: file.version,
            categories: by_category.into_values().collect(),
        };
        info!(
            "Loaded pattern catalog {} ({} rules)",
            catalog.version,
            catalog.rule_count()
        );
        Ok(catalog)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Categories in catalog order
    pub fn categories(&self) -> &[CategoryRules] {
        &self.categories
    }

    pub fn rules(&self, category: ViolationCategory) -> &[PatternRule] {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .map(CategoryRules::rules)
            .unwrap_or(&[])
    }

    pub fn title(&self, category: ViolationCategory) -> &str {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.title.as_str())
            .unwrap_or_else(|| category.title())
    }

    pub fn rule_count(&self) -> usize {
        self.categories.iter().map(|c| c.rules.len()).sum()
    }
}

/// Character offset of a byte offset
pub fn char_offset(text: &str, byte_pos: usize) -> usize {
    text[..byte_pos].chars().count()
}

/// Context around a match: up to `radius` characters on each side of
/// `start..end` (byte offsets), clamped to the text and trimmed
pub fn extract_context(text: &str, start: usize, end: usize, radius: usize) -> String {
    let context_start = if radius == 0 {
        start
    } else {
        text[..start]
            .char_indices()
            .rev()
            .nth(radius - 1)
            .map(|(i, _)| i)
            .unwrap_or(0)
    };
    let context_end = text[end..]
        .char_indices()
        .nth(radius)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());

    text[context_start..context_end].trim().to_string()
}
