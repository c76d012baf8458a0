//! Closed enumerations of the compliance domain
//!
//! Prohibited advertising claims are grouped into a fixed set of eight
//! categories (Federal Law No. 38-FZ "On Advertising", art. 28.1). Adding a
//! category is a code change; adding phrases to an existing one is a catalog
//! change.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when a string does not name a known variant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Category of prohibited phrasing in bankruptcy advertising
///
/// Declaration order is the catalog iteration order and therefore the order
/// in which evidence is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCategory {
    /// Guarantees and promises of debt release
    Guarantees,
    /// Calls to stop paying or to ignore obligations
    CallsNotPay,
    /// Presenting bankruptcy as a state programme
    StateSystem,
    /// Mentions of debt write-off as an outcome
    MentionExemption,
    /// Promises to keep property
    PropertyPreservation,
    /// Money-back guarantees
    MoneyBack,
    /// Calls to take loans
    TakeLoans,
    /// "We take any case" claims
    AnyCases,
}

impl ViolationCategory {
    /// Every category, in catalog order
    pub const ALL: [ViolationCategory; 8] = [
        ViolationCategory::Guarantees,
        ViolationCategory::CallsNotPay,
        ViolationCategory::StateSystem,
        ViolationCategory::MentionExemption,
        ViolationCategory::PropertyPreservation,
        ViolationCategory::MoneyBack,
        ViolationCategory::TakeLoans,
        ViolationCategory::AnyCases,
    ];

    /// Stable machine identifier (matches the serde representation)
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationCategory::Guarantees => "guarantees",
            ViolationCategory::CallsNotPay => "calls_not_pay",
            ViolationCategory::StateSystem => "state_system",
            ViolationCategory::MentionExemption => "mention_exemption",
            ViolationCategory::PropertyPreservation => "property_preservation",
            ViolationCategory::MoneyBack => "money_back",
            ViolationCategory::TakeLoans => "take_loans",
            ViolationCategory::AnyCases => "any_cases",
        }
    }

    /// Default human-readable title used in reports
    pub fn title(&self) -> &'static str {
        match self {
            ViolationCategory::Guarantees => "Гарантии и обещания освобождения",
            ViolationCategory::CallsNotPay => "Призывы не исполнять обязательства",
            ViolationCategory::StateSystem => "Упоминания о государственной системе",
            ViolationCategory::MentionExemption => "Упоминания о возможности освобождения",
            ViolationCategory::PropertyPreservation => "Обещания сохранения имущества",
            ViolationCategory::MoneyBack => "Гарантии возврата средств",
            ViolationCategory::TakeLoans => "Призывы брать кредиты",
            ViolationCategory::AnyCases => "Обещания взяться за любые дела",
        }
    }
}

impl fmt::Display for ViolationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViolationCategory {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViolationCategory::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "violation category",
                value: s.to_string(),
            })
    }
}

/// Kind of advertising material submitted for a check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialType {
    /// Web page fetched by URL
    Site,
    /// Pasted advertising copy
    #[default]
    Text,
    /// Marketplace or catalog card
    Card,
}

impl MaterialType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialType::Site => "site",
            MaterialType::Text => "text",
            MaterialType::Card => "card",
        }
    }

    /// Label shown in reports
    pub fn label(&self) -> &'static str {
        match self {
            MaterialType::Site => "Сайт",
            MaterialType::Text => "Текст",
            MaterialType::Card => "Карточка",
        }
    }
}

impl fmt::Display for MaterialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaterialType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "site" => Ok(MaterialType::Site),
            "text" => Ok(MaterialType::Text),
            "card" => Ok(MaterialType::Card),
            _ => Err(UnknownVariant {
                kind: "material type",
                value: s.to_string(),
            }),
        }
    }
}
