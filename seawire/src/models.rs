use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

/// Topical label attached to an article.
///
/// Variant order is the order categories appear in serialized output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Green Tech")]
    GreenTech,
    #[serde(rename = "Automation")]
    Automation,
    #[serde(rename = "AI & Analytics")]
    AiAnalytics,
    #[serde(rename = "Digital Innovation")]
    DigitalInnovation,
    #[serde(rename = "Blockchain")]
    Blockchain,
    #[serde(rename = "Port & Logistics")]
    PortLogistics,
    #[serde(rename = "Regulation & Policy")]
    RegulationPolicy,
    #[serde(rename = "Finance & Investment")]
    FinanceInvestment,
    #[serde(rename = "People & Careers")]
    PeopleCareers,
    #[serde(rename = "Vessels & Fleets")]
    VesselsFleets,
    /// Fallback when no keyword matched
    #[serde(rename = "General")]
    General,
}

impl Category {
    pub const ALL: [Category; 11] = [
        Category::GreenTech,
        Category::Automation,
        Category::AiAnalytics,
        Category::DigitalInnovation,
        Category::Blockchain,
        Category::PortLogistics,
        Category::RegulationPolicy,
        Category::FinanceInvestment,
        Category::PeopleCareers,
        Category::VesselsFleets,
        Category::General,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::GreenTech => "Green Tech",
            Category::Automation => "Automation",
            Category::AiAnalytics => "AI & Analytics",
            Category::DigitalInnovation => "Digital Innovation",
            Category::Blockchain => "Blockchain",
            Category::PortLogistics => "Port & Logistics",
            Category::RegulationPolicy => "Regulation & Policy",
            Category::FinanceInvestment => "Finance & Investment",
            Category::PeopleCareers => "People & Careers",
            Category::VesselsFleets => "Vessels & Fleets",
            Category::General => "General",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.label() == s)
            .ok_or_else(|| anyhow!("unknown category: {}", s))
    }
}

/// A normalized, categorized news item as served by `/api/news`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub link: String,
    /// Plain text with HTML entities decoded
    pub summary: String,
    /// Title of the feed the article came from
    pub source: String,
    /// Never empty; `General` when nothing else matched
    #[serde(rename = "category")]
    pub categories: BTreeSet<Category>,
}
