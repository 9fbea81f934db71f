use std::collections::BTreeSet;

use crate::models::Category;

/// Keyword table. A category applies when any of its keywords occurs as a
/// plain substring of the lower-cased text, so short keywords ("ai", "hr",
/// "sar") also match inside longer words.
pub const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::GreenTech,
        &[
            "green", "emissions", "hydrogen", "fuel", "decarbon", "carbon", "climate",
            "renewable", "wind", "solar", "battery", "electric", "lng", "methanol",
            "ammonia", "scrubber", "sustainability", "esg",
        ],
    ),
    (
        Category::Automation,
        &[
            "autonomous", "robot", "automation", "machine", "unmanned", "remote", "drone",
            "rov", "auv", "sensor", "smart", "navigation", "autopilot",
        ],
    ),
    (
        Category::AiAnalytics,
        &[
            "ai", "artificial intelligence", "ml", "machine learning", "analytics",
            "predictive", "algorithm", "data", "big data", "digital twin", "simulation",
            "optimization", "forecast",
        ],
    ),
    (
        Category::DigitalInnovation,
        &[
            "digital", "platform", "software", "saas", "app", "cloud", "iot",
            "connectivity", "cyber", "fintech", "e-navigation", "e-logistics",
            "e-documents",
        ],
    ),
    (
        Category::Blockchain,
        &["blockchain", "ledger", "crypto", "token", "smart contract"],
    ),
    (
        Category::PortLogistics,
        &[
            "port", "terminal", "logistics", "supply chain", "container", "intermodal",
            "cargo", "freight", "throughput", "handling", "storage", "warehouse",
            "distribution", "customs",
        ],
    ),
    (
        Category::RegulationPolicy,
        &[
            "imo", "regulation", "policy", "law", "compliance", "solas", "marpol",
            "convention", "standard", "rule", "guideline", "authority", "government",
            "ban", "restriction", "safety", "security",
        ],
    ),
    (
        Category::FinanceInvestment,
        &[
            "finance", "investment", "funding", "capital", "ipo", "acquisition", "merger",
            "buyout", "private equity", "venture", "grant", "subsidy", "insurance", "risk",
            "market", "stock", "share", "bond", "loan", "credit",
        ],
    ),
    (
        Category::PeopleCareers,
        &[
            "crew", "seafarer", "officer", "captain", "training", "education", "job",
            "career", "union", "welfare", "health", "diversity", "leadership", "hr",
            "recruitment",
        ],
    ),
    (
        Category::VesselsFleets,
        &[
            "ship", "vessel", "fleet", "tanker", "bulker", "container", "ferry", "cruise",
            "yacht", "barge", "tug", "newbuild", "retrofit", "scrapping", "delivery",
            "order", "launch", "design", "hull", "engine", "propulsion", "maintenance",
            "repair", "drydock", "conversion", "upgrade", "incident", "accident",
            "casualty", "grounding", "collision", "fire", "rescue", "salvage", "piracy",
            "hijack", "loss", "sinking", "distress", "emergency", "sar",
        ],
    ),
];

/// Assign categories to an article from keywords found in its title and summary.
/// Returns `{General}` when no keyword matches.
pub fn assign_categories(title: &str, summary: &str) -> BTreeSet<Category> {
    let text = format!("{} {}", title, summary).to_lowercase();

    let mut categories: BTreeSet<Category> = CATEGORY_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(category, _)| *category)
        .collect();

    if categories.is_empty() {
        categories.insert(Category::General);
    }
    categories
}
