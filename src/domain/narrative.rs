use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

pub const USP_COUNT: usize = 3;

const DEFAULT_INDUSTRY: &str = "Dienstleistung";

const FALLBACK_USPS: [&str; USP_COUNT] = [
    "Persönliche Betreuung und kurze Kommunikationswege",
    "Langjährige Erfahrung und fundiertes Branchenwissen",
    "Maßgeschneiderte Lösungen statt Standardpakete",
];

/// What the generator knows about a company before asking for prose.
#[derive(Debug, Clone, Default)]
pub struct CompanyContext {
    pub name: String,
    pub industry: Option<String>,
    pub brand_tone: Option<String>,
    pub scraped_text: String,
}

impl CompanyContext {
    pub fn industry_or_default(&self) -> &str {
        self.industry
            .as_deref()
            .map(str::trim)
            .filter(|i| !i.is_empty())
            .unwrap_or(DEFAULT_INDUSTRY)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeResult {
    pub description: String,
    pub short_pitch: String,
    pub usp: Vec<String>,
    pub positioning: String,
}

impl NarrativeResult {
    pub fn fallback(context: &CompanyContext) -> Self {
        let name = context.name.trim();
        let industry = context.industry_or_default();

        NarrativeResult {
            description: format!(
                "{name} ist ein Unternehmen aus dem Bereich {industry}. Mit fundierter \
                 Erfahrung und einem klaren Fokus auf Kundenzufriedenheit entwickelt {name} \
                 passgenaue Lösungen für die Anforderungen seiner Kunden."
            ),
            short_pitch: format!("{name}: Ihr verlässlicher Partner für {industry}."),
            usp: FALLBACK_USPS.iter().map(|u| u.to_string()).collect(),
            positioning: format!(
                "{name} positioniert sich als kompetenter und zuverlässiger Anbieter \
                 im Bereich {industry} mit persönlichem Service."
            ),
        }
    }
}

/// Exactly `USP_COUNT` entries: generated ones first, topped up from the template.
pub fn fill_usps(generated: Vec<String>) -> Vec<String> {
    let mut usp: Vec<String> = generated
        .into_iter()
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .unique()
        .take(USP_COUNT)
        .collect();

    let missing: Vec<String> = FALLBACK_USPS
        .iter()
        .map(|u| u.to_string())
        .filter(|u| !usp.contains(u))
        .take(USP_COUNT - usp.len())
        .collect();
    usp.extend(missing);

    usp
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceLevel {
    Low,
    Medium,
    High,
    Premium,
}

impl PriceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceLevel::Low => "low",
            PriceLevel::Medium => "medium",
            PriceLevel::High => "high",
            PriceLevel::Premium => "premium",
        }
    }
}

impl fmt::Display for PriceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketPosition {
    Lokal,
    National,
    Global,
}

impl MarketPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketPosition::Lokal => "lokal",
            MarketPosition::National => "national",
            MarketPosition::Global => "global",
        }
    }
}

impl fmt::Display for MarketPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessModelResult {
    pub business_model: String,
    pub target_market: String,
    pub price_level: PriceLevel,
    pub market_position: MarketPosition,
}

impl BusinessModelResult {
    /// Generic small-business services profile.
    pub fn fallback() -> Self {
        BusinessModelResult {
            business_model: "Dienstleistungsunternehmen (KMU) mit projektbasierter Abrechnung"
                .to_string(),
            target_market: "Kleine und mittlere Unternehmen in der Region".to_string(),
            price_level: PriceLevel::Medium,
            market_position: MarketPosition::Lokal,
        }
    }
}
