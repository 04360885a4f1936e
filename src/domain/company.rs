use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{
    narrative::{BusinessModelResult, NarrativeResult},
    tech_stack::TechStackProfile,
};

/// The company aggregate as far as the enrichment pipeline sees it.
/// Created and owned by the surrounding console, only ever updated here.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub brand_tone: Option<String>,
    pub description: Option<String>,
    pub short_pitch: Option<String>,
    pub usp: Option<Vec<String>>,
    pub positioning: Option<String>,
    pub business_model: Option<String>,
    pub target_market: Option<String>,
    pub price_level: Option<String>,
    pub market_position: Option<String>,
    pub website_system: Option<String>,
    pub tech_stack: Option<TechStackProfile>,
    pub website_reachable: Option<bool>,
    pub ssl_enabled: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

impl Company {
    pub fn new(name: &str, website: Option<&str>) -> Self {
        Company {
            id: Uuid::new_v4(),
            name: name.to_string(),
            website: website.map(|w| w.to_string()),
            industry: None,
            brand_tone: None,
            description: None,
            short_pitch: None,
            usp: None,
            positioning: None,
            business_model: None,
            target_market: None,
            price_level: None,
            market_position: None,
            website_system: None,
            tech_stack: None,
            website_reachable: None,
            ssl_enabled: None,
            updated_at: Utc::now(),
        }
    }

    /// The configured website, if it is more than whitespace.
    pub fn website_url(&self) -> Option<&str> {
        self.website
            .as_deref()
            .map(str::trim)
            .filter(|w| !w.is_empty())
    }
}

/// Field changes for one update call. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyUpdate {
    pub description: Option<String>,
    pub short_pitch: Option<String>,
    pub usp: Option<Vec<String>>,
    pub positioning: Option<String>,
    pub business_model: Option<String>,
    pub target_market: Option<String>,
    pub price_level: Option<String>,
    pub market_position: Option<String>,
    pub website_system: Option<String>,
    pub tech_stack: Option<TechStackProfile>,
    pub website_reachable: Option<bool>,
    pub ssl_enabled: Option<bool>,
}

impl CompanyUpdate {
    pub fn with_narrative(mut self, narrative: NarrativeResult) -> Self {
        self.description = Some(narrative.description);
        self.short_pitch = Some(narrative.short_pitch);
        self.usp = Some(narrative.usp);
        self.positioning = Some(narrative.positioning);
        self
    }

    pub fn with_business_model(mut self, model: BusinessModelResult) -> Self {
        self.business_model = Some(model.business_model);
        self.target_market = Some(model.target_market);
        self.price_level = Some(model.price_level.to_string());
        self.market_position = Some(model.market_position.to_string());
        self
    }

    /// Tech profile replaces the stored one wholesale. The website system is
    /// only overwritten when a CMS was detected.
    pub fn with_tech_stack(mut self, profile: TechStackProfile) -> Self {
        self.website_system = profile.cms.clone();
        self.tech_stack = Some(profile);
        self
    }

    /// An update without field changes only re-reads the company.
    pub fn is_empty(&self) -> bool {
        *self == CompanyUpdate::default()
    }

    pub fn apply(self, company: &mut Company) {
        fn set<T>(field: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *field = value;
            }
        }

        set(&mut company.description, self.description);
        set(&mut company.short_pitch, self.short_pitch);
        set(&mut company.usp, self.usp);
        set(&mut company.positioning, self.positioning);
        set(&mut company.business_model, self.business_model);
        set(&mut company.target_market, self.target_market);
        set(&mut company.price_level, self.price_level);
        set(&mut company.market_position, self.market_position);
        set(&mut company.website_system, self.website_system);
        set(&mut company.tech_stack, self.tech_stack);
        set(&mut company.website_reachable, self.website_reachable);
        set(&mut company.ssl_enabled, self.ssl_enabled);
        company.updated_at = Utc::now();
    }
}

/// SSL is inferred from the configured URL scheme, no TLS probe is made.
pub fn ssl_from_scheme(website: &str) -> bool {
    website.trim().to_lowercase().starts_with("https://")
}
