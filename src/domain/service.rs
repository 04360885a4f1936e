use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_default_from_null;
use uuid::Uuid;

pub const MIN_TITLE_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCandidate {
    pub category: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub keywords: Vec<String>,
}

impl ServiceCandidate {
    pub fn has_valid_title(&self) -> bool {
        self.title.trim().chars().count() >= MIN_TITLE_LEN
    }
}

/// Child row of a company, as stored. `keywords` is serialized to a JSON array
/// by the store; `relevance_score` is left for later scoring and never set here.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: Uuid,
    pub company_id: Uuid,
    pub category: String,
    pub title: String,
    pub description: Option<String>,
    pub keywords: Vec<String>,
    pub relevance_score: Option<f64>,
}

impl Service {
    pub fn from_candidate(company_id: Uuid, candidate: ServiceCandidate) -> Self {
        Service {
            id: Uuid::new_v4(),
            company_id,
            category: candidate.category,
            title: candidate.title,
            description: candidate.description,
            keywords: candidate.keywords,
            relevance_score: None,
        }
    }
}
