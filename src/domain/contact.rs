use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const CONTACT_NOTES: &str = "automatisch extrahiert";
const UNNAMED_CONTACT: &str = "Website-Kontakt";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactCandidate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linked_in_url: Option<String>,
}

impl ContactCandidate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.linked_in_url.is_none()
    }
}

/// Child row of a company, as stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linked_in: Option<String>,
    pub notes: String,
}

impl Contact {
    pub fn from_candidate(company_id: Uuid, candidate: ContactCandidate) -> Self {
        Contact {
            id: Uuid::new_v4(),
            company_id,
            name: candidate
                .name
                .unwrap_or_else(|| UNNAMED_CONTACT.to_string()),
            email: candidate.email,
            phone: candidate.phone,
            linked_in: candidate.linked_in_url,
            notes: CONTACT_NOTES.to_string(),
        }
    }
}
