use std::sync::Arc;

use serde::{de::DeserializeOwned, Deserialize};

use crate::domain::{
    narrative::{fill_usps, BusinessModelResult, CompanyContext, NarrativeResult},
    service::ServiceCandidate,
};

use super::CompletionProvider;

pub const MAX_PROMPT_TEXT_CHARS: usize = 7000;

/// Always a complete value: the AI result when usable, a fixed template otherwise.
pub type GuaranteedResult<T> = T;

/// Empty on any failure. Callers pick their own fallback.
pub type FallibleList<T> = Vec<T>;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DescriptionPayload {
    description: String,
    short_pitch: String,
    usp: Vec<String>,
    #[serde(default)]
    positioning: String,
}

#[derive(Deserialize)]
struct ServicesPayload {
    services: Vec<ServiceCandidate>,
}

/// Turns prompts into validated structured results. Provider or parse errors
/// never leave this type.
#[derive(Clone)]
pub struct Generator {
    provider: Option<Arc<dyn CompletionProvider>>,
}

impl Generator {
    pub fn new(provider: Option<Arc<dyn CompletionProvider>>) -> Self {
        Generator { provider }
    }

    /// `None` when no provider is configured, the call fails, the answer is not
    /// the expected JSON, or `validate` rejects it.
    pub async fn structured_completion<T, F>(&self, prompt: &str, validate: F) -> Option<T>
    where
        T: DeserializeOwned,
        F: Fn(&T) -> bool + Send,
    {
        let provider = self.provider.as_ref()?;

        let raw = match provider.complete_json(prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("Completion provider failed: {:?}", e);
                return None;
            }
        };

        let parsed: T = match serde_json::from_str(strip_code_fence(&raw)) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::warn!("Completion is not the expected JSON: {}", e);
                return None;
            }
        };

        match validate(&parsed) {
            true => Some(parsed),
            false => {
                log::warn!("Completion failed validation");
                None
            }
        }
    }

    pub async fn generate_description(
        &self,
        context: &CompanyContext,
    ) -> GuaranteedResult<NarrativeResult> {
        let prompt = format!(
            r#"Erstelle ein Unternehmensprofil für "{name}".
Branche: {industry}
Tonalität: {tone}

Liefere ein JSON-Objekt mit den Schlüsseln:
- "description": Unternehmensbeschreibung in 3 bis 5 Sätzen
- "shortPitch": ein prägnanter Satz
- "usp": Liste mit genau 3 Alleinstellungsmerkmalen
- "positioning": ein Satz zur Marktpositionierung

Website-Text:
{text}"#,
            name = context.name,
            industry = context.industry_or_default(),
            tone = context.brand_tone.as_deref().unwrap_or("professionell"),
            text = truncate_chars(&context.scraped_text, MAX_PROMPT_TEXT_CHARS),
        );

        let payload = self
            .structured_completion::<DescriptionPayload, _>(&prompt, |p| {
                !p.description.trim().is_empty() && !p.short_pitch.trim().is_empty()
            })
            .await;

        match payload {
            Some(p) => {
                let fallback_positioning = || NarrativeResult::fallback(context).positioning;
                NarrativeResult {
                    description: p.description.trim().to_string(),
                    short_pitch: p.short_pitch.trim().to_string(),
                    usp: fill_usps(p.usp),
                    positioning: match p.positioning.trim().is_empty() {
                        true => fallback_positioning(),
                        false => p.positioning.trim().to_string(),
                    },
                }
            }
            None => {
                log::info!("Using fallback narrative for {}", context.name);
                NarrativeResult::fallback(context)
            }
        }
    }

    pub async fn generate_services(
        &self,
        scraped_text: &str,
        industry: Option<&str>,
    ) -> FallibleList<ServiceCandidate> {
        let prompt = format!(
            r#"Ermittle die angebotenen Leistungen eines Unternehmens aus der Branche {industry}.
Liefere ein JSON-Objekt {{"services": [{{"category": "...", "title": "...", "description": "...", "keywords": ["..."]}}]}}
mit höchstens 10 Einträgen.

Website-Text:
{text}"#,
            industry = industry.unwrap_or("unbekannt"),
            text = truncate_chars(scraped_text, MAX_PROMPT_TEXT_CHARS),
        );

        self.structured_completion::<ServicesPayload, _>(&prompt, |_| true)
            .await
            .map(|p| {
                p.services
                    .into_iter()
                    .map(|mut s| {
                        s.title = s.title.trim().to_string();
                        s
                    })
                    .filter(ServiceCandidate::has_valid_title)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub async fn analyze_business_model(
        &self,
        context: &CompanyContext,
    ) -> GuaranteedResult<BusinessModelResult> {
        let prompt = format!(
            r#"Analysiere das Geschäftsmodell von "{name}" (Branche: {industry}).
Liefere ein JSON-Objekt mit den Schlüsseln:
- "businessModel": kurze Beschreibung des Geschäftsmodells
- "targetMarket": Zielmarkt
- "priceLevel": einer von "low", "medium", "high", "premium"
- "marketPosition": einer von "lokal", "national", "global"

Website-Text:
{text}"#,
            name = context.name,
            industry = context.industry_or_default(),
            text = truncate_chars(&context.scraped_text, MAX_PROMPT_TEXT_CHARS),
        );

        self.structured_completion::<BusinessModelResult, _>(&prompt, |r| {
            !r.business_model.trim().is_empty() && !r.target_market.trim().is_empty()
        })
        .await
        .unwrap_or_else(|| {
            log::info!("Using fallback business model for {}", context.name);
            BusinessModelResult::fallback()
        })
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Some models wrap JSON in a markdown fence even when asked not to.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => rest
            .trim_start_matches("json")
            .trim_end()
            .trim_end_matches("```")
            .trim(),
        None => trimmed,
    }
}
