//! The four enrichment pipelines over one company record.
//!
//! Every run loads the company, checks it has a website, computes fields
//! sequentially, writes them with one update call, appends child rows and
//! finishes with an audit entry. Child inserts happen after the update and are
//! not covered by its atomicity: a crash in between leaves the company updated
//! without children.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    dal::CompanyStore,
    domain::{
        audit::{AuditAction, AuditEntry},
        company::{ssl_from_scheme, Company, CompanyUpdate},
        contact::{Contact, ContactCandidate},
        extractor::{extract_contacts, extract_services},
        narrative::CompanyContext,
        scraped_document::ScrapedDocument,
        service::{Service, ServiceCandidate},
    },
};

use super::{FetchError, Fetcher, Generator, TechStackDetector};

pub const MAX_CONTACT_INSERTS: usize = 5;
pub const MAX_SERVICE_INSERTS: usize = 10;

const DESCRIPTION_RULE: &str = "Leistungen bei Beschreibungsänderung";

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Firma {0} nicht gefunden")]
    NotFound(Uuid),
    #[error("Website fehlt. Bitte zuerst eine Website für die Firma hinterlegen.")]
    MissingPrecondition,
    #[error("Website konnte nicht abgerufen werden")]
    Fetch(#[from] FetchError),
    #[error("Analyse fehlgeschlagen")]
    Store(#[source] anyhow::Error),
}

pub struct EnrichmentPipeline {
    store: Arc<dyn CompanyStore>,
    fetcher: Fetcher,
    detector: TechStackDetector,
    generator: Generator,
}

impl EnrichmentPipeline {
    pub fn new(store: Arc<dyn CompanyStore>, fetcher: Fetcher, generator: Generator) -> Self {
        EnrichmentPipeline {
            store,
            detector: TechStackDetector::new(fetcher.clone()),
            fetcher,
            generator,
        }
    }

    /// Fetch, extract, detect, generate and persist everything.
    pub async fn analyze_website(&self, company_id: Uuid) -> Result<Company, PipelineError> {
        let (company, website) = self.load(company_id).await?;
        log::info!("Analyzing website {} of company {}", website, company_id);

        let document = self.fetcher.fetch(&website).await?;
        let contacts = extract_contacts(&document.raw_html);
        let heuristic_services = extract_services(&document.raw_html);
        let profile = self.detector.profile(&document);

        let context = company_context(&company, &document);
        let narrative = self.generator.generate_description(&context).await;
        let business_model = self.generator.analyze_business_model(&context).await;
        let ai_services = self
            .generator
            .generate_services(&document.plain_text, company.industry.as_deref())
            .await;
        let services = prefer_ai_services(ai_services, heuristic_services);

        let cms = profile.cms.clone();
        let update = CompanyUpdate {
            website_reachable: Some(true),
            ssl_enabled: Some(ssl_from_scheme(&website)),
            ..Default::default()
        }
        .with_narrative(narrative)
        .with_business_model(business_model)
        .with_tech_stack(profile);

        let updated = self.update(company_id, update).await?;
        let contact_count = self.insert_contacts(company_id, contacts).await?;
        let service_count = self.insert_services(company_id, services).await?;

        self.audit(AuditEntry::company(
            company_id,
            AuditAction::AnalyzeWebsite,
            format!(
                "Website analysiert: {} Kontakte, {} Leistungen, CMS: {}",
                contact_count,
                service_count,
                cms.as_deref().unwrap_or("unbekannt")
            ),
        ))
        .await?;

        Ok(updated)
    }

    /// Re-detect the tech stack only.
    pub async fn detect_tech(&self, company_id: Uuid) -> Result<Company, PipelineError> {
        let (_, website) = self.load(company_id).await?;
        log::info!("Detecting tech stack of {} for company {}", website, company_id);

        let profile = self.detector.detect(&website).await?;
        let summary = format!(
            "Technik erkannt: CMS {}, Hosting {}, {} Tracking-Dienste",
            profile.cms.as_deref().unwrap_or("unbekannt"),
            profile.hosting.as_deref().unwrap_or("unbekannt"),
            profile.tracking.len()
        );

        let update = CompanyUpdate {
            website_reachable: Some(true),
            ..Default::default()
        }
        .with_tech_stack(profile);
        let updated = self.update(company_id, update).await?;

        self.audit(AuditEntry::company(
            company_id,
            AuditAction::DetectTech,
            summary,
        ))
        .await?;

        Ok(updated)
    }

    /// Append services only. The update call carries no field changes and
    /// only re-reads the company.
    pub async fn extract_services(&self, company_id: Uuid) -> Result<Company, PipelineError> {
        let (company, website) = self.load(company_id).await?;
        log::info!("Extracting services from {} for company {}", website, company_id);

        let document = self.fetcher.fetch(&website).await?;
        let ai_services = self
            .generator
            .generate_services(&document.plain_text, company.industry.as_deref())
            .await;
        let services = match ai_services.is_empty() {
            true => extract_services(&document.raw_html),
            false => ai_services,
        };

        let current = self.update(company_id, CompanyUpdate::default()).await?;
        let service_count = self.insert_services(company_id, services).await?;
        self.audit(AuditEntry::company(
            company_id,
            AuditAction::ExtractServices,
            format!("{} Leistungen extrahiert", service_count),
        ))
        .await?;

        Ok(current)
    }

    /// Regenerate narrative and business model. A changed description fires
    /// the services rule.
    pub async fn generate_description(&self, company_id: Uuid) -> Result<Company, PipelineError> {
        let (company, website) = self.load(company_id).await?;
        log::info!("Generating description for company {}", company_id);

        let document = self.fetcher.fetch(&website).await?;
        let context = company_context(&company, &document);
        let narrative = self.generator.generate_description(&context).await;
        let business_model = self.generator.analyze_business_model(&context).await;

        let description_changed =
            company.description.as_deref() != Some(narrative.description.as_str());

        let update = CompanyUpdate::default()
            .with_narrative(narrative)
            .with_business_model(business_model);
        let updated = self.update(company_id, update).await?;

        self.audit(AuditEntry::company(
            company_id,
            AuditAction::GenerateDescription,
            match description_changed {
                true => "Beschreibung neu generiert",
                false => "Beschreibung unverändert",
            },
        ))
        .await?;

        if description_changed {
            self.run_services_rule(&company, &document).await?;
        }

        Ok(updated)
    }

    async fn run_services_rule(
        &self,
        company: &Company,
        document: &ScrapedDocument,
    ) -> Result<(), PipelineError> {
        let services = self
            .generator
            .generate_services(&document.plain_text, company.industry.as_deref())
            .await;

        if services.is_empty() {
            log::info!("Rule '{}' not fired: no services generated", DESCRIPTION_RULE);
            return Ok(());
        }

        let service_count = self.insert_services(company.id, services).await?;
        self.audit(AuditEntry::company(
            company.id,
            AuditAction::AutomationRuleFired,
            format!(
                "Regel '{}' ausgelöst: {} Leistungen angelegt",
                DESCRIPTION_RULE, service_count
            ),
        ))
        .await
    }

    async fn load(&self, company_id: Uuid) -> Result<(Company, String), PipelineError> {
        let company = self
            .store
            .get_company(company_id)
            .await
            .map_err(PipelineError::Store)?
            .ok_or(PipelineError::NotFound(company_id))?;

        let website = company
            .website_url()
            .map(str::to_string)
            .ok_or(PipelineError::MissingPrecondition)?;

        Ok((company, website))
    }

    async fn update(
        &self,
        company_id: Uuid,
        update: CompanyUpdate,
    ) -> Result<Company, PipelineError> {
        self.store
            .update_company(company_id, update)
            .await
            .map_err(|e| {
                log::error!("Failed to update company {}: {:?}", company_id, e);
                PipelineError::Store(e)
            })
    }

    async fn insert_contacts(
        &self,
        company_id: Uuid,
        candidates: Vec<ContactCandidate>,
    ) -> Result<usize, PipelineError> {
        let contacts: Vec<Contact> = candidates
            .into_iter()
            .take(MAX_CONTACT_INSERTS)
            .map(|c| Contact::from_candidate(company_id, c))
            .collect();
        let count = contacts.len();

        if count > 0 {
            self.store
                .insert_contacts(contacts)
                .await
                .map_err(PipelineError::Store)?;
        }

        Ok(count)
    }

    async fn insert_services(
        &self,
        company_id: Uuid,
        candidates: Vec<ServiceCandidate>,
    ) -> Result<usize, PipelineError> {
        let services: Vec<Service> = candidates
            .into_iter()
            .take(MAX_SERVICE_INSERTS)
            .map(|s| Service::from_candidate(company_id, s))
            .collect();
        let count = services.len();

        if count > 0 {
            self.store
                .insert_services(services)
                .await
                .map_err(PipelineError::Store)?;
        }

        Ok(count)
    }

    async fn audit(&self, entry: AuditEntry) -> Result<(), PipelineError> {
        log::info!("{} {}: {}", entry.action.as_str(), entry.entity_id, entry.details);
        self.store
            .insert_audit_entry(entry)
            .await
            .map_err(PipelineError::Store)
    }
}

fn company_context(company: &Company, document: &ScrapedDocument) -> CompanyContext {
    CompanyContext {
        name: company.name.clone(),
        industry: company.industry.clone(),
        brand_tone: company.brand_tone.clone(),
        scraped_text: document.plain_text.clone(),
    }
}

/// One list wins wholesale. The lists are never merged.
fn prefer_ai_services(
    ai_services: Vec<ServiceCandidate>,
    heuristic_services: Vec<ServiceCandidate>,
) -> Vec<ServiceCandidate> {
    match ai_services.is_empty() {
        true => {
            log::info!("Using {} heuristic services", heuristic_services.len());
            heuristic_services
        }
        false => {
            log::info!("Using {} generated services", ai_services.len());
            ai_services
        }
    }
}
