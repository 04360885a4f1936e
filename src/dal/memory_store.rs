use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, MutexGuard,
    },
};

use anyhow::{anyhow, bail};
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    audit::AuditEntry,
    company::{Company, CompanyUpdate},
    contact::Contact,
    service::Service,
};

use super::CompanyStore;

#[derive(Default)]
struct State {
    companies: HashMap<Uuid, Company>,
    contacts: Vec<Contact>,
    services: Vec<Service>,
    audit_log: Vec<AuditEntry>,
}

/// Process-local store with the same append semantics as the Postgres one.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
    fail_updates: AtomicBool,
}

impl InMemoryStore {
    pub fn insert_company(&self, company: Company) -> anyhow::Result<()> {
        self.lock()?.companies.insert(company.id, company);
        Ok(())
    }

    /// Makes every following `update_company` call fail, as a broken database would.
    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }

    pub fn company(&self, id: Uuid) -> Option<Company> {
        self.lock().ok()?.companies.get(&id).cloned()
    }

    pub fn contacts_for(&self, company_id: Uuid) -> Vec<Contact> {
        self.lock()
            .map(|s| {
                s.contacts
                    .iter()
                    .filter(|c| c.company_id == company_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn services_for(&self, company_id: Uuid) -> Vec<Service> {
        self.lock()
            .map(|s| {
                s.services
                    .iter()
                    .filter(|c| c.company_id == company_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn audit_entries_for(&self, company_id: Uuid) -> Vec<AuditEntry> {
        self.lock()
            .map(|s| {
                s.audit_log
                    .iter()
                    .filter(|e| e.entity_id == company_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn lock(&self) -> anyhow::Result<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| anyhow!("in-memory store lock poisoned"))
    }
}

#[async_trait]
impl CompanyStore for InMemoryStore {
    async fn get_company(&self, id: Uuid) -> anyhow::Result<Option<Company>> {
        Ok(self.lock()?.companies.get(&id).cloned())
    }

    async fn update_company(&self, id: Uuid, update: CompanyUpdate) -> anyhow::Result<Company> {
        if self.fail_updates.load(Ordering::SeqCst) {
            bail!("connection to database lost");
        }

        let mut state = self.lock()?;
        let company = state
            .companies
            .get_mut(&id)
            .ok_or_else(|| anyhow!("no company with id {}", id))?;
        if !update.is_empty() {
            update.apply(company);
        }

        Ok(company.clone())
    }

    async fn insert_contacts(&self, contacts: Vec<Contact>) -> anyhow::Result<()> {
        self.lock()?.contacts.extend(contacts);
        Ok(())
    }

    async fn insert_services(&self, services: Vec<Service>) -> anyhow::Result<()> {
        self.lock()?.services.extend(services);
        Ok(())
    }

    async fn insert_audit_entry(&self, entry: AuditEntry) -> anyhow::Result<()> {
        self.lock()?.audit_log.push(entry);
        Ok(())
    }
}
