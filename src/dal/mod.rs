pub mod audit_db;
pub mod company_db;
pub mod contact_db;
pub mod memory_store;
pub mod pg_store;
pub mod service_db;

pub use memory_store::InMemoryStore;
pub use pg_store::PgCompanyStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    audit::AuditEntry,
    company::{Company, CompanyUpdate},
    contact::Contact,
    service::Service,
};

/// Everything the enrichment pipeline needs from the relational store.
#[async_trait]
pub trait CompanyStore: Send + Sync {
    async fn get_company(&self, id: Uuid) -> anyhow::Result<Option<Company>>;

    /// All field changes of one pipeline run in a single statement.
    async fn update_company(&self, id: Uuid, update: CompanyUpdate) -> anyhow::Result<Company>;

    /// Appends unconditionally. Re-running a pipeline duplicates rows.
    async fn insert_contacts(&self, contacts: Vec<Contact>) -> anyhow::Result<()>;

    /// Appends unconditionally. Re-running a pipeline duplicates rows.
    async fn insert_services(&self, services: Vec<Service>) -> anyhow::Result<()>;

    async fn insert_audit_entry(&self, entry: AuditEntry) -> anyhow::Result<()>;
}
