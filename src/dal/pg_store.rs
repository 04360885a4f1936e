use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{
    audit::AuditEntry,
    company::{Company, CompanyUpdate},
    contact::Contact,
    service::Service,
};

use super::{audit_db, company_db, contact_db, service_db, CompanyStore};

pub struct PgCompanyStore {
    pool: PgPool,
}

impl PgCompanyStore {
    pub fn new(pool: PgPool) -> Self {
        PgCompanyStore { pool }
    }
}

#[async_trait]
impl CompanyStore for PgCompanyStore {
    async fn get_company(&self, id: Uuid) -> anyhow::Result<Option<Company>> {
        company_db::get_company(&self.pool, id).await
    }

    async fn update_company(&self, id: Uuid, update: CompanyUpdate) -> anyhow::Result<Company> {
        company_db::update_company(&self.pool, id, update).await
    }

    async fn insert_contacts(&self, contacts: Vec<Contact>) -> anyhow::Result<()> {
        let result = contact_db::insert_contacts(&self.pool, contacts).await?;
        log::info!("Inserted {} contacts", result.rows_affected());
        Ok(())
    }

    async fn insert_services(&self, services: Vec<Service>) -> anyhow::Result<()> {
        let inserted = service_db::insert_services(&self.pool, services).await?;
        log::info!("Inserted {} services", inserted);
        Ok(())
    }

    async fn insert_audit_entry(&self, entry: AuditEntry) -> anyhow::Result<()> {
        if let Err(e) = audit_db::insert_audit_entry(&self.pool, entry).await {
            log::error!("Error inserting audit entry: {:?}", e);
            return Err(e.into());
        }
        Ok(())
    }
}
