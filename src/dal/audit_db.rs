use sqlx::{postgres::PgQueryResult, PgPool};
use uuid::Uuid;

use crate::domain::audit::AuditEntry;

pub async fn insert_audit_entry(
    pool: &PgPool,
    entry: AuditEntry,
) -> Result<PgQueryResult, sqlx::Error> {
    sqlx::query(
        r"
        insert into audit_log
            (id, entity_type, entity_id, action, details)
        values
            ($1, $2, $3, $4, $5)
        ",
    )
    .bind(Uuid::new_v4())
    .bind(entry.entity_type)
    .bind(entry.entity_id)
    .bind(entry.action.as_str())
    .bind(entry.details)
    .execute(pool)
    .await
}
