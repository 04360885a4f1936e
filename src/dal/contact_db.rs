use sqlx::{postgres::PgQueryResult, PgPool};
use uuid::Uuid;

use crate::domain::contact::Contact;

pub async fn insert_contacts(
    pool: &PgPool,
    contacts: Vec<Contact>,
) -> Result<PgQueryResult, sqlx::Error> {
    let mut ids: Vec<Uuid> = Vec::new();
    let mut company_ids: Vec<Uuid> = Vec::new();
    let mut names: Vec<String> = Vec::new();
    let mut emails: Vec<Option<String>> = Vec::new();
    let mut phones: Vec<Option<String>> = Vec::new();
    let mut linked_ins: Vec<Option<String>> = Vec::new();
    let mut notes: Vec<String> = Vec::new();

    for c in contacts {
        ids.push(c.id);
        company_ids.push(c.company_id);
        names.push(c.name);
        emails.push(c.email);
        phones.push(c.phone);
        linked_ins.push(c.linked_in);
        notes.push(c.notes);
    }

    sqlx::query(
        r#"
        insert into contact
            (id, company_id, name, email, phone, linkedin, notes)
        select * from unnest (
            $1::uuid[],
            $2::uuid[],
            $3::text[],
            $4::text[],
            $5::text[],
            $6::text[],
            $7::text[]
        )
        "#,
    )
    .bind(&ids)
    .bind(&company_ids)
    .bind(&names)
    .bind(&emails)
    .bind(&phones)
    .bind(&linked_ins)
    .bind(&notes)
    .execute(pool)
    .await
}
