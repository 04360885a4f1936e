use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::service::Service;

pub async fn insert_services(pool: &PgPool, services: Vec<Service>) -> anyhow::Result<u64> {
    let mut ids: Vec<Uuid> = Vec::new();
    let mut company_ids: Vec<Uuid> = Vec::new();
    let mut categories: Vec<String> = Vec::new();
    let mut titles: Vec<String> = Vec::new();
    let mut descriptions: Vec<Option<String>> = Vec::new();
    let mut keywords: Vec<String> = Vec::new();

    for s in services {
        ids.push(s.id);
        company_ids.push(s.company_id);
        categories.push(s.category);
        titles.push(s.title);
        descriptions.push(s.description);
        keywords.push(serde_json::to_string(&s.keywords)?);
    }

    // relevance_score stays null until something scores the service
    let result = sqlx::query(
        r#"
        insert into service
            (id, company_id, category, title, description, keywords)
        select * from unnest (
            $1::uuid[],
            $2::uuid[],
            $3::text[],
            $4::text[],
            $5::text[],
            $6::text[]
        )
        "#,
    )
    .bind(&ids)
    .bind(&company_ids)
    .bind(&categories)
    .bind(&titles)
    .bind(&descriptions)
    .bind(&keywords)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
