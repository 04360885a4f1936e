use anyhow::{anyhow, Context};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{
    company::{Company, CompanyUpdate},
    tech_stack::TechStackProfile,
};

#[derive(sqlx::FromRow)]
struct CompanyRow {
    id: Uuid,
    name: String,
    website: Option<String>,
    industry: Option<String>,
    brand_tone: Option<String>,
    description: Option<String>,
    short_pitch: Option<String>,
    usp: Option<String>,
    positioning: Option<String>,
    business_model: Option<String>,
    target_market: Option<String>,
    price_level: Option<String>,
    market_position: Option<String>,
    website_system: Option<String>,
    tech_stack: Option<String>,
    website_reachable: Option<bool>,
    ssl_enabled: Option<bool>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CompanyRow> for Company {
    type Error = anyhow::Error;

    fn try_from(row: CompanyRow) -> Result<Self, Self::Error> {
        let usp = row
            .usp
            .map(|u| serde_json::from_str::<Vec<String>>(&u))
            .transpose()
            .context("usp column is not a JSON string array")?;
        let tech_stack = row
            .tech_stack
            .map(|t| serde_json::from_str::<TechStackProfile>(&t))
            .transpose()
            .context("tech_stack column is not a tech stack profile")?;

        Ok(Company {
            id: row.id,
            name: row.name,
            website: row.website,
            industry: row.industry,
            brand_tone: row.brand_tone,
            description: row.description,
            short_pitch: row.short_pitch,
            usp,
            positioning: row.positioning,
            business_model: row.business_model,
            target_market: row.target_market,
            price_level: row.price_level,
            market_position: row.market_position,
            website_system: row.website_system,
            tech_stack,
            website_reachable: row.website_reachable,
            ssl_enabled: row.ssl_enabled,
            updated_at: row.updated_at,
        })
    }
}

pub async fn get_company(pool: &PgPool, id: Uuid) -> anyhow::Result<Option<Company>> {
    let row = sqlx::query_as::<_, CompanyRow>(
        r"
        select
            id, name, website, industry, brand_tone,
            description, short_pitch, usp, positioning,
            business_model, target_market, price_level, market_position,
            website_system, tech_stack, website_reachable, ssl_enabled,
            updated_at
        from
            company
        where
            id = $1
        ",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(Company::try_from).transpose()
}

pub async fn update_company(
    pool: &PgPool,
    id: Uuid,
    update: CompanyUpdate,
) -> anyhow::Result<Company> {
    if update.is_empty() {
        return get_company(pool, id)
            .await?
            .ok_or_else(|| anyhow!("no company with id {}", id));
    }

    let usp = update.usp.as_ref().map(serde_json::to_string).transpose()?;
    let tech_stack = update
        .tech_stack
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    let row = sqlx::query_as::<_, CompanyRow>(
        r"
        update company set
            description = coalesce($2, description),
            short_pitch = coalesce($3, short_pitch),
            usp = coalesce($4, usp),
            positioning = coalesce($5, positioning),
            business_model = coalesce($6, business_model),
            target_market = coalesce($7, target_market),
            price_level = coalesce($8, price_level),
            market_position = coalesce($9, market_position),
            website_system = coalesce($10, website_system),
            tech_stack = coalesce($11, tech_stack),
            website_reachable = coalesce($12, website_reachable),
            ssl_enabled = coalesce($13, ssl_enabled),
            updated_at = now()
        where
            id = $1
        returning
            id, name, website, industry, brand_tone,
            description, short_pitch, usp, positioning,
            business_model, target_market, price_level, market_position,
            website_system, tech_stack, website_reachable, ssl_enabled,
            updated_at
        ",
    )
    .bind(id)
    .bind(update.description)
    .bind(update.short_pitch)
    .bind(usp)
    .bind(update.positioning)
    .bind(update.business_model)
    .bind(update.target_market)
    .bind(update.price_level)
    .bind(update.market_position)
    .bind(update.website_system)
    .bind(tech_stack)
    .bind(update.website_reachable)
    .bind(update.ssl_enabled)
    .fetch_one(pool)
    .await
    .with_context(|| format!("Failed to update company {}", id))?;

    Company::try_from(row)
}
