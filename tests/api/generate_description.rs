use std::sync::Arc;

use async_trait::async_trait;
use company_intel::{domain::audit::AuditAction, services::CompletionProvider};

use crate::helpers::{spawn_app, ScriptedProvider};

struct BrokenProvider;

#[async_trait]
impl CompletionProvider for BrokenProvider {
    async fn complete_json(&self, _prompt: &str) -> anyhow::Result<String> {
        anyhow::bail!("rate limited")
    }
}

fn actions(entries: Vec<company_intel::domain::audit::AuditEntry>) -> Vec<AuditAction> {
    entries.into_iter().map(|e| e.action).collect()
}

#[tokio::test]
async fn generate_description_without_provider_uses_template() {
    let app = spawn_app(None).await;
    let company = app.add_site_company("Acme Bau");

    let response = app.post_action(company.id, "generate-description").await;

    assert_eq!(200, response.status().as_u16());
    let stored = app.store.company(company.id).unwrap();
    assert!(stored.description.unwrap().contains("Acme Bau"));
    assert_eq!(3, stored.usp.unwrap().len());
    assert!(stored.tech_stack.is_none());
    assert!(app.store.contacts_for(company.id).is_empty());
    // No services can be generated, so the rule stays silent.
    assert!(app.store.services_for(company.id).is_empty());
    assert_eq!(
        vec![AuditAction::GenerateDescription],
        actions(app.store.audit_entries_for(company.id))
    );
}

#[tokio::test]
async fn changed_description_fires_services_rule_once() {
    let app = spawn_app(Some(ScriptedProvider::agency())).await;
    let company = app.add_site_company("Acme Bau");

    let response = app.post_action(company.id, "generate-description").await;
    assert_eq!(200, response.status().as_u16());

    assert_eq!(10, app.store.services_for(company.id).len());
    let audit = app.store.audit_entries_for(company.id);
    assert_eq!(
        vec![
            AuditAction::GenerateDescription,
            AuditAction::AutomationRuleFired
        ],
        actions(audit.clone())
    );
    assert!(audit[1].details.contains("10 Leistungen"));

    // Same answer again: the description is unchanged and the rule does not fire.
    let response = app.post_action(company.id, "generate-description").await;
    assert_eq!(200, response.status().as_u16());

    assert_eq!(10, app.store.services_for(company.id).len());
    assert_eq!(
        vec![
            AuditAction::GenerateDescription,
            AuditAction::AutomationRuleFired,
            AuditAction::GenerateDescription
        ],
        actions(app.store.audit_entries_for(company.id))
    );
}

#[tokio::test]
async fn provider_failures_never_fail_the_request() {
    let provider: Arc<dyn CompletionProvider> = Arc::new(BrokenProvider);
    let app = spawn_app(Some(provider)).await;
    let company = app.add_site_company("Acme Bau");

    let response = app.post_action(company.id, "generate-description").await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["data"]["description"]
        .as_str()
        .unwrap()
        .contains("Acme Bau"));
    assert_eq!("medium", body["data"]["priceLevel"]);
    assert!(app.store.services_for(company.id).is_empty());
}
