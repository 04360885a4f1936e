use company_intel::domain::{audit::AuditAction, company::Company, contact::CONTACT_NOTES};
use uuid::Uuid;

use crate::helpers::{spawn_app, ScriptedProvider};

#[tokio::test]
async fn analyze_website_without_provider_persists_fallback_enrichment() {
    let app = spawn_app(None).await;
    let company = app.add_site_company("Acme Bau");

    let response = app.post_action(company.id, "analyze-website").await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    let data = &body["data"];
    assert!(data["description"].as_str().unwrap().contains("Acme Bau"));
    assert_eq!(3, data["usp"].as_array().unwrap().len());
    assert_eq!("medium", data["priceLevel"]);
    assert_eq!("lokal", data["marketPosition"]);
    assert_eq!("WordPress", data["websiteSystem"]);
    assert_eq!("WordPress", data["techStack"]["cms"]);
    assert_eq!("nginx", data["techStack"]["hosting"]);
    assert!(data["techStack"]["tracking"]
        .as_array()
        .unwrap()
        .contains(&serde_json::json!("Google Tag Manager")));
    assert_eq!(true, data["websiteReachable"]);
    assert_eq!(false, data["sslEnabled"]);

    let contacts = app.store.contacts_for(company.id);
    assert_eq!(1, contacts.len());
    assert_eq!(Some("info@acme-bau.de"), contacts[0].email.as_deref());
    assert_eq!(Some("+49 30 1234567"), contacts[0].phone.as_deref());
    assert_eq!(CONTACT_NOTES, contacts[0].notes);
    assert!(contacts[0].linked_in.as_deref().unwrap().contains("linkedin.com"));

    let titles: Vec<String> = app
        .store
        .services_for(company.id)
        .into_iter()
        .map(|s| s.title)
        .collect();
    assert_eq!(
        vec![
            "Acme Bau GmbH",
            "Bauberatung",
            "Projektentwicklung",
            "Webdesign für Handwerker"
        ],
        titles
    );

    let audit = app.store.audit_entries_for(company.id);
    assert_eq!(1, audit.len());
    assert_eq!(AuditAction::AnalyzeWebsite, audit[0].action);
    assert!(audit[0].details.contains("CMS: WordPress"));
}

#[tokio::test]
async fn analyze_website_prefers_generated_services_and_caps_inserts() {
    let app = spawn_app(Some(ScriptedProvider::agency())).await;
    let company = app.add_site_company("Acme Bau");

    let response = app.post_action(company.id, "analyze-website").await;

    assert_eq!(200, response.status().as_u16());
    let stored = app.store.company(company.id).unwrap();
    assert_eq!(
        Some("Acme Bau plant und baut Gewerbeimmobilien."),
        stored.description.as_deref()
    );
    assert_eq!(Some("high"), stored.price_level.as_deref());
    assert_eq!(Some("national"), stored.market_position.as_deref());

    let services = app.store.services_for(company.id);
    assert_eq!(10, services.len());
    assert!(services.iter().all(|s| s.title.starts_with("Leistung")));
}

#[tokio::test]
async fn analyze_website_without_website_is_rejected() {
    let app = spawn_app(None).await;
    let company = app.add_company(Company::new("Ohne Web", Some("   ")));

    let response = app.post_action(company.id, "analyze-website").await;

    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("Website fehlt"));
    assert_eq!(Some(company.clone()), app.store.company(company.id));
    assert!(app.store.audit_entries_for(company.id).is_empty());
}

#[tokio::test]
async fn analyze_website_for_unknown_company_returns_404() {
    let app = spawn_app(None).await;

    let response = app.post_action(Uuid::new_v4(), "analyze-website").await;

    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn malformed_company_id_gets_json_envelope() {
    let app = spawn_app(None).await;

    let response = app
        .api_client
        .post(format!("{}/companies/not-a-uuid/analyze-website", app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(404, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!("Firma not-a-uuid nicht gefunden", body["error"]);
    assert!(body["details"].as_str().unwrap().contains("UUID"));
}

#[tokio::test]
async fn unreachable_website_leaves_company_untouched() {
    let app = spawn_app(None).await;
    let website = format!("{}/missing", app.site_address);
    let company = app.add_company(Company::new("Acme Bau", Some(&website)));

    let response = app.post_action(company.id, "analyze-website").await;

    assert_eq!(500, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!("Website konnte nicht abgerufen werden", body["error"]);
    assert!(body["details"].as_str().unwrap().contains("404"));
    assert_eq!(Some(company.clone()), app.store.company(company.id));
    assert!(app.store.contacts_for(company.id).is_empty());
    assert!(app.store.audit_entries_for(company.id).is_empty());
}

#[tokio::test]
async fn failed_update_is_reported_and_nothing_is_appended() {
    let app = spawn_app(None).await;
    let company = app.add_site_company("Acme Bau");
    app.store.fail_updates();

    let response = app.post_action(company.id, "analyze-website").await;

    assert_eq!(500, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!("Analyse fehlgeschlagen", body["error"]);
    assert!(body["details"]
        .as_str()
        .unwrap()
        .contains("connection to database lost"));
    assert!(app.store.contacts_for(company.id).is_empty());
    assert!(app.store.services_for(company.id).is_empty());
    assert!(app.store.audit_entries_for(company.id).is_empty());
}

#[tokio::test]
async fn repeated_analysis_appends_child_rows_again() {
    let app = spawn_app(None).await;
    let company = app.add_site_company("Acme Bau");

    for _ in 0..2 {
        let response = app.post_action(company.id, "analyze-website").await;
        assert_eq!(200, response.status().as_u16());
    }

    assert_eq!(2, app.store.contacts_for(company.id).len());
    assert_eq!(8, app.store.services_for(company.id).len());
    assert_eq!(2, app.store.audit_entries_for(company.id).len());
}
