use company_intel::services::{FetchError, TechStackDetector};

use crate::helpers::{spawn_site, test_fetcher, SITE_HTML};

#[tokio::test]
async fn fetch_parses_page_and_keeps_headers() {
    let site = spawn_site(SITE_HTML);

    let document = test_fetcher(2).fetch(&site).await.unwrap();

    assert_eq!(Some("Acme Bau"), document.title.as_deref());
    assert_eq!(
        Some("nginx"),
        document.response_headers.get("server").map(String::as_str)
    );
    assert!(document.plain_text.contains("info@acme-bau.de"));
    assert!(!document.plain_text.contains("googletagmanager"));
    assert!(document
        .outbound_links
        .iter()
        .any(|l| l.contains("linkedin.com")));
}

#[tokio::test]
async fn fetch_sends_identifying_user_agent() {
    let site = spawn_site(SITE_HTML);

    let document = test_fetcher(2)
        .fetch(&format!("{}/user-agent", site))
        .await
        .unwrap();

    assert!(document.plain_text.contains("company-intel"));
}

#[tokio::test]
async fn redirect_loop_is_cut_off() {
    let site = spawn_site(SITE_HTML);

    let result = test_fetcher(2).fetch(&format!("{}/hop/0", site)).await;

    assert!(matches!(result, Err(FetchError::TooManyRedirects { .. })));
}

#[tokio::test]
async fn slow_site_times_out() {
    let site = spawn_site(SITE_HTML);

    let result = test_fetcher(1).fetch(&format!("{}/slow", site)).await;

    assert!(matches!(result, Err(FetchError::Timeout { seconds: 1, .. })));
}

#[tokio::test]
async fn error_status_is_a_failure() {
    let site = spawn_site(SITE_HTML);

    let result = test_fetcher(2).fetch(&format!("{}/missing", site)).await;

    match result {
        Err(FetchError::Status { status, .. }) => assert_eq!(404, status.as_u16()),
        other => panic!("expected a status error, got {:?}", other.map(|d| d.source_url)),
    }
}

#[tokio::test]
async fn detection_is_stable_across_fetches() {
    let site = spawn_site(SITE_HTML);
    let detector = TechStackDetector::new(test_fetcher(2));

    let first = detector.detect(&site).await.unwrap();
    let second = detector.detect(&site).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(Some("WordPress"), first.cms.as_deref());
}
