use std::{net::TcpListener, sync::Arc, time::Duration};

use actix_web::{
    http::header::{LOCATION, USER_AGENT},
    web, App, HttpRequest, HttpResponse, HttpServer,
};
use async_trait::async_trait;
use company_intel::{
    configuration::ScraperSettings,
    dal::InMemoryStore,
    domain::company::Company,
    services::{CompletionProvider, EnrichmentPipeline, Fetcher, Generator},
    startup::run,
};
use uuid::Uuid;

pub const SITE_HTML: &str = r#"
<html>
  <head>
    <title>Acme Bau</title>
    <link rel="stylesheet" href="/wp-content/themes/acme/style.css">
    <script src="https://www.googletagmanager.com/gtm.js?id=GTM-XYZ"></script>
  </head>
  <body>
    <h1>Acme Bau GmbH</h1>
    <h2>Ab</h2>
    <h2>Bauberatung</h2>
    <h2>Projektentwicklung</h2>
    <h3>Webdesign für Handwerker</h3>
    <p>Kontakt: info@acme-bau.de, Telefon +49 30 1234567</p>
    <a href="https://www.linkedin.com/company/acme-bau">LinkedIn</a>
  </body>
</html>
"#;

pub const PLAIN_SITE_HTML: &str =
    "<html><head><title>Schlicht</title></head><body><h1>Hallo Welt</h1></body></html>";

struct SitePage(String);

async fn index(page: web::Data<SitePage>) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header(("server", "nginx"))
        .content_type("text/html; charset=utf-8")
        .body(page.0.clone())
}

async fn slow() -> HttpResponse {
    actix_web::rt::time::sleep(Duration::from_secs(5)).await;
    HttpResponse::Ok().body("zu spät")
}

async fn hop(path: web::Path<u32>) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((LOCATION, format!("/hop/{}", path.into_inner() + 1)))
        .finish()
}

async fn echo_user_agent(req: HttpRequest) -> HttpResponse {
    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(format!("<html><body><p>{}</p></body></html>", user_agent))
}

/// Serves `html` on `/` plus a few misbehaving routes. Returns the base url.
pub fn spawn_site(html: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let page = web::Data::new(SitePage(html.to_string()));

    let server = HttpServer::new(move || {
        App::new()
            .app_data(page.clone())
            .route("/", web::get().to(index))
            .route("/slow", web::get().to(slow))
            .route("/hop/{n}", web::get().to(hop))
            .route("/user-agent", web::get().to(echo_user_agent))
    })
    .workers(1)
    .listen(listener)
    .expect("Failed to listen on fake site")
    .run();
    let _ = tokio::spawn(server);

    format!("http://127.0.0.1:{}", port)
}

pub fn test_fetcher(timeout_secs: u64) -> Fetcher {
    Fetcher::new(ScraperSettings {
        timeout_secs,
        ..Default::default()
    })
    .expect("Failed to build fetcher")
}

/// Answers every prompt kind with a fixed JSON document.
pub struct ScriptedProvider {
    pub description: String,
    pub business_model: String,
    pub services: String,
}

impl ScriptedProvider {
    pub fn agency() -> Arc<Self> {
        let services: Vec<String> = (1..=12)
            .map(|i| {
                format!(
                    r#"{{"category": "Bau", "title": "Leistung {}", "description": "Beschreibung {}", "keywords": ["bau"]}}"#,
                    i, i
                )
            })
            .collect();

        Arc::new(ScriptedProvider {
            description: r#"{
                "description": "Acme Bau plant und baut Gewerbeimmobilien.",
                "shortPitch": "Bauen mit Plan.",
                "usp": ["Festpreise", "Eigene Handwerker", "Termintreue"],
                "positioning": "Regionaler Generalunternehmer."
            }"#
            .to_string(),
            business_model: r#"{
                "businessModel": "Generalunternehmer",
                "targetMarket": "Gewerbliche Bauherren",
                "priceLevel": "high",
                "marketPosition": "national"
            }"#
            .to_string(),
            services: format!(r#"{{"services": [{}]}}"#, services.join(",")),
        })
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete_json(&self, prompt: &str) -> anyhow::Result<String> {
        let answer = if prompt.contains("\"shortPitch\"") {
            &self.description
        } else if prompt.contains("\"businessModel\"") {
            &self.business_model
        } else {
            &self.services
        };
        Ok(answer.clone())
    }
}

pub struct TestApp {
    pub address: String,
    pub site_address: String,
    pub store: Arc<InMemoryStore>,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub fn add_company(&self, company: Company) -> Company {
        self.store
            .insert_company(company.clone())
            .expect("Failed to store company");
        company
    }

    /// A company whose website is the fake site.
    pub fn add_site_company(&self, name: &str) -> Company {
        self.add_company(Company::new(name, Some(&self.site_address)))
    }

    pub async fn post_action(&self, company_id: Uuid, action: &str) -> reqwest::Response {
        self.api_client
            .post(format!(
                "{}/companies/{}/{}",
                self.address, company_id, action
            ))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

pub async fn spawn_app(provider: Option<Arc<dyn CompletionProvider>>) -> TestApp {
    spawn_app_with_site(SITE_HTML, provider).await
}

pub async fn spawn_app_with_site(
    html: &str,
    provider: Option<Arc<dyn CompletionProvider>>,
) -> TestApp {
    let _ = env_logger::builder().is_test(true).try_init();

    let site_address = spawn_site(html);
    let store = Arc::new(InMemoryStore::default());
    let pipeline = EnrichmentPipeline::new(store.clone(), test_fetcher(2), Generator::new(provider));

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let server = run(listener, pipeline).expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        site_address,
        store,
        api_client: reqwest::Client::new(),
    }
}
