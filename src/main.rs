use std::{net::TcpListener, sync::Arc, time::Duration};

use company_intel::{
    configuration::get_configuration,
    dal::PgCompanyStore,
    services::{CompletionProvider, EnrichmentPipeline, Fetcher, Generator, OpenaiClient},
    startup::run,
};
use env_logger::Env;
use sqlx::postgres::PgPoolOptions;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().expect("Failed to read configuration.");

    let pool_options = PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(15 * 60)) // 15 minutes
        .max_lifetime(None);

    let connection_pool = pool_options.connect_lazy_with(configuration.database.with_db());
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database.");
    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(address)?;

    let provider: Option<Arc<dyn CompletionProvider>> = match configuration.api_keys.openai_key()
    {
        Some(api_key) => Some(Arc::new(OpenaiClient::new(
            api_key,
            configuration.generator.clone(),
        ))),
        None => {
            log::warn!("No OpenAI key configured, narratives use the fallback templates");
            None
        }
    };

    let fetcher = Fetcher::new(configuration.scraper.clone()).expect("Failed to build http client.");
    let store = Arc::new(PgCompanyStore::new(connection_pool));
    let pipeline = EnrichmentPipeline::new(store, fetcher, Generator::new(provider));

    run(listener, pipeline)?.await
}
