use std::collections::BTreeMap;

use itertools::Itertools;
use reqwest::{header::HeaderMap, redirect::Policy, Client, StatusCode};
use url::Url;

use crate::{configuration::ScraperSettings, domain::scraped_document::ScrapedDocument};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("'{url}' is not a valid website url: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("request to {url} timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },
    #[error("request to {url} exceeded the limit of {limit} redirects")]
    TooManyRedirects { url: String, limit: usize },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: StatusCode },
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Single-attempt page retrieval. The only component that talks to company websites.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    settings: ScraperSettings,
}

impl Fetcher {
    pub fn new(settings: ScraperSettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(settings.timeout())
            .redirect(Policy::limited(settings.max_redirects))
            .build()?;

        Ok(Fetcher { client, settings })
    }

    pub async fn fetch(&self, website: &str) -> Result<ScrapedDocument, FetchError> {
        let url = normalize_url(website)?;
        log::info!("Fetching {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.classify(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            log::error!("{} answered with status {}", url, status);
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let final_url = response.url().clone();
        let headers = collect_headers(response.headers());
        let raw_html = response.text().await.map_err(|e| self.classify(&url, e))?;

        log::info!(
            "Fetched {} ({} bytes, {} headers)",
            final_url,
            raw_html.len(),
            headers.len()
        );

        Ok(ScrapedDocument::parse(&final_url, raw_html, headers))
    }

    fn classify(&self, url: &Url, error: reqwest::Error) -> FetchError {
        log::error!("Fetching {} failed: {:?}", url, error);
        let url = url.to_string();

        match error {
            e if e.is_timeout() => FetchError::Timeout {
                url,
                seconds: self.settings.timeout_secs,
            },
            e if e.is_redirect() => FetchError::TooManyRedirects {
                url,
                limit: self.settings.max_redirects,
            },
            source => FetchError::Request { url, source },
        }
    }
}

/// Websites are often stored without a scheme; those are fetched over https.
pub fn normalize_url(website: &str) -> Result<Url, FetchError> {
    let trimmed = website.trim();
    let candidate = match trimmed.contains("://") {
        true => trimmed.to_string(),
        false => format!("https://{}", trimmed),
    };

    let url = Url::parse(&candidate).map_err(|e| FetchError::InvalidUrl {
        url: website.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FetchError::InvalidUrl {
            url: website.to_string(),
            reason: format!("unsupported scheme {}", other),
        }),
    }
}

fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .keys()
        .map(|name| {
            let value = headers
                .get_all(name)
                .iter()
                .filter_map(|v| v.to_str().ok())
                .join(", ");
            (name.as_str().to_string(), value)
        })
        .collect()
}
