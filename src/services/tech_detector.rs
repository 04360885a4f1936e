use crate::domain::{scraped_document::ScrapedDocument, tech_stack::TechStackProfile};

use super::{FetchError, Fetcher};

#[derive(Clone)]
pub struct TechStackDetector {
    fetcher: Fetcher,
}

impl TechStackDetector {
    pub fn new(fetcher: Fetcher) -> Self {
        TechStackDetector { fetcher }
    }

    /// Fetches the page and classifies it. Fails only when fetching fails.
    pub async fn detect(&self, website: &str) -> Result<TechStackProfile, FetchError> {
        let document = self.fetcher.fetch(website).await?;
        Ok(self.profile(&document))
    }

    pub fn profile(&self, document: &ScrapedDocument) -> TechStackProfile {
        let profile = TechStackProfile::from_document(document);

        log::info!(
            "Tech stack for {}: cms={:?} hosting={:?} cdn={:?} tracking={:?}",
            document.source_url,
            profile.cms,
            profile.hosting,
            profile.cdn,
            profile.tracking
        );

        profile
    }
}
