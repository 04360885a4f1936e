use serde::{Deserialize, Serialize};

use super::scraped_document::ScrapedDocument;

pub const SEO_META_PRESENT: &str = "Meta-Description vorhanden";
pub const SEO_META_MISSING: &str = "Meta-Description fehlt";

/// Ordered: the first CMS whose marker appears in the page wins.
const CMS_SIGNATURES: [(&str, &[&str]); 11] = [
    ("WordPress", &["wp-content", "wp-includes"]),
    ("TYPO3", &["typo3"]),
    ("Joomla", &["joomla"]),
    ("Drupal", &["drupal"]),
    ("Contao", &["contao"]),
    ("Shopify", &["cdn.shopify.com", "shopify"]),
    ("Wix", &["wixstatic.com", "wix.com"]),
    ("Squarespace", &["squarespace"]),
    ("Jimdo", &["jimdo"]),
    ("Webflow", &["webflow"]),
    ("Shopware", &["shopware"]),
];

/// Each group contributes at most one label, so labels never repeat.
const TRACKING_SIGNATURES: [(&str, &[&str]); 7] = [
    ("Google Tag Manager", &["googletagmanager.com/gtm.js", "gtm-"]),
    ("Google Analytics", &["google-analytics.com", "gtag("]),
    ("Meta Pixel", &["connect.facebook.net", "fbq("]),
    ("LinkedIn Insight", &["snap.licdn.com", "_linkedin_partner_id"]),
    ("Hotjar", &["static.hotjar.com", "hotjar"]),
    ("Matomo", &["matomo", "piwik"]),
    ("Microsoft Clarity", &["clarity.ms"]),
];

/// Header names (lower-cased) whose presence identifies a CDN.
const CDN_HEADERS: [(&str, &str); 5] = [
    ("cf-ray", "Cloudflare"),
    ("x-amz-cf-id", "Amazon CloudFront"),
    ("x-fastly-request-id", "Fastly"),
    ("x-akamai-transformed", "Akamai"),
    ("x-vercel-id", "Vercel"),
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechStackProfile {
    pub cms: Option<String>,
    pub hosting: Option<String>,
    pub cdn: Option<String>,
    #[serde(default)]
    pub tracking: Vec<String>,
    pub seo_basics: Option<String>,
}

impl TechStackProfile {
    /// Pure function of the fetched page: same content, same profile.
    pub fn from_document(document: &ScrapedDocument) -> Self {
        let html = document.raw_html.to_lowercase();
        let headers = &document.response_headers;

        let cms = CMS_SIGNATURES
            .iter()
            .find(|(_, markers)| markers.iter().any(|m| html.contains(m)))
            .map(|(name, _)| name.to_string());

        let tracking = TRACKING_SIGNATURES
            .iter()
            .filter(|(_, markers)| markers.iter().any(|m| html.contains(m)))
            .map(|(label, _)| label.to_string())
            .collect();

        let server = headers.get("server").filter(|s| !s.is_empty()).cloned();

        let cdn = CDN_HEADERS
            .iter()
            .find(|(header, _)| headers.contains_key(*header))
            .map(|(_, name)| name.to_string())
            .or_else(|| {
                server
                    .as_deref()
                    .filter(|s| s.to_lowercase().contains("cloudflare"))
                    .map(|_| "Cloudflare".to_string())
            });

        let seo_basics = match document.meta_description {
            Some(_) => SEO_META_PRESENT,
            None => SEO_META_MISSING,
        };

        TechStackProfile {
            cms,
            hosting: server,
            cdn,
            tracking,
            seo_basics: Some(seo_basics.to_string()),
        }
    }
}
