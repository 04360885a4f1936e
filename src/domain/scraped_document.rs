use std::collections::BTreeMap;

use itertools::Itertools;
use scraper::{Html, Selector};
use serde::Serialize;
use url::Url;

const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// One fetched page. Never persisted as a whole, only what is derived from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedDocument {
    pub source_url: String,
    pub raw_html: String,
    pub plain_text: String,
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub outbound_links: Vec<String>,
    pub meta_tags: BTreeMap<String, String>,
    /// Lower-cased header names, multi-valued headers joined with ", ".
    pub response_headers: BTreeMap<String, String>,
}

impl ScrapedDocument {
    pub fn parse(
        source_url: &Url,
        raw_html: String,
        response_headers: BTreeMap<String, String>,
    ) -> Self {
        let document = Html::parse_document(&raw_html);

        let title_selector = Selector::parse("title").unwrap();
        let title = document
            .select(&title_selector)
            .next()
            .map(|t| collapse_whitespace(&t.text().collect::<String>()))
            .filter(|t| !t.is_empty());

        let meta_tags = extract_meta_tags(&document);
        let meta_description = meta_tags
            .get("description")
            .filter(|d| !d.is_empty())
            .cloned();

        ScrapedDocument {
            source_url: source_url.to_string(),
            plain_text: visible_text(&document),
            title,
            meta_description,
            outbound_links: extract_links(&document, source_url),
            meta_tags,
            response_headers,
            raw_html,
        }
    }
}

/// Body text without script/style content, whitespace collapsed to single spaces.
pub fn visible_text(document: &Html) -> String {
    let body_selector = Selector::parse("body").unwrap();
    let root = document
        .select(&body_selector)
        .next()
        .unwrap_or_else(|| document.root_element());

    let fragments: Vec<&str> = root
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|e| HIDDEN_ELEMENTS.contains(&e.name()))
            });
            (!hidden).then_some(&**text)
        })
        .collect();

    collapse_whitespace(&fragments.join(" "))
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().join(" ")
}

fn extract_meta_tags(document: &Html) -> BTreeMap<String, String> {
    let meta_selector = Selector::parse("meta").unwrap();
    let mut tags = BTreeMap::new();

    for meta in document.select(&meta_selector) {
        let element = meta.value();
        let key = element.attr("name").or_else(|| element.attr("property"));
        let (Some(key), Some(content)) = (key, element.attr("content")) else {
            continue;
        };
        tags.entry(key.trim().to_lowercase())
            .or_insert_with(|| content.trim().to_string());
    }

    tags
}

fn extract_links(document: &Html, base: &Url) -> Vec<String> {
    let a_tag_selector = Selector::parse("a[href]").unwrap();

    document
        .select(&a_tag_selector)
        .filter_map(|tag| tag.value().attr("href"))
        .filter_map(|href| base.join(href.trim()).ok())
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .map(|url| url.to_string())
        .unique()
        .collect()
}
