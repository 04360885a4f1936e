//! Heuristic extraction of contacts and service offerings from raw HTML.
//!
//! Everything here is pure and total: bad markup yields empty lists, never errors.

use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;
use scraper::{Html, Selector};

use super::{
    contact::ContactCandidate,
    scraped_document::{collapse_whitespace, visible_text},
    service::{ServiceCandidate, MIN_TITLE_LEN},
};

pub const MAX_CONTACT_FIELDS: usize = 5;
pub const MAX_CONTACTS: usize = 5;
pub const MAX_HEADING_SERVICES: usize = 12;
pub const GENERIC_CATEGORY: &str = "Sonstiges";

const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;

static RE_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}\b").unwrap()
});
/// Dialable numbers start with an international prefix or a trunk zero, which
/// keeps year ranges and postcodes out.
static RE_PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\+|\b0)\d[\d\s/().-]{4,}\d").unwrap());

/// Seed vocabulary, checked in order against the lower-cased heading.
/// The first keyword contained in the heading decides the category.
const SERVICE_KEYWORDS: [(&str, &str); 18] = [
    ("beratung", "Beratung"),
    ("consulting", "Beratung"),
    ("entwicklung", "Entwicklung"),
    ("programmierung", "Entwicklung"),
    ("software", "Entwicklung"),
    ("webdesign", "Design"),
    ("design", "Design"),
    ("marketing", "Marketing"),
    ("seo", "Marketing"),
    ("social media", "Marketing"),
    ("hosting", "Hosting"),
    ("wartung", "Wartung & Support"),
    ("support", "Wartung & Support"),
    ("schulung", "Schulung"),
    ("workshop", "Schulung"),
    ("fotografie", "Medien"),
    ("video", "Medien"),
    ("shop", "E-Commerce"),
];

/// Emails, phone numbers and LinkedIn links, paired by position.
///
/// Candidate `i` holds the i-th email, the i-th phone number and the i-th
/// LinkedIn link found on the page. The fields are not known to belong to the
/// same person; consumers treat them as positional, not associative.
pub fn extract_contacts(html: &str) -> Vec<ContactCandidate> {
    let document = Html::parse_document(html);
    let text = visible_text(&document);

    let emails: Vec<String> = RE_EMAIL
        .find_iter(&text)
        .map(|m| m.as_str().to_lowercase())
        .unique()
        .take(MAX_CONTACT_FIELDS)
        .collect();

    let phones: Vec<String> = RE_PHONE
        .find_iter(&text)
        .map(|m| m.as_str().trim().to_string())
        .filter(|p| {
            let digits = p.chars().filter(char::is_ascii_digit).count();
            (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits)
        })
        .unique()
        .take(MAX_CONTACT_FIELDS)
        .collect();

    let linkedin_selector = Selector::parse(r#"a[href*="linkedin.com"]"#).unwrap();
    let links: Vec<String> = document
        .select(&linkedin_selector)
        .filter_map(|a| a.value().attr("href"))
        .map(|href| href.trim().to_string())
        .unique()
        .take(MAX_CONTACT_FIELDS)
        .collect();

    let count = emails.len().max(phones.len()).max(links.len());

    (0..count)
        .map(|i| ContactCandidate {
            name: None,
            email: emails.get(i).cloned(),
            phone: phones.get(i).cloned(),
            linked_in_url: links.get(i).cloned(),
        })
        .filter(|c| !c.is_empty())
        .take(MAX_CONTACTS)
        .collect()
}

/// Service candidates from h1-h3 headings in document order.
pub fn extract_services(html: &str) -> Vec<ServiceCandidate> {
    let document = Html::parse_document(html);
    let heading_selector = Selector::parse("h1, h2, h3").unwrap();

    document
        .select(&heading_selector)
        .map(|h| collapse_whitespace(&h.text().join(" ")))
        .filter(|title| title.chars().count() >= MIN_TITLE_LEN)
        .take(MAX_HEADING_SERVICES)
        .map(|title| {
            let lowered = title.to_lowercase();
            let matched = SERVICE_KEYWORDS
                .iter()
                .find(|(keyword, _)| lowered.contains(keyword));

            match matched {
                Some((keyword, category)) => ServiceCandidate {
                    category: category.to_string(),
                    title,
                    description: None,
                    keywords: vec![keyword.to_string()],
                },
                None => ServiceCandidate {
                    category: GENERIC_CATEGORY.to_string(),
                    title,
                    description: None,
                    keywords: vec![],
                },
            }
        })
        .collect()
}
