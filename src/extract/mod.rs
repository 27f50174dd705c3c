//! Email extraction pipeline
//!
//! Extraction runs as a sequence of pure stages over the page:
//! 1. Direct sources: `mailto:` hrefs and `data-email` attributes, which
//!    bypass de-obfuscation entirely
//! 2. Visible text: [`deobfuscate`] then [`scan`] with the address pattern
//! 3. Raw markup: [`scan`] over the unparsed HTML (scripts, comments, attributes)
//! 4. [`Denylist`] filter, then case-insensitive deduplication that keeps the
//!    casing of the first sighting

mod deobfuscate;
mod filter;
mod pattern;

pub use deobfuscate::deobfuscate;
pub use filter::{Denylist, Exclusion};
pub use pattern::{is_address, scan};

use crate::config::ExtractorConfig;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashSet;

static HREF_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("[href]").expect("valid href selector"));

static DATA_EMAIL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("[data-email]").expect("valid data-email selector"));

/// Finds contact addresses in HTML pages
#[derive(Debug, Clone, Default)]
pub struct EmailExtractor {
    denylist: Denylist,
}

impl EmailExtractor {
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            denylist: Denylist::new(config),
        }
    }

    /// An extractor with a caller-supplied denylist
    pub fn with_denylist(denylist: Denylist) -> Self {
        Self { denylist }
    }

    /// Extracts the deduplicated addresses found in an HTML page
    ///
    /// The result is ordered by first appearance and running it twice on the
    /// same input yields the same list.
    ///
    /// # Examples
    ///
    /// ```
    /// use email_finder::extract::EmailExtractor;
    ///
    /// let extractor = EmailExtractor::default();
    /// let html = r#"<a href="mailto:Sales@shop.test?subject=Hi">Mail</a>
    ///               <p>or sales@shop.test, support [at] shop [dot] test</p>"#;
    /// assert_eq!(
    ///     extractor.extract(html),
    ///     vec!["Sales@shop.test", "support@shop.test"]
    /// );
    /// ```
    pub fn extract(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        self.extract_from_document(&document, html)
    }

    /// Same as [`extract`](Self::extract) for an already parsed document
    pub fn extract_from_document(&self, document: &Html, raw: &str) -> Vec<String> {
        let mut found = Vec::new();
        found.extend(mailto_addresses(document));
        found.extend(data_email_addresses(document));

        let text = visible_text(document);
        found.extend(scan(&deobfuscate(&text)).into_iter().map(str::to_string));
        found.extend(scan(raw).into_iter().map(str::to_string));

        self.finalize(found)
    }

    /// Extracts addresses from plain text (no markup sources)
    pub fn extract_text(&self, text: &str) -> Vec<String> {
        let found = scan(&deobfuscate(text))
            .into_iter()
            .map(str::to_string)
            .collect();
        self.finalize(found)
    }

    fn finalize(&self, found: Vec<String>) -> Vec<String> {
        let kept = found.into_iter().filter(|address| {
            match self.denylist.check(address) {
                Some(reason) => {
                    tracing::trace!("Dropped candidate {}: {:?}", address, reason);
                    false
                }
                None => true,
            }
        });
        dedup_case_insensitive(kept)
    }
}

/// Keeps the first spelling of each address, comparing lowercased forms
pub fn dedup_case_insensitive<I>(addresses: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    addresses
        .into_iter()
        .filter(|address| seen.insert(address.to_lowercase()))
        .collect()
}

/// Addresses from `mailto:` hrefs, with the query stripped and `%40` decoded
fn mailto_addresses(document: &Html) -> Vec<String> {
    document
        .select(&HREF_SELECTOR)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| {
            let href = href.trim();
            let prefix = href.get(..7)?;
            if !prefix.eq_ignore_ascii_case("mailto:") {
                return None;
            }
            Some(href[7..].split('?').next().unwrap_or_default().to_string())
        })
        .flat_map(|targets| {
            // mailto:a@x.test,b@x.test addresses several recipients
            targets
                .split(',')
                .map(|t| t.trim().replace("%40", "@").replace("%20", ""))
                .filter(|t| is_address(t))
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Addresses stored in `data-email` attributes
fn data_email_addresses(document: &Html) -> Vec<String> {
    document
        .select(&DATA_EMAIL_SELECTOR)
        .filter_map(|element| element.value().attr("data-email"))
        .map(str::trim)
        .filter(|value| is_address(value))
        .map(str::to_string)
        .collect()
}

/// Text nodes of the document joined with spaces so adjacent blocks stay apart
fn visible_text(document: &Html) -> String {
    document.root_element().text().collect::<Vec<_>>().join(" ")
}
