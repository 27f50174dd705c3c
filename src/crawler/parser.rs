//! HTML parser for extracting links and addresses
//!
//! This module parses a fetched page once and pulls out:
//! - Link targets to offer to the frontier (raw hrefs, resolved later)
//! - Page title
//! - Email addresses, via the extraction pipeline

use crate::extract::EmailExtractor;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("valid title selector"));

static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href], area[href]").expect("valid link selector"));

static CANONICAL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("link[rel='canonical'][href]").expect("valid canonical selector"));

static FRAME_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("frame[src], iframe[src]").expect("valid frame selector"));

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// Link targets in document order, exactly as written in the markup
    pub links: Vec<String>,

    /// Addresses found on the page, deduplicated, in order of appearance
    pub emails: Vec<String>,
}

/// Parses HTML content and extracts links, title and addresses
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href>` and `<area href>`
/// - `<link rel="canonical" href>`
/// - `<frame src>` and `<iframe src>`, since small sites still put their
///   contact form in a frame
///
/// **Exclude:**
/// - `<a href download>`
///
/// Scheme, origin and asset filtering is left to the URL normalizer.
///
/// # Example
///
/// ```
/// use email_finder::crawler::parse_page;
/// use email_finder::extract::EmailExtractor;
///
/// let html = r#"<html><head><title>Shop</title></head>
///     <body><a href="/contact">Contact</a> sales@shop.test</body></html>"#;
/// let parsed = parse_page(html, &EmailExtractor::default());
/// assert_eq!(parsed.title.as_deref(), Some("Shop"));
/// assert_eq!(parsed.links, vec!["/contact"]);
/// assert_eq!(parsed.emails, vec!["sales@shop.test"]);
/// ```
pub fn parse_page(html: &str, extractor: &EmailExtractor) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        links: extract_links(&document),
        emails: extractor.extract_from_document(&document, html),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts every link target from the HTML document
fn extract_links(document: &Html) -> Vec<String> {
    let anchors = document
        .select(&LINK_SELECTOR)
        .filter(|element| element.value().attr("download").is_none())
        .filter_map(|element| element.value().attr("href"));

    let canonical = document
        .select(&CANONICAL_SELECTOR)
        .filter_map(|element| element.value().attr("href"));

    let frames = document
        .select(&FRAME_SELECTOR)
        .filter_map(|element| element.value().attr("src"));

    anchors
        .chain(canonical)
        .chain(frames)
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(str::to_string)
        .collect()
}
