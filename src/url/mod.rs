//! URL handling module for Email-Finder
//!
//! This module provides link normalization, origin checks, domain helpers and
//! the contact-page heuristic used to order a crawl's frontier.

mod domain;
mod matcher;
mod normalize;

use url::Url;

// Re-export main functions
pub use domain::{extract_domain, is_same_site};
pub use matcher::matches_domain_pattern;
pub use normalize::{normalize_seed, LinkRejection, UrlNormalizer};

/// Scheme and host (plus an explicit port, if any) of a crawl's seed
///
/// Two URLs share an origin when their hosts are identical and they carry
/// the same explicit port. The scheme is kept for display only, so an
/// `http` seed still follows its own `https` links.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Origin {
    scheme: String,
    host: String,
    port: Option<u16>,
}

impl Origin {
    /// Derives the origin of `url`; `None` when it has no host
    pub fn of(url: &Url) -> Option<Self> {
        let host = extract_domain(url)?;
        if host.is_empty() {
            return None;
        }

        Some(Self {
            scheme: url.scheme().to_string(),
            host,
            port: url.port(),
        })
    }

    /// Lowercase host name
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Returns true if both origins name the same host and explicit port
    pub fn same_host(&self, other: &Origin) -> bool {
        self.host == other.host && self.port == other.port
    }

    /// Returns true if `url` lives on this origin
    pub fn contains(&self, url: &Url) -> bool {
        url.port() == self.port && extract_domain(url).as_deref() == Some(self.host.as_str())
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}://{}:{}", self.scheme, self.host, port),
            None => write!(f, "{}://{}", self.scheme, self.host),
        }
    }
}

/// Returns true if the URL path carries one of the contact-page signals
///
/// Keywords are expected in lowercase; the path is lowercased before matching.
///
/// # Examples
///
/// ```
/// use email_finder::url::is_priority_path;
/// use url::Url;
///
/// let keywords = vec!["contact".to_string(), "impressum".to_string()];
/// let url = Url::parse("https://shop.test/de/Impressum").unwrap();
/// assert!(is_priority_path(&url, &keywords));
/// ```
pub fn is_priority_path(url: &Url, keywords: &[String]) -> bool {
    let path = url.path().to_lowercase();
    keywords.iter().any(|keyword| path.contains(keyword.as_str()))
}
