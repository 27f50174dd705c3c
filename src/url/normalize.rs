use crate::url::Origin;
use crate::UrlError;
use url::Url;

/// Schemes that are recognisably not a website even without `//`
const NON_WEB_SCHEMES: &[&str] = &["mailto", "tel", "javascript", "data", "ftp", "file", "sms"];

/// Why a link was not turned into a frontier candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkRejection {
    /// Blank href
    Empty,
    /// `#section` style anchors pointing back into the same page
    FragmentOnly,
    /// The href could not be resolved against the page URL
    Unresolvable(String),
    /// `mailto:`, `tel:`, `javascript:` and other non-web schemes
    Scheme(String),
    /// The link leaves the crawl's origin
    CrossOrigin(String),
    /// The link points at a known non-page asset
    Asset,
}

/// Canonicalizes and filters links found on the pages of one site
///
/// A normalizer is bound to the origin of the seed URL (plus any host the
/// seed redirected to, see [`adopt`](Self::adopt)): everything it accepts
/// is an http(s) page on exactly that host, with no fragment, no empty query
/// and no trailing slash (except the root path). Equivalent spellings of the
/// same page therefore normalize to the same string.
#[derive(Debug, Clone)]
pub struct UrlNormalizer {
    origins: Vec<Origin>,
    asset_extensions: Vec<String>,
}

impl UrlNormalizer {
    /// Creates a normalizer for `origin`, rejecting links whose path ends
    /// with one of `asset_extensions` (compared case-insensitively)
    pub fn new(origin: Origin, asset_extensions: &[String]) -> Self {
        Self {
            origins: vec![origin],
            asset_extensions: asset_extensions.iter().map(|e| e.to_lowercase()).collect(),
        }
    }

    /// The origin this normalizer accepts links for
    pub fn origin(&self) -> &Origin {
        &self.origins[0]
    }

    /// Accepts links on `origin` from now on
    ///
    /// Used when the seed redirects: links on the redirected host are
    /// followed, and links naming that host with the other scheme are
    /// rewritten to the scheme the site redirected to.
    pub fn adopt(&mut self, origin: Origin) {
        match self.origins.iter_mut().find(|o| o.same_host(&origin)) {
            Some(known) => *known = origin,
            None => self.origins.push(origin),
        }
    }

    /// Returns true if `url` lives on one of the accepted origins
    pub fn accepts(&self, url: &Url) -> bool {
        self.origins.iter().any(|o| o.contains(url))
    }

    /// Resolves `href` against `base` and returns the canonical URL, or
    /// `None` when the link must not enter the frontier
    ///
    /// # Examples
    ///
    /// ```
    /// use email_finder::url::{Origin, UrlNormalizer};
    /// use url::Url;
    ///
    /// let base = Url::parse("https://a.com/dir/page").unwrap();
    /// let normalizer = UrlNormalizer::new(Origin::of(&base).unwrap(), &[".png".to_string()]);
    ///
    /// let contact = normalizer.normalize(&base, "../contact").unwrap();
    /// assert_eq!(contact.as_str(), "https://a.com/contact");
    /// assert!(normalizer.normalize(&base, "https://b.com/x").is_none());
    /// assert!(normalizer.normalize(&base, "/logo.PNG").is_none());
    /// ```
    pub fn normalize(&self, base: &Url, href: &str) -> Option<Url> {
        match self.classify(base, href) {
            Ok(url) => Some(url),
            Err(reason) => {
                tracing::trace!("Rejected link {:?} on {}: {:?}", href, base, reason);
                None
            }
        }
    }

    /// Same as [`normalize`](Self::normalize) but reports the rejection reason
    pub fn classify(&self, base: &Url, href: &str) -> Result<Url, LinkRejection> {
        let href = href.trim();

        if href.is_empty() {
            return Err(LinkRejection::Empty);
        }

        if href.starts_with('#') {
            return Err(LinkRejection::FragmentOnly);
        }

        let mut url = base
            .join(href)
            .map_err(|e| LinkRejection::Unresolvable(e.to_string()))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(LinkRejection::Scheme(url.scheme().to_string()));
        }

        let Some(origin) = self.origins.iter().find(|o| o.contains(&url)) else {
            return Err(LinkRejection::CrossOrigin(
                url.host_str().unwrap_or_default().to_string(),
            ));
        };

        // http and https spellings of one page share a visited key
        if url.scheme() != origin.scheme() && url.set_scheme(origin.scheme()).is_err() {
            return Err(LinkRejection::Scheme(url.scheme().to_string()));
        }

        canonicalize(&mut url);

        if self.is_asset(&url) {
            return Err(LinkRejection::Asset);
        }

        Ok(url)
    }

    fn is_asset(&self, url: &Url) -> bool {
        let path = url.path().to_lowercase();
        self.asset_extensions.iter().any(|ext| path.ends_with(ext))
    }
}

/// Parses and canonicalizes a seed URL
///
/// Seeds are typed by people, so a missing scheme is tolerated and
/// `https://` is assumed (`shop.test/about` becomes `https://shop.test/about`).
///
/// # Examples
///
/// ```
/// use email_finder::url::normalize_seed;
///
/// let url = normalize_seed("www.Shop.test/about/").unwrap();
/// assert_eq!(url.as_str(), "https://www.shop.test/about");
/// assert!(normalize_seed("mailto:someone@shop.test").is_err());
/// ```
pub fn normalize_seed(raw: &str) -> Result<Url, UrlError> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(UrlError::Parse("empty URL".to_string()));
    }

    let mut url = match Url::parse(raw) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => url,
        Ok(url) if raw.contains("://") || NON_WEB_SCHEMES.contains(&url.scheme()) => {
            return Err(UrlError::InvalidScheme(format!(
                "Only HTTP and HTTPS schemes are supported, got: {}",
                url.scheme()
            )));
        }
        Err(e) if raw.contains("://") => return Err(UrlError::Parse(e.to_string())),
        // `shop.test` (relative) or `shop.test:8080` (parsed as a scheme)
        _ => Url::parse(&format!("https://{}", raw)).map_err(|e| UrlError::Parse(e.to_string()))?,
    };

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    canonicalize(&mut url);
    Ok(url)
}

/// Drops the fragment, an empty query and a trailing slash
fn canonicalize(url: &mut Url) {
    url.set_fragment(None);

    if url.query() == Some("") {
        url.set_query(None);
    }

    let path = url.path();
    if path.len() > 1 && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/');
        let trimmed = if trimmed.is_empty() { "/" } else { trimmed }.to_string();
        url.set_path(&trimmed);
    }
}
