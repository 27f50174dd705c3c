use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use email_finder::url::extract_domain;
///
/// let url = Url::parse("https://SHOP.test/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("shop.test".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if a mail domain belongs to the crawled site
///
/// A leading `www.` on the site host is ignored, and the site may be a
/// subdomain of the mail domain (`shop.brand.test` sends mail from
/// `brand.test`).
///
/// # Examples
///
/// ```
/// use email_finder::url::is_same_site;
///
/// assert!(is_same_site("shop.test", "www.shop.test"));
/// assert!(is_same_site("brand.test", "shop.brand.test"));
/// assert!(!is_same_site("gmail.com", "shop.test"));
/// ```
pub fn is_same_site(mail_domain: &str, site_host: &str) -> bool {
    let mail_domain = mail_domain.to_lowercase();
    let host = site_host.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);

    host == mail_domain || host.ends_with(&format!(".{}", mail_domain))
}
