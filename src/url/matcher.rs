/// Checks if a mail domain matches a denylist pattern
///
/// Two kinds of pattern are supported, both compared case-insensitively:
/// 1. Exact: "example.com" matches only "example.com"
/// 2. Wildcard: "*.wixpress.com" matches "wixpress.com" and every
///    subdomain of it ("sentry-next.wixpress.com")
///
/// # Examples
///
/// ```
/// use email_finder::url::matches_domain_pattern;
///
/// assert!(matches_domain_pattern("example.com", "EXAMPLE.com"));
/// assert!(!matches_domain_pattern("example.com", "mail.example.com"));
///
/// assert!(matches_domain_pattern("*.wixpress.com", "wixpress.com"));
/// assert!(matches_domain_pattern("*.wixpress.com", "sentry-next.wixpress.com"));
/// assert!(!matches_domain_pattern("*.wixpress.com", "notwixpress.com"));
/// ```
pub fn matches_domain_pattern(pattern: &str, domain: &str) -> bool {
    let pattern = pattern.to_ascii_lowercase();
    let domain = domain.to_ascii_lowercase();

    match pattern.strip_prefix("*.") {
        Some(base) => domain == base || domain.ends_with(&format!(".{}", base)),
        None => domain == pattern,
    }
}
