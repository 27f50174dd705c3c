//! Drops address-shaped strings that are not real contact addresses

use crate::config::ExtractorConfig;
use crate::url::matches_domain_pattern;

/// Why a candidate was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// A file name such as `logo@2x.png` picked up by the pattern
    AssetName,
    /// Template or third-party script boilerplate (`example.com`, `wixpress.com`)
    PlaceholderDomain,
    /// A mailbox nobody reads (`noreply@...`)
    IgnoredLocalPart,
}

/// Denylist built from the extractor's tuning lists
#[derive(Debug, Clone)]
pub struct Denylist {
    placeholder_domains: Vec<String>,
    ignored_local_parts: Vec<String>,
    asset_suffixes: Vec<String>,
}

impl Denylist {
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            placeholder_domains: config.placeholder_domains.clone(),
            ignored_local_parts: lowercase_all(&config.ignored_local_parts),
            asset_suffixes: lowercase_all(&config.asset_suffixes),
        }
    }

    /// A denylist that lets every well-formed address through
    pub fn empty() -> Self {
        Self {
            placeholder_domains: Vec::new(),
            ignored_local_parts: Vec::new(),
            asset_suffixes: Vec::new(),
        }
    }

    /// Returns the reason `address` must be dropped, if any
    pub fn check(&self, address: &str) -> Option<Exclusion> {
        let lower = address.to_lowercase();
        let (local, domain) = lower.rsplit_once('@')?;

        if self.asset_suffixes.iter().any(|s| lower.ends_with(s.as_str())) {
            return Some(Exclusion::AssetName);
        }

        if self
            .placeholder_domains
            .iter()
            .any(|pattern| matches_domain_pattern(pattern, domain))
        {
            return Some(Exclusion::PlaceholderDomain);
        }

        if self
            .ignored_local_parts
            .iter()
            .any(|part| local.contains(part.as_str()))
        {
            return Some(Exclusion::IgnoredLocalPart);
        }

        None
    }

    pub fn is_excluded(&self, address: &str) -> bool {
        self.check(address).is_some()
    }
}

impl Default for Denylist {
    fn default() -> Self {
        Self::new(&ExtractorConfig::default())
    }
}

fn lowercase_all(items: &[String]) -> Vec<String> {
    items.iter().map(|s| s.to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_names_dropped() {
        let denylist = Denylist::default();
        assert_eq!(denylist.check("logo@2x.png"), Some(Exclusion::AssetName));
        assert_eq!(denylist.check("icons@3x.WEBP"), Some(Exclusion::AssetName));
        assert_eq!(denylist.check("font@1.woff2"), Some(Exclusion::AssetName));
    }

    #[test]
    fn test_placeholder_domains_dropped() {
        let denylist = Denylist::default();
        assert_eq!(
            denylist.check("noreply@wixpress.com"),
            Some(Exclusion::PlaceholderDomain)
        );
        assert_eq!(
            denylist.check("abc123@o450.ingest.sentry.io"),
            Some(Exclusion::PlaceholderDomain)
        );
        assert_eq!(
            denylist.check("you@yourdomain.com"),
            Some(Exclusion::PlaceholderDomain)
        );
        assert_eq!(
            denylist.check("info@Example.com"),
            Some(Exclusion::PlaceholderDomain)
        );
    }

    #[test]
    fn test_ignored_local_parts_dropped() {
        let denylist = Denylist::default();
        assert_eq!(
            denylist.check("no-reply@shop.test"),
            Some(Exclusion::IgnoredLocalPart)
        );
        assert_eq!(
            denylist.check("DoNotReply.orders@shop.test"),
            Some(Exclusion::IgnoredLocalPart)
        );
    }

    #[test]
    fn test_real_addresses_kept() {
        let denylist = Denylist::default();
        assert_eq!(denylist.check("info@shop.test"), None);
        assert_eq!(denylist.check("sales@example.co.uk"), None);
        assert!(!denylist.is_excluded("reply@shop.test"));
    }

    #[test]
    fn test_empty_denylist() {
        let denylist = Denylist::empty();
        assert!(!denylist.is_excluded("info@example.com"));
        assert!(!denylist.is_excluded("noreply@wixpress.com"));
    }

    #[test]
    fn test_configured_lists() {
        let config = ExtractorConfig {
            placeholder_domains: vec!["*.mailinator.com".to_string()],
            ignored_local_parts: vec!["Bounce".to_string()],
            asset_suffixes: vec![".avif".to_string()],
        };
        let denylist = Denylist::new(&config);

        assert!(denylist.is_excluded("x@mailinator.com"));
        assert!(denylist.is_excluded("bounce-42@shop.test"));
        assert!(denylist.is_excluded("hero@2x.avif"));
        assert!(!denylist.is_excluded("info@example.com"));
    }
}
