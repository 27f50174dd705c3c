use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Email-Finder
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub extractor: ExtractorConfig,
    pub table: TableConfig,
}

/// Crawl budget and scheduling configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of pages visited per site
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// Timeout for a single request, connection setup included (seconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,

    /// Maximum number of sites crawled at the same time
    #[serde(rename = "max-concurrency")]
    pub max_concurrency: u32,

    /// Optional wall-clock deadline for one row's crawl (seconds)
    #[serde(rename = "row-timeout")]
    pub row_timeout: Option<u64>,

    /// Visit pages whose path looks like a contact page first
    #[serde(rename = "prioritize-contact-pages")]
    pub prioritize_contact_pages: bool,

    /// Path fragments that mark a contact-like page
    #[serde(rename = "priority-keywords")]
    pub priority_keywords: Vec<String>,

    /// Link extensions that never lead to an HTML page
    #[serde(rename = "asset-extensions")]
    pub asset_extensions: Vec<String>,
}

impl CrawlerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn row_timeout(&self) -> Option<Duration> {
        self.row_timeout.map(Duration::from_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 50,
            request_timeout: 10,
            max_concurrency: 20,
            row_timeout: None,
            prioritize_contact_pages: true,
            priority_keywords: strings(&[
                "contact",
                "about",
                "impressum",
                "kontakt",
                "mentions-legales",
                "a-propos",
                "legal",
                "team",
            ]),
            asset_extensions: strings(&[
                ".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp", ".ico", ".pdf", ".zip", ".rar",
                ".gz", ".exe", ".dmg", ".mp4", ".mp3", ".avi", ".mov", ".css", ".js", ".xml",
                ".json", ".woff", ".woff2", ".ttf", ".eot",
            ]),
        }
    }
}

/// HTTP identity configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Value sent in the User-Agent header
    pub value: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            value: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                    (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
        }
    }
}

/// Email extraction tuning lists
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Mail domains that only ever appear as template or script boilerplate
    /// (e.g. "example.com" or "*.wixpress.com")
    #[serde(rename = "placeholder-domains")]
    pub placeholder_domains: Vec<String>,

    /// Local parts that never reach a person
    #[serde(rename = "ignored-local-parts")]
    pub ignored_local_parts: Vec<String>,

    /// Suffixes that reveal a file name matched as an address (logo@2x.png)
    #[serde(rename = "asset-suffixes")]
    pub asset_suffixes: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            placeholder_domains: strings(&[
                "example.com",
                "example.org",
                "yourdomain.com",
                "domain.com",
                "*.sentry.io",
                "*.wixpress.com",
            ]),
            ignored_local_parts: strings(&["noreply", "no-reply", "donotreply"]),
            asset_suffixes: strings(&[
                ".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp", ".ico", ".bmp", ".woff",
                ".woff2", ".ttf", ".eot", ".otf",
            ]),
        }
    }
}

/// Column layout of the input and output tables
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    #[serde(rename = "url-column")]
    pub url_column: String,

    #[serde(rename = "name-column")]
    pub name_column: String,

    #[serde(rename = "email-column")]
    pub email_column: String,

    /// Joins several addresses inside one cell
    pub separator: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            url_column: "url".to_string(),
            name_column: "name".to_string(),
            email_column: "email".to_string(),
            separator: "; ".to_string(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
