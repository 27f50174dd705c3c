//! Site crawler - the per-row crawl state machine
//!
//! One [`SiteCrawler`] owns the frontier, visited set and accumulated
//! addresses of a single seed. It fetches one page at a time; the only
//! suspension point is the fetch itself. Parsing and link handling happen in
//! synchronous helpers so no parsed document is ever held across an `.await`.

use crate::config::Config;
use crate::crawler::fetcher::{FetchFailure, PageFetcher, PageResult};
use crate::crawler::frontier::{Frontier, FrontierEntry, PriorityPolicy};
use crate::crawler::parser::parse_page;
use crate::extract::EmailExtractor;
use crate::state::{CrawlPhase, RowStatus};
use crate::url::{is_same_site, normalize_seed, Origin, UrlNormalizer};
use crate::{CrawlError, FinderError};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

/// Seed and budget of one crawl, fixed before it starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    seed: Url,
    origin: Origin,
    max_pages: u32,
    request_timeout: Duration,
}

impl CrawlTarget {
    /// Normalizes `seed` and derives its origin
    ///
    /// # Errors
    ///
    /// `InvalidSeedUrl` when the seed cannot be turned into an http(s) URL
    /// with a host, `InvalidInput` when the budget or timeout is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use email_finder::crawler::CrawlTarget;
    /// use std::time::Duration;
    ///
    /// let target = CrawlTarget::new("shop.test/about#team", 10, Duration::from_secs(5)).unwrap();
    /// assert_eq!(target.seed().as_str(), "https://shop.test/about");
    /// assert_eq!(target.origin().host(), "shop.test");
    ///
    /// assert!(CrawlTarget::new("mailto:a@shop.test", 10, Duration::from_secs(5)).is_err());
    /// ```
    pub fn new(seed: &str, max_pages: u32, request_timeout: Duration) -> Result<Self, CrawlError> {
        if max_pages == 0 {
            return Err(CrawlError::InvalidInput(
                "max_pages must be positive".to_string(),
            ));
        }
        if request_timeout.is_zero() {
            return Err(CrawlError::InvalidInput(
                "request timeout must be positive".to_string(),
            ));
        }

        let invalid = |reason: String| CrawlError::InvalidSeedUrl {
            url: seed.to_string(),
            reason,
        };
        let seed_url = normalize_seed(seed).map_err(|e| invalid(e.to_string()))?;
        let origin = Origin::of(&seed_url).ok_or_else(|| invalid("missing host".to_string()))?;

        Ok(Self {
            seed: seed_url,
            origin,
            max_pages,
            request_timeout,
        })
    }

    pub fn seed(&self) -> &Url {
        &self.seed
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

/// An address together with the first page it was seen on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailCandidate {
    pub address: String,
    pub found_on: Url,
}

/// Counters collected while crawling one site
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Fetches started
    pub pages_attempted: u32,
    /// HTML pages fetched and parsed
    pub pages_fetched: u32,
    /// Fetches that timed out, failed to connect or returned an error status
    pub pages_failed: u32,
    /// Responses that were not HTML
    pub pages_skipped: u32,
    /// Links added to the frontier
    pub links_enqueued: u32,
    /// Fetched pages whose path matched a priority keyword
    pub important_pages: Vec<String>,
}

/// Final, immutable result of one site crawl
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Normalized seed, or the raw input when it could not be parsed
    pub seed: String,
    /// Terminal phase
    pub phase: CrawlPhase,
    /// Deduplicated addresses, same-site ones first
    pub emails: Vec<EmailCandidate>,
    pub stats: CrawlStats,
    /// Set only when the crawl could not start
    pub error: Option<CrawlError>,
}

impl CrawlOutcome {
    /// Outcome of a crawl that never got going
    pub fn fatal(seed: impl Into<String>, error: CrawlError) -> Self {
        Self {
            seed: seed.into(),
            phase: CrawlPhase::Fatal,
            emails: Vec::new(),
            stats: CrawlStats::default(),
            error: Some(error),
        }
    }

    /// The addresses in ranked order
    pub fn addresses(&self) -> Vec<String> {
        self.emails.iter().map(|c| c.address.clone()).collect()
    }

    pub fn status(&self) -> RowStatus {
        RowStatus::from_phase(self.phase)
    }
}

/// Settings shared by every crawl of a batch
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub max_pages: u32,
    pub request_timeout: Duration,
    /// Supervising deadline for a whole crawl
    pub row_timeout: Option<Duration>,
    pub priority: PriorityPolicy,
    pub asset_extensions: Vec<String>,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl CrawlOptions {
    pub fn from_config(config: &Config) -> Self {
        let crawler = &config.crawler;
        Self {
            max_pages: crawler.max_pages,
            request_timeout: crawler.request_timeout(),
            row_timeout: crawler.row_timeout(),
            priority: PriorityPolicy::from_keywords(
                crawler.prioritize_contact_pages,
                &crawler.priority_keywords,
            ),
            asset_extensions: crawler.asset_extensions.clone(),
        }
    }
}

/// Entry point for crawling sites
///
/// Cloning is cheap: the HTTP client pool, extractor and options are shared
/// read-only between clones.
#[derive(Debug, Clone)]
pub struct Crawler {
    fetcher: PageFetcher,
    extractor: Arc<EmailExtractor>,
    options: Arc<CrawlOptions>,
}

impl Crawler {
    pub fn new(fetcher: PageFetcher, extractor: EmailExtractor, options: CrawlOptions) -> Self {
        Self {
            fetcher,
            extractor: Arc::new(extractor),
            options: Arc::new(options),
        }
    }

    /// Builds a crawler with its own HTTP client from the configuration
    pub fn from_config(config: &Config) -> Result<Self, FinderError> {
        let fetcher = PageFetcher::from_config(&config.user_agent)?;
        Ok(Self::new(
            fetcher,
            EmailExtractor::new(&config.extractor),
            CrawlOptions::from_config(config),
        ))
    }

    pub fn options(&self) -> &CrawlOptions {
        &self.options
    }

    /// Builds a target for `seed` with this crawler's budget and timeout
    pub fn target(&self, seed: &str) -> Result<CrawlTarget, CrawlError> {
        CrawlTarget::new(seed, self.options.max_pages, self.options.request_timeout)
    }

    /// Crawls one target to a terminal phase
    pub async fn crawl(&self, target: CrawlTarget) -> CrawlOutcome {
        SiteCrawler::new(
            target,
            self.fetcher.clone(),
            Arc::clone(&self.extractor),
            &self.options,
        )
        .run()
        .await
    }

    /// Builds the target for `seed` and crawls it; an invalid seed yields a
    /// `Fatal` outcome
    pub async fn crawl_seed(&self, seed: &str) -> CrawlOutcome {
        match self.target(seed) {
            Ok(target) => self.crawl(target).await,
            Err(e) => {
                tracing::warn!("Rejected seed {:?}: {}", seed, e);
                CrawlOutcome::fatal(seed, e)
            }
        }
    }
}

/// State machine for one site crawl
///
/// ```text
/// Idle -> Running -> { Completed | BudgetExhausted | DeadlineReached | Fatal }
/// ```
pub struct SiteCrawler {
    target: CrawlTarget,
    fetcher: PageFetcher,
    extractor: Arc<EmailExtractor>,
    normalizer: UrlNormalizer,
    frontier: Frontier,
    row_timeout: Option<Duration>,
    deadline: Option<Instant>,
    phase: CrawlPhase,
    emails: Vec<EmailCandidate>,
    seen: HashSet<String>,
    stats: CrawlStats,
    error: Option<CrawlError>,
}

impl SiteCrawler {
    pub fn new(
        target: CrawlTarget,
        fetcher: PageFetcher,
        extractor: Arc<EmailExtractor>,
        options: &CrawlOptions,
    ) -> Self {
        let normalizer = UrlNormalizer::new(target.origin().clone(), &options.asset_extensions);
        let frontier = Frontier::new(target.max_pages(), options.priority.clone());

        Self {
            target,
            fetcher,
            extractor,
            normalizer,
            frontier,
            row_timeout: options.row_timeout,
            deadline: None,
            phase: CrawlPhase::Idle,
            emails: Vec::new(),
            seen: HashSet::new(),
            stats: CrawlStats::default(),
            error: None,
        }
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Runs the crawl until it reaches a terminal phase
    pub async fn run(mut self) -> CrawlOutcome {
        tracing::info!(
            "Crawling {} (budget {} pages)",
            self.target.seed(),
            self.target.max_pages()
        );

        self.deadline = self.row_timeout.map(|t| Instant::now() + t);
        self.transition(CrawlPhase::Running);
        self.frontier.offer(self.target.seed().clone(), 0);

        while !self.phase.is_terminal() {
            let Some(entry) = self.frontier.pop() else {
                let end = if self.frontier.refused() > 0 {
                    CrawlPhase::BudgetExhausted
                } else {
                    CrawlPhase::Completed
                };
                self.transition(end);
                break;
            };

            if self.stats.pages_attempted >= self.target.max_pages() {
                self.transition(CrawlPhase::BudgetExhausted);
                break;
            }

            let Some(timeout) = self.fetch_timeout() else {
                tracing::warn!(
                    "Row deadline reached for {} with {} pages queued",
                    self.target.seed(),
                    self.frontier.len() + 1
                );
                self.transition(CrawlPhase::DeadlineReached);
                break;
            };

            self.stats.pages_attempted += 1;
            tracing::debug!("Fetching {} (depth {})", entry.url, entry.depth);

            match self.fetcher.fetch(&entry.url, timeout).await {
                PageResult::Page { final_url, body } => {
                    self.stats.pages_fetched += 1;
                    if entry.priority {
                        self.stats.important_pages.push(entry.url.to_string());
                    }
                    let page_url = self.follow_redirect(&entry, &final_url);
                    self.process_page(&page_url, &body, entry.depth);
                }
                PageResult::Skipped { content_type } => {
                    tracing::debug!("Skipped {} ({})", entry.url, content_type);
                    if entry.depth == 0 {
                        self.fail(CrawlError::UnsupportedContentType {
                            url: entry.url.to_string(),
                            content_type,
                        });
                    } else {
                        self.stats.pages_skipped += 1;
                    }
                }
                PageResult::Failed(failure) => {
                    tracing::warn!("Failed to fetch {}: {:?}", entry.url, failure);
                    self.stats.pages_failed += 1;

                    if failure == FetchFailure::Timeout && self.deadline_passed() {
                        self.transition(CrawlPhase::DeadlineReached);
                    } else if entry.depth == 0 {
                        self.fail(failure.into_crawl_error(&entry.url));
                    }
                }
            }
        }

        self.finish()
    }

    /// Accounts for a redirect and returns the URL links are resolved against
    ///
    /// A seed redirect (`shop.test` to `www.shop.test`, `http` to `https`)
    /// adds the final host to the crawl's origins. A redirect that ends on an
    /// accepted origin marks the final URL as fetched. A redirect that leaves
    /// the origins falls back to the requested URL.
    fn follow_redirect(&mut self, entry: &FrontierEntry, final_url: &Url) -> Url {
        if *final_url == entry.url {
            return entry.url.clone();
        }

        if entry.depth == 0 {
            if let Some(origin) = Origin::of(final_url) {
                if origin != *self.normalizer.origin() {
                    tracing::info!("Seed {} redirected to {}", entry.url, origin);
                }
                self.normalizer.adopt(origin);
            }
        }

        match self.normalizer.normalize(final_url, final_url.as_str()) {
            Some(landed) => {
                tracing::debug!("{} redirected to {}", entry.url, landed);
                if landed != entry.url {
                    self.frontier.mark_redirect_target(&landed);
                }
                final_url.clone()
            }
            None => {
                tracing::debug!("{} redirected off-site to {}", entry.url, final_url);
                entry.url.clone()
            }
        }
    }

    /// Extracts addresses and links from a fetched page
    fn process_page(&mut self, page_url: &Url, body: &str, depth: u32) {
        let parsed = parse_page(body, &self.extractor);
        tracing::debug!(
            "Parsed {} ({}): {} links, {} addresses",
            page_url,
            parsed.title.as_deref().unwrap_or("untitled"),
            parsed.links.len(),
            parsed.emails.len()
        );

        for address in parsed.emails {
            if self.seen.insert(address.to_lowercase()) {
                tracing::debug!("Found {} on {}", address, page_url);
                self.emails.push(EmailCandidate {
                    address,
                    found_on: page_url.clone(),
                });
            }
        }

        let links: Vec<Url> = parsed
            .links
            .iter()
            .filter_map(|href| self.normalizer.normalize(page_url, href))
            .collect();

        let refused_before = self.frontier.refused();
        let enqueued = self.frontier.offer_links(links, depth + 1);
        self.stats.links_enqueued += enqueued as u32;

        let refused = self.frontier.refused() - refused_before;
        if refused > 0 {
            tracing::trace!("Budget full, {} links from {} not queued", refused, page_url);
        }
    }

    /// Timeout for the next fetch, or `None` once the row deadline has passed
    fn fetch_timeout(&self) -> Option<Duration> {
        let request_timeout = self.target.request_timeout();
        match self.deadline {
            None => Some(request_timeout),
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    None
                } else {
                    Some(remaining.min(request_timeout))
                }
            }
        }
    }

    fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    fn fail(&mut self, error: CrawlError) {
        tracing::warn!("Crawl of {} failed: {}", self.target.seed(), error);
        self.error = Some(error);
        self.transition(CrawlPhase::Fatal);
    }

    fn transition(&mut self, next: CrawlPhase) {
        if self.phase.can_transition_to(next) {
            tracing::trace!("{}: {} -> {}", self.target.seed(), self.phase, next);
            self.phase = next;
        } else {
            tracing::error!(
                "Invalid phase transition {} -> {} for {}",
                self.phase,
                next,
                self.target.seed()
            );
        }
    }

    fn finish(self) -> CrawlOutcome {
        let emails = if self.phase == CrawlPhase::Fatal {
            Vec::new()
        } else {
            rank_by_site(self.emails, self.target.origin().host())
        };

        tracing::info!(
            "Finished {}: {} ({} pages fetched, {} failed, {} addresses)",
            self.target.seed(),
            self.phase,
            self.stats.pages_fetched,
            self.stats.pages_failed,
            emails.len()
        );

        CrawlOutcome {
            seed: self.target.seed().to_string(),
            phase: self.phase,
            emails,
            stats: self.stats,
            error: self.error,
        }
    }
}

/// Moves addresses on the crawled site's domain to the front, keeping
/// discovery order inside each group
fn rank_by_site(emails: Vec<EmailCandidate>, host: &str) -> Vec<EmailCandidate> {
    let (mut own, foreign): (Vec<_>, Vec<_>) = emails.into_iter().partition(|candidate| {
        candidate
            .address
            .rsplit_once('@')
            .is_some_and(|(_, domain)| is_same_site(domain, host))
    });
    own.extend(foreign);
    own
}
