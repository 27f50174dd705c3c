//! Frontier queue and visited set for one site crawl
//!
//! Entries are served breadth-first. When contact-page prioritization is on,
//! entries whose path carries a contact signal wait in a separate lane that is
//! always drained first; both lanes are FIFO.
//!
//! The visited set is filled at enqueue time and never shrinks, and it is
//! capped at the page budget: once it holds `max_pages` URLs further offers
//! are refused, so no crawl can ever visit more pages than its budget.
//! Redirect targets are tracked separately: they were fetched under another
//! URL, so they block later offers without taking a budget slot.

use crate::url::is_priority_path;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// A URL waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// Normalized URL
    pub url: Url,

    /// Link distance from the seed (seed is 0)
    pub depth: u32,

    /// Whether the path matched a contact-page keyword
    pub priority: bool,
}

/// Ordering policy for the frontier
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PriorityPolicy {
    /// Strict discovery order
    #[default]
    Fifo,

    /// Pages whose path contains one of these lowercase keywords jump ahead
    ContactFirst(Vec<String>),
}

impl PriorityPolicy {
    /// Builds the policy from the crawler settings
    pub fn from_keywords(enabled: bool, keywords: &[String]) -> Self {
        if enabled && !keywords.is_empty() {
            Self::ContactFirst(keywords.iter().map(|k| k.to_lowercase()).collect())
        } else {
            Self::Fifo
        }
    }

    /// Returns true if `url` belongs in the priority lane
    pub fn is_priority(&self, url: &Url) -> bool {
        match self {
            Self::Fifo => false,
            Self::ContactFirst(keywords) => is_priority_path(url, keywords),
        }
    }
}

/// What happened to an offered URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    /// Added to the visited set and queued
    Enqueued,
    /// Already seen during this crawl
    AlreadyVisited,
    /// The visited set is full
    OverBudget,
}

/// Frontier plus visited set, owned by exactly one crawl
#[derive(Debug)]
pub struct Frontier {
    priority: VecDeque<FrontierEntry>,
    regular: VecDeque<FrontierEntry>,
    visited: HashSet<String>,
    redirected: HashSet<String>,
    max_pages: usize,
    refused: usize,
    policy: PriorityPolicy,
}

impl Frontier {
    pub fn new(max_pages: u32, policy: PriorityPolicy) -> Self {
        Self {
            priority: VecDeque::new(),
            regular: VecDeque::new(),
            visited: HashSet::new(),
            redirected: HashSet::new(),
            max_pages: max_pages as usize,
            refused: 0,
            policy,
        }
    }

    /// Offers a normalized URL discovered at `depth`
    pub fn offer(&mut self, url: Url, depth: u32) -> Offer {
        if self.is_visited(&url) {
            return Offer::AlreadyVisited;
        }
        if self.visited.len() >= self.max_pages {
            self.refused += 1;
            return Offer::OverBudget;
        }

        self.visited.insert(url.as_str().to_string());

        let priority = depth > 0 && self.policy.is_priority(&url);
        let entry = FrontierEntry {
            url,
            depth,
            priority,
        };
        if priority {
            self.priority.push_back(entry);
        } else {
            self.regular.push_back(entry);
        }
        Offer::Enqueued
    }

    /// Offers the links found on one page, priority links first
    ///
    /// With the visited set capped at the budget, offering contact pages
    /// ahead of their siblings is what lets them win the remaining slots.
    /// Returns the number of links enqueued.
    pub fn offer_links(&mut self, links: Vec<Url>, depth: u32) -> usize {
        let (first, rest): (Vec<_>, Vec<_>) = links
            .into_iter()
            .partition(|url| self.policy.is_priority(url));

        first
            .into_iter()
            .chain(rest)
            .filter(|url| self.offer(url.clone(), depth) == Offer::Enqueued)
            .count()
    }

    /// Records that `url` was reached by following a redirect
    ///
    /// Queued entries for it are dropped when popped, and later offers are
    /// turned away.
    pub fn mark_redirect_target(&mut self, url: &Url) {
        self.redirected.insert(url.as_str().to_string());
    }

    /// Removes the next entry to fetch
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        loop {
            let entry = self
                .priority
                .pop_front()
                .or_else(|| self.regular.pop_front())?;
            if !self.redirected.contains(entry.url.as_str()) {
                return Some(entry);
            }
            tracing::trace!("Dropping {}: already fetched through a redirect", entry.url);
        }
    }

    /// Number of URLs waiting
    pub fn len(&self) -> usize {
        self.priority.len() + self.regular.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of URLs ever enqueued
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Returns true if `url` was already enqueued or fetched during this crawl
    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url.as_str()) || self.redirected.contains(url.as_str())
    }

    /// Number of new URLs turned away because the budget was full
    pub fn refused(&self) -> usize {
        self.refused
    }
}
