/// Phase definitions for one site crawl
///
/// A crawl starts `Idle`, becomes `Running` once its seed is accepted, and
/// ends in exactly one terminal phase.
use std::fmt;

/// Represents the current phase of a site crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    // ===== Active Phases =====
    /// Target built, nothing fetched yet
    Idle,

    /// Frontier is being worked through
    Running,

    // ===== Terminal Phases =====
    /// Frontier emptied before the page budget was reached
    Completed,

    /// Page budget reached; further same-origin pages were left unvisited
    BudgetExhausted,

    /// The row's supervising deadline passed while pages were still queued
    DeadlineReached,

    /// The crawl could not start (invalid seed, unreachable seed page)
    Fatal,
}

impl CrawlPhase {
    /// Returns true if this is a terminal phase (no further processing)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Idle | Self::Running)
    }

    /// Returns true if the crawl ended normally
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed | Self::BudgetExhausted)
    }

    /// Returns true if moving from this phase to `next` is allowed
    ///
    /// `Idle` may fail straight to `Fatal` when the seed is rejected before
    /// any fetch; terminal phases never change again.
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        match self {
            Self::Idle => matches!(next, Self::Running | Self::Fatal),
            Self::Running => next.is_terminal(),
            _ => false,
        }
    }

    /// Stable lowercase name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::BudgetExhausted => "budget_exhausted",
            Self::DeadlineReached => "deadline_reached",
            Self::Fatal => "fatal",
        }
    }

    /// Returns all phases
    pub fn all_phases() -> Vec<Self> {
        vec![
            Self::Idle,
            Self::Running,
            Self::Completed,
            Self::BudgetExhausted,
            Self::DeadlineReached,
            Self::Fatal,
        ]
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
