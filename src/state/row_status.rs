use crate::state::CrawlPhase;
use std::fmt;

/// Outcome recorded on an output row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowStatus {
    /// The crawl ran to a normal end; zero addresses is still `Ok`
    Ok,
    /// The crawl was cut short; the addresses found so far are kept
    Partial,
    /// The crawl could not start
    Failed,
}

impl RowStatus {
    /// Maps the terminal phase of a crawl to the row verdict
    pub fn from_phase(phase: CrawlPhase) -> Self {
        if phase.is_success() {
            Self::Ok
        } else if phase == CrawlPhase::Fatal {
            Self::Failed
        } else {
            Self::Partial
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Partial => "partial",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for RowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
