/// Lifecycle of a single site crawl
use crate::ScoutError;
use std::fmt;

/// Represents where a site crawl is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    /// Created, nothing fetched yet
    Idle,

    /// Batches are being taken from the frontier
    Crawling,

    /// Frontier exhausted or page budget spent
    Done,
}

impl CrawlState {
    /// Returns true if `next` is a legal successor of this state
    ///
    /// The only legal path is Idle -> Crawling -> Done.
    pub fn can_transition_to(&self, next: CrawlState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Crawling) | (Self::Crawling, Self::Done)
        )
    }

    /// Moves to `next`, rejecting illegal transitions
    pub fn transition(self, next: CrawlState) -> Result<CrawlState, ScoutError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(ScoutError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Crawling => "crawling",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
