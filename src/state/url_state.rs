/// Frontier position of a discovered URL
use std::fmt;

/// A URL is in at most one of these at any time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrlState {
    /// Discovered, waiting to be taken
    Pending,

    /// Taken by a worker, not yet completed
    InFlight,

    /// Completed; never offered again in this run
    Visited,
}

impl UrlState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InFlight => "in_flight",
            Self::Visited => "visited",
        }
    }
}

impl fmt::Display for UrlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
