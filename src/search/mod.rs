//! Multi-strategy "how-to" search over crawled documents
//!
//! This module contains:
//! - Query preprocessing (tokenizing, stopwords, stemming)
//! - Partial-ratio fuzzy similarity
//! - The exact, tokenized, heading and fuzzy match strategies
//! - The search engine running them in a fixed order

mod engine;
mod fuzzy;
mod preprocess;
mod strategy;

pub use engine::{SearchEngine, SearchError, SearchResponse, NOT_FOUND_MESSAGE};
pub use fuzzy::partial_ratio;
pub use preprocess::{word_tokens, QueryPreprocessor};
pub use strategy::{
    default_strategies, DocumentView, ExactMatch, FuzzyMatch, HeadingMatch, MatchKind,
    MatchStrategy, PreparedQuery, SearchResult, TokenizedMatch, DEFAULT_FUZZY_THRESHOLD,
};
