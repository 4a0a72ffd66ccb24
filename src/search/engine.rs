//! Search engine: runs the match strategies over a collection

use crate::config::SearchConfig;
use crate::document::Document;
use crate::events::{Event, EventSink};
use crate::search::preprocess::QueryPreprocessor;
use crate::search::strategy::{
    default_strategies, DocumentView, MatchStrategy, PreparedQuery, SearchResult,
};
use std::sync::Arc;
use thiserror::Error;

/// Shown when no strategy matches any document
pub const NOT_FOUND_MESSAGE: &str = "Sorry, I couldn't find relevant information for your query.";

/// Search-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("Query is empty")]
    EmptyQuery,
}

/// What a search returns: matches, or the single not-found sentinel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResponse {
    Matches(Vec<SearchResult>),
    NotFound { message: String },
}

impl SearchResponse {
    fn not_found() -> Self {
        Self::NotFound {
            message: NOT_FOUND_MESSAGE.to_string(),
        }
    }

    /// Matched results; empty for the sentinel
    pub fn results(&self) -> &[SearchResult] {
        match self {
            Self::Matches(results) => results,
            Self::NotFound { .. } => &[],
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Evaluates free-text queries against documents
///
/// Stateless between calls: `search` takes `&self` and touches nothing but
/// the event sink, so one engine serves concurrent queries.
pub struct SearchEngine {
    preprocessor: QueryPreprocessor,
    strategies: Vec<Box<dyn MatchStrategy>>,
    excerpt_chars: usize,
    sink: Arc<dyn EventSink>,
}

impl SearchEngine {
    /// Creates an engine with the four default strategies
    pub fn new(config: &SearchConfig, sink: Arc<dyn EventSink>) -> Self {
        Self::with_strategies(
            default_strategies(config.fuzzy_threshold),
            config.excerpt_chars,
            sink,
        )
    }

    /// Creates an engine running `strategies` in the given order
    pub fn with_strategies(
        strategies: Vec<Box<dyn MatchStrategy>>,
        excerpt_chars: usize,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            preprocessor: QueryPreprocessor::new(),
            strategies,
            excerpt_chars,
            sink,
        }
    }

    pub fn preprocessor(&self) -> &QueryPreprocessor {
        &self.preprocessor
    }

    /// Searches `documents` for `query`
    ///
    /// Results come in document order; within a document, in strategy order.
    /// One document may produce several results, one per matching strategy
    /// (and one per matching heading).
    ///
    /// # Returns
    ///
    /// * `Ok(SearchResponse::Matches)` - At least one result
    /// * `Ok(SearchResponse::NotFound)` - Nothing matched
    /// * `Err(SearchError::EmptyQuery)` - Query is empty or whitespace only
    ///
    /// # Example
    ///
    /// ```
    /// use docs_scout::config::SearchConfig;
    /// use docs_scout::events::TracingSink;
    /// use docs_scout::{Document, MatchKind, SearchEngine};
    /// use std::sync::Arc;
    ///
    /// let engine = SearchEngine::new(&SearchConfig::default(), Arc::new(TracingSink));
    /// let docs = vec![Document {
    ///     url: "https://segment.com/docs/track".to_string(),
    ///     title: "Track".to_string(),
    ///     body: "Track events using the API".to_string(),
    ///     headings: vec![],
    /// }];
    ///
    /// let response = engine.search("track event", &docs).unwrap();
    /// assert_eq!(response.results()[0].match_kind, MatchKind::Exact);
    /// ```
    pub fn search(
        &self,
        query: &str,
        documents: &[Document],
    ) -> Result<SearchResponse, SearchError> {
        if query.trim().is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let prepared = PreparedQuery::new(query, &self.preprocessor);
        self.sink.record(&Event::SearchStarted {
            query: prepared.text.clone(),
            documents: documents.len(),
        });

        let mut results = Vec::new();
        for document in documents {
            let view = DocumentView::new(document, &self.preprocessor, self.excerpt_chars);
            for strategy in &self.strategies {
                for result in strategy.evaluate(&prepared, &view) {
                    self.sink.record(&Event::SearchMatched {
                        title: result.title.clone(),
                        url: result.url.clone(),
                        kind: result.match_kind,
                    });
                    results.push(result);
                }
            }
        }

        if results.is_empty() {
            self.sink.record(&Event::SearchNoMatches {
                query: prepared.text,
            });
            Ok(SearchResponse::not_found())
        } else {
            Ok(SearchResponse::Matches(results))
        }
    }
}

impl std::fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let strategies: Vec<_> = self.strategies.iter().map(|s| s.name()).collect();
        f.debug_struct("SearchEngine")
            .field("strategies", &strategies)
            .field("excerpt_chars", &self.excerpt_chars)
            .finish_non_exhaustive()
    }
}
