//! Match strategies
//!
//! Each strategy looks at one document for one query and contributes zero or
//! more results. The engine runs a fixed, ordered list of them per document.

use crate::document::Document;
use crate::search::fuzzy::partial_ratio;
use crate::search::preprocess::QueryPreprocessor;
use std::collections::HashSet;
use std::fmt;

/// Default minimum fuzzy score for a match
pub const DEFAULT_FUZZY_THRESHOLD: u8 = 70;

/// Which strategy produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Tokenized,
    Heading,
    Fuzzy { score: u8 },
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => write!(f, "Exact Match"),
            Self::Tokenized => write!(f, "Tokenized Match"),
            Self::Heading => write!(f, "Heading Match"),
            Self::Fuzzy { score } => write!(f, "Fuzzy Match (Score: {})", score),
        }
    }
}

/// One match of a query against a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    /// Start of the body, or the matching heading for heading matches
    pub excerpt: String,
    pub match_kind: MatchKind,
}

impl SearchResult {
    fn body_match(view: &DocumentView<'_>, match_kind: MatchKind) -> Self {
        Self {
            title: view.document.title.clone(),
            url: view.document.url.clone(),
            excerpt: view.document.excerpt(view.excerpt_chars),
            match_kind,
        }
    }
}

/// A query normalized once, at search entry
#[derive(Debug, Clone)]
pub struct PreparedQuery {
    /// Trimmed and lowercased
    pub text: String,
    pub stems: HashSet<String>,
}

impl PreparedQuery {
    pub fn new(query: &str, preprocessor: &QueryPreprocessor) -> Self {
        let text = query.trim().to_lowercase();
        let stems = preprocessor.stem_set(&text);
        Self { text, stems }
    }
}

/// A document with its derived forms computed once per search
#[derive(Debug)]
pub struct DocumentView<'a> {
    pub document: &'a Document,
    pub lowered_body: String,
    pub stems: HashSet<String>,
    pub excerpt_chars: usize,
}

impl<'a> DocumentView<'a> {
    pub fn new(
        document: &'a Document,
        preprocessor: &QueryPreprocessor,
        excerpt_chars: usize,
    ) -> Self {
        Self {
            document,
            lowered_body: document.body.to_lowercase(),
            stems: preprocessor.stem_set(&document.body),
            excerpt_chars,
        }
    }
}

/// One way of matching a query against a document
pub trait MatchStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn evaluate(&self, query: &PreparedQuery, view: &DocumentView<'_>) -> Vec<SearchResult>;
}

/// Case-insensitive substring of the query in the body
#[derive(Debug, Default, Clone, Copy)]
pub struct ExactMatch;

impl MatchStrategy for ExactMatch {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn evaluate(&self, query: &PreparedQuery, view: &DocumentView<'_>) -> Vec<SearchResult> {
        if view.lowered_body.contains(&query.text) {
            vec![SearchResult::body_match(view, MatchKind::Exact)]
        } else {
            Vec::new()
        }
    }
}

/// Query and body share at least one stem
#[derive(Debug, Default, Clone, Copy)]
pub struct TokenizedMatch;

impl MatchStrategy for TokenizedMatch {
    fn name(&self) -> &'static str {
        "tokenized"
    }

    fn evaluate(&self, query: &PreparedQuery, view: &DocumentView<'_>) -> Vec<SearchResult> {
        if query.stems.is_disjoint(&view.stems) {
            Vec::new()
        } else {
            vec![SearchResult::body_match(view, MatchKind::Tokenized)]
        }
    }
}

/// Case-insensitive substring of the query in a heading, one result per
/// matching heading
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadingMatch;

impl MatchStrategy for HeadingMatch {
    fn name(&self) -> &'static str {
        "heading"
    }

    fn evaluate(&self, query: &PreparedQuery, view: &DocumentView<'_>) -> Vec<SearchResult> {
        view.document
            .headings
            .iter()
            .filter(|heading| heading.text.to_lowercase().contains(&query.text))
            .map(|heading| SearchResult {
                title: view.document.title.clone(),
                url: view.document.url.clone(),
                excerpt: format!("Heading Match: {}", heading.text),
                match_kind: MatchKind::Heading,
            })
            .collect()
    }
}

/// Partial-ratio similarity of query and body at or above a threshold
#[derive(Debug, Clone, Copy)]
pub struct FuzzyMatch {
    pub threshold: u8,
}

impl Default for FuzzyMatch {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_FUZZY_THRESHOLD,
        }
    }
}

impl MatchStrategy for FuzzyMatch {
    fn name(&self) -> &'static str {
        "fuzzy"
    }

    fn evaluate(&self, query: &PreparedQuery, view: &DocumentView<'_>) -> Vec<SearchResult> {
        let score = partial_ratio(&query.text, &view.lowered_body);
        if score >= self.threshold {
            vec![SearchResult::body_match(view, MatchKind::Fuzzy { score })]
        } else {
            Vec::new()
        }
    }
}

/// Exact, Tokenized, Heading, Fuzzy: the order results appear in per document
pub fn default_strategies(fuzzy_threshold: u8) -> Vec<Box<dyn MatchStrategy>> {
    vec![
        Box::new(ExactMatch),
        Box::new(TokenizedMatch),
        Box::new(HeadingMatch),
        Box::new(FuzzyMatch {
            threshold: fuzzy_threshold,
        }),
    ]
}
