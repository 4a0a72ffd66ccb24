//! Query and body text preprocessing
//!
//! Turns free text into a sequence of stems: lowercase, split into word
//! tokens, drop English stopwords, stem what remains.

use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;

/// English stopwords dropped before stemming
const STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

/// Lowercases and splits text into word tokens
///
/// A token is a maximal run of alphanumeric characters, optionally joined by
/// inner apostrophes (`don't`, `user's`).
pub fn word_tokens(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = lowered.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_alphanumeric() {
            current.push(c);
        } else if c == '\''
            && !current.is_empty()
            && chars.peek().map_or(false, |n| n.is_alphanumeric())
        {
            current.push(c);
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

/// Normalizes free text into stems
///
/// Holds the stopword set and stemmer so repeated calls do not rebuild them.
/// Immutable after construction; share it freely across threads.
pub struct QueryPreprocessor {
    stopwords: HashSet<&'static str>,
    stemmer: Stemmer,
}

impl QueryPreprocessor {
    pub fn new() -> Self {
        Self {
            stopwords: STOPWORDS.iter().copied().collect(),
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// Returns the stems of `text`'s non-stopword tokens, in text order
    ///
    /// # Example
    ///
    /// ```
    /// use docs_scout::search::QueryPreprocessor;
    ///
    /// let preprocessor = QueryPreprocessor::new();
    /// assert_eq!(preprocessor.tokenize("How to track the events"), vec!["track", "event"]);
    /// ```
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        word_tokens(text)
            .into_iter()
            .filter(|token| !self.is_stopword(token))
            .map(|token| self.stemmer.stem(&token).into_owned())
            .collect()
    }

    /// Same as [`tokenize`](Self::tokenize), deduplicated
    pub fn stem_set(&self, text: &str) -> HashSet<String> {
        self.tokenize(text).into_iter().collect()
    }
}

impl Default for QueryPreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for QueryPreprocessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryPreprocessor")
            .field("stopwords", &self.stopwords.len())
            .finish_non_exhaustive()
    }
}
