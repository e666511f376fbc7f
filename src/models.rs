//! Data models for processed articles.
//!
//! This module defines the records the analysis pipeline hands back to its
//! callers:
//! - [`ProcessingStatus`]: the terminal outcome assigned to a single URL
//! - [`FailureStatus`]: the subset of outcomes that carry no rating
//! - [`ProcessedArticle`]: the per-URL result, including the jaundice rating
//!
//! Both types serialize to the JSON shape returned by the HTTP front end.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal outcome of processing one article URL.
///
/// Exactly one status is assigned per URL and it is never revised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessingStatus {
    /// The article was fetched, sanitized, normalized and scored.
    Ok,
    /// The page could not be retrieved (transport failure or non-success HTTP status).
    FetchError,
    /// No sanitizer could extract article text from the page.
    ParsingError,
    /// Either the fetch or the text analysis ran past its deadline.
    Timeout,
}

impl ProcessingStatus {
    /// The wire name of the status, e.g. `"FETCH_ERROR"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingStatus::Ok => "OK",
            ProcessingStatus::FetchError => "FETCH_ERROR",
            ProcessingStatus::ParsingError => "PARSING_ERROR",
            ProcessingStatus::Timeout => "TIMEOUT",
        }
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A terminal outcome other than [`ProcessingStatus::Ok`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureStatus {
    FetchError,
    ParsingError,
    Timeout,
}

impl From<FailureStatus> for ProcessingStatus {
    fn from(status: FailureStatus) -> Self {
        match status {
            FailureStatus::FetchError => ProcessingStatus::FetchError,
            FailureStatus::ParsingError => ProcessingStatus::ParsingError,
            FailureStatus::Timeout => ProcessingStatus::Timeout,
        }
    }
}

impl fmt::Display for FailureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(ProcessingStatus::from(*self).as_str())
    }
}

/// The result of processing a single article URL.
///
/// `rating` and `word_count` are present if and only if `status` is
/// [`ProcessingStatus::Ok`]; the constructors enforce this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedArticle {
    /// The article URL exactly as it was submitted.
    pub url: String,
    /// The terminal status reached for this URL.
    pub status: ProcessingStatus,
    /// Percentage of charged words among the article's normalized words.
    pub rating: Option<f64>,
    /// Number of normalized words the rating was computed over.
    pub word_count: Option<usize>,
}

impl ProcessedArticle {
    /// A successfully scored article.
    pub fn ok(url: impl Into<String>, rating: f64, word_count: usize) -> Self {
        Self {
            url: url.into(),
            status: ProcessingStatus::Ok,
            rating: Some(rating),
            word_count: Some(word_count),
        }
    }

    /// An article that stopped at a failure status.
    pub fn failed(url: impl Into<String>, status: FailureStatus) -> Self {
        Self {
            url: url.into(),
            status: status.into(),
            rating: None,
            word_count: None,
        }
    }

    /// Render the article as a short human-readable block for the batch driver.
    pub fn format(&self) -> String {
        let rating = self
            .rating
            .map(|r| format!("{r:.2}%"))
            .unwrap_or_else(|| "-".to_string());
        let words = self
            .word_count
            .map(|w| w.to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "URL: {}\nStatus: {}\nRating: {}\nWords: {}\n",
            self.url, self.status, rating, words
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_article_carries_rating_and_words() {
        let article = ProcessedArticle::ok("https://example.com/a", 12.5, 80);
        assert_eq!(article.status, ProcessingStatus::Ok);
        assert_eq!(article.rating, Some(12.5));
        assert_eq!(article.word_count, Some(80));
    }

    #[test]
    fn test_failed_article_has_no_rating() {
        let article = ProcessedArticle::failed("https://example.com/a", FailureStatus::Timeout);
        assert_eq!(article.status, ProcessingStatus::Timeout);
        assert!(article.rating.is_none());
        assert!(article.word_count.is_none());
    }

    #[test]
    fn test_failure_statuses_are_never_ok() {
        for failure in [
            FailureStatus::FetchError,
            FailureStatus::ParsingError,
            FailureStatus::Timeout,
        ] {
            let article = ProcessedArticle::failed("https://example.com/a", failure);
            assert_ne!(article.status, ProcessingStatus::Ok);
            assert_eq!(article.status.as_str(), failure.to_string());
        }
    }

    #[test]
    fn test_status_serializes_in_screaming_case() {
        let json = serde_json::to_string(&ProcessingStatus::ParsingError).unwrap();
        assert_eq!(json, r#""PARSING_ERROR""#);

        let back: ProcessingStatus = serde_json::from_str(r#""FETCH_ERROR""#).unwrap();
        assert_eq!(back, ProcessingStatus::FetchError);
    }

    #[test]
    fn test_failed_article_json_has_null_fields() {
        let article = ProcessedArticle::failed("https://example.com/x", FailureStatus::FetchError);
        let value = serde_json::to_value(&article).unwrap();

        assert_eq!(value["url"], "https://example.com/x");
        assert_eq!(value["status"], "FETCH_ERROR");
        assert!(value["rating"].is_null());
        assert!(value["word_count"].is_null());
    }

    #[test]
    fn test_format_contains_all_fields() {
        let text = ProcessedArticle::ok("https://example.com/a", 3.456, 120).format();
        assert!(text.contains("URL: https://example.com/a"));
        assert!(text.contains("Status: OK"));
        assert!(text.contains("Rating: 3.46%"));
        assert!(text.contains("Words: 120"));

        let text = ProcessedArticle::failed("https://example.com/b", FailureStatus::Timeout).format();
        assert!(text.contains("Status: TIMEOUT"));
        assert!(text.contains("Rating: -"));
    }
}
