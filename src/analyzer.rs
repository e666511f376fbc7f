//! Per-article processing: fetch, sanitize, normalize and score one URL.
//!
//! [`process_article`] drives a single URL through the pipeline and always
//! produces exactly one [`ProcessedArticle`]. Every failure along the way is
//! expressed as a [`ProcessingError`] and converted to a
//! [`FailureStatus`] in one place, so nothing escapes to the batch
//! coordinator.
//!
//! # Deadlines
//!
//! Two independent deadlines apply:
//! - the fetch deadline bounds the network request (see [`crate::fetcher`]);
//! - the analysis deadline bounds word normalization only and starts after
//!   the page has been fetched and sanitized.
//!
//! The fetch has always finished before normalization begins, so the two
//! can never race.

use crate::config::Settings;
use crate::fetcher;
use crate::models::{FailureStatus, ProcessedArticle};
use crate::morph::Morphology;
use crate::sanitizers::{ContentNotRecognized, SanitizerRegistry};
use crate::text_tools::{calculate_jaundice_rate, split_by_words};
use crate::utils::truncate_for_log;
use crate::words::ChargedWords;
use reqwest::Client;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

/// Pipeline stage that ran out of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Analysis,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Fetch => f.write_str("fetch"),
            Stage::Analysis => f.write_str("analysis"),
        }
    }
}

/// Why an article did not reach the `OK` status.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// Transport failure, DNS failure or non-success HTTP status.
    #[error("fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// No sanitizer could extract the article from the page.
    #[error(transparent)]
    ContentNotRecognized(#[from] ContentNotRecognized),

    /// A stage exceeded its deadline.
    #[error("{0} deadline exceeded")]
    Timeout(Stage),
}

impl From<&ProcessingError> for FailureStatus {
    fn from(err: &ProcessingError) -> Self {
        match err {
            ProcessingError::Fetch(_) => FailureStatus::FetchError,
            ProcessingError::ContentNotRecognized(_) => FailureStatus::ParsingError,
            ProcessingError::Timeout(_) => FailureStatus::Timeout,
        }
    }
}

/// Shared, read-only dependencies of every article task.
///
/// Built once at startup; cloning only bumps reference counts.
#[derive(Clone)]
pub struct AnalysisContext {
    pub client: Client,
    pub morph: Arc<dyn Morphology>,
    pub charged_words: Arc<ChargedWords>,
    pub sanitizers: Arc<SanitizerRegistry>,
    pub fetch_timeout: Duration,
    pub analysis_timeout: Duration,
}

impl fmt::Debug for AnalysisContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisContext")
            .field("charged_words", &self.charged_words.len())
            .field("sanitizers", &self.sanitizers)
            .field("fetch_timeout", &self.fetch_timeout)
            .field("analysis_timeout", &self.analysis_timeout)
            .finish()
    }
}

impl AnalysisContext {
    /// Assemble a context around an existing HTTP session.
    pub fn new(
        client: Client,
        morph: Arc<dyn Morphology>,
        charged_words: Arc<ChargedWords>,
        sanitizers: Arc<SanitizerRegistry>,
        settings: &Settings,
    ) -> Self {
        Self {
            client,
            morph,
            charged_words,
            sanitizers,
            fetch_timeout: settings.fetch_timeout(),
            analysis_timeout: settings.analysis_timeout(),
        }
    }
}

/// Outcome of analyzing one article's text.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub rating: f64,
    pub word_count: usize,
}

/// Normalize `plaintext` under `deadline` and score it.
///
/// Only normalization is bounded; scoring is a quick synchronous pass.
pub async fn analyze_article(
    morph: &dyn Morphology,
    charged_words: &ChargedWords,
    plaintext: &str,
    deadline: Duration,
) -> Result<Analysis, ProcessingError> {
    let words = timeout(deadline, split_by_words(morph, plaintext))
        .await
        .map_err(|_| ProcessingError::Timeout(Stage::Analysis))?;
    let rating = calculate_jaundice_rate(&words, charged_words);
    Ok(Analysis {
        rating,
        word_count: words.len(),
    })
}

async fn run_pipeline(ctx: &AnalysisContext, url: &str) -> Result<Analysis, ProcessingError> {
    let html = fetcher::fetch(&ctx.client, url, ctx.fetch_timeout).await?;
    let plaintext = ctx.sanitizers.sanitize(url, &html)?;
    debug!(preview = %truncate_for_log(&plaintext, 120), "Sanitized article");
    analyze_article(
        ctx.morph.as_ref(),
        &ctx.charged_words,
        &plaintext,
        ctx.analysis_timeout,
    )
    .await
}

/// Process one URL end-to-end and return its terminal result.
///
/// Never fails: every error becomes a non-`OK` status.
#[instrument(level = "info", skip_all, fields(%url))]
pub async fn process_article(ctx: &AnalysisContext, url: &str) -> ProcessedArticle {
    let t0 = Instant::now();
    let result = run_pipeline(ctx, url).await;
    let elapsed_ms = t0.elapsed().as_millis() as u64;

    match result {
        Ok(analysis) => {
            info!(
                rating = analysis.rating,
                words = analysis.word_count,
                elapsed_ms,
                "Article analyzed"
            );
            ProcessedArticle::ok(url, analysis.rating, analysis.word_count)
        }
        Err(err) => {
            let status = FailureStatus::from(&err);
            warn!(%status, error = %err, elapsed_ms, "Article analysis aborted");
            ProcessedArticle::failed(url, status)
        }
    }
}
