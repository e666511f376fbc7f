//! Batch coordination: run the article processor over many URLs at once.
//!
//! All URLs of a batch are processed concurrently on the calling task. Each
//! result is written into the slot of its input index, so the returned list
//! is in input order no matter which article finished first. The batch only
//! returns once every URL has reached a terminal status.

use crate::analyzer::{process_article, AnalysisContext};
use crate::config::Settings;
use crate::fetcher::build_client;
use crate::models::{ProcessedArticle, ProcessingStatus};
use crate::morph::Morphology;
use crate::sanitizers::SanitizerRegistry;
use crate::words::ChargedWords;
use futures::stream::{self, StreamExt};
use std::error::Error;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument};

/// Process every URL concurrently and return one result per URL, in input order.
///
/// A failing URL only affects its own slot; siblings keep running.
#[instrument(level = "info", skip_all, fields(urls = urls.len()))]
pub async fn process_batch(ctx: &AnalysisContext, urls: &[String]) -> Vec<ProcessedArticle> {
    let t0 = Instant::now();
    let mut slots: Vec<Option<ProcessedArticle>> = vec![None; urls.len()];

    // Owned URLs keep the per-item future free of a borrow into the stream,
    // which the server's `Send` handler future requires.
    let mut results = stream::iter(urls.iter().cloned().enumerate())
        .map(|(index, url)| async move { (index, process_article(ctx, &url).await) })
        .buffer_unordered(urls.len().max(1));

    while let Some((index, article)) = results.next().await {
        slots[index] = Some(article);
    }

    let articles: Vec<ProcessedArticle> = slots.into_iter().flatten().collect();
    debug_assert_eq!(articles.len(), urls.len());

    let ok = articles
        .iter()
        .filter(|a| a.status == ProcessingStatus::Ok)
        .count();
    info!(
        total = articles.len(),
        ok,
        failed = articles.len() - ok,
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Batch processed"
    );
    articles
}

/// Build a fresh HTTP session and process `urls` with it.
///
/// # Errors
///
/// Only fails when the HTTP session cannot be created. Per-URL failures are
/// reported through each article's status instead.
pub async fn analyze_urls(
    urls: &[String],
    morph: Arc<dyn Morphology>,
    charged_words: Arc<ChargedWords>,
    settings: &Settings,
) -> Result<Vec<ProcessedArticle>, Box<dyn Error>> {
    let client = build_client()?;
    let ctx = AnalysisContext::new(
        client,
        morph,
        charged_words,
        Arc::new(SanitizerRegistry::with_defaults()),
        settings,
    );
    Ok(process_batch(&ctx, urls).await)
}
