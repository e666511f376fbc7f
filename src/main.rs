//! # Jaundice Rate
//!
//! Scores news articles by their "jaundice rate": the percentage of an
//! article's words that belong to a curated list of emotionally charged
//! words.
//!
//! ## Usage
//!
//! ```sh
//! jaundice_rate batch https://inosmi.ru/20221214/kitay-258839981.html
//! jaundice_rate serve --bind 127.0.0.1:8080
//! ```
//!
//! ## Architecture
//!
//! Every URL goes through the same pipeline, concurrently with its siblings:
//! 1. **Fetching**: download the page under the fetch deadline
//! 2. **Sanitizing**: extract plain article text with the source's sanitizer
//! 3. **Normalizing**: split into words and reduce them to normal form under
//!    the analysis deadline
//! 4. **Scoring**: compute the share of charged words
//!
//! Each URL ends in exactly one of `OK`, `FETCH_ERROR`, `PARSING_ERROR` or
//! `TIMEOUT`; a failing URL never affects the others.

use clap::Parser;
use itertools::Itertools;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod analyzer;
mod batch;
mod cli;
mod config;
mod fetcher;
mod models;
mod morph;
mod sanitizers;
mod server;
mod text_tools;
mod utils;
mod words;

use analyzer::AnalysisContext;
use cli::{Cli, Command};
use config::Settings;
use morph::{DictionaryMorphology, Morphology};
use sanitizers::SanitizerRegistry;
use server::AppState;

/// Articles analyzed when `batch` is run without URLs.
const SAMPLE_ARTICLES: &[&str] = &[
    "https://inosmi.ru/20221214/eneregetika-258837716.html",
    "https://inosmi.ru/20221214/kitay-258839981.html",
    "https://inosmi.ru/20221214/ultrapravye-258844791.html",
    "https://inosmi.ru/20221214/kitay-258839420.html",
    "https://inosmi.ru/20221214/katargeyt-258839069.html",
    "https://inosmi.ru/not/exist.html",
    "https://lenta.ru/brief/2021/08/26/afg_terror/",
];

async fn load_settings(cli: &Cli) -> Result<Settings, Box<dyn Error>> {
    let mut settings = match &cli.options.config {
        Some(path) => Settings::load(path).await?,
        None => Settings::default(),
    };
    cli.apply_to(&mut settings);
    settings.validate()?;
    Ok(settings)
}

/// The lemma dictionary is mandatory: without it words stay in surface form
/// and never match the charged-word lemmas.
async fn load_morphology(settings: &Settings) -> Result<Arc<dyn Morphology>, Box<dyn Error>> {
    Ok(Arc::new(DictionaryMorphology::load(&settings.lemmas).await?))
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let settings = load_settings(&cli).await?;
    debug!(?settings, "Effective settings");

    // Process-wide read-only state, built once before any article task starts.
    let charged_words =
        Arc::new(words::load_charged_words(&settings.negative_words, &settings.positive_words).await?);
    if charged_words.is_empty() {
        warn!("Charged word list is empty; every rating will be 0");
    }
    let morph = load_morphology(&settings).await?;

    match &cli.command {
        Command::Batch { json, .. } => {
            let mut urls = cli.command.batch_urls();
            if urls.is_empty() {
                info!("No URLs given; analyzing sample articles");
                urls = SAMPLE_ARTICLES.iter().map(|u| u.to_string()).collect();
            }

            let articles = batch::analyze_urls(&urls, morph, charged_words, &settings).await?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&articles)?);
            } else {
                println!("{}", articles.iter().map(|a| a.format()).join("\n"));
            }
        }
        Command::Serve { .. } => {
            let client = fetcher::build_client()?;
            let ctx = AnalysisContext::new(
                client,
                morph,
                charged_words,
                Arc::new(SanitizerRegistry::with_defaults()),
                &settings,
            );
            let state = AppState {
                ctx: Arc::new(ctx),
                max_urls: settings.max_urls,
            };
            server::start_server(settings.bind_address, state).await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let cli = Cli::parse();
    debug!(?cli, "Parsed CLI arguments");

    if let Err(e) = run(cli).await {
        error!(error = %e, "jaundice_rate failed");
        return Err(e);
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, "Execution complete");
    Ok(())
}
