//! Command-line interface definitions for Jaundice Rate.
//!
//! Global options tune the analysis and can also be set through `JAUNDICE_*`
//! environment variables or a YAML settings file. Any option given here wins
//! over the settings file.

use crate::config::Settings;
use crate::utils::split_urls;
use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Rate news articles by the share of emotionally charged words.
///
/// # Examples
///
/// ```sh
/// # Analyze a couple of articles and print the results
/// jaundice_rate batch https://inosmi.ru/20221214/kitay-258839981.html
///
/// # Same, as JSON, with a lemma dictionary
/// jaundice_rate --lemmas dict/lemmas.tsv batch --json --urls-list https://inosmi.ru/a.html,https://inosmi.ru/b.html
///
/// # Serve GET /?urls=... on port 8080
/// jaundice_rate serve --bind 0.0.0.0:8080
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(flatten)]
    pub options: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Default)]
pub struct GlobalOptions {
    /// Optional path to a YAML settings file
    #[arg(short, long, global = true, env = "JAUNDICE_CONFIG")]
    pub config: Option<PathBuf>,

    /// File with negative charged words, one per line
    #[arg(long, global = true, env = "JAUNDICE_NEGATIVE_WORDS")]
    pub negative_words: Option<PathBuf>,

    /// File with positive charged words, one per line
    #[arg(long, global = true, env = "JAUNDICE_POSITIVE_WORDS")]
    pub positive_words: Option<PathBuf>,

    /// Lemma dictionary for word normalization (OpenCorpora text or `form<TAB>lemma`)
    #[arg(long, global = true, env = "JAUNDICE_LEMMAS")]
    pub lemmas: Option<PathBuf>,

    /// Seconds allowed for downloading one page
    #[arg(long, global = true, env = "JAUNDICE_FETCH_TIMEOUT")]
    pub fetch_timeout: Option<f64>,

    /// Seconds allowed for normalizing one article's text
    #[arg(long, global = true, env = "JAUNDICE_ANALYSIS_TIMEOUT")]
    pub analysis_timeout: Option<f64>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a list of article URLs and print the results
    Batch {
        /// Article URLs
        urls: Vec<String>,

        /// Comma-separated article URLs, added after the positional ones
        #[arg(long)]
        urls_list: Option<String>,

        /// Print the results as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// Serve the rating endpoint over HTTP
    Serve {
        /// Address to listen on
        #[arg(short, long, env = "JAUNDICE_BIND")]
        bind: Option<SocketAddr>,

        /// Most URLs accepted in one request
        #[arg(long, env = "JAUNDICE_MAX_URLS")]
        max_urls: Option<usize>,
    },
}

impl Cli {
    /// Apply every option given on the command line on top of `settings`.
    pub fn apply_to(&self, settings: &mut Settings) {
        let opts = &self.options;
        if let Some(path) = &opts.negative_words {
            settings.negative_words = path.clone();
        }
        if let Some(path) = &opts.positive_words {
            settings.positive_words = path.clone();
        }
        if let Some(path) = &opts.lemmas {
            settings.lemmas = path.clone();
        }
        if let Some(secs) = opts.fetch_timeout {
            settings.fetch_timeout_secs = secs;
        }
        if let Some(secs) = opts.analysis_timeout {
            settings.analysis_timeout_secs = secs;
        }
        if let Command::Serve { bind, max_urls } = &self.command {
            if let Some(bind) = bind {
                settings.bind_address = *bind;
            }
            if let Some(max_urls) = max_urls {
                settings.max_urls = *max_urls;
            }
        }
    }
}

impl Command {
    /// All URLs requested by the `batch` subcommand, in order.
    pub fn batch_urls(&self) -> Vec<String> {
        match self {
            Command::Batch { urls, urls_list, .. } => urls
                .iter()
                .cloned()
                .chain(urls_list.as_deref().map(split_urls).unwrap_or_default())
                .collect(),
            Command::Serve { .. } => Vec::new(),
        }
    }
}
