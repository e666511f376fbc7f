//! Source-specific sanitizers that extract article text from page markup.
//!
//! Every supported news site gets its own adapter implementing [`Sanitizer`].
//! Adapters are registered by host name in a [`SanitizerRegistry`], which
//! the article processor consults for each fetched URL.
//!
//! # Supported Sources
//!
//! | Source | Module | Host |
//! |--------|--------|------|
//! | ИноСМИ | [`inosmi`] | `inosmi.ru` |
//!
//! A URL whose host has no registered sanitizer, or whose page does not
//! contain the markup its sanitizer expects, is reported as
//! [`ContentNotRecognized`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

pub mod html_tools;
pub mod inosmi;

/// No extraction rule matched the page.
#[derive(Debug, Clone, Error)]
#[error("article content not recognized: {0}")]
pub struct ContentNotRecognized(pub String);

/// Extracts plain article text from the raw markup of one news source.
pub trait Sanitizer: Send + Sync {
    /// Identifier of the source this sanitizer understands, e.g. `"inosmi_ru"`.
    fn name(&self) -> &'static str;

    /// Strip markup from `html` and return the article's plain text.
    fn sanitize(&self, html: &str) -> Result<String, ContentNotRecognized>;
}

/// Sanitizers keyed by the host they handle.
#[derive(Clone, Default)]
pub struct SanitizerRegistry {
    by_host: HashMap<String, Arc<dyn Sanitizer>>,
}

impl fmt::Debug for SanitizerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut hosts: Vec<(&String, &'static str)> = self
            .by_host
            .iter()
            .map(|(host, s)| (host, s.name()))
            .collect();
        hosts.sort();
        f.debug_struct("SanitizerRegistry")
            .field("hosts", &hosts)
            .finish()
    }
}

impl SanitizerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry with every built-in adapter.
    pub fn with_defaults() -> Self {
        Self::new().register("inosmi.ru", inosmi::InosmiSanitizer)
    }

    /// Register `sanitizer` for `host` and its subdomains.
    pub fn register(mut self, host: &str, sanitizer: impl Sanitizer + 'static) -> Self {
        self.by_host
            .insert(host.trim_start_matches("www.").to_lowercase(), Arc::new(sanitizer));
        self
    }

    /// Find the sanitizer responsible for `url`.
    ///
    /// A host matches a registration exactly or as one of its subdomains.
    pub fn resolve(&self, url: &str) -> Result<&dyn Sanitizer, ContentNotRecognized> {
        let parsed = Url::parse(url).map_err(|e| ContentNotRecognized(format!("bad url: {e}")))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| ContentNotRecognized("url has no host".to_string()))?
            .to_lowercase();

        let mut candidate = host.as_str();
        loop {
            if let Some(sanitizer) = self.by_host.get(candidate) {
                return Ok(sanitizer.as_ref());
            }
            match candidate.split_once('.') {
                Some((_, parent)) if !parent.is_empty() => candidate = parent,
                _ => break,
            }
        }
        Err(ContentNotRecognized(format!("no sanitizer for host {host}")))
    }

    /// Resolve the sanitizer for `url` and run it over `html`.
    pub fn sanitize(&self, url: &str, html: &str) -> Result<String, ContentNotRecognized> {
        self.resolve(url)?.sanitize(html)
    }
}
