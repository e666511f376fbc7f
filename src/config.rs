//! Runtime settings.
//!
//! Settings start from built-in defaults, are optionally replaced by a YAML
//! file (`--config`), and are finally overridden by individual command-line
//! flags or their `JAUNDICE_*` environment variables.
//!
//! ```yaml
//! fetch_timeout_secs: 2
//! analysis_timeout_secs: 3
//! max_urls: 10
//! bind_address: "127.0.0.1:8080"
//! negative_words: charged_words/negative_words.txt
//! positive_words: charged_words/positive_words.txt
//! lemmas: dict/dict.opcorpora.txt
//! ```

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::{info, instrument};

pub const DEFAULT_FETCH_TIMEOUT_SECS: f64 = 2.0;
pub const DEFAULT_ANALYSIS_TIMEOUT_SECS: f64 = 3.0;
pub const DEFAULT_MAX_URLS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Deadline for downloading one page, in seconds.
    pub fetch_timeout_secs: f64,
    /// Deadline for normalizing one article's text, in seconds.
    pub analysis_timeout_secs: f64,
    /// Most URLs accepted in a single HTTP request.
    pub max_urls: usize,
    /// Address the HTTP front end listens on.
    pub bind_address: SocketAddr,
    /// Line-delimited negative charged words.
    pub negative_words: PathBuf,
    /// Line-delimited positive charged words.
    pub positive_words: PathBuf,
    /// Lemma dictionary for the morphology analyzer; required at startup.
    pub lemmas: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            analysis_timeout_secs: DEFAULT_ANALYSIS_TIMEOUT_SECS,
            max_urls: DEFAULT_MAX_URLS,
            bind_address: SocketAddr::from(([127, 0, 0, 1], 8080)),
            negative_words: PathBuf::from("charged_words/negative_words.txt"),
            positive_words: PathBuf::from("charged_words/positive_words.txt"),
            lemmas: PathBuf::from("dict/dict.opcorpora.txt"),
        }
    }
}

impl Settings {
    /// Parse settings from YAML text. Missing keys keep their defaults.
    pub fn from_yaml(content: &str) -> Result<Self, Box<dyn Error>> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Read settings from a YAML file.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub async fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| format!("cannot read config {}: {e}", path.display()))?;
        let settings = Self::from_yaml(&content)?;
        info!("Loaded settings file");
        Ok(settings)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if !(self.fetch_timeout_secs.is_finite() && self.fetch_timeout_secs > 0.0) {
            return Err(format!("fetch_timeout_secs must be positive, got {}", self.fetch_timeout_secs).into());
        }
        if !(self.analysis_timeout_secs.is_finite() && self.analysis_timeout_secs > 0.0) {
            return Err(format!(
                "analysis_timeout_secs must be positive, got {}",
                self.analysis_timeout_secs
            )
            .into());
        }
        if self.max_urls == 0 {
            return Err("max_urls must be at least 1".into());
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.fetch_timeout_secs)
    }

    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.analysis_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.fetch_timeout(), Duration::from_secs(2));
        assert_eq!(settings.analysis_timeout(), Duration::from_secs(3));
        assert_eq!(settings.max_urls, 10);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let settings = Settings::from_yaml("max_urls: 25\nfetch_timeout_secs: 0.5\n").unwrap();
        assert_eq!(settings.max_urls, 25);
        assert_eq!(settings.fetch_timeout(), Duration::from_millis(500));
        assert_eq!(settings.analysis_timeout_secs, DEFAULT_ANALYSIS_TIMEOUT_SECS);
        assert_eq!(settings.lemmas, PathBuf::from("dict/dict.opcorpora.txt"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let settings = Settings {
            max_urls: 0,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());

        let settings = Settings {
            analysis_timeout_secs: -1.0,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "bind_address: \"0.0.0.0:9000\"").unwrap();
        writeln!(file, "lemmas: dict/lemmas.tsv").unwrap();

        let settings = Settings::load(file.path()).await.unwrap();
        assert_eq!(settings.bind_address.port(), 9000);
        assert_eq!(settings.lemmas, PathBuf::from("dict/lemmas.tsv"));
    }
}
