//! Loading of the charged-word vocabulary.
//!
//! The vocabulary is read once at startup from two line-delimited files
//! (negative words first, then positive) and then shared read-only by every
//! concurrent analysis.

use std::collections::HashSet;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Ordered list of charged words with a membership index.
#[derive(Debug, Clone, Default)]
pub struct ChargedWords {
    words: Vec<String>,
    index: HashSet<String>,
}

impl ChargedWords {
    /// Whether `word` (already in normal form) is a charged word.
    pub fn contains(&self, word: &str) -> bool {
        self.index.contains(word)
    }

    /// The words in load order.
    #[cfg(test)]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ChargedWords {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let words: Vec<String> = iter.into_iter().map(Into::into).collect();
        let index = words.iter().cloned().collect();
        Self { words, index }
    }
}

/// Split a word file into entries, one per line.
///
/// Line terminators are stripped and blank lines skipped.
pub fn parse_words(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.trim_end_matches('\r').trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Load the charged-word list from the negative and positive word files.
///
/// # Errors
///
/// Fails if either file cannot be read. This happens during startup and is
/// fatal for the process.
#[instrument(level = "info", skip_all, fields(negative = %negative.display(), positive = %positive.display()))]
pub async fn load_charged_words(
    negative: &Path,
    positive: &Path,
) -> Result<ChargedWords, Box<dyn Error>> {
    let negative_words = fs::read_to_string(negative)
        .await
        .map_err(|e| format!("cannot read {}: {e}", negative.display()))?;
    let positive_words = fs::read_to_string(positive)
        .await
        .map_err(|e| format!("cannot read {}: {e}", positive.display()))?;

    let words: ChargedWords = parse_words(&negative_words)
        .into_iter()
        .chain(parse_words(&positive_words))
        .collect();

    info!(count = words.len(), "Loaded charged words");
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn word_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_words_strips_line_endings() {
        let words = parse_words("аутсайдер\nбанкротство\r\n\nпобег\n");
        assert_eq!(words, vec!["аутсайдер", "банкротство", "побег"]);
    }

    #[test]
    fn test_contains_uses_exact_forms() {
        let words: ChargedWords = ["аутсайдер", "банкротство"].into_iter().collect();
        assert!(words.contains("аутсайдер"));
        assert!(!words.contains("Аутсайдер"));
        assert!(!words.contains("побег"));
    }

    #[tokio::test]
    async fn test_load_charged_words_negative_first() {
        let negative = word_file("провал\nкризис\n");
        let positive = word_file("успех\n");

        let words = load_charged_words(negative.path(), positive.path())
            .await
            .unwrap();

        assert_eq!(words.words(), &["провал", "кризис", "успех"]);
        assert!(words.contains("успех"));
    }

    #[tokio::test]
    async fn test_load_charged_words_missing_file() {
        let positive = word_file("успех\n");
        let result =
            load_charged_words(Path::new("/nonexistent/negative_words.txt"), positive.path()).await;
        assert!(result.is_err());
    }
}
