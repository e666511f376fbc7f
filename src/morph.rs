//! Morphological analysis used to reduce words to their normal form.
//!
//! The analyzer is injected into the pipeline through the [`Morphology`]
//! trait. It is built once at startup and shared read-only across all
//! concurrent analyses, so implementations must be `Send + Sync`.

use std::collections::HashMap;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument, warn};

/// Reduces a lowercased word to its dictionary (normal) form.
pub trait Morphology: Send + Sync {
    /// Return the normal form of `word`. The input is already lowercased.
    fn normal_form(&self, word: &str) -> String;
}

/// A lookup-table analyzer built from a lemma dictionary.
///
/// Two file layouts are understood, and may be mixed:
/// - the OpenCorpora plain-text dictionary (`dict.opcorpora.txt`): a numeric
///   lexeme id line, then one `FORM<TAB>grammemes` line per word form, with a
///   blank line closing the lexeme. The first form of a lexeme is its lemma;
/// - `form<TAB>lemma` lines outside any lexeme block.
///
/// When a form belongs to several lexemes the first one read wins. Words
/// missing from the table are returned unchanged.
#[derive(Debug, Clone, Default)]
pub struct DictionaryMorphology {
    lemmas: HashMap<String, String>,
}

impl DictionaryMorphology {
    /// Build an analyzer from `(form, lemma)` pairs.
    pub fn from_pairs<I, F, L>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (F, L)>,
        F: AsRef<str>,
        L: Into<String>,
    {
        let lemmas = pairs
            .into_iter()
            .map(|(form, lemma)| (form.as_ref().to_lowercase(), lemma.into()))
            .collect();
        Self { lemmas }
    }

    /// Parse dictionary text. Lines starting with `#` and malformed lines
    /// are skipped.
    pub fn parse(content: &str) -> Self {
        let mut lemmas: HashMap<String, String> = HashMap::new();
        // `Some` while inside an OpenCorpora lexeme; holds its lemma once read.
        let mut lexeme: Option<Option<String>> = None;
        let mut skipped = 0usize;

        for line in content.lines().map(str::trim) {
            if line.is_empty() {
                lexeme = None;
                continue;
            }
            if line.starts_with('#') {
                continue;
            }
            if line.bytes().all(|b| b.is_ascii_digit()) {
                lexeme = Some(None);
                continue;
            }
            let Some((form, rest)) = line.split_once('\t') else {
                skipped += 1;
                continue;
            };
            let form = form.trim().to_lowercase();
            if form.is_empty() {
                skipped += 1;
                continue;
            }
            let lemma = match &mut lexeme {
                Some(head) => head.get_or_insert_with(|| form.clone()).clone(),
                None => {
                    let lemma = rest.trim().to_lowercase();
                    if lemma.is_empty() {
                        skipped += 1;
                        continue;
                    }
                    lemma
                }
            };
            lemmas.entry(form).or_insert(lemma);
        }

        if skipped > 0 {
            warn!(skipped, "Skipped malformed dictionary lines");
        }
        Self { lemmas }
    }

    /// Load a dictionary file from disk.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or yields no entries: scoring
    /// against surface forms would silently under-count charged words.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub async fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let content = fs::read_to_string(path).await.map_err(|e| {
            format!(
                "cannot read lemma dictionary {}: {e} (see README for obtaining dict.opcorpora.txt)",
                path.display()
            )
        })?;
        let morph = Self::parse(&content);
        if morph.is_empty() {
            return Err(format!("lemma dictionary {} has no entries", path.display()).into());
        }
        info!(entries = morph.len(), "Loaded morphology dictionary");
        Ok(morph)
    }

    pub fn len(&self) -> usize {
        self.lemmas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lemmas.is_empty()
    }
}

impl Morphology for DictionaryMorphology {
    fn normal_form(&self, word: &str) -> String {
        self.lemmas
            .get(word)
            .cloned()
            .unwrap_or_else(|| word.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_unknown_word_is_returned_unchanged() {
        let morph = DictionaryMorphology::default();
        assert_eq!(morph.normal_form("во-первых"), "во-первых");
    }

    #[test]
    fn test_parse_dictionary() {
        let morph = DictionaryMorphology::parse(
            "# form\tlemma\nхочет\tхотеть\n\nСтало\tстать\nbroken line\n",
        );
        assert_eq!(morph.len(), 2);
        assert_eq!(morph.normal_form("хочет"), "хотеть");
        // forms are keyed in lowercase
        assert_eq!(morph.normal_form("стало"), "стать");
        assert_eq!(morph.normal_form("началом"), "началом");
    }

    #[test]
    fn test_parse_opencorpora_lexemes() {
        let morph = DictionaryMorphology::parse(concat!(
            "11\n",
            "ХОТЕТЬ\tINFN,impf,tran\n",
            "ХОЧУ\tVERB,impf,tran sing,1per,pres,indc\n",
            "ХОЧЕТ\tVERB,impf,tran sing,3per,pres,indc\n",
            "\n",
            "12\n",
            "СТАТЬ\tINFN,perf,intr\n",
            "СТАЛО\tVERB,perf,intr neut,sing,past,indc\n",
            "СТАЛИ\tVERB,perf,intr plur,past,indc\n",
            "\n",
            "13\n",
            "СТАЛЬ\tNOUN,inan,femn sing,nomn\n",
            "СТАЛИ\tNOUN,inan,femn sing,gent\n",
            "\n",
            "началом\tначало\n",
        ));
        assert_eq!(morph.normal_form("хочет"), "хотеть");
        assert_eq!(morph.normal_form("хотеть"), "хотеть");
        assert_eq!(morph.normal_form("стало"), "стать");
        // ambiguous forms keep the first lexeme
        assert_eq!(morph.normal_form("стали"), "стать");
        assert_eq!(morph.normal_form("сталь"), "сталь");
        assert_eq!(morph.normal_form("началом"), "начало");
    }

    #[tokio::test]
    async fn test_load_dictionary_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "началом\tначало").unwrap();

        let morph = DictionaryMorphology::load(file.path()).await.unwrap();
        assert_eq!(morph.normal_form("началом"), "начало");
    }

    #[tokio::test]
    async fn test_load_missing_dictionary_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = DictionaryMorphology::load(&dir.path().join("dict.opcorpora.txt"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("cannot read lemma dictionary"));
    }

    #[tokio::test]
    async fn test_load_empty_dictionary_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# nothing here").unwrap();

        let err = DictionaryMorphology::load(file.path()).await.unwrap_err();
        assert!(err.to_string().contains("has no entries"));
    }
}
