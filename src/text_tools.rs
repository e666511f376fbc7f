//! Text tokenization, normalization and jaundice scoring.
//!
//! [`split_by_words`] turns plain article text into normalized word forms and
//! [`calculate_jaundice_rate`] scores those words against the charged-word
//! vocabulary.

use crate::morph::Morphology;
use crate::words::ChargedWords;
use once_cell::sync::Lazy;
use regex::Regex;

/// Anything that is not a letter, a digit or a hyphen separates words.
static WORD_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{N}-]+").expect("valid word separator regex"));

/// Words this short carry no meaning for scoring, except the negation.
const MIN_WORD_CHARS: usize = 3;
const KEPT_SHORT_WORDS: &[&str] = &["не"];

/// Lazy iterator over the lowercased tokens of a text, see [`tokenize`].
///
/// Only the unread remainder of the text is kept between items, so the
/// iterator can be held across an `.await` in a `Send` future.
pub struct Tokens<'a> {
    rest: &'a str,
}

impl Iterator for Tokens<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while !self.rest.is_empty() {
            let (token, rest) = match WORD_SEPARATOR.find(self.rest) {
                Some(sep) => (&self.rest[..sep.start()], &self.rest[sep.end()..]),
                None => (self.rest, ""),
            };
            self.rest = rest;
            let token = token.trim_matches('-');
            if token.chars().any(char::is_alphanumeric) {
                return Some(token.to_lowercase());
            }
        }
        None
    }
}

/// Split raw text into lowercased tokens.
///
/// Intra-word hyphens survive (`"во-первых"` stays one token); tokens made of
/// punctuation only are discarded. Tokens are produced on demand.
pub fn tokenize(text: &str) -> Tokens<'_> {
    Tokens { rest: text }
}

fn is_significant(word: &str) -> bool {
    word.chars().count() >= MIN_WORD_CHARS || KEPT_SHORT_WORDS.contains(&word)
}

/// Split text into normalized words, dropping prepositions and other short words.
///
/// The routine yields to the scheduler after every word so that a caller
/// wrapping it in [`tokio::time::timeout`] can abandon a long text between
/// words. Tokenizing is interleaved with those yields, so even a huge text
/// does no unbounded work before the first one. Dropping the future mid-way
/// leaves no shared state behind.
pub async fn split_by_words(morph: &dyn Morphology, text: &str) -> Vec<String> {
    let mut words = Vec::new();
    for token in tokenize(text) {
        let normalized = morph.normal_form(&token);
        if is_significant(&normalized) {
            words.push(normalized);
        }
        tokio::task::yield_now().await;
    }
    words
}

/// Percentage of `words` that are charged, rounded to two decimals.
///
/// Returns `0.0` for an empty article. Both sides must already be in normal
/// form; no normalization happens here.
pub fn calculate_jaundice_rate<S: AsRef<str>>(words: &[S], charged_words: &ChargedWords) -> f64 {
    if words.is_empty() {
        return 0.0;
    }
    let charged = words
        .iter()
        .filter(|word| charged_words.contains(word.as_ref()))
        .count();
    let rate = charged as f64 / words.len() as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morph::DictionaryMorphology;

    fn morph() -> DictionaryMorphology {
        DictionaryMorphology::from_pairs([
            ("хочет", "хотеть"),
            ("стало", "стать"),
            ("началом", "начало"),
        ])
    }

    #[test]
    fn test_tokenize_keeps_hyphenated_words() {
        let tokens: Vec<String> = tokenize("Во-первых, он — хочет... -так- «это»!").collect();
        assert_eq!(tokens, vec!["во-первых", "он", "хочет", "так", "это"]);
    }

    #[test]
    fn test_tokenize_discards_punctuation_only() {
        let tokens: Vec<String> = tokenize(" -- ... !!! «» ").collect();
        assert!(tokens.is_empty());
    }

    #[tokio::test]
    async fn test_split_by_words() {
        let morph = morph();
        assert_eq!(
            split_by_words(&morph, "Во-первых, он хочет, чтобы").await,
            vec!["во-первых", "хотеть", "чтобы"]
        );
        assert_eq!(
            split_by_words(&morph, "«Удивительно, но это стало началом!»").await,
            vec!["удивительно", "это", "стать", "начало"]
        );
    }

    #[tokio::test]
    async fn test_split_by_words_keeps_negation() {
        let morph = morph();
        assert_eq!(
            split_by_words(&morph, "Он не хочет").await,
            vec!["не", "хотеть"]
        );
    }

    #[test]
    fn test_tokenize_is_lazy() {
        let mut tokens = tokenize("первое, второе; третье");
        assert_eq!(tokens.next().as_deref(), Some("первое"));
        assert_eq!(tokens.rest, "второе; третье");
        assert_eq!(tokens.collect::<Vec<_>>(), vec!["второе", "третье"]);
    }

    #[tokio::test]
    async fn test_split_by_words_empty_text() {
        let morph = morph();
        assert!(split_by_words(&morph, "").await.is_empty());
    }

    #[test]
    fn test_calculate_jaundice_rate() {
        let empty: [&str; 0] = [];
        let rate = calculate_jaundice_rate(&empty, &ChargedWords::default());
        assert!(-0.01 < rate && rate < 0.01);

        let charged: ChargedWords = ["аутсайдер", "банкротство"].into_iter().collect();
        let rate = calculate_jaundice_rate(&["все", "аутсайдер", "побег"], &charged);
        assert!(33.0 < rate && rate < 34.0);
        assert_eq!(rate, 33.33);
    }

    #[test]
    fn test_calculate_jaundice_rate_all_charged() {
        let charged: ChargedWords = ["провал"].into_iter().collect();
        assert_eq!(calculate_jaundice_rate(&["провал", "провал"], &charged), 100.0);
    }
}
