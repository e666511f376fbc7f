//! Sanitizer for [ИноСМИ](https://inosmi.ru) article pages.
//!
//! The article body lives in the first `<article>` element. Disclaimers,
//! asides and the footer inside it are dropped before the text is collected.

use super::html_tools::{collect_text, TextFilter, DEFAULT_BLACKLIST_TAGS};
use super::{ContentNotRecognized, Sanitizer};
use scraper::{Html, Selector};
use tracing::debug;

const SKIP_TAGS: &[&str] = &["aside", "footer"];
const SKIP_CLASSES: &[&str] = &["article-disclaimer", "article__info", "article__aside"];

#[derive(Debug, Clone, Copy, Default)]
pub struct InosmiSanitizer;

impl Sanitizer for InosmiSanitizer {
    fn name(&self) -> &'static str {
        "inosmi_ru"
    }

    fn sanitize(&self, html: &str) -> Result<String, ContentNotRecognized> {
        let document = Html::parse_document(html);
        let article_selector = Selector::parse("article")
            .map_err(|e| ContentNotRecognized(format!("bad selector: {e}")))?;
        let article = document
            .select(&article_selector)
            .next()
            .ok_or_else(|| ContentNotRecognized("no <article> element on page".to_string()))?;

        let skip_tags: Vec<&str> = DEFAULT_BLACKLIST_TAGS
            .iter()
            .chain(SKIP_TAGS)
            .copied()
            .collect();
        let filter = TextFilter {
            skip_tags: &skip_tags,
            skip_classes: SKIP_CLASSES,
        };

        let text = collect_text(article, &filter);
        debug!(chars = text.chars().count(), "Sanitized inosmi.ru article");
        Ok(text)
    }
}
