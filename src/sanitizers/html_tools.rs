//! Helpers shared by the sanitizers for turning an HTML subtree into text.

use itertools::Itertools;
use scraper::node::Node;
use scraper::ElementRef;

/// Tags whose content never belongs to the article text.
pub const DEFAULT_BLACKLIST_TAGS: &[&str] = &["script", "style", "time", "noscript"];

/// Tags that end a line of text; a separator is emitted after them so that
/// words from adjacent blocks are not glued together.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "blockquote", "br", "div", "footer", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "li", "p", "section", "span", "td", "tr",
];

/// Which parts of a subtree to drop while collecting text.
#[derive(Debug, Clone, Copy)]
pub struct TextFilter<'a> {
    pub skip_tags: &'a [&'a str],
    pub skip_classes: &'a [&'a str],
}

impl Default for TextFilter<'_> {
    fn default() -> Self {
        Self {
            skip_tags: DEFAULT_BLACKLIST_TAGS,
            skip_classes: &[],
        }
    }
}

impl TextFilter<'_> {
    fn skips(&self, element: &scraper::node::Element) -> bool {
        self.skip_tags.contains(&element.name())
            || element.classes().any(|class| self.skip_classes.contains(&class))
    }
}

/// Collect the text of `root` and its descendants, dropping filtered subtrees.
pub fn collect_text(root: ElementRef<'_>, filter: &TextFilter<'_>) -> String {
    let mut out = String::new();
    push_text(root, filter, &mut out);
    normalize_whitespace(&out)
}

fn push_text(element: ElementRef<'_>, filter: &TextFilter<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                if filter.skips(el) {
                    continue;
                }
                if let Some(child_ref) = ElementRef::wrap(child) {
                    push_text(child_ref, filter, out);
                }
                if BLOCK_TAGS.contains(&el.name()) {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

/// Collapse whitespace runs inside lines and drop empty lines.
pub fn normalize_whitespace(text: &str) -> String {
    text.lines()
        .map(|line| line.split_whitespace().join(" "))
        .filter(|line| !line.is_empty())
        .join("\n")
}
