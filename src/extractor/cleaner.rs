use ammonia::Builder;
use scraper::{ElementRef, Html};
use std::collections::HashMap;

use crate::extractor::model::normalize_whitespace;

/// Dropped together with everything inside them.
const DROPPED_WITH_CONTENT: [&str; 3] = ["table", "figure", "nav"];
/// Dropped as tags; text children of the non-void ones survive.
const DROPPED_TAGS: [&str; 5] = ["table", "figure", "nav", "img", "picture"];

const BLOCK_ELEMENTS: [&str; 21] = [
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "footer", "h1",
    "h2", "h3", "h4", "h5", "h6", "header", "li", "p", "pre", "section",
];

/// Turns the article HTML produced by readability into plain text.
///
/// Scripts, styles, tables, figures and images are removed before the text is
/// collected, so none of their content reaches the analyzers.
pub fn article_text(article_html: &str) -> String {
    // Attributes never reach the text; the default per-tag allow-list also
    // names `table`, which ammonia refuses alongside a clean-content tag.
    let clean_html = Builder::default()
        .tag_attributes(HashMap::new())
        .rm_tags(DROPPED_TAGS)
        .add_clean_content_tags(DROPPED_WITH_CONTENT)
        .clean(article_html)
        .to_string();

    let fragment = Html::parse_fragment(&clean_html);
    let mut text = String::new();
    collect_text(fragment.root_element(), &mut text);
    normalize_whitespace(&text)
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    let is_block = BLOCK_ELEMENTS.contains(&element.value().name());
    if is_block {
        out.push('\n');
    }

    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            collect_text(child_element, out);
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
        }
    }

    if is_block {
        out.push('\n');
    }
}
