pub mod cleaner;
pub mod fallback;
pub mod language;
pub mod model;
pub mod reader;

#[cfg(test)]
mod tests;

pub use model::PageContent;

use tracing::debug;
use url::Url;

use crate::fetcher::types::PageResponse;

/// Plain text of a page. Never fails; pages without visible text yield `""`.
pub fn extract(html: &str, url: &Url) -> String {
    // 1. Readability for article-like pages
    if let Some(text) = reader::extract(html, url) {
        return text;
    }

    // 2. Whole-document text for everything readability gives up on
    debug!(url = %url, "readability produced no text, using DOM fallback");
    fallback::extract(html)
}

pub fn build_page(resp: PageResponse) -> PageContent {
    let text = extract(&resp.body_html, &resp.url_final);
    let language = language::detect_language(&text);

    PageContent {
        url: resp.url_final,
        raw_html: resp.body_html,
        text,
        language,
        fetched_at: resp.fetched_at,
    }
}
