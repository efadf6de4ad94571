use readability::extractor;
use tracing::debug;
use url::Url;

use crate::extractor::cleaner;

/// Readability pass over the whole document.
///
/// Returns `None` when readability fails or finds no text, which is the
/// signal for the caller to fall back to plain DOM text.
pub fn extract(html: &str, url: &Url) -> Option<String> {
    let article = match extractor::extract(&mut html.as_bytes(), url) {
        Ok(article) => article,
        Err(e) => {
            debug!(error = %e, "readability extraction failed");
            return None;
        }
    };

    let text = cleaner::article_text(&article.content);
    if text.is_empty() { None } else { Some(text) }
}
