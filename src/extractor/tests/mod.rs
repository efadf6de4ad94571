use chrono::Utc;
use reqwest::StatusCode;
use url::Url;

use crate::extractor::{build_page, extract};
use crate::fetcher::types::{Charset, PageResponse};

fn article_html() -> String {
    let paragraph = "The river restoration project has brought salmon back to the valley after decades of absence, and local volunteers have planted thousands of native trees along the banks. ";
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <title>River Restoration - Valley News</title>
  <style>body {{ font-family: serif; }}</style>
  <script>window.analytics = {{ track: function() {{}} }};</script>
</head>
<body>
  <nav class="menu"><a href="/">Home</a> <a href="/sports">Sports</a> <a href="/weather">Weather</a></nav>
  <article>
    <h1>Salmon return to the valley</h1>
    <p>{p}</p>
    <p>{p}</p>
    <table><tr><td>Station</td><td>Count</td></tr><tr><td>North weir</td><td>412</td></tr></table>
    <p>{p}</p>
  </article>
  <footer>Copyright Valley News</footer>
</body>
</html>"#,
        p = paragraph.repeat(3)
    )
}

fn create_test_response(html: String, url: &str) -> PageResponse {
    PageResponse {
        url_final: Url::parse(url).unwrap(),
        status: StatusCode::OK,
        body_html: html,
        charset: Charset::Utf8,
        fetched_at: Utc::now(),
    }
}

#[test]
fn test_extract_article_body() {
    let url = Url::parse("https://news.example.com/river").unwrap();
    let text = extract(&article_html(), &url);

    assert!(text.contains("salmon back to the valley"));
    assert!(!text.contains("window.analytics"));
    assert!(!text.contains("font-family"));
    assert!(!text.contains("North weir"));
}

#[test]
fn test_minimal_page_uses_fallback_text() {
    let url = Url::parse("https://example.com/").unwrap();
    let html = "<html><head><title>Tiny</title></head><body><span>Just a few words</span></body></html>";
    let text = extract(html, &url);

    assert!(text.contains("Just a few words"));
}

#[test]
fn test_page_without_visible_text_is_empty() {
    let url = Url::parse("https://example.com/").unwrap();
    let html = "<html><head><style>p { margin: 0; }</style></head><body><script>var app = {};</script>   </body></html>";

    assert_eq!(extract(html, &url), "");
}

#[test]
fn test_malformed_html() {
    let url = Url::parse("https://example.com/broken").unwrap();
    let html = "<html><head><title>Broken</title><body><p>Unclosed tags<div>More content";
    let text = extract(html, &url);

    assert!(text.contains("Unclosed tags"));
}

#[test]
fn test_build_page_detects_language() {
    let response = create_test_response(article_html(), "https://news.example.com/river");
    let page = build_page(response);

    assert_eq!(page.url.as_str(), "https://news.example.com/river");
    assert!(page.raw_html.contains("<article>"));
    assert!(!page.text.is_empty());
    assert_eq!(page.language.as_deref(), Some("eng"));
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_extract_never_panics(html in ".*") {
            let url = Url::parse("https://example.com").unwrap();
            let _ = extract(&html, &url);
        }

        #[test]
        fn test_extract_output_is_trimmed(words in proptest::collection::vec("[a-z]{1,8}", 0..20)) {
            let url = Url::parse("https://example.com").unwrap();
            let html = format!("<html><body><div>{}</div></body></html>", words.join(" "));
            let text = extract(&html, &url);
            prop_assert_eq!(text.trim(), text.as_str());
        }
    }
}
