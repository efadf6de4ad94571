use crate::fetcher::types::{Charset, PageResponse};
use chrono::Utc;
use encoding_rs::Encoding;
use regex::Regex;
use reqwest::StatusCode;
use std::sync::LazyLock;
use tracing::warn;
use url::Url;

static CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap());

static META_HTTP_EQUIV_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s+[^>]*?http-equiv\s*=\s*["']?content-type["']?[^>]*?content\s*=\s*["']?[^"'>]*?charset\s*=\s*([^"'\s;/>]+)"#).unwrap()
});

/// Bytes of the body searched for a `<meta>` charset declaration.
const META_SNIFF_LEN: usize = 4096;

pub fn process_response(
    url_final: Url,
    status: StatusCode,
    body_bytes: &[u8],
    content_type: &str,
) -> PageResponse {
    let charset = detect_charset(content_type, body_bytes);
    let body_html = decode_to_utf8(body_bytes, &charset);

    PageResponse {
        url_final,
        status,
        body_html,
        charset,
        fetched_at: Utc::now(),
    }
}

fn detect_charset(content_type: &str, body_bytes: &[u8]) -> Charset {
    // 1. Content-Type header
    if let Some(charset) = label_from(&CHARSET_REGEX, content_type) {
        return charset;
    }

    // 2. <meta charset> or <meta http-equiv> near the top of the document
    let search_bytes = &body_bytes[..body_bytes.len().min(META_SNIFF_LEN)];
    let search_str = String::from_utf8_lossy(search_bytes);
    if let Some(charset) = label_from(&META_CHARSET_REGEX, &search_str)
        .or_else(|| label_from(&META_HTTP_EQUIV_REGEX, &search_str))
    {
        return charset;
    }

    // 3. Heuristic detection
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(search_bytes, false);
    Charset::from_encoding(detector.guess(None, true))
}

fn label_from(regex: &Regex, haystack: &str) -> Option<Charset> {
    let label = regex.captures(haystack)?.get(1)?.as_str().to_lowercase();
    Encoding::for_label(label.as_bytes()).map(Charset::from_encoding)
}

/// Malformed sequences are replaced rather than failing the fetch.
fn decode_to_utf8(body_bytes: &[u8], charset: &Charset) -> String {
    let encoding = charset.encoding();
    let (decoded, _encoding, had_errors) = encoding.decode(body_bytes);

    if had_errors {
        warn!(
            encoding = encoding.name(),
            "body contained malformed sequences, replaced during decoding"
        );
    }

    decoded.into_owned()
}
