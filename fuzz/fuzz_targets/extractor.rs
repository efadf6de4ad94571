#![no_main]

use libfuzzer_sys::fuzz_target;
use std::sync::LazyLock;
use url::Url;

use pagesense::extractor::extract;

static BASE_URL: LazyLock<Url> = LazyLock::new(|| Url::parse("https://example.com/").unwrap());

fuzz_target!(|data: &[u8]| {
    let html = String::from_utf8_lossy(data);

    // Must not panic, whatever the markup
    let _ = extract(&html, &BASE_URL);
});
