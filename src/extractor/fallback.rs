use regex::Regex;
use scraper::Html;
use std::sync::LazyLock;

static NEWLINE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n+").unwrap());
static WHITESPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

const STRIPPED_ELEMENTS: [&str; 2] = ["script", "style"];

/// Every text node of the document outside `script`/`style`, whitespace collapsed.
pub fn extract(html: &str) -> String {
    let document = Html::parse_document(html);

    let pieces: Vec<&str> = document
        .root_element()
        .descendants()
        .filter(|node| {
            !node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| STRIPPED_ELEMENTS.contains(&el.name()))
            })
        })
        .filter_map(|node| node.value().as_text().map(|text| &**text))
        .collect();

    let joined = pieces.join("\n");
    let collapsed = NEWLINE_RUNS.replace_all(&joined, "\n");
    WHITESPACE_RUNS.replace_all(&collapsed, " ").trim().to_string()
}
