use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static WORD_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w{3,15}\b").unwrap());

const STOP_WORDS: [&str; 31] = [
    "the", "a", "an", "and", "was", "were", "or", "but", "in", "on", "at", "to", "for", "with",
    "by", "about", "as", "into", "like", "through", "after", "over", "between", "out", "against",
    "during", "without", "before", "under", "around", "among",
];

const MAX_KEYWORDS: usize = 10;

/// Most frequent content words of `text`, most frequent first.
///
/// Words are 3 to 15 characters, purely alphabetic and not stop words. Equal
/// counts keep the order in which the words first appeared.
pub fn frequent_words(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();

    let mut order: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for word in WORD_REGEX.find_iter(&lowered).map(|m| m.as_str()) {
        if STOP_WORDS.contains(&word) || !word.chars().all(char::is_alphabetic) {
            continue;
        }
        match index.get(word) {
            Some(&slot) => order[slot].1 += 1,
            None => {
                index.insert(word, order.len());
                order.push((word, 1));
            }
        }
    }

    // stable sort keeps first-seen order among ties
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order
        .into_iter()
        .take(MAX_KEYWORDS)
        .map(|(word, _)| word.to_string())
        .collect()
}
