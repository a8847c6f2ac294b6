use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{Alphabetic}+").expect("valid regex"));

/// Filler and unit words that say nothing about what a recipe contains.
static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "and", "the", "for", "with", "from", "into", "fresh", "dried", "chopped", "sliced",
        "diced", "minced", "cup", "cups", "tablespoon", "tablespoons", "tbsp", "teaspoon",
        "teaspoons", "tsp", "pound", "pounds", "lbs", "ounce", "ounces", "clove", "cloves",
        "pinch", "dash",
    ]
    .into_iter()
    .collect()
});

const MIN_WORD_CHARS: usize = 3;

/// Lowercase alphabetic words of at least three characters, stop words removed.
/// Digits and punctuation act as separators, so `"2cups flour"` yields `["flour"]`.
pub fn ingredient_words(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    WORD_RE
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|w| w.chars().count() >= MIN_WORD_CHARS)
        .filter(|w| !STOP_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}
