/// Decoder for single dataset cells.
///
/// The recipe export packs lists into one CSV cell using one of three shapes:
/// - R vector literals: `c("2 cups", NA, "1 tsp")`
/// - JSON or Python style list literals: `["a", "b"]`, `['a', 'b']`
/// - Plain text, possibly multi-line or multi-sentence
///
/// Decoding never fails. Anything unrecognized degrades to an empty list or a
/// single element holding the trimmed input.
use std::sync::LazyLock;

use regex::Regex;

use crate::model::is_missing_marker;

static R_VECTOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^\s*c\s*\((.*)\)\s*$").expect("valid regex"));

static STEP_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\d+\s*[.)]|[-•*])\s+").expect("valid regex"));

/// How placeholders and plain text are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMode {
    /// Ingredient names, quantities and images. `NA`, empty and noise elements
    /// keep their slot as `""` so parallel lists stay aligned, except at the end
    /// of the list. Plain text is one element.
    Positional,
    /// Instructions. `NA` and empty elements are dropped and plain text is split
    /// into steps on line breaks or sentence ends.
    Steps,
}

/// Parse a cell in [`FieldMode::Positional`].
pub fn parse_list(raw: Option<&str>) -> Vec<String> {
    parse_field(raw, FieldMode::Positional)
}

/// Parse a cell in [`FieldMode::Steps`].
pub fn parse_steps(raw: Option<&str>) -> Vec<String> {
    parse_field(raw, FieldMode::Steps)
}

pub fn parse_field(raw: Option<&str>, mode: FieldMode) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    let text = raw.trim();
    if text.is_empty() || is_missing_marker(text) {
        return Vec::new();
    }

    // `None` marks an NA placeholder.
    let elements: Vec<Option<String>> = if let Some(caps) = R_VECTOR_RE.captures(text) {
        split_quoted_list(&caps[1])
    } else if text.starts_with('[') && text.ends_with(']') {
        parse_list_literal(text)
    } else {
        let plain = strip_wrapping_quotes(text);
        match mode {
            FieldMode::Positional => vec![Some(plain.to_string())],
            FieldMode::Steps => split_plain_text(plain),
        }
    };

    let mut out = Vec::with_capacity(elements.len());
    for element in elements {
        let cleaned = element.as_deref().map(clean_element).unwrap_or_default();
        if cleaned.is_empty() || is_noise(&cleaned) {
            if mode == FieldMode::Positional {
                out.push(String::new());
            }
        } else {
            out.push(cleaned);
        }
    }
    // Trailing placeholders hold no alignment; pairing pads the shorter side anyway.
    while out.last().is_some_and(String::is_empty) {
        out.pop();
    }
    out
}

/// A bare cell such as `"salt"` or `'salt'` loses one matching pair of quotes.
fn strip_wrapping_quotes(text: &str) -> &str {
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return text[1..text.len() - 1].trim();
        }
    }
    text
}

/// Split the body of a list literal on top-level commas.
///
/// Commas inside single or double quotes do not split. Quote characters are
/// removed and backslash escapes inside quotes are resolved. An unterminated
/// quote swallows the rest of the input into the current element.
fn split_quoted_list(content: &str) -> Vec<Option<String>> {
    if content.trim().is_empty() {
        return Vec::new();
    }

    let mut items = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = content.chars();

    while let Some(ch) = chars.next() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) if ch == '\\' => match chars.next() {
                Some('n') => current.push('\n'),
                Some('t') => current.push('\t'),
                Some(next @ ('"' | '\'' | '\\')) => current.push(next),
                Some(next) => {
                    current.push('\\');
                    current.push(next);
                }
                None => current.push('\\'),
            },
            Some(_) => current.push(ch),
            None => match ch {
                '"' | '\'' => quote = Some(ch),
                ',' => items.push(finish_element(&mut current)),
                _ => current.push(ch),
            },
        }
    }
    items.push(finish_element(&mut current));
    items
}

fn finish_element(current: &mut String) -> Option<String> {
    let element = std::mem::take(current);
    let trimmed = element.trim();
    if trimmed.eq_ignore_ascii_case("na") {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// `[...]` literals: strict JSON first, then the Python `str(list)` form with
/// single quotes.
fn parse_list_literal(text: &str) -> Vec<Option<String>> {
    if let Ok(values) = serde_json::from_str::<Vec<serde_json::Value>>(text) {
        return values
            .into_iter()
            .map(|value| match value {
                serde_json::Value::Null => None,
                serde_json::Value::String(s) => Some(s),
                other => Some(other.to_string()),
            })
            .collect();
    }
    split_quoted_list(&text[1..text.len() - 1])
}

/// Prefer line breaks when they give at least two chunks, otherwise split after
/// sentence-ending punctuation.
fn split_plain_text(text: &str) -> Vec<Option<String>> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if lines.len() >= 2 {
        return lines.into_iter().map(|l| Some(l.to_string())).collect();
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut iter = text.char_indices().peekable();
    while let Some((idx, ch)) = iter.next() {
        if !matches!(ch, '.' | '!' | '?' | ';') {
            continue;
        }
        let at_boundary = match iter.peek() {
            Some((_, next)) => next.is_whitespace(),
            None => true,
        };
        if at_boundary {
            let end = idx + ch.len_utf8();
            chunks.push(&text[start..end]);
            start = end;
        }
    }
    chunks.push(&text[start..]);

    chunks
        .into_iter()
        .map(|chunk| chunk.trim().trim_end_matches(';').trim_end())
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| Some(chunk.to_string()))
        .collect()
}

/// Collapse whitespace runs and strip a leading step marker (`3. `, `3) `, `- `, `• `).
fn clean_element(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    match STEP_PREFIX_RE.find(&collapsed) {
        Some(m) => collapsed[m.end()..].trim().to_string(),
        None => collapsed,
    }
}

/// Leftover quotes, brackets or punctuation from a broken literal.
fn is_noise(token: &str) -> bool {
    token
        .chars()
        .all(|c| c.is_ascii_punctuation() || matches!(c, '“' | '”' | '‘' | '’' | '•' | '–' | '—'))
}
