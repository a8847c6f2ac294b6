/// Turns one raw dataset row into a [`Recipe`].
///
/// All field access happens here, once. Downstream code consumes the canonical
/// record and never re-checks field presence.
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::field::{parse_list, parse_steps};
use crate::model::{Difficulty, Nutrition, RawRow, Recipe};

/// Source column names.
pub mod columns {
    pub const RECIPE_ID: &str = "RecipeId";
    pub const NAME: &str = "Name";
    pub const DESCRIPTION: &str = "Description";
    pub const CATEGORY: &str = "RecipeCategory";
    pub const INGREDIENT_PARTS: &str = "RecipeIngredientParts";
    pub const INGREDIENT_QUANTITIES: &str = "RecipeIngredientQuantities";
    pub const INSTRUCTIONS: &str = "RecipeInstructions";
    pub const IMAGES: &str = "Images";
    pub const TOTAL_TIME: &str = "TotalTime";
    pub const COOK_TIME: &str = "CookTime";
    pub const SERVINGS: &str = "RecipeServings";
    pub const AGGREGATED_RATING: &str = "AggregatedRating";
    pub const CALORIES: &str = "Calories";
    pub const PROTEIN: &str = "ProteinContent";
    pub const FAT: &str = "FatContent";
    pub const CARBS: &str = "CarbohydrateContent";
}

pub const DEFAULT_TITLE: &str = "Untitled Recipe";
pub const DEFAULT_DESCRIPTION: &str = "Delicious recipe";
pub const DEFAULT_CATEGORY: &str = "General";
pub const DEFAULT_MINUTES: u32 = 30;
pub const DEFAULT_SERVINGS: u32 = 4;
pub const PLACEHOLDER_IMAGE: &str =
    "https://images.unsplash.com/photo-1546069901-ba9599a7e63c?w=800&h=600&fit=crop&q=food";

static HOURS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)H").expect("valid regex"));
static MINUTES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)M").expect("valid regex"));
static DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

/// Why a row did not become a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NoIngredients,
    NoInstructions,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NoIngredients => f.write_str("no ingredients"),
            Rejection::NoInstructions => f.write_str("no instructions"),
        }
    }
}

/// Normalize a row. `ordinal` is the row's position in the source and backs
/// the id and rating fallbacks.
pub fn normalize(row: &RawRow, ordinal: usize) -> Result<Recipe, Rejection> {
    let parts = parse_list(row.get(columns::INGREDIENT_PARTS));
    if parts.iter().all(String::is_empty) {
        return Err(Rejection::NoIngredients);
    }
    let quantities = parse_list(row.get(columns::INGREDIENT_QUANTITIES));
    let ingredients = pair_ingredients(&quantities, &parts);

    let instructions = parse_steps(row.get(columns::INSTRUCTIONS));
    if instructions.is_empty() {
        return Err(Rejection::NoInstructions);
    }

    let cook_time_minutes = resolve_cook_time(
        row.scalar(columns::COOK_TIME),
        row.scalar(columns::TOTAL_TIME),
    );

    let servings = safe_int(row.scalar(columns::SERVINGS))
        .and_then(|n| u32::try_from(n).ok())
        .filter(|&n| n >= 1)
        .unwrap_or(DEFAULT_SERVINGS);

    let rating = safe_float(row.scalar(columns::AGGREGATED_RATING))
        .filter(|&r| r > 0.0)
        .unwrap_or_else(|| fallback_rating(ordinal));

    Ok(Recipe {
        id: row
            .scalar(columns::RECIPE_ID)
            .map(canonical_id)
            .unwrap_or_else(|| ordinal.to_string()),
        title: text_or(row, columns::NAME, DEFAULT_TITLE),
        description: text_or(row, columns::DESCRIPTION, DEFAULT_DESCRIPTION),
        image_url: first_image(row.get(columns::IMAGES)),
        cook_time_minutes,
        servings,
        rating,
        category: text_or(row, columns::CATEGORY, DEFAULT_CATEGORY),
        difficulty: classify_difficulty(cook_time_minutes, instructions.len()),
        ingredients,
        instructions,
        nutrition: Nutrition {
            calories: safe_float(row.scalar(columns::CALORIES)),
            protein: safe_float(row.scalar(columns::PROTEIN)),
            fat: safe_float(row.scalar(columns::FAT)),
            carbs: safe_float(row.scalar(columns::CARBS)),
        },
    })
}

/// Pair quantities with names by position.
///
/// The shorter list is padded with empty strings, so nothing is lost when one
/// side is missing entries. Slots where both sides are empty are dropped.
pub fn pair_ingredients(quantities: &[String], parts: &[String]) -> Vec<String> {
    let n = quantities.len().max(parts.len());
    (0..n)
        .filter_map(|i| {
            let quantity = quantities.get(i).map(String::as_str).unwrap_or("");
            let part = parts.get(i).map(String::as_str).unwrap_or("");
            let display = if quantity.is_empty() {
                part.to_string()
            } else {
                format!("{quantity} {part}").trim().to_string()
            };
            (!display.is_empty()).then_some(display)
        })
        .collect()
}

pub fn safe_float(raw: Option<&str>) -> Option<f64> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Parses as a float first so `"4.0"` works, then truncates.
pub fn safe_int(raw: Option<&str>) -> Option<i64> {
    safe_float(raw).map(|v| v.trunc() as i64)
}

/// Minutes from an ISO-8601-like duration (`PT1H30M`, `PT2H`, `PT45M`).
///
/// Without a `PT` marker the first run of digits is taken as minutes. Falls back
/// to [`DEFAULT_MINUTES`] when nothing can be extracted.
pub fn extract_minutes(raw: Option<&str>) -> u32 {
    let Some(text) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return DEFAULT_MINUTES;
    };

    if text.contains("PT") {
        let hours = capture_number(&HOURS_RE, text);
        let minutes = capture_number(&MINUTES_RE, text);
        if hours.is_none() && minutes.is_none() {
            return DEFAULT_MINUTES;
        }
        hours
            .unwrap_or(0)
            .saturating_mul(60)
            .saturating_add(minutes.unwrap_or(0))
    } else {
        DIGITS_RE
            .find(text)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(DEFAULT_MINUTES)
    }
}

/// CookTime wins unless it came out as the default, then TotalTime is used.
pub fn resolve_cook_time(cook_time: Option<&str>, total_time: Option<&str>) -> u32 {
    let cook = extract_minutes(cook_time);
    if cook == DEFAULT_MINUTES {
        extract_minutes(total_time)
    } else {
        cook
    }
}

pub fn classify_difficulty(cook_time_minutes: u32, instruction_count: usize) -> Difficulty {
    if cook_time_minutes > 60 || instruction_count > 8 {
        Difficulty::Hard
    } else if cook_time_minutes > 30 || instruction_count > 5 {
        Difficulty::Medium
    } else {
        Difficulty::Easy
    }
}

/// Stable placeholder rating in `[4.2, 4.8]`, cycling with the row ordinal.
pub fn fallback_rating(ordinal: usize) -> f64 {
    let raw = 4.2 + (ordinal % 7) as f64 * 0.1;
    (raw * 10.0).round() / 10.0
}

pub fn first_image(raw: Option<&str>) -> String {
    parse_list(raw)
        .into_iter()
        .next()
        .filter(|url| url.starts_with("http"))
        .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string())
}

fn capture_number(re: &Regex, text: &str) -> Option<u32> {
    re.captures(text).and_then(|caps| caps[1].parse().ok())
}

fn text_or(row: &RawRow, column: &str, default: &str) -> String {
    row.scalar(column)
        .map(|s| s.to_string())
        .unwrap_or_else(|| default.to_string())
}

/// `"38.0"` (a float-typed export of an integer id) becomes `"38"`.
fn canonical_id(raw: &str) -> String {
    match raw.strip_suffix(".0") {
        Some(int) if !int.is_empty() && int.bytes().all(|b| b.is_ascii_digit()) => int.to_string(),
        _ => raw.to_string(),
    }
}
