use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One untyped dataset row: column name to raw cell text.
///
/// Cells are stored as read. Accessors treat blank cells as missing so callers
/// never have to distinguish "absent column" from "empty cell".
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    cells: HashMap<String, String>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.cells.insert(column.into(), value.into());
    }

    /// Raw cell text, or `None` when the column is absent or the cell is blank.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .get(column)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Trimmed scalar value. Pandas-style missing markers (`nan`, `NA`) read as `None`.
    pub fn scalar(&self, column: &str) -> Option<&str> {
        self.get(column)
            .map(str::trim)
            .filter(|v| !is_missing_marker(v))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

pub(crate) fn is_missing_marker(value: &str) -> bool {
    value.eq_ignore_ascii_case("nan") || value.eq_ignore_ascii_case("na")
}

/// Coarse effort level shown next to a recipe. Ordered `Easy < Medium < Hard`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// Per-serving nutrition facts. Each value is `None` when the source cell was
/// missing or not numeric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Nutrition {
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
    pub carbs: Option<f64>,
}

/// A normalized recipe. Built once per accepted source row and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Source `RecipeId`, or the row ordinal when the source has none.
    pub id: String,
    pub title: String,
    pub description: String,
    /// First dataset image when it is an http(s) URL, otherwise a placeholder.
    #[serde(rename = "image")]
    pub image_url: String,
    /// Resolved cooking time in minutes (CookTime, falling back to TotalTime).
    #[serde(rename = "cookTime")]
    pub cook_time_minutes: u32,
    pub servings: u32,
    pub rating: f64,
    pub category: String,
    pub difficulty: Difficulty,
    /// Display strings, `"<quantity> <name>"` or the bare name.
    pub ingredients: Vec<String>,
    /// Ordered, non-empty steps with numbering stripped.
    pub instructions: Vec<String>,
    pub nutrition: Nutrition,
}

/// A search hit: the full recipe plus its similarity to the query, in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoredRecipe {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub similarity_score: f32,
}
