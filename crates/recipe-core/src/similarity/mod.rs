/// Ingredient similarity models.
///
/// Each model is built once from the catalog's ingredient lists and scores
/// catalog positions against a query ingredient list. Two strategies share the
/// [`SimilarityModel`] contract:
/// - [`lexical::InvertedIndex`]: word overlap weighted per query ingredient
/// - [`tfidf::TfIdfModel`]: cosine similarity of TF-IDF vectors
pub mod lexical;
pub mod tfidf;
pub mod tokenizer;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::model::Recipe;

/// Catalog position to similarity score.
pub type Scores = HashMap<usize, f32>;

pub trait SimilarityModel: Send + Sync {
    /// Scores in `(0, 1]` keyed by catalog position. Recipes with no overlap are absent.
    fn score(&self, query: &[String]) -> Scores;

    fn strategy(&self) -> SimilarityStrategy;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityStrategy {
    #[default]
    Lexical,
    TfIdf,
}

impl SimilarityStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimilarityStrategy::Lexical => "lexical",
            SimilarityStrategy::TfIdf => "tfidf",
        }
    }

    pub fn build(self, recipes: &[Recipe]) -> Box<dyn SimilarityModel> {
        match self {
            SimilarityStrategy::Lexical => Box::new(lexical::InvertedIndex::build(recipes)),
            SimilarityStrategy::TfIdf => Box::new(tfidf::TfIdfModel::build(
                recipes,
                tfidf::TfIdfConfig::default(),
            )),
        }
    }
}

impl fmt::Display for SimilarityStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimilarityStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lexical" | "inverted" | "index" => Ok(SimilarityStrategy::Lexical),
            "tfidf" | "tf-idf" | "vector" => Ok(SimilarityStrategy::TfIdf),
            other => Err(format!(
                "unknown similarity strategy '{other}' (expected 'lexical' or 'tfidf')"
            )),
        }
    }
}

/// Order scored positions best first and keep the top `top_n`.
///
/// Zero scores are dropped. Equal scores keep catalog order, so results are
/// reproducible. Truncation happens only after the full sort.
pub fn rank(scores: Scores, top_n: usize) -> Vec<(usize, f32)> {
    let mut ranked: Vec<(usize, f32)> = scores.into_iter().filter(|&(_, s)| s > 0.0).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.truncate(top_n);
    ranked
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::model::{Difficulty, Nutrition, Recipe};

    pub fn recipe(id: &str, ingredients: &[&str]) -> Recipe {
        Recipe {
            id: id.to_string(),
            title: format!("Recipe {id}"),
            description: "Delicious recipe".to_string(),
            image_url: String::new(),
            cook_time_minutes: 30,
            servings: 4,
            rating: 4.5,
            category: "General".to_string(),
            difficulty: Difficulty::Easy,
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
            instructions: vec!["Cook.".to_string()],
            nutrition: Nutrition::default(),
        }
    }

    pub fn query(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_orders_by_score_then_position() {
        let scores: Scores = [(4, 0.5), (1, 0.9), (2, 0.5), (0, 0.0), (3, 0.5)]
            .into_iter()
            .collect();
        assert_eq!(rank(scores.clone(), 10), vec![(1, 0.9), (2, 0.5), (3, 0.5), (4, 0.5)]);
        assert_eq!(rank(scores, 2), vec![(1, 0.9), (2, 0.5)]);
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("TFIDF".parse::<SimilarityStrategy>(), Ok(SimilarityStrategy::TfIdf));
        assert_eq!(" lexical ".parse::<SimilarityStrategy>(), Ok(SimilarityStrategy::Lexical));
        assert!("bm25".parse::<SimilarityStrategy>().is_err());
    }

    #[test]
    fn test_both_strategies_exclude_unrelated_recipes() {
        let recipes = vec![
            fixtures::recipe("1", &["2 cups flour", "1 tsp salt"]),
            fixtures::recipe("2", &["1 lb beef", "1 onion"]),
        ];
        for strategy in [SimilarityStrategy::Lexical, SimilarityStrategy::TfIdf] {
            let model = strategy.build(&recipes);
            assert_eq!(model.strategy(), strategy);
            assert!(model.score(&fixtures::query(&["chicken"])).is_empty());
            let ranked = rank(model.score(&fixtures::query(&["onion"])), 6);
            assert_eq!(ranked.len(), 1);
            assert_eq!(ranked[0].0, 1);
        }
    }
}
