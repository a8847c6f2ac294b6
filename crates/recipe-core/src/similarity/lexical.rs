use std::collections::HashMap;

use super::tokenizer::ingredient_words;
use super::{Scores, SimilarityModel, SimilarityStrategy};
use crate::model::Recipe;

/// Word to the catalog positions whose ingredients mention it.
///
/// Each query ingredient carries a total weight of 1, split evenly across its
/// words. A recipe collects the weight of every query word it contains; the sum
/// is capped at 1.
pub struct InvertedIndex {
    postings: HashMap<String, Vec<usize>>,
}

impl InvertedIndex {
    pub fn build(recipes: &[Recipe]) -> Self {
        let mut postings: HashMap<String, Vec<usize>> = HashMap::new();
        for (position, recipe) in recipes.iter().enumerate() {
            for ingredient in &recipe.ingredients {
                for word in ingredient_words(ingredient) {
                    let list = postings.entry(word).or_default();
                    // positions arrive in ascending order
                    if list.last() != Some(&position) {
                        list.push(position);
                    }
                }
            }
        }
        Self { postings }
    }

    pub fn vocabulary_size(&self) -> usize {
        self.postings.len()
    }
}

impl SimilarityModel for InvertedIndex {
    fn score(&self, query: &[String]) -> Scores {
        let mut scores = Scores::new();
        for ingredient in query {
            let words = ingredient_words(ingredient);
            let weight = 1.0 / words.len().max(1) as f32;
            for word in &words {
                let Some(positions) = self.postings.get(word) else {
                    continue;
                };
                for &position in positions {
                    *scores.entry(position).or_insert(0.0) += weight;
                }
            }
        }
        for score in scores.values_mut() {
            *score = score.min(1.0);
        }
        scores
    }

    fn strategy(&self) -> SimilarityStrategy {
        SimilarityStrategy::Lexical
    }
}
