/// TF-IDF vector space over recipe ingredient words.
///
/// Terms are ingredient words plus, optionally, bigrams of adjacent words within
/// one ingredient line. Weights are raw term counts times smoothed idf
/// `ln((1 + n) / (1 + df)) + 1`, L2-normalized, so a dot product is the cosine.
/// Document vectors are stored as per-term postings so a query only touches
/// recipes that share at least one term with it.
use std::collections::{HashMap, HashSet};

use super::tokenizer::ingredient_words;
use super::{Scores, SimilarityModel, SimilarityStrategy};
use crate::model::Recipe;

#[derive(Debug, Clone)]
pub struct TfIdfConfig {
    pub bigrams: bool,
    /// Drop terms found in fewer documents than this.
    pub min_df: usize,
    /// Drop terms found in more than this fraction of documents.
    pub max_df: f32,
    /// Keep at most this many terms, most frequent first.
    pub max_features: usize,
}

impl Default for TfIdfConfig {
    fn default() -> Self {
        Self {
            bigrams: true,
            min_df: 1,
            max_df: 1.0,
            max_features: 50_000,
        }
    }
}

pub struct TfIdfModel {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
    /// term index -> (catalog position, normalized weight)
    postings: Vec<Vec<(usize, f32)>>,
    bigrams: bool,
}

impl TfIdfModel {
    pub fn build(recipes: &[Recipe], config: TfIdfConfig) -> Self {
        let docs: Vec<Vec<String>> = recipes
            .iter()
            .map(|r| terms(r.ingredients.iter().map(String::as_str), config.bigrams))
            .collect();
        let n_docs = docs.len();

        let mut df: HashMap<&str, usize> = HashMap::new();
        for doc in &docs {
            let unique: HashSet<&str> = doc.iter().map(String::as_str).collect();
            for term in unique {
                *df.entry(term).or_insert(0) += 1;
            }
        }

        let max_count = config.max_df * n_docs as f32;
        let mut kept: Vec<(&str, usize)> = df
            .into_iter()
            .filter(|&(_, count)| count >= config.min_df && count as f32 <= max_count)
            .collect();
        kept.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        kept.truncate(config.max_features);
        kept.sort_by(|a, b| a.0.cmp(b.0));

        let vocabulary: HashMap<String, usize> = kept
            .iter()
            .enumerate()
            .map(|(idx, (term, _))| (term.to_string(), idx))
            .collect();
        let idf: Vec<f32> = kept
            .iter()
            .map(|&(_, count)| ((1.0 + n_docs as f32) / (1.0 + count as f32)).ln() + 1.0)
            .collect();

        let mut postings = vec![Vec::new(); vocabulary.len()];
        for (position, doc) in docs.iter().enumerate() {
            for (term, weight) in vectorize(doc, &vocabulary, &idf) {
                postings[term].push((position, weight));
            }
        }

        Self {
            vocabulary,
            idf,
            postings,
            bigrams: config.bigrams,
        }
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.vocabulary.contains_key(term)
    }
}

impl SimilarityModel for TfIdfModel {
    fn score(&self, query: &[String]) -> Scores {
        let query_terms = terms(query.iter().map(String::as_str), self.bigrams);
        let mut scores = Scores::new();
        for (term, query_weight) in vectorize(&query_terms, &self.vocabulary, &self.idf) {
            for &(position, doc_weight) in &self.postings[term] {
                *scores.entry(position).or_insert(0.0) += query_weight * doc_weight;
            }
        }
        for score in scores.values_mut() {
            *score = score.min(1.0);
        }
        scores
    }

    fn strategy(&self) -> SimilarityStrategy {
        SimilarityStrategy::TfIdf
    }
}

fn terms<'a>(lines: impl Iterator<Item = &'a str>, bigrams: bool) -> Vec<String> {
    let mut out = Vec::new();
    for line in lines {
        let words = ingredient_words(line);
        if bigrams {
            out.extend(words.windows(2).map(|pair| format!("{} {}", pair[0], pair[1])));
        }
        out.extend(words);
    }
    out
}

/// Sparse L2-normalized tf-idf vector. Out-of-vocabulary terms are ignored.
fn vectorize(
    terms: &[String],
    vocabulary: &HashMap<String, usize>,
    idf: &[f32],
) -> Vec<(usize, f32)> {
    let mut counts: HashMap<usize, f32> = HashMap::new();
    for term in terms {
        if let Some(&idx) = vocabulary.get(term) {
            *counts.entry(idx).or_insert(0.0) += 1.0;
        }
    }

    let mut weights: Vec<(usize, f32)> = counts
        .into_iter()
        .map(|(idx, count)| (idx, count * idf[idx]))
        .collect();
    let norm = weights.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
    if norm == 0.0 {
        return Vec::new();
    }
    for (_, w) in &mut weights {
        *w /= norm;
    }
    weights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::fixtures::{query, recipe};
    use crate::similarity::rank;

    fn recipes() -> Vec<Recipe> {
        vec![
            recipe("a", &["chicken breast", "rice"]),
            recipe("b", &["chicken thigh", "soy sauce"]),
            recipe("c", &["beef", "rice"]),
        ]
    }

    #[test]
    fn test_identical_ingredients_score_one() {
        let model = TfIdfModel::build(&recipes(), TfIdfConfig::default());
        let scores = model.score(&query(&["chicken breast", "rice"]));
        assert!((scores[&0] - 1.0).abs() < 1e-5);
        assert!(scores[&1] < scores[&0]);
        assert!(scores.values().all(|&s| s > 0.0 && s <= 1.0));
    }

    #[test]
    fn test_ranking_prefers_full_overlap() {
        let model = TfIdfModel::build(&recipes(), TfIdfConfig::default());
        let ranked = rank(model.score(&query(&["chicken", "rice"])), 6);
        let positions: Vec<usize> = ranked.iter().map(|&(p, _)| p).collect();
        assert_eq!(positions[0], 0);
        assert_eq!(positions.len(), 3);
    }

    #[test]
    fn test_bigrams_in_vocabulary() {
        let with = TfIdfModel::build(&recipes(), TfIdfConfig::default());
        assert!(with.contains_term("soy sauce"));
        assert!(!with.contains_term("breast rice"));

        let without = TfIdfModel::build(
            &recipes(),
            TfIdfConfig {
                bigrams: false,
                ..TfIdfConfig::default()
            },
        );
        assert!(!without.contains_term("soy sauce"));
        assert_eq!(without.vocabulary_size(), 7);
    }

    #[test]
    fn test_min_df_prunes_rare_terms() {
        let model = TfIdfModel::build(
            &recipes(),
            TfIdfConfig {
                min_df: 2,
                ..TfIdfConfig::default()
            },
        );
        assert_eq!(model.vocabulary_size(), 2);
        assert!(model.score(&query(&["beef"])).is_empty());
        assert_eq!(model.score(&query(&["rice"])).len(), 2);
    }

    #[test]
    fn test_empty_catalog() {
        let model = TfIdfModel::build(&[], TfIdfConfig::default());
        assert_eq!(model.vocabulary_size(), 0);
        assert!(model.score(&query(&["rice"])).is_empty());
    }
}
