/// In-memory recipe catalog.
///
/// Holds every accepted recipe in source order plus two derived lookups: an
/// id map (last writer wins on collisions) and the sorted set of categories.
/// Nothing is mutated after [`Catalog::load`] returns.
use std::collections::{BTreeSet, HashMap};

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::model::{RawRow, Recipe};
use crate::normalize::normalize;

/// Upper bound on any random sample, whatever the caller asks for.
pub const SAMPLE_HARD_CAP: usize = 50;
pub const DEFAULT_MAX_RECIPES: usize = 10_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    pub rows_read: usize,
    pub accepted: usize,
    pub rejected: usize,
    /// Accepted recipes whose id was already taken by an earlier row.
    pub duplicates: usize,
    /// Loading stopped because the recipe cap was reached.
    pub capped: bool,
}

#[derive(Debug, Default)]
pub struct Catalog {
    recipes: Vec<Recipe>,
    by_id: HashMap<String, usize>,
    categories: Vec<String>,
}

impl Catalog {
    /// Normalize rows in order, keeping accepted recipes up to `max_recipes`.
    ///
    /// Once the cap is reached at most one further row is pulled, only to learn
    /// whether the source had more, so a streaming source is never drained.
    pub fn load<I>(rows: I, max_recipes: usize) -> (Self, LoadStats)
    where
        I: IntoIterator<Item = RawRow>,
    {
        let mut stats = LoadStats::default();
        let mut recipes = Vec::new();
        let mut rows = rows.into_iter().peekable();

        loop {
            if recipes.len() >= max_recipes {
                stats.capped = rows.peek().is_some();
                break;
            }
            let Some(row) = rows.next() else {
                break;
            };
            let ordinal = stats.rows_read;
            stats.rows_read += 1;

            match normalize(&row, ordinal) {
                Ok(recipe) => recipes.push(recipe),
                Err(reason) => {
                    stats.rejected += 1;
                    debug!(ordinal, %reason, "row rejected");
                }
            }

            if stats.rows_read % 1000 == 0 {
                info!(rows_read = stats.rows_read, accepted = recipes.len(), "loading recipes");
            }
        }

        stats.accepted = recipes.len();
        let catalog = Self::from_recipes(recipes);
        stats.duplicates = stats.accepted - catalog.by_id.len();
        (catalog, stats)
    }

    pub fn from_recipes(recipes: Vec<Recipe>) -> Self {
        let by_id = recipes
            .iter()
            .enumerate()
            .map(|(idx, r)| (r.id.clone(), idx))
            .collect();

        let categories = recipes
            .iter()
            .map(|r| r.category.trim())
            .filter(|c| !c.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();

        Self {
            recipes,
            by_id,
            categories,
        }
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Recipe at a catalog position, as used by the similarity model.
    pub fn at(&self, position: usize) -> Option<&Recipe> {
        self.recipes.get(position)
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Recipe> {
        self.by_id.get(id).map(|&idx| &self.recipes[idx])
    }

    /// Uniform sample without replacement of `min(n, len, SAMPLE_HARD_CAP)` recipes.
    pub fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<&Recipe> {
        let n = n.min(SAMPLE_HARD_CAP);
        self.recipes.choose_multiple(rng, n).collect()
    }

    /// Recipes whose category contains `needle`, ignoring case. When more than
    /// `limit` match, a random subset of `limit` is returned; otherwise all
    /// matches in catalog order.
    pub fn by_category<R: Rng + ?Sized>(
        &self,
        needle: &str,
        limit: usize,
        rng: &mut R,
    ) -> Vec<&Recipe> {
        let needle = needle.trim().to_lowercase();
        let limit = limit.min(SAMPLE_HARD_CAP);
        let matches: Vec<&Recipe> = self
            .recipes
            .iter()
            .filter(|r| r.category.to_lowercase().contains(&needle))
            .collect();

        if matches.len() > limit {
            matches.choose_multiple(rng, limit).copied().collect()
        } else {
            matches
        }
    }

    /// Distinct non-empty categories, sorted.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }
}
