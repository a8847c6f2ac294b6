/// Query surface over a loaded catalog and its similarity model.
///
/// A `RecipeService` is built once at startup and shared read-only between
/// request handlers. Reloading means building a new service.
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::{Catalog, LoadStats, DEFAULT_MAX_RECIPES};
use crate::error::CoreError;
use crate::model::{Recipe, ScoredRecipe};
use crate::similarity::{rank, SimilarityModel, SimilarityStrategy};
use crate::source::RowReader;

pub const DEFAULT_TOP_N: usize = 6;
pub const MAX_TOP_N: usize = 50;
pub const DEFAULT_RANDOM_COUNT: usize = 6;
pub const MAX_RANDOM_COUNT: usize = 20;
pub const DEFAULT_CATEGORY_RECIPES: usize = 20;
pub const DEFAULT_CATEGORY_LIMIT: usize = 15;

const SELF_CHECK_QUERY: &str = "chicken";

/// Resolve a caller-supplied count. Missing or non-positive values mean
/// `default`; anything above `max` is cut to `max`.
pub fn clamp_count(requested: Option<i64>, default: usize, max: usize) -> usize {
    match requested {
        Some(n) if n >= 1 => usize::try_from(n).unwrap_or(max).min(max),
        _ => default.min(max),
    }
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub max_recipes: usize,
    pub similarity: SimilarityStrategy,
    /// How many categories `list_categories` returns.
    pub category_limit: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            max_recipes: DEFAULT_MAX_RECIPES,
            similarity: SimilarityStrategy::default(),
            category_limit: DEFAULT_CATEGORY_LIMIT,
        }
    }
}

/// Health report. Keys stay snake_case on the wire, unlike recipe records.
#[derive(Debug, Clone, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub dataset_loaded: bool,
    pub recipe_count: usize,
    pub categories_count: usize,
    pub similarity: SimilarityStrategy,
    pub load: LoadStats,
}

pub struct RecipeService {
    catalog: Catalog,
    model: Box<dyn SimilarityModel>,
    stats: LoadStats,
    options: LoadOptions,
}

impl RecipeService {
    /// Read the CSV at `path`, build the catalog and similarity model.
    ///
    /// Fails when the file is missing or unreadable, or when no row survives
    /// normalization.
    pub fn load(path: &Path, options: LoadOptions) -> Result<Self, CoreError> {
        info!(
            path = %path.display(),
            max_recipes = options.max_recipes,
            similarity = %options.similarity,
            "loading recipe dataset"
        );

        let mut rows = RowReader::open(path)?;
        let (catalog, mut stats) = Catalog::load(rows.by_ref(), options.max_recipes);
        stats.rows_read += rows.skipped();
        stats.rejected += rows.skipped();

        if catalog.is_empty() {
            return Err(CoreError::Empty {
                path: path.to_path_buf(),
                rows_read: stats.rows_read,
            });
        }

        Ok(Self::from_catalog(catalog, stats, options))
    }

    pub fn from_catalog(catalog: Catalog, stats: LoadStats, options: LoadOptions) -> Self {
        let model = options.similarity.build(catalog.recipes());
        let service = Self {
            catalog,
            model,
            stats,
            options,
        };

        info!(
            recipes = service.catalog.len(),
            categories = service.catalog.categories().len(),
            rows_read = stats.rows_read,
            rejected = stats.rejected,
            duplicates = stats.duplicates,
            capped = stats.capped,
            similarity = %service.model.strategy(),
            "recipe catalog ready"
        );

        let hits = service.search(&[SELF_CHECK_QUERY.to_string()], 3);
        info!(query = SELF_CHECK_QUERY, hits = hits.len(), "startup self-check search");

        service
    }

    /// Recipes most similar to the query ingredients, best first, each carrying
    /// its score. Blank entries are ignored; an empty query returns nothing.
    pub fn search(&self, ingredients: &[String], top_n: usize) -> Vec<ScoredRecipe> {
        let query: Vec<String> = ingredients
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if query.is_empty() {
            return Vec::new();
        }

        let ranked = rank(self.model.score(&query), top_n.min(MAX_TOP_N));
        debug!(?query, hits = ranked.len(), "ingredient search");

        ranked
            .into_iter()
            .filter_map(|(position, score)| {
                self.catalog.at(position).map(|recipe| ScoredRecipe {
                    recipe: recipe.clone(),
                    similarity_score: score,
                })
            })
            .collect()
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Recipe> {
        self.catalog.get_by_id(id.trim())
    }

    pub fn sample_random(&self, count: usize) -> Vec<&Recipe> {
        self.catalog.sample(count, &mut rand::thread_rng())
    }

    pub fn by_category(&self, category: &str, limit: usize) -> Vec<&Recipe> {
        self.catalog
            .by_category(category, limit, &mut rand::thread_rng())
    }

    /// Sorted distinct categories, at most `category_limit` of them.
    pub fn list_categories(&self) -> Vec<String> {
        self.catalog
            .categories()
            .iter()
            .take(self.options.category_limit)
            .cloned()
            .collect()
    }

    pub fn health(&self) -> Health {
        Health {
            status: "healthy",
            dataset_loaded: !self.catalog.is_empty(),
            recipe_count: self.catalog.len(),
            categories_count: self.catalog.categories().len(),
            similarity: self.model.strategy(),
            load: self.stats,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn stats(&self) -> LoadStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::model::Difficulty;

    const HEADER: [&str; 16] = [
        "RecipeId",
        "Name",
        "RecipeIngredientParts",
        "RecipeIngredientQuantities",
        "RecipeInstructions",
        "Images",
        "TotalTime",
        "CookTime",
        "RecipeServings",
        "AggregatedRating",
        "RecipeCategory",
        "Calories",
        "ProteinContent",
        "FatContent",
        "CarbohydrateContent",
        "Description",
    ];

    struct Row<'a> {
        id: &'a str,
        category: &'a str,
        parts: &'a str,
        quantities: &'a str,
        instructions: &'a str,
    }

    fn write_csv(rows: &[Row]) -> NamedTempFile {
        let file = NamedTempFile::new().unwrap();
        let mut writer = csv::Writer::from_path(file.path()).unwrap();
        writer.write_record(HEADER).unwrap();
        for row in rows {
            let name = format!("Recipe {}", row.id);
            writer
                .write_record([
                    row.id,
                    name.as_str(),
                    row.parts,
                    row.quantities,
                    row.instructions,
                    r#"c("https://img.example.com/1.jpg")"#,
                    "PT45M",
                    "PT30M",
                    "6",
                    "",
                    row.category,
                    "250.5",
                    "12",
                    "nan",
                    "",
                    "",
                ])
                .unwrap();
        }
        writer.flush().unwrap();
        file
    }

    fn fixture() -> NamedTempFile {
        write_csv(&[
            Row {
                id: "101",
                category: "Chicken Breast",
                parts: r#"c("chicken breast", "rice", "garlic")"#,
                quantities: r#"c("2", "1 cup", NA)"#,
                instructions: r#"c("Season the chicken.", "Cook the rice.", "Serve.")"#,
            },
            Row {
                id: "102",
                category: "Dessert",
                parts: r#"c("flour", "sugar")"#,
                quantities: r#"c("2 cups", "1")"#,
                instructions: "",
            },
            Row {
                id: "103",
                category: "Rice",
                parts: r#"c("rice", "peas")"#,
                quantities: r#"c("1 cup", "1/2 cup")"#,
                instructions: "Boil the rice. Stir in peas.",
            },
        ])
    }

    fn load(file: &NamedTempFile, similarity: SimilarityStrategy) -> RecipeService {
        RecipeService::load(
            file.path(),
            LoadOptions {
                similarity,
                ..LoadOptions::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn test_load_drops_row_without_instructions() {
        let file = fixture();
        let service = load(&file, SimilarityStrategy::Lexical);
        assert_eq!(service.catalog().len(), 2);
        assert!(service.get_by_id("102").is_none());
        assert_eq!(service.stats().rejected, 1);

        let recipe = service.get_by_id("101").unwrap();
        assert_eq!(recipe.ingredients, vec!["2 chicken breast", "1 cup rice", "garlic"]);
        assert_eq!(recipe.cook_time_minutes, 45);
        assert_eq!(recipe.difficulty, Difficulty::Medium);
        assert_eq!(recipe.servings, 6);
        assert_eq!(recipe.nutrition.fat, None);
        assert_eq!(recipe.image_url, "https://img.example.com/1.jpg");
    }

    #[test]
    fn test_get_by_id_is_deterministic() {
        let file = fixture();
        let service = load(&file, SimilarityStrategy::Lexical);
        let first = service.get_by_id("103").cloned();
        let second = service.get_by_id(" 103 ").cloned();
        assert!(first.is_some());
        assert_eq!(first, second);
        assert!(service.get_by_id("999").is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let result = RecipeService::load(
            &PathBuf::from("/nonexistent/recipes.csv"),
            LoadOptions::default(),
        );
        assert!(matches!(result, Err(CoreError::NotFound(_))));
    }

    #[test]
    fn test_load_with_no_usable_rows() {
        let file = write_csv(&[Row {
            id: "1",
            category: "Dessert",
            parts: "",
            quantities: "",
            instructions: "Mix.",
        }]);
        let result = RecipeService::load(file.path(), LoadOptions::default());
        assert!(matches!(result, Err(CoreError::Empty { rows_read: 1, .. })));
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        let file = fixture();
        for strategy in [SimilarityStrategy::Lexical, SimilarityStrategy::TfIdf] {
            let service = load(&file, strategy);
            assert!(service.search(&[], 6).is_empty());
            assert!(service.search(&["  ".to_string()], 6).is_empty());
        }
    }

    #[test]
    fn test_search_without_matches() {
        let file = write_csv(&[Row {
            id: "1",
            category: "Dessert",
            parts: r#"c("flour", "sugar")"#,
            quantities: "",
            instructions: "Bake.",
        }]);
        for strategy in [SimilarityStrategy::Lexical, SimilarityStrategy::TfIdf] {
            let service = load(&file, strategy);
            assert!(service.search(&["chicken".to_string()], 3).is_empty());
        }
    }

    #[test]
    fn test_search_ranks_and_attaches_scores() {
        let file = fixture();
        for strategy in [SimilarityStrategy::Lexical, SimilarityStrategy::TfIdf] {
            let service = load(&file, strategy);
            let results = service.search(&["chicken".to_string(), "garlic".to_string()], 6);
            assert_eq!(results.len(), 1, "{strategy}");
            assert_eq!(results[0].recipe.id, "101");
            assert!(results[0].similarity_score > 0.0 && results[0].similarity_score <= 1.0);

            let rice = service.search(&["rice".to_string()], 1);
            assert_eq!(rice.len(), 1);
        }
    }

    #[test]
    fn test_equal_scores_keep_catalog_order() {
        let rows: Vec<Row> = ["5", "3", "9", "1"]
            .into_iter()
            .map(|id| Row {
                id,
                category: "Soup",
                parts: r#"c("tomato", "basil")"#,
                quantities: "",
                instructions: "Simmer.",
            })
            .collect();
        let file = write_csv(&rows);
        for strategy in [SimilarityStrategy::Lexical, SimilarityStrategy::TfIdf] {
            let service = load(&file, strategy);
            let ids: Vec<String> = service
                .search(&["tomato".to_string()], 6)
                .into_iter()
                .map(|r| r.recipe.id)
                .collect();
            assert_eq!(ids, vec!["5", "3", "9", "1"]);

            let top: Vec<String> = service
                .search(&["tomato".to_string()], 2)
                .into_iter()
                .map(|r| r.recipe.id)
                .collect();
            assert_eq!(top, vec!["5", "3"]);
        }
    }

    #[test]
    fn test_categories_sorted_and_capped() {
        let rows: Vec<Row> = ["Stew", "Bread", "Stew", "Apple", "Curry"]
            .into_iter()
            .enumerate()
            .map(|(i, category)| Row {
                id: ["1", "2", "3", "4", "5"][i],
                category,
                parts: r#"c("water")"#,
                quantities: "",
                instructions: "Boil.",
            })
            .collect();
        let file = write_csv(&rows);
        let service = RecipeService::load(
            file.path(),
            LoadOptions {
                category_limit: 3,
                ..LoadOptions::default()
            },
        )
        .unwrap();
        assert_eq!(service.list_categories(), vec!["Apple", "Bread", "Curry"]);
        assert_eq!(service.health().categories_count, 4);
    }

    #[test]
    fn test_random_and_category_queries() {
        let file = fixture();
        let service = load(&file, SimilarityStrategy::Lexical);
        assert_eq!(service.sample_random(6).len(), 2);
        assert!(service.sample_random(0).is_empty());

        let chicken = service.by_category("chicken", 20);
        assert_eq!(chicken.len(), 1);
        assert_eq!(chicken[0].id, "101");
        assert!(service.by_category("seafood", 20).is_empty());
    }

    #[test]
    fn test_clamp_count() {
        assert_eq!(clamp_count(None, DEFAULT_TOP_N, MAX_TOP_N), 6);
        assert_eq!(clamp_count(Some(0), DEFAULT_TOP_N, MAX_TOP_N), 6);
        assert_eq!(clamp_count(Some(-3), DEFAULT_TOP_N, MAX_TOP_N), 6);
        assert_eq!(clamp_count(Some(10), DEFAULT_TOP_N, MAX_TOP_N), 10);
        assert_eq!(clamp_count(Some(500), DEFAULT_RANDOM_COUNT, MAX_RANDOM_COUNT), 20);
        assert_eq!(clamp_count(Some(i64::MAX), DEFAULT_TOP_N, MAX_TOP_N), 50);
    }

    #[test]
    fn test_health_reports_counts() {
        let file = fixture();
        let health = load(&file, SimilarityStrategy::TfIdf).health();
        assert!(health.dataset_loaded);
        assert_eq!(health.recipe_count, 2);
        assert_eq!(health.similarity, SimilarityStrategy::TfIdf);
        assert_eq!(health.load.rows_read, 3);
    }

    #[test]
    fn test_health_keys_are_snake_case() {
        let file = fixture();
        let health = load(&file, SimilarityStrategy::Lexical).health();
        let value = serde_json::to_value(health).unwrap();
        assert_eq!(value["dataset_loaded"], true);
        assert_eq!(value["recipe_count"], 2);
        assert!(value["categories_count"].is_number());
        assert_eq!(value["load"]["rows_read"], 3);
        assert_eq!(value["load"]["capped"], false);
        assert!(value.get("datasetLoaded").is_none());
    }
}
