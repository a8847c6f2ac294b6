pub mod catalog;
pub mod error;
pub mod field;
pub mod model;
pub mod normalize;
pub mod service;
pub mod similarity;
pub mod source;

pub use catalog::{Catalog, LoadStats};
pub use error::CoreError;
pub use model::{Difficulty, Nutrition, RawRow, Recipe, ScoredRecipe};
pub use service::{Health, LoadOptions, RecipeService};
pub use similarity::SimilarityStrategy;
