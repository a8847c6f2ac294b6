use std::sync::Arc;

use recipe_core::model::{Difficulty, Nutrition, Recipe};
use recipe_core::{Catalog, LoadOptions, LoadStats, RecipeService};

pub fn recipe(id: &str, category: &str, ingredients: &[&str]) -> Recipe {
    Recipe {
        id: id.to_string(),
        title: format!("Recipe {id}"),
        description: "Delicious recipe".to_string(),
        image_url: "https://img.example.com/r.jpg".to_string(),
        cook_time_minutes: 25,
        servings: 4,
        rating: 4.4,
        category: category.to_string(),
        difficulty: Difficulty::Easy,
        ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
        instructions: vec!["Cook.".to_string()],
        nutrition: Nutrition::default(),
    }
}

/// Five recipes across four categories; two contain chicken.
pub fn service() -> Arc<RecipeService> {
    let recipes = vec![
        recipe("1", "Chicken Breast", &["2 chicken breasts", "1 cup rice"]),
        recipe("2", "Dessert", &["2 cups flour", "1 cup sugar"]),
        recipe("3", "Frozen Desserts", &["2 cups blueberries", "1 cup yogurt"]),
        recipe("4", "Stew", &["1 lb beef", "2 carrots", "1 onion"]),
        recipe("5", "Chicken", &["4 chicken thighs", "soy sauce"]),
    ];
    let stats = LoadStats {
        rows_read: recipes.len(),
        accepted: recipes.len(),
        ..LoadStats::default()
    };
    Arc::new(RecipeService::from_catalog(
        Catalog::from_recipes(recipes),
        stats,
        LoadOptions::default(),
    ))
}
