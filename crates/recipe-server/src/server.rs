/// MCP server over the recipe catalog.
///
/// Exposes five tools:
/// - `search_recipes`: Rank recipes by ingredient overlap
/// - `get_recipe`: Look up one recipe by id
/// - `random_recipes`: Random sample for browsing
/// - `list_category`: Recipes whose category contains a term
/// - `list_categories`: Distinct category names
use std::sync::Arc;

use recipe_core::catalog::SAMPLE_HARD_CAP;
use recipe_core::service::{
    clamp_count, DEFAULT_CATEGORY_RECIPES, DEFAULT_RANDOM_COUNT, DEFAULT_TOP_N,
    MAX_RANDOM_COUNT, MAX_TOP_N,
};
use recipe_core::{Recipe, RecipeService, ScoredRecipe};
use rmcp::{
    Json, ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

// --- Tool parameters ---

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchRecipesParams {
    /// Ingredients on hand, one per entry (e.g. "chicken breast", "rice").
    pub ingredients: Vec<String>,
    /// Maximum number of results to return (default: 6, max: 50).
    pub top_n: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetRecipeParams {
    /// Recipe id as returned by the other tools.
    pub recipe_id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RandomRecipesParams {
    /// Number of recipes (default: 6, max: 20).
    pub count: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListCategoryParams {
    /// Case-insensitive fragment of a category name, such as "dessert".
    pub category: String,
    /// Maximum number of recipes (default: 20, max: 50).
    pub limit: Option<u32>,
}

// --- Tool responses ---

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct SearchRecipesResponse {
    pub results: Vec<ScoredRecipe>,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct RecipeListResponse {
    pub recipes: Vec<Recipe>,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

// --- MCP Server ---

#[derive(Clone)]
pub struct RecipeMcpServer {
    service: Arc<RecipeService>,
    tool_router: ToolRouter<RecipeMcpServer>,
}

impl RecipeMcpServer {
    pub fn new(service: Arc<RecipeService>) -> Self {
        Self {
            service,
            tool_router: Self::tool_router(),
        }
    }
}

fn recipe_list(recipes: Vec<&Recipe>) -> Json<RecipeListResponse> {
    Json(RecipeListResponse {
        recipes: recipes.into_iter().cloned().collect(),
    })
}

#[tool_router]
impl RecipeMcpServer {
    #[tool(description = "Find recipes that use the given ingredients. Returns recipes ranked by ingredient similarity, each with a similarityScore in [0, 1].")]
    async fn search_recipes(
        &self,
        Parameters(params): Parameters<SearchRecipesParams>,
    ) -> Result<Json<SearchRecipesResponse>, String> {
        let top_n = clamp_count(params.top_n.map(i64::from), DEFAULT_TOP_N, MAX_TOP_N);
        let results = self.service.search(&params.ingredients, top_n);
        debug!(hits = results.len(), "search_recipes");
        Ok(Json(SearchRecipesResponse { results }))
    }

    #[tool(description = "Get the full recipe (ingredients, instructions, nutrition) for a recipe id.")]
    async fn get_recipe(
        &self,
        Parameters(params): Parameters<GetRecipeParams>,
    ) -> Result<Json<Recipe>, String> {
        let recipe_id = params.recipe_id.trim();
        if recipe_id.is_empty() {
            return Err("recipe_id must not be empty".to_string());
        }

        self.service
            .get_by_id(recipe_id)
            .cloned()
            .map(Json)
            .ok_or_else(|| format!("recipe not found: {recipe_id}"))
    }

    #[tool(description = "Pick random recipes for browsing or inspiration.")]
    async fn random_recipes(
        &self,
        Parameters(params): Parameters<RandomRecipesParams>,
    ) -> Result<Json<RecipeListResponse>, String> {
        let count = clamp_count(
            params.count.map(i64::from),
            DEFAULT_RANDOM_COUNT,
            MAX_RANDOM_COUNT,
        );
        Ok(recipe_list(self.service.sample_random(count)))
    }

    #[tool(description = "List recipes whose category contains the given text (case-insensitive). Use list_categories to see what exists.")]
    async fn list_category(
        &self,
        Parameters(params): Parameters<ListCategoryParams>,
    ) -> Result<Json<RecipeListResponse>, String> {
        let category = params.category.trim();
        if category.is_empty() {
            return Err("category must not be empty".to_string());
        }

        let limit = clamp_count(
            params.limit.map(i64::from),
            DEFAULT_CATEGORY_RECIPES,
            SAMPLE_HARD_CAP,
        );
        Ok(recipe_list(self.service.by_category(category, limit)))
    }

    #[tool(description = "List recipe category names, sorted alphabetically.")]
    async fn list_categories(&self) -> Result<Json<CategoriesResponse>, String> {
        Ok(Json(CategoriesResponse {
            categories: self.service.list_categories(),
        }))
    }
}

#[tool_handler]
impl ServerHandler for RecipeMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            server_info: Implementation {
                name: "recipe-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Recipe catalog MCP server. Use search_recipes with a list of ingredients \
                 to find matching recipes, get_recipe for full details by id, \
                 list_categories and list_category to browse by category, and \
                 random_recipes for suggestions."
                    .to_string(),
            ),
        }
    }
}
