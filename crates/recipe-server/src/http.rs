/// JSON HTTP surface, mounted under `/api`.
///
/// Handlers are thin: parameter defaults and clamps live here, everything else
/// is a direct call into [`RecipeService`].
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{MatchedPath, Path, Query, State};
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use recipe_core::catalog::SAMPLE_HARD_CAP;
use recipe_core::service::{
    clamp_count, DEFAULT_CATEGORY_RECIPES, DEFAULT_RANDOM_COUNT, DEFAULT_TOP_N,
    MAX_RANDOM_COUNT, MAX_TOP_N,
};
use recipe_core::{Recipe, RecipeService};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Span};

use crate::error::AppError;

pub type AppState = Arc<RecipeService>;

/// Error body shared by every endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub ingredients: Option<Vec<String>>,
    pub top_n: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CountQuery {
    pub count: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

pub fn router(service: AppState) -> Router {
    let api = Router::new()
        .route("/recipes", get(list_recipes))
        .route("/recipes/search", post(search_recipes))
        .route("/recipes/random", get(random_recipes))
        .route("/recipes/categories", get(list_categories))
        .route("/recipes/by-category/{category}", get(recipes_by_category))
        .route("/recipes/{id}", get(get_recipe))
        .route("/health", get(health));

    Router::new()
        .nest("/api", api)
        .with_state(service)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let path = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map(MatchedPath::as_str)
                        .unwrap_or(request.uri().path());
                    tracing::info_span!("http_request", method = %request.method(), path = %path)
                })
                .on_request(|_request: &Request<_>, _span: &Span| {})
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &Span| {
                        tracing::info!(
                            status = response.status().as_u16(),
                            latency_ms = latency.as_millis() as u64,
                            "request completed"
                        );
                    },
                ),
        )
}

pub async fn serve(addr: SocketAddr, service: AppState) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(listen_addr = %listener.local_addr()?, "HTTP server ready");
    axum::serve(listener, router(service)).await?;
    Ok(())
}

fn owned(recipes: Vec<&Recipe>) -> Vec<Recipe> {
    recipes.into_iter().cloned().collect()
}

/// Random sample for the landing page.
pub async fn list_recipes(State(service): State<AppState>) -> Response {
    Json(owned(service.sample_random(SAMPLE_HARD_CAP))).into_response()
}

pub async fn search_recipes(
    State(service): State<AppState>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(request)) = body else {
        return error_response(StatusCode::BAD_REQUEST, "Ingredients list is required");
    };
    let Some(ingredients) = request.ingredients else {
        return error_response(StatusCode::BAD_REQUEST, "Ingredients list is required");
    };

    let top_n = clamp_count(request.top_n, DEFAULT_TOP_N, MAX_TOP_N);
    Json(service.search(&ingredients, top_n)).into_response()
}

pub async fn get_recipe(State(service): State<AppState>, Path(id): Path<String>) -> Response {
    match service.get_by_id(&id) {
        Some(recipe) => Json(recipe.clone()).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "Recipe not found"),
    }
}

pub async fn random_recipes(
    State(service): State<AppState>,
    Query(query): Query<CountQuery>,
) -> Response {
    let count = clamp_count(query.count, DEFAULT_RANDOM_COUNT, MAX_RANDOM_COUNT);
    Json(owned(service.sample_random(count))).into_response()
}

pub async fn list_categories(State(service): State<AppState>) -> Response {
    Json(service.list_categories()).into_response()
}

pub async fn recipes_by_category(
    State(service): State<AppState>,
    Path(category): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Response {
    let limit = clamp_count(query.limit, DEFAULT_CATEGORY_RECIPES, SAMPLE_HARD_CAP);
    Json(owned(service.by_category(&category, limit))).into_response()
}

pub async fn health(State(service): State<AppState>) -> Response {
    Json(service.health()).into_response()
}
