use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use recipe_core::catalog::DEFAULT_MAX_RECIPES;
use recipe_core::service::DEFAULT_CATEGORY_LIMIT;
use recipe_core::{LoadOptions, SimilarityStrategy};

use crate::error::AppError;

const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:5000";

/// Which surface the process serves once the catalog is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Http,
    /// MCP tools over stdin/stdout.
    Stdio,
}

impl FromStr for Transport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Transport::Http),
            "stdio" | "mcp" => Ok(Transport::Stdio),
            other => Err(format!(
                "unknown transport '{other}' (expected 'http' or 'stdio')"
            )),
        }
    }
}

/// Application configuration loaded explicitly from environment variables.
///
/// The dataset path has no default; everything else does.
#[derive(Debug, Clone)]
pub struct Config {
    /// Recipe CSV to load at startup.
    pub data_path: PathBuf,
    pub max_recipes: usize,
    pub similarity: SimilarityStrategy,
    /// How many categories the category listing shows.
    pub category_limit: usize,
    pub http_addr: SocketAddr,
    pub transport: Transport,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `RECIPE_DATA_PATH`: path to the recipe CSV
    ///
    /// Optional:
    /// - `RECIPE_MAX_RECIPES` (default 10000)
    /// - `RECIPE_SIMILARITY`: `lexical` or `tfidf` (default `lexical`)
    /// - `RECIPE_CATEGORY_LIMIT` (default 15)
    /// - `RECIPE_HTTP_ADDR` (default `0.0.0.0:5000`)
    /// - `RECIPE_TRANSPORT`: `http` or `stdio` (default `http`)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let data_path = lookup("RECIPE_DATA_PATH").map(PathBuf::from).ok_or_else(|| {
            AppError::Config("RECIPE_DATA_PATH environment variable is required".to_string())
        })?;
        if !data_path.is_file() {
            return Err(AppError::Config(format!(
                "recipe dataset not found at {}",
                data_path.display()
            )));
        }

        let max_recipes = parse_var(&lookup, "RECIPE_MAX_RECIPES", DEFAULT_MAX_RECIPES)?;
        let similarity = parse_var(&lookup, "RECIPE_SIMILARITY", SimilarityStrategy::default())?;
        let category_limit = parse_var(&lookup, "RECIPE_CATEGORY_LIMIT", DEFAULT_CATEGORY_LIMIT)?;
        let http_addr = match lookup("RECIPE_HTTP_ADDR") {
            Some(raw) => raw.trim().parse::<SocketAddr>().map_err(|e| {
                AppError::Config(format!("RECIPE_HTTP_ADDR '{raw}' is not a socket address: {e}"))
            })?,
            None => DEFAULT_HTTP_ADDR.parse::<SocketAddr>().map_err(|e| {
                AppError::Config(format!("default http address is invalid: {e}"))
            })?,
        };
        let transport = parse_var(&lookup, "RECIPE_TRANSPORT", Transport::Http)?;

        if max_recipes == 0 {
            return Err(AppError::Config(
                "RECIPE_MAX_RECIPES must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            data_path,
            max_recipes,
            similarity,
            category_limit,
            http_addr,
            transport,
        })
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            max_recipes: self.max_recipes,
            similarity: self.similarity,
            category_limit: self.category_limit,
        }
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{key}='{raw}': {e}"))),
        _ => Ok(default),
    }
}
