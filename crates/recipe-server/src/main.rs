mod config;
mod error;
mod http;
mod server;
#[cfg(test)]
mod testing;

use std::sync::Arc;

use recipe_core::RecipeService;
use rmcp::{ServiceExt, transport::stdio};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{Config, Transport};
use error::AppError;
use server::RecipeMcpServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries MCP JSON-RPC in stdio mode
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting recipe server");

    let config = Config::from_env()?;
    info!(
        data_path = %config.data_path.display(),
        max_recipes = config.max_recipes,
        similarity = %config.similarity,
        transport = ?config.transport,
        "configuration loaded"
    );

    // Parsing and model building are CPU-bound
    let path = config.data_path.clone();
    let options = config.load_options();
    let service = tokio::task::spawn_blocking(move || {
        RecipeService::load(&path, options).map_err(AppError::from)
    })
    .await??;
    let service = Arc::new(service);

    match config.transport {
        Transport::Http => {
            http::serve(config.http_addr, service).await?;
        }
        Transport::Stdio => {
            let server = RecipeMcpServer::new(service);
            info!("MCP server ready, serving on stdio");
            let running = server.serve(stdio()).await.inspect_err(|e| {
                tracing::error!(error = %e, "MCP server error");
            })?;
            running.waiting().await?;
            info!("MCP server shut down");
        }
    }
    Ok(())
}
