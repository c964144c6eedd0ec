use axum::routing::{get, post};
use axum::Router;
use tracing_subscriber::EnvFilter;

use catechism_search::api;
use catechism_search::config::Config;
use catechism_search::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!("Data directory: {}", config.data_dir.display());
    tracing::info!("LLM provider: {} ({})", config.llm.provider, config.llm.base_url);

    let state = AppState::new(config.clone())?;
    tracing::info!(
        corpus = state.store.corpus_len(),
        vectors = state.store.vector_count(),
        "Corpus loaded"
    );

    let app = Router::new()
        .route("/api/health", get(api::health))
        .route("/api/search", post(api::search::search))
        .route("/api/paragraphs/{reference}", get(api::paragraphs::lookup))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
