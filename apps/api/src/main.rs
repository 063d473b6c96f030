mod cache;
mod config;
mod errors;
mod index;
mod jobs;
mod llm_client;
mod models;
mod resume;
mod routes;
mod search;
mod state;

#[cfg(test)]
mod testing;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cache::CacheStore;
use crate::config::Config;
use crate::index::embedder::HttpEmbedder;
use crate::index::VectorIndex;
use crate::jobs::recommender::Recommender;
use crate::jobs::retriever::JobRetriever;
use crate::llm_client::GroqClient;
use crate::resume::extractor::ResumeExtractor;
use crate::routes::build_router;
use crate::search::{BrowserSearch, TavilySearch};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Fails fast when the Groq or Tavily key is missing
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting jobfinder v{}", env!("CARGO_PKG_VERSION"));

    let llm = Arc::new(GroqClient::new(config.groq_api_key.clone())?);
    info!(
        "LLM client initialized (chat: {}, search: {})",
        llm_client::CHAT_MODEL,
        llm_client::SEARCH_MODEL
    );

    let cache = Arc::new(CacheStore::open(&config.cache_file).await?);
    if cache.is_empty().await {
        info!("Starting with an empty result cache at {}", cache.path().display());
    } else {
        info!(
            "Result cache loaded from {} ({} entries)",
            cache.path().display(),
            cache.len().await
        );
    }

    let embedder = HttpEmbedder::new(
        &config.embedding_api_url,
        config.embedding_model.clone(),
        config.embedding_api_key.clone(),
    )?;
    info!("Embedding {} via {}", config.embedding_model, embedder.endpoint());

    let index = Arc::new(VectorIndex::new(&config.index_dir, Arc::new(embedder)));
    if index.exists() {
        info!(
            "Vector index at {} holds {} documents",
            index.dir().display(),
            index.len().await?
        );
    } else {
        info!("No vector index at {} yet", index.dir().display());
    }

    let retriever = JobRetriever::new(
        cache,
        index.clone(),
        Arc::new(BrowserSearch::new(llm.clone())),
        Arc::new(TavilySearch::new(config.tavily_api_key.clone())?),
    );

    let state = AppState {
        retriever: Arc::new(retriever),
        recommender: Arc::new(Recommender::new(index, llm.clone())),
        resume_extractor: Arc::new(ResumeExtractor::new(llm)),
        pipeline: Arc::new(Mutex::new(())),
        default_top_k: config.top_k,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
