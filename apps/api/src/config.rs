use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_CACHE_FILE: &str = "cache/job_results_cache.json";
const DEFAULT_INDEX_DIR: &str = "job_index";
const DEFAULT_EMBEDDING_API_URL: &str = "http://localhost:8081/v1";
const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Application configuration loaded from environment variables.
/// Startup fails if the language-model or search credentials are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: String,
    pub tavily_api_key: String,
    pub cache_file: PathBuf,
    pub index_dir: PathBuf,
    pub embedding_api_url: String,
    pub embedding_model: String,
    /// Local embedding servers usually run without auth.
    pub embedding_api_key: Option<String>,
    pub top_k: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            groq_api_key: require_env("GROQ_API_KEY")?,
            tavily_api_key: require_env("TAVILY_API_KEY")?,
            cache_file: optional_env("CACHE_FILE")
                .unwrap_or_else(|| DEFAULT_CACHE_FILE.to_string())
                .into(),
            index_dir: optional_env("INDEX_DIR")
                .unwrap_or_else(|| DEFAULT_INDEX_DIR.to_string())
                .into(),
            embedding_api_url: optional_env("EMBEDDING_API_URL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_API_URL.to_string()),
            embedding_model: optional_env("EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            embedding_api_key: optional_env("EMBEDDING_API_KEY"),
            top_k: std::env::var("TOP_K")
                .unwrap_or_else(|_| "5".to_string())
                .parse::<usize>()
                .context("TOP_K must be a positive integer")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    let value = std::env::var(key)
        .with_context(|| format!("Required environment variable '{key}' is not set"))?;
    anyhow::ensure!(
        !value.trim().is_empty(),
        "Required environment variable '{key}' is empty"
    );
    Ok(value)
}

/// Unset and blank values are treated the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
