//! Axum route handlers for the job search API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::jobs::retriever::PostingSource;
use crate::models::{JobPosting, UserProfile};
use crate::search::SearchFailure;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub postings: Vec<JobPosting>,
    pub source: PostingSource,
    pub search_failures: Vec<SearchFailure>,
    pub recommendations: String,
}

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub profile_text: String,
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub recommendations: String,
}

fn resolve_top_k(requested: Option<usize>, default: usize) -> Result<usize, AppError> {
    match requested.unwrap_or(default) {
        0 => Err(AppError::Validation("top_k must be at least 1".to_string())),
        k => Ok(k),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jobs/search
///
/// Full pipeline: cache lookup → search (with fallback) → index → recommend.
/// Runs one request at a time so index writes never interleave.
pub async fn handle_search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    if request.profile.is_blank() {
        return Err(AppError::Validation(
            "at least one profile field must be filled in".to_string(),
        ));
    }
    let top_k = resolve_top_k(request.top_k, state.default_top_k)?;

    let _guard = state.pipeline.lock().await;

    let retrieval = state.retriever.fetch_or_retrieve(&request.profile).await?;
    info!(
        "Retrieved {} postings ({:?})",
        retrieval.postings.len(),
        retrieval.source
    );

    let recommendations = state
        .recommender
        .recommend(&request.profile.describe(), top_k)
        .await?;

    Ok(Json(SearchResponse {
        postings: retrieval.postings,
        source: retrieval.source,
        search_failures: retrieval.search_failures,
        recommendations,
    }))
}

/// POST /api/v1/jobs/recommend
///
/// Recommends from whatever is already indexed, without searching.
pub async fn handle_recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> Result<Json<RecommendResponse>, AppError> {
    if request.profile_text.trim().is_empty() {
        return Err(AppError::Validation(
            "profile_text cannot be empty".to_string(),
        ));
    }
    let top_k = resolve_top_k(request.top_k, state.default_top_k)?;

    let recommendations = state
        .recommender
        .recommend(&request.profile_text, top_k)
        .await?;

    Ok(Json(RecommendResponse { recommendations }))
}
