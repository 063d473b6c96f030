pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::jobs::handlers as jobs;
use crate::resume::handlers as resume;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/resume/extract",
            post(resume::handle_extract_resume)
                .layer(DefaultBodyLimit::max(resume::MAX_RESUME_BYTES)),
        )
        .route("/api/v1/jobs/search", post(jobs::handle_search))
        .route("/api/v1/jobs/recommend", post(jobs::handle_recommend))
        .with_state(state)
}
