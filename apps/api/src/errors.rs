use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::index::IndexError;
use crate::jobs::recommender::RecommendError;
use crate::jobs::retriever::RetrieverError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// A precondition the operator must fix, e.g. no vector index yet.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("LLM error: {0}")]
    Llm(String),

    /// The embedding service failed or answered with unusable vectors.
    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<IndexError> for AppError {
    fn from(e: IndexError) -> Self {
        match e {
            IndexError::NotFound(_) => AppError::Configuration(e.to_string()),
            IndexError::Embed(_) | IndexError::DimensionMismatch { .. } => {
                AppError::Embedding(e.to_string())
            }
            other => AppError::Storage(other.to_string()),
        }
    }
}

impl From<RetrieverError> for AppError {
    fn from(e: RetrieverError) -> Self {
        match e {
            RetrieverError::Index(index) => index.into(),
            RetrieverError::Cache(cache) => AppError::Storage(cache.to_string()),
        }
    }
}

impl From<RecommendError> for AppError {
    fn from(e: RecommendError) -> Self {
        match e {
            RecommendError::Index(index) => index.into(),
            RecommendError::Llm(llm) => AppError::Llm(llm.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "CONFIGURATION_ERROR",
                    msg.clone(),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::Embedding(msg) => {
                tracing::error!("Embedding error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "EMBEDDING_ERROR",
                    "The embedding service is unavailable".to_string(),
                )
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A local storage error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::cache::CacheError;
    use crate::index::embedder::EmbedError;
    use crate::llm_client::LlmError;

    #[test]
    fn test_missing_index_maps_to_service_unavailable() {
        let err: AppError =
            RecommendError::Index(IndexError::NotFound(PathBuf::from("job_index"))).into();
        assert!(matches!(err, AppError::Configuration(ref m) if m.contains("job_index")));
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_llm_failure_maps_to_bad_gateway() {
        let err: AppError = RecommendError::Llm(LlmError::EmptyContent).into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_embedding_outage_during_indexing_maps_to_bad_gateway() {
        let outage = EmbedError::Api {
            status: 503,
            message: "model loading".to_string(),
        };
        let err: AppError = RetrieverError::Index(IndexError::Embed(outage)).into();
        assert!(matches!(err, AppError::Embedding(ref m) if m.contains("model loading")));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_cache_failure_stays_a_storage_error() {
        let err: AppError = RetrieverError::Cache(CacheError::Write {
            path: PathBuf::from("cache/jobs.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        })
        .into();
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_maps_to_bad_request() {
        let response = AppError::Validation("nope".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
