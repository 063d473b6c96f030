//! Axum route handlers for the resume API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;
use crate::models::UserProfile;
use crate::state::AppState;

/// Multipart field carrying the PDF.
pub const RESUME_FIELD: &str = "resume";
/// Upload size cap for the resume route.
pub const MAX_RESUME_BYTES: usize = 10 * 1024 * 1024;

/// POST /api/v1/resume/extract
///
/// Accepts a multipart upload with a `resume` PDF field and returns the
/// extracted profile. Unparseable resumes come back as "Not Found" fields,
/// not as an error.
pub async fn handle_extract_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UserProfile>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }

        let pdf: Bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("failed to read resume upload: {e}")))?;
        if pdf.is_empty() {
            return Err(AppError::Validation("resume file is empty".to_string()));
        }

        info!("Parsing uploaded resume ({} bytes)", pdf.len());
        let profile = state.resume_extractor.extract(pdf.to_vec()).await;
        return Ok(Json(profile));
    }

    Err(AppError::Validation(format!(
        "missing '{RESUME_FIELD}' file field"
    )))
}
