//! Resume field extractor: PDF text → LLM → profile fields.
//!
//! Never fails: any problem (unreadable PDF, LLM error, non-JSON answer)
//! yields `UserProfile::not_found()` and a warning in the logs.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::llm_client::prompts::render;
use crate::llm_client::{parse_json, CompletionRequest, LanguageModel, LlmError, CHAT_MODEL};
use crate::models::UserProfile;
use crate::resume::prompts::RESUME_PARSE_PROMPT;

const MAX_TOKENS: u32 = 512;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF text extraction failed: {0}")]
    Pdf(String),

    #[error("PDF extraction task aborted: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub struct ResumeExtractor {
    llm: Arc<dyn LanguageModel>,
}

impl ResumeExtractor {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self { llm }
    }

    pub async fn extract(&self, pdf_bytes: Vec<u8>) -> UserProfile {
        match read_pdf(pdf_bytes).await {
            Ok(text) => self.extract_from_text(&text).await,
            Err(e) => {
                warn!("Resume parsing failed, returning placeholders: {e}");
                UserProfile::not_found()
            }
        }
    }

    /// Same as `extract` for text that has already been pulled out of a PDF.
    pub async fn extract_from_text(&self, text: &str) -> UserProfile {
        match self.parse_fields(text).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!("Resume parsing failed, returning placeholders: {e}");
                UserProfile::not_found()
            }
        }
    }

    async fn parse_fields(&self, text: &str) -> Result<UserProfile, LlmError> {
        let prompt = render(RESUME_PARSE_PROMPT, &[("resume_text", text)]);
        let request = CompletionRequest::user(CHAT_MODEL, prompt)
            .temperature(0.0)
            .max_tokens(MAX_TOKENS);
        let reply = self.llm.complete(&request).await?;
        parse_json(&reply)
    }
}

async fn read_pdf(pdf_bytes: Vec<u8>) -> Result<String, ExtractError> {
    // pdf-extract is CPU-bound and panics on some malformed files; a
    // blocking task contains both.
    let text = tokio::task::spawn_blocking(move || pdf_text(&pdf_bytes)).await??;
    debug!("Extracted {} chars of resume text", text.len());
    Ok(text)
}

/// Text of every page that yielded any, each followed by a newline.
fn pdf_text(pdf_bytes: &[u8]) -> Result<String, ExtractError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
        .map_err(|e| ExtractError::Pdf(e.to_string()))?;
    Ok(join_pages(pages))
}

fn join_pages(pages: Vec<String>) -> String {
    pages
        .into_iter()
        .filter(|page| !page.trim().is_empty())
        .fold(String::new(), |mut text, page| {
            text.push_str(&page);
            text.push('\n');
            text
        })
}
