//! Recommender: similarity search over the index, then LLM synthesis.
//! The model's answer is returned verbatim.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::index::{IndexError, VectorIndex};
use crate::jobs::prompts::RECOMMEND_PROMPT;
use crate::llm_client::prompts::render;
use crate::llm_client::{CompletionRequest, LanguageModel, LlmError, CHAT_MODEL};

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("{0}")]
    Index(#[from] IndexError),

    #[error("recommendation synthesis failed: {0}")]
    Llm(#[from] LlmError),
}

pub struct Recommender {
    index: Arc<VectorIndex>,
    llm: Arc<dyn LanguageModel>,
}

impl Recommender {
    pub fn new(index: Arc<VectorIndex>, llm: Arc<dyn LanguageModel>) -> Self {
        Self { index, llm }
    }

    pub async fn recommend(&self, profile_text: &str, top_k: usize) -> Result<String, RecommendError> {
        let documents = self.index.query_similar(profile_text, top_k).await?;
        info!(
            "Recommending from {} indexed postings (top_k={top_k})",
            documents.len()
        );

        let job_listings = documents
            .iter()
            .map(|d| d.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let prompt = render(
            RECOMMEND_PROMPT,
            &[
                ("user_profile", profile_text),
                ("job_listings", job_listings.as_str()),
            ],
        );

        let request = CompletionRequest::user(CHAT_MODEL, prompt).temperature(0.7);
        Ok(self.llm.complete(&request).await?)
    }
}
